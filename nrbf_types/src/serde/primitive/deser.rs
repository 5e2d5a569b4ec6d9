use crate::io_utils;
use crate::serde::{DateTime, Decimal, LengthPrefixedString, PrimitiveType, PrimitiveValue};
use crate::NrbfError;
use anyhow::Result;
use std::io::Read;
use std::str;

impl PrimitiveValue {
    pub fn deser(prim_type: PrimitiveType, r: &mut impl Read) -> Result<(usize, Self)> {
        let what = prim_type.type_name();
        let (r_len, val) = match prim_type {
            PrimitiveType::Boolean => {
                let [byte] = io_utils::read_array::<1>(r, what)?;
                let b = match byte {
                    0 => false,
                    1 => true,
                    _ => {
                        return Err(NrbfError::invalid_data(format!("Boolean byte {byte}")).into())
                    }
                };
                (1, Self::Boolean(b))
            }
            PrimitiveType::Byte => {
                let buf = io_utils::read_array::<1>(r, what)?;
                (buf.len(), Self::Byte(u8::from_le_bytes(buf)))
            }
            PrimitiveType::SByte => {
                let buf = io_utils::read_array::<1>(r, what)?;
                (buf.len(), Self::SByte(i8::from_le_bytes(buf)))
            }
            PrimitiveType::Char => {
                let (r_len, c) = Self::deser_utf8_char(r)?;
                (r_len, Self::Char(c))
            }
            PrimitiveType::Int16 => {
                let buf = io_utils::read_array::<2>(r, what)?;
                (buf.len(), Self::Int16(i16::from_le_bytes(buf)))
            }
            PrimitiveType::UInt16 => {
                let buf = io_utils::read_array::<2>(r, what)?;
                (buf.len(), Self::UInt16(u16::from_le_bytes(buf)))
            }
            PrimitiveType::Int32 => {
                let buf = io_utils::read_array::<4>(r, what)?;
                (buf.len(), Self::Int32(i32::from_le_bytes(buf)))
            }
            PrimitiveType::UInt32 => {
                let buf = io_utils::read_array::<4>(r, what)?;
                (buf.len(), Self::UInt32(u32::from_le_bytes(buf)))
            }
            PrimitiveType::Int64 => {
                let buf = io_utils::read_array::<8>(r, what)?;
                (buf.len(), Self::Int64(i64::from_le_bytes(buf)))
            }
            PrimitiveType::UInt64 => {
                let buf = io_utils::read_array::<8>(r, what)?;
                (buf.len(), Self::UInt64(u64::from_le_bytes(buf)))
            }
            PrimitiveType::Single => {
                let buf = io_utils::read_array::<4>(r, what)?;
                (buf.len(), Self::Single(f32::from_le_bytes(buf)))
            }
            PrimitiveType::Double => {
                let buf = io_utils::read_array::<8>(r, what)?;
                (buf.len(), Self::Double(f64::from_le_bytes(buf)))
            }
            PrimitiveType::TimeSpan => {
                let buf = io_utils::read_array::<8>(r, what)?;
                (buf.len(), Self::TimeSpan(i64::from_le_bytes(buf).into()))
            }
            PrimitiveType::DateTime => {
                let buf = io_utils::read_array::<8>(r, what)?;
                let dt = DateTime::from_date_data(u64::from_le_bytes(buf))?;
                (buf.len(), Self::DateTime(dt))
            }
            PrimitiveType::Decimal => {
                let (r_len, text) = LengthPrefixedString::deser(r)?;
                (r_len, Self::Decimal(Decimal::parse(&text)?))
            }
        };
        Ok((r_len, val))
    }

    fn deser_utf8_char(r: &mut impl Read) -> Result<(usize, char)> {
        let mut buf = [0u8; 4];
        io_utils::read_exact(r, &mut buf[..1], "Char")?;
        let width = match buf[0] {
            0x00..=0x7F => 1,
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            byte => {
                return Err(NrbfError::invalid_data(format!("Char lead byte {byte:#x}")).into())
            }
        };
        io_utils::read_exact(r, &mut buf[1..width], "Char")?;
        let c = str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| NrbfError::invalid_data("Char is not UTF-8"))?;
        Ok((width, c))
    }
}
