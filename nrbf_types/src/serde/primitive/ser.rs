use crate::io_utils;
use crate::serde::{LengthPrefixedString, PrimitiveValue, WriteLen};
use anyhow::Result;
use std::io::Write;

impl PrimitiveValue {
    /// Writes the untagged body. The caller is responsible for any type tag.
    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen> {
        let mut w_len = 0;
        match self {
            Self::Boolean(b) => io_utils::write_all(w, &[*b as u8], &mut w_len)?,
            Self::Byte(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::SByte(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::Char(c) => {
                let mut buf = [0u8; 4];
                let s = c.encode_utf8(&mut buf);
                io_utils::write_all(w, s.as_bytes(), &mut w_len)?;
            }
            Self::Int16(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::UInt16(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::Int32(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::UInt32(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::Int64(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::UInt64(i) => io_utils::write_all(w, &i.to_le_bytes(), &mut w_len)?,
            Self::Single(f) => io_utils::write_all(w, &f.to_le_bytes(), &mut w_len)?,
            Self::Double(f) => io_utils::write_all(w, &f.to_le_bytes(), &mut w_len)?,
            Self::TimeSpan(ts) => io_utils::write_all(w, &ts.ticks().to_le_bytes(), &mut w_len)?,
            Self::DateTime(dt) => {
                io_utils::write_all(w, &dt.to_date_data().to_le_bytes(), &mut w_len)?
            }
            Self::Decimal(dec) => w_len += *LengthPrefixedString::ser(&dec.to_string(), w)?,
        }
        Ok(WriteLen::new_manual(w_len))
    }
}
