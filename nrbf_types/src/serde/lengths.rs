use crate::io_utils;
use crate::serde::WriteLen;
use crate::NrbfError;
use anyhow::Result;
use derive_more::Deref;
use std::io::{Read, Write};

const MAX_7BIT_ENCODED_BYTES: usize = 5;

/// The 7-bit encoded length prefix of a `LengthPrefixedString`.
#[derive(Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct StringLen(u32);
impl StringLen {
    pub fn from_body(buf: &[u8]) -> Result<Self> {
        let len = i32::try_from(buf.len())
            .map_err(|_| NrbfError::overflow(format!("String of {} bytes", buf.len())))?;
        Ok(Self(len as u32))
    }

    pub fn deser(r: &mut impl Read) -> Result<(usize, Self)> {
        let mut int = 0u32;
        for byte_i in 0..MAX_7BIT_ENCODED_BYTES {
            let [byte] = io_utils::read_array::<1>(r, "string length")?;
            let group = (byte & 0x7F) as u32;
            if byte_i == MAX_7BIT_ENCODED_BYTES - 1 && byte > 0x07 {
                return Err(NrbfError::out_of_range("7-bit encoded length exceeds 31 bits").into());
            }
            int |= group << (7 * byte_i);
            if byte & 0x80 == 0 {
                return Ok((byte_i + 1, Self(int)));
            }
        }
        Err(NrbfError::out_of_range("7-bit encoded length is unterminated").into())
    }

    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen> {
        let mut buf = [0u8; MAX_7BIT_ENCODED_BYTES];
        let mut buf_len = 0;
        let mut int = self.0;
        while int >= 0x80 {
            buf[buf_len] = (int as u8) | 0x80;
            buf_len += 1;
            int >>= 7;
        }
        buf[buf_len] = int as u8;
        buf_len += 1;

        let mut w_len = 0;
        io_utils::write_all(w, &buf[..buf_len], &mut w_len)?;
        Ok(WriteLen::new_manual(w_len))
    }
}

/// A UTF-8 string preceded by its [`StringLen`].
pub struct LengthPrefixedString;
impl LengthPrefixedString {
    pub fn deser(r: &mut impl Read) -> Result<(usize, String)> {
        let (mut r_len, len) = StringLen::deser(r)?;
        let body = io_utils::read_vec(r, *len as usize, "string body")?;
        r_len += body.len();
        let s = String::from_utf8(body)
            .map_err(|e| NrbfError::invalid_data(format!("String is not UTF-8. {e}")))?;
        Ok((r_len, s))
    }

    pub fn ser(s: &str, w: &mut impl Write) -> Result<WriteLen> {
        let body = s.as_bytes();
        let mut w_len = *StringLen::from_body(body)?.ser(w)?;
        io_utils::write_all(w, body, &mut w_len)?;
        Ok(WriteLen::new_manual(w_len))
    }
}
