use anyhow::Result;
use derive_more::{Deref, Display, From, Into};
use nrbf_types::io_utils;
use std::io::{Read, Write};

/// A stream-unique object id. Libraries share the numbering space with objects.
///
/// Zero is reserved and never identifies anything.
#[derive(From, Into, Deref, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct Id(i32);
impl Id {
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    pub fn deser(r: &mut impl Read) -> Result<(usize, Self)> {
        let buf = io_utils::read_array::<4>(r, "id")?;
        Ok((buf.len(), Self(i32::from_le_bytes(buf))))
    }

    pub fn ser(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        io_utils::write_all(w, &self.0.to_le_bytes(), w_len)
    }
}
