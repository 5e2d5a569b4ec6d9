use crate::catalog::{RecordType, RecordTypeInt};
use crate::Id;
use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::serde::{LengthPrefixedString, WriteLen};
use std::io::{Read, Write};

/// Names the assembly that non-system class records belong to.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct BinaryLibrary {
    pub library_id: Id,
    pub library_name: String,
}

impl BinaryLibrary {
    pub fn deser(r: &mut impl Read) -> Result<Self> {
        let (_, library_id) = Id::deser(r)?;
        let (_, library_name) = LengthPrefixedString::deser(r)?;
        Ok(Self {
            library_id,
            library_name,
        })
    }

    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen> {
        let mut w_len = 0;
        io_utils::write_all(w, &[*RecordTypeInt::from(RecordType::BinaryLibrary)], &mut w_len)?;
        self.library_id.ser(w, &mut w_len)?;
        w_len += *LengthPrefixedString::ser(&self.library_name, w)?;
        Ok(WriteLen::new_manual(w_len))
    }
}
