use crate::catalog::{RecordType, RecordTypeInt};
use crate::Id;
use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::serde::{LengthPrefixedString, WriteLen};
use std::io::{Read, Write};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct BinaryObjectString {
    pub object_id: Id,
    pub value: String,
}

impl BinaryObjectString {
    pub fn deser(r: &mut impl Read) -> Result<Self> {
        let (_, object_id) = Id::deser(r)?;
        let (_, value) = LengthPrefixedString::deser(r)?;
        Ok(Self { object_id, value })
    }

    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen> {
        let mut w_len = 0;
        let tag = RecordTypeInt::from(RecordType::BinaryObjectString);
        io_utils::write_all(w, &[*tag], &mut w_len)?;
        self.object_id.ser(w, &mut w_len)?;
        w_len += *LengthPrefixedString::ser(&self.value, w)?;
        Ok(WriteLen::new_manual(w_len))
    }
}
