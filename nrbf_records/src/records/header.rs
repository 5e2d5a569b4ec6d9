use crate::catalog::{RecordType, RecordTypeInt};
use crate::Id;
use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::serde::WriteLen;
use nrbf_types::NrbfError;
use std::io::{Read, Write};

pub const MAJOR_VERSION: i32 = 1;
pub const MINOR_VERSION: i32 = 0;
/// The header id written by the canonical writer when there are no call headers.
pub const NO_HEADERS_ID: i32 = -1;

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SerializationHeader {
    pub root_id: Id,
    pub header_id: i32,
    pub major_version: i32,
    pub minor_version: i32,
}

impl SerializationHeader {
    pub fn new(root_id: Id) -> Self {
        Self {
            root_id,
            header_id: NO_HEADERS_ID,
            major_version: MAJOR_VERSION,
            minor_version: MINOR_VERSION,
        }
    }

    /// Reads the body following the tag.
    pub fn deser(r: &mut impl Read) -> Result<Self> {
        let (_, root_id) = Id::deser(r)?;
        let header_id = i32::from_le_bytes(io_utils::read_array::<4>(r, "header id")?);
        let major_version = i32::from_le_bytes(io_utils::read_array::<4>(r, "major version")?);
        let minor_version = i32::from_le_bytes(io_utils::read_array::<4>(r, "minor version")?);

        if (major_version, minor_version) != (MAJOR_VERSION, MINOR_VERSION) {
            return Err(NrbfError::corrupt(format!(
                "Unsupported format version {major_version}.{minor_version}"
            ))
            .into());
        }
        if !root_id.is_valid() {
            return Err(NrbfError::corrupt("Root id 0").into());
        }

        Ok(Self {
            root_id,
            header_id,
            major_version,
            minor_version,
        })
    }

    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen> {
        let mut w_len = 0;
        let tag = RecordTypeInt::from(RecordType::SerializedStreamHeader);
        io_utils::write_all(w, &[*tag], &mut w_len)?;
        self.root_id.ser(w, &mut w_len)?;
        io_utils::write_all(w, &self.header_id.to_le_bytes(), &mut w_len)?;
        io_utils::write_all(w, &self.major_version.to_le_bytes(), &mut w_len)?;
        io_utils::write_all(w, &self.minor_version.to_le_bytes(), &mut w_len)?;
        Ok(WriteLen::new_manual(w_len))
    }
}
