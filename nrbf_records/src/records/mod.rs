mod array;
mod class;
mod header;
mod library;
mod string;

pub use array::*;
pub use class::*;
pub use header::*;
pub use library::*;
pub use string::*;

use crate::catalog::{RecordType, RecordTypeInt};
use crate::Id;
use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::serde::{PrimitiveType, PrimitiveTypeInt, PrimitiveValue};
use nrbf_types::NrbfError;
use std::io::Write;

/// The content of one member slot or array element slot.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MemberValue {
    Null,
    Primitive(PrimitiveValue),
    /// A record that was defined inline at this slot. It is stored in the record map.
    Object(Id),
    /// A `MemberReference` to a record defined elsewhere, possibly later.
    Reference(Id),
}
impl MemberValue {
    /// The id this slot points at, whether defined inline or referenced.
    pub fn id(&self) -> Option<Id> {
        match self {
            Self::Object(id) | Self::Reference(id) => Some(*id),
            Self::Null | Self::Primitive(_) => None,
        }
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

#[derive(PartialEq, Clone, Debug)]
pub enum Record {
    SerializationHeader(SerializationHeader),
    BinaryLibrary(BinaryLibrary),
    Class(ClassRecord),
    BinaryObjectString(BinaryObjectString),
    Array(ArrayRecord),
    MemberPrimitiveTyped(PrimitiveValue),
    MemberReference(Id),
    ObjectNull,
    /// At most 255 on the wire.
    ObjectNullMultiple256(u32),
    ObjectNullMultiple(u32),
    MessageEnd,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::SerializationHeader(_) => RecordType::SerializedStreamHeader,
            Self::BinaryLibrary(_) => RecordType::BinaryLibrary,
            Self::Class(class) => class.record_type(),
            Self::BinaryObjectString(_) => RecordType::BinaryObjectString,
            Self::Array(array) => array.record_type(),
            Self::MemberPrimitiveTyped(_) => RecordType::MemberPrimitiveTyped,
            Self::MemberReference(_) => RecordType::MemberReference,
            Self::ObjectNull => RecordType::ObjectNull,
            Self::ObjectNullMultiple256(_) => RecordType::ObjectNullMultiple256,
            Self::ObjectNullMultiple(_) => RecordType::ObjectNullMultiple,
            Self::MessageEnd => RecordType::MessageEnd,
        }
    }

    /// The id under which this record is kept in a record map.
    /// Libraries are keyed by their library id.
    pub fn object_id(&self) -> Option<Id> {
        match self {
            Self::BinaryLibrary(lib) => Some(lib.library_id),
            Self::Class(class) => Some(class.object_id),
            Self::BinaryObjectString(s) => Some(s.object_id),
            Self::Array(array) => Some(array.object_id),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassRecord> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }
    pub fn as_string(&self) -> Option<&BinaryObjectString> {
        match self {
            Self::BinaryObjectString(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_array(&self) -> Option<&ArrayRecord> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }
    pub fn as_library(&self) -> Option<&BinaryLibrary> {
        match self {
            Self::BinaryLibrary(lib) => Some(lib),
            _ => None,
        }
    }

    /// Writes a record that has no member values or elements of its own.
    ///
    /// Class and array records are written by [`crate::RecordWriter`], which recurses into them.
    pub fn ser_leaf(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        let tag = RecordTypeInt::from(self.record_type());
        match self {
            Self::SerializationHeader(header) => *w_len += *header.ser(w)?,
            Self::BinaryLibrary(lib) => *w_len += *lib.ser(w)?,
            Self::BinaryObjectString(s) => *w_len += *s.ser(w)?,
            Self::MemberPrimitiveTyped(val) => {
                let prim_type = PrimitiveTypeInt::from(PrimitiveType::from(val));
                io_utils::write_all(w, &[*tag, *prim_type], w_len)?;
                *w_len += *val.ser(w)?;
            }
            Self::MemberReference(id) => {
                io_utils::write_all(w, &[*tag], w_len)?;
                id.ser(w, w_len)?;
            }
            Self::ObjectNull | Self::MessageEnd => io_utils::write_all(w, &[*tag], w_len)?,
            Self::ObjectNullMultiple256(count) => {
                let count = u8::try_from(*count).map_err(|_| {
                    NrbfError::overflow(format!("Null count {count} in ObjectNullMultiple256"))
                })?;
                io_utils::write_all(w, &[*tag, count], w_len)?;
            }
            Self::ObjectNullMultiple(count) => {
                let count = i32::try_from(*count)
                    .map_err(|_| NrbfError::overflow(format!("Null count {count}")))?;
                io_utils::write_all(w, &[*tag], w_len)?;
                io_utils::write_all(w, &count.to_le_bytes(), w_len)?;
            }
            Self::Class(_) | Self::Array(_) => {
                return Err(NrbfError::corrupt(format!(
                    "{:?} record is not a leaf",
                    self.record_type()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// The shortest null record standing for `count` consecutive nulls.
    pub fn null_run(count: u32) -> Self {
        match count {
            0 | 1 => Self::ObjectNull,
            2..=255 => Self::ObjectNullMultiple256(count),
            _ => Self::ObjectNullMultiple(count),
        }
    }
}
