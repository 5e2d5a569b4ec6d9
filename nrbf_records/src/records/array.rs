use crate::catalog::{BinaryArrayType, MemberType, RecordType, RecordTypeInt};
use crate::records::MemberValue;
use crate::Id;
use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::serde::PrimitiveTypeInt;
use nrbf_types::NrbfError;
use std::io::{Read, Write};

/// The id and length shared by the `ArraySingle*` records.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ArrayInfo {
    pub object_id: Id,
    pub length: u32,
}

impl ArrayInfo {
    pub fn deser(r: &mut impl Read) -> Result<(usize, Self)> {
        let (mut r_len, object_id) = Id::deser(r)?;
        let buf = io_utils::read_array::<4>(r, "array length")?;
        r_len += buf.len();
        let length = i32::from_le_bytes(buf);
        let length = u32::try_from(length)
            .map_err(|_| NrbfError::out_of_range(format!("Array length {length}")))?;
        Ok((r_len, Self { object_id, length }))
    }

    pub fn ser(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        let length = i32::try_from(self.length)
            .map_err(|_| NrbfError::overflow(format!("Array length {}", self.length)))?;
        self.object_id.ser(w, w_len)?;
        io_utils::write_all(w, &length.to_le_bytes(), w_len)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ArrayKind {
    SingleObject,
    SingleString,
    SinglePrimitive,
    Binary(BinaryArrayType),
}

/// Any array record. Null runs have been expanded into [`MemberValue::Null`] elements.
#[derive(PartialEq, Clone, Debug)]
pub struct ArrayRecord {
    pub object_id: Id,
    pub kind: ArrayKind,
    pub element_type: MemberType,
    pub lengths: Vec<i32>,
    /// Empty unless `kind` is one of the `*Offset` binary array types.
    pub lower_bounds: Vec<i32>,
    pub elements: Vec<MemberValue>,
}

impl ArrayRecord {
    pub fn record_type(&self) -> RecordType {
        match self.kind {
            ArrayKind::SingleObject => RecordType::ArraySingleObject,
            ArrayKind::SingleString => RecordType::ArraySingleString,
            ArrayKind::SinglePrimitive => RecordType::ArraySinglePrimitive,
            ArrayKind::Binary(_) => RecordType::BinaryArray,
        }
    }

    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    /// Whether this is a zero-based, one-dimensional array.
    pub fn is_single_dimension(&self) -> bool {
        match self.kind {
            ArrayKind::Binary(bin_arr_type) => {
                bin_arr_type == BinaryArrayType::Single && self.rank() == 1
            }
            _ => true,
        }
    }

    /// Writes the tag and the metadata part, ie everything before the elements.
    pub fn ser_head(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        io_utils::write_all(w, &[*RecordTypeInt::from(self.record_type())], w_len)?;
        match self.kind {
            ArrayKind::SingleObject | ArrayKind::SingleString => {
                self.single_array_info()?.ser(w, w_len)?;
            }
            ArrayKind::SinglePrimitive => {
                self.single_array_info()?.ser(w, w_len)?;
                let prim_type = self.element_type.primitive_type().ok_or_else(|| {
                    NrbfError::corrupt("Primitive array without a primitive element type")
                })?;
                io_utils::write_all(w, &[*PrimitiveTypeInt::from(prim_type)], w_len)?;
            }
            ArrayKind::Binary(bin_arr_type) => {
                self.object_id.ser(w, w_len)?;
                io_utils::write_all(w, &[bin_arr_type as u8], w_len)?;
                let rank = i32::try_from(self.rank())
                    .map_err(|_| NrbfError::overflow(format!("Array rank {}", self.rank())))?;
                io_utils::write_all(w, &rank.to_le_bytes(), w_len)?;
                for length in self.lengths.iter() {
                    io_utils::write_all(w, &length.to_le_bytes(), w_len)?;
                }
                if bin_arr_type.has_lower_bounds() {
                    for lower_bound in self.lower_bounds.iter() {
                        io_utils::write_all(w, &lower_bound.to_le_bytes(), w_len)?;
                    }
                }
                self.element_type.ser_binary_type(w, w_len)?;
                self.element_type.ser_additional_info(w, w_len)?;
            }
        }
        Ok(())
    }

    fn single_array_info(&self) -> Result<ArrayInfo> {
        let length = u32::try_from(self.elements.len())
            .map_err(|_| NrbfError::overflow(format!("Array of {} elements", self.elements.len())))?;
        Ok(ArrayInfo {
            object_id: self.object_id,
            length,
        })
    }
}

