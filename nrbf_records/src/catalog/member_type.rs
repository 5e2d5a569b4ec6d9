use crate::Id;
use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::serde::{LengthPrefixedString, PrimitiveType, PrimitiveTypeInt};
use nrbf_types::NrbfError;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::io::{Read, Write};

/// The wire discriminant of a member's (or array element's) type.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum BinaryType {
    Primitive = 0,
    String = 1,
    Object = 2,
    SystemClass = 3,
    Class = 4,
    ObjectArray = 5,
    StringArray = 6,
    PrimitiveArray = 7,
}
impl BinaryType {
    pub fn deser(r: &mut impl Read) -> Result<Self> {
        let [int] = io_utils::read_array::<1>(r, "binary type")?;
        BinaryType::from_u8(int)
            .ok_or_else(|| NrbfError::corrupt(format!("Unknown binary type {int}")).into())
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct ClassTypeInfo {
    pub type_name: String,
    pub library_id: Id,
}

/// A [`BinaryType`] together with its additional info.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum MemberType {
    Primitive(PrimitiveType),
    String,
    Object,
    SystemClass(String),
    Class(ClassTypeInfo),
    ObjectArray,
    StringArray,
    PrimitiveArray(PrimitiveType),
}

impl MemberType {
    pub fn binary_type(&self) -> BinaryType {
        match self {
            Self::Primitive(_) => BinaryType::Primitive,
            Self::String => BinaryType::String,
            Self::Object => BinaryType::Object,
            Self::SystemClass(_) => BinaryType::SystemClass,
            Self::Class(_) => BinaryType::Class,
            Self::ObjectArray => BinaryType::ObjectArray,
            Self::StringArray => BinaryType::StringArray,
            Self::PrimitiveArray(_) => BinaryType::PrimitiveArray,
        }
    }

    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self {
            Self::Primitive(prim_type) => Some(*prim_type),
            _ => None,
        }
    }

    /// Reads the additional info that `bin_type` calls for.
    pub fn deser_additional_info(bin_type: BinaryType, r: &mut impl Read) -> Result<Self> {
        let memb_type = match bin_type {
            BinaryType::Primitive => Self::Primitive(Self::deser_primitive_type(r)?),
            BinaryType::String => Self::String,
            BinaryType::Object => Self::Object,
            BinaryType::SystemClass => Self::SystemClass(LengthPrefixedString::deser(r)?.1),
            BinaryType::Class => {
                let (_, type_name) = LengthPrefixedString::deser(r)?;
                let (_, library_id) = Id::deser(r)?;
                Self::Class(ClassTypeInfo {
                    type_name,
                    library_id,
                })
            }
            BinaryType::ObjectArray => Self::ObjectArray,
            BinaryType::StringArray => Self::StringArray,
            BinaryType::PrimitiveArray => Self::PrimitiveArray(Self::deser_primitive_type(r)?),
        };
        Ok(memb_type)
    }

    fn deser_primitive_type(r: &mut impl Read) -> Result<PrimitiveType> {
        let (_, int) = PrimitiveTypeInt::deser(r)?;
        PrimitiveType::try_from(int)
    }

    pub fn ser_binary_type(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        io_utils::write_all(w, &[self.binary_type() as u8], w_len)
    }

    pub fn ser_additional_info(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        match self {
            Self::Primitive(prim_type) | Self::PrimitiveArray(prim_type) => {
                io_utils::write_all(w, &[*PrimitiveTypeInt::from(*prim_type)], w_len)?;
            }
            Self::SystemClass(name) => {
                *w_len += *LengthPrefixedString::ser(name, w)?;
            }
            Self::Class(info) => {
                *w_len += *LengthPrefixedString::ser(&info.type_name, w)?;
                info.library_id.ser(w, w_len)?;
            }
            Self::String | Self::Object | Self::ObjectArray | Self::StringArray => {}
        }
        Ok(())
    }
}

/// The per-member type list of a `*WithMembersAndTypes` class record.
pub struct MemberTypeInfo;
impl MemberTypeInfo {
    pub fn deser(member_count: usize, r: &mut impl Read) -> Result<Vec<MemberType>> {
        let mut bin_types = Vec::with_capacity(member_count.min(1024));
        for _ in 0..member_count {
            bin_types.push(BinaryType::deser(r)?);
        }
        let mut memb_types = Vec::with_capacity(bin_types.len());
        for bin_type in bin_types {
            memb_types.push(MemberType::deser_additional_info(bin_type, r)?);
        }
        Ok(memb_types)
    }

    pub fn ser(memb_types: &[MemberType], w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        for memb_type in memb_types {
            memb_type.ser_binary_type(w, w_len)?;
        }
        for memb_type in memb_types {
            memb_type.ser_additional_info(w, w_len)?;
        }
        Ok(())
    }
}
