use crate::io_utils;
use crate::serde::PrimitiveValue;
use crate::NrbfError;
use anyhow::Result;
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::io::Read;

#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct PrimitiveTypeInt(u8);
impl From<PrimitiveType> for PrimitiveTypeInt {
    fn from(prim_type: PrimitiveType) -> Self {
        Self(prim_type as u8)
    }
}
impl PrimitiveTypeInt {
    pub fn deser(r: &mut impl Read) -> Result<(usize, Self)> {
        let buf = io_utils::read_array::<1>(r, "primitive type")?;
        Ok((buf.len(), Self(buf[0])))
    }
}

/// Wire discriminants of fixed-width primitives.
///
/// Discriminant 4 is unassigned. Discriminants 17 (`Null`) and 18 (`String`)
/// exist in the wire enumeration but never denote a primitive value,
/// so they are not members here and are rejected like any unknown tag.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum PrimitiveType {
    Boolean = 1,
    Byte = 2,
    Char = 3,
    Decimal = 5,
    Double = 6,
    Int16 = 7,
    Int32 = 8,
    Int64 = 9,
    SByte = 10,
    Single = 11,
    TimeSpan = 12,
    DateTime = 13,
    UInt16 = 14,
    UInt32 = 15,
    UInt64 = 16,
}
impl TryFrom<PrimitiveTypeInt> for PrimitiveType {
    type Error = anyhow::Error;
    fn try_from(int: PrimitiveTypeInt) -> Result<Self> {
        PrimitiveType::from_u8(int.0).ok_or_else(|| NrbfError::UnsupportedPrimitive(int.0).into())
    }
}
impl From<&PrimitiveValue> for PrimitiveType {
    fn from(val: &PrimitiveValue) -> Self {
        match val {
            PrimitiveValue::Boolean(_) => Self::Boolean,
            PrimitiveValue::Byte(_) => Self::Byte,
            PrimitiveValue::Char(_) => Self::Char,
            PrimitiveValue::Decimal(_) => Self::Decimal,
            PrimitiveValue::Double(_) => Self::Double,
            PrimitiveValue::Int16(_) => Self::Int16,
            PrimitiveValue::Int32(_) => Self::Int32,
            PrimitiveValue::Int64(_) => Self::Int64,
            PrimitiveValue::SByte(_) => Self::SByte,
            PrimitiveValue::Single(_) => Self::Single,
            PrimitiveValue::TimeSpan(_) => Self::TimeSpan,
            PrimitiveValue::DateTime(_) => Self::DateTime,
            PrimitiveValue::UInt16(_) => Self::UInt16,
            PrimitiveValue::UInt32(_) => Self::UInt32,
            PrimitiveValue::UInt64(_) => Self::UInt64,
        }
    }
}
impl PrimitiveType {
    pub fn deser(r: &mut impl Read) -> Result<(usize, Self)> {
        let (r_len, int) = PrimitiveTypeInt::deser(r)?;
        Ok((r_len, Self::try_from(int)?))
    }

    /// The framework type name of this primitive, eg `System.Int32`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean => "System.Boolean",
            Self::Byte => "System.Byte",
            Self::Char => "System.Char",
            Self::Decimal => "System.Decimal",
            Self::Double => "System.Double",
            Self::Int16 => "System.Int16",
            Self::Int32 => "System.Int32",
            Self::Int64 => "System.Int64",
            Self::SByte => "System.SByte",
            Self::Single => "System.Single",
            Self::TimeSpan => "System.TimeSpan",
            Self::DateTime => "System.DateTime",
            Self::UInt16 => "System.UInt16",
            Self::UInt32 => "System.UInt32",
            Self::UInt64 => "System.UInt64",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        PRIMITIVE_TYPES
            .iter()
            .copied()
            .find(|prim_type| prim_type.type_name() == name)
    }
}

pub const PRIMITIVE_TYPES: [PrimitiveType; 15] = [
    PrimitiveType::Boolean,
    PrimitiveType::Byte,
    PrimitiveType::Char,
    PrimitiveType::Decimal,
    PrimitiveType::Double,
    PrimitiveType::Int16,
    PrimitiveType::Int32,
    PrimitiveType::Int64,
    PrimitiveType::SByte,
    PrimitiveType::Single,
    PrimitiveType::TimeSpan,
    PrimitiveType::DateTime,
    PrimitiveType::UInt16,
    PrimitiveType::UInt32,
    PrimitiveType::UInt64,
];
