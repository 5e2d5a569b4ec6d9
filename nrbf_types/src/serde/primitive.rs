use crate::serde::{DateTime, Decimal, TimeSpan};
use std::hash::{Hash, Hasher};

mod deser;
mod ser;

/// A fixed-width primitive value.
///
/// Equality is bitwise for floating point members, so `NaN == NaN` when the payloads match,
/// and `0.0 != -0.0`.
#[derive(Clone, Copy, Debug)]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(u8),
    Char(char),
    Decimal(Decimal),
    Double(f64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    SByte(i8),
    Single(f32),
    TimeSpan(TimeSpan),
    DateTime(DateTime),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
}

impl PartialEq for PrimitiveValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(slf), Self::Boolean(oth)) => slf == oth,
            (Self::Byte(slf), Self::Byte(oth)) => slf == oth,
            (Self::Char(slf), Self::Char(oth)) => slf == oth,
            (Self::Decimal(slf), Self::Decimal(oth)) => slf == oth,
            (Self::Double(slf), Self::Double(oth)) => slf.to_bits() == oth.to_bits(),
            (Self::Int16(slf), Self::Int16(oth)) => slf == oth,
            (Self::Int32(slf), Self::Int32(oth)) => slf == oth,
            (Self::Int64(slf), Self::Int64(oth)) => slf == oth,
            (Self::SByte(slf), Self::SByte(oth)) => slf == oth,
            (Self::Single(slf), Self::Single(oth)) => slf.to_bits() == oth.to_bits(),
            (Self::TimeSpan(slf), Self::TimeSpan(oth)) => slf == oth,
            (Self::DateTime(slf), Self::DateTime(oth)) => slf == oth,
            (Self::UInt16(slf), Self::UInt16(oth)) => slf == oth,
            (Self::UInt32(slf), Self::UInt32(oth)) => slf == oth,
            (Self::UInt64(slf), Self::UInt64(oth)) => slf == oth,
            _ => false,
        }
    }
}
impl Eq for PrimitiveValue {}

impl Hash for PrimitiveValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Boolean(v) => v.hash(state),
            Self::Byte(v) => v.hash(state),
            Self::Char(v) => v.hash(state),
            Self::Decimal(v) => v.hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Int16(v) => v.hash(state),
            Self::Int32(v) => v.hash(state),
            Self::Int64(v) => v.hash(state),
            Self::SByte(v) => v.hash(state),
            Self::Single(v) => v.to_bits().hash(state),
            Self::TimeSpan(v) => v.hash(state),
            Self::DateTime(v) => v.hash(state),
            Self::UInt16(v) => v.hash(state),
            Self::UInt32(v) => v.hash(state),
            Self::UInt64(v) => v.hash(state),
        }
    }
}
