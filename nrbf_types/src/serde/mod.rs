//! # Primitive serialization format
//!
//! All multi-byte integers are little-endian.
//!
//! Inside a record, a primitive value carries no tag of its own; its
//! [`PrimitiveType`] is known from the surrounding metadata.
//! Where a tag is needed (eg `MemberPrimitiveTyped` records, array element types),
//! the tag is a single `u8`.
//!
//! ```text
//! Boolean     [u8; 1]     0 or 1
//! Byte        [u8; 1]
//! SByte       [u8; 1]
//! Char        [u8; 1..=4] one UTF-8 encoded scalar value
//! Int16       [u8; 2]     and UInt16
//! Int32       [u8; 4]     and UInt32
//! Int64       [u8; 8]     and UInt64
//! Single      [u8; 4]     IEEE-754, bits preserved
//! Double      [u8; 8]     IEEE-754, bits preserved
//! TimeSpan    [u8; 8]     i64 ticks
//! DateTime    [u8; 8]     {
//!                             ticks:  62 low bits,
//!                             kind:   2 high bits,
//!                         }
//! Decimal     LengthPrefixedString {
//!                 len:    7-bit encoded u31,
//!                 utf8:   [u8; len],  eg "-12.3400"
//!             }
//! ```
//!
//! The 7-bit encoded length stores 7 bits per byte, least significant group first,
//! with the high bit set on every byte except the last; at most 5 bytes.
//!
//! Strings are never primitive values here. They always live in their own record,
//! so that they can be shared by id.

mod decimal;
mod lengths;
mod primitive;
mod primitive_type;
mod temporal;

pub use decimal::*;
pub use lengths::*;
pub use primitive::*;
pub use primitive_type::*;
pub use temporal::*;

use derive_more::Deref;

#[derive(PartialEq, Eq, Debug)]
pub enum ReadResult<T> {
    EOF,
    Some(usize, T),
}

#[derive(Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct WriteLen(usize);
impl WriteLen {
    pub fn new_manual(i: usize) -> Self {
        Self(i)
    }
}
