use anyhow::Result;
use derive_more::{Deref, From};
use nrbf_types::io_utils;
use nrbf_types::NrbfError;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::io::Read;

#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct RecordTypeInt(u8);
impl From<RecordType> for RecordTypeInt {
    fn from(rec_type: RecordType) -> Self {
        Self(rec_type as u8)
    }
}
impl RecordTypeInt {
    /// Returns `None` if the stream is exhausted before the tag.
    pub fn deser(r: &mut impl Read) -> Result<Option<Self>> {
        Ok(io_utils::read_u8_or_eof(r)?.map(Self))
    }
}

#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum RecordType {
    SerializedStreamHeader = 0,
    ClassWithId = 1,
    SystemClassWithMembers = 2,
    ClassWithMembers = 3,
    SystemClassWithMembersAndTypes = 4,
    ClassWithMembersAndTypes = 5,
    BinaryObjectString = 6,
    BinaryArray = 7,
    MemberPrimitiveTyped = 8,
    MemberReference = 9,
    ObjectNull = 10,
    MessageEnd = 11,
    BinaryLibrary = 12,
    ObjectNullMultiple256 = 13,
    ObjectNullMultiple = 14,
    ArraySinglePrimitive = 15,
    ArraySingleObject = 16,
    ArraySingleString = 17,
    MethodCall = 21,
    MethodReturn = 22,
}
impl TryFrom<RecordTypeInt> for RecordType {
    type Error = anyhow::Error;
    fn try_from(int: RecordTypeInt) -> Result<Self> {
        RecordType::from_u8(int.0).ok_or_else(|| NrbfError::UnknownRecordType(int.0).into())
    }
}
impl RecordType {
    pub fn is_null_run(&self) -> bool {
        matches!(self, Self::ObjectNullMultiple256 | Self::ObjectNullMultiple)
    }
}
