use crate::catalog::{RecordType, RecordTypeInt};
use nrbf_types::serde::{LengthPrefixedString, PrimitiveType, PrimitiveTypeInt};

/// Hand-assembles stream bytes, field by field.
pub struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    pub fn empty() -> Self {
        Self { buf: vec![] }
    }

    /// Starts with a version 1.0 header.
    pub fn new(root_id: i32) -> Self {
        Self::empty()
            .tag(RecordType::SerializedStreamHeader)
            .i32(root_id)
            .i32(-1)
            .i32(1)
            .i32(0)
    }

    pub fn tag(self, rec_type: RecordType) -> Self {
        self.u8(*RecordTypeInt::from(rec_type))
    }
    pub fn prim(self, prim_type: PrimitiveType) -> Self {
        self.u8(*PrimitiveTypeInt::from(prim_type))
    }
    pub fn u8(mut self, b: u8) -> Self {
        self.buf.push(b);
        self
    }
    pub fn i32(mut self, i: i32) -> Self {
        self.buf.extend_from_slice(&i.to_le_bytes());
        self
    }
    pub fn str(mut self, s: &str) -> Self {
        LengthPrefixedString::ser(s, &mut self.buf).unwrap();
        self
    }

    pub fn string(self, id: i32, s: &str) -> Self {
        self.tag(RecordType::BinaryObjectString).i32(id).str(s)
    }
    pub fn library(self, id: i32, name: &str) -> Self {
        self.tag(RecordType::BinaryLibrary).i32(id).str(name)
    }
    pub fn reference(self, id: i32) -> Self {
        self.tag(RecordType::MemberReference).i32(id)
    }
    pub fn nulls(self, count: u8) -> Self {
        self.tag(RecordType::ObjectNullMultiple256).u8(count)
    }
    pub fn object_array(self, id: i32, len: i32) -> Self {
        self.tag(RecordType::ArraySingleObject).i32(id).i32(len)
    }
    /// A class record header up to and including the member names.
    pub fn class_info(self, rec_type: RecordType, id: i32, name: &str, members: &[&str]) -> Self {
        let mut this = self.tag(rec_type).i32(id).str(name).i32(members.len() as i32);
        for member in members {
            this = this.str(member);
        }
        this
    }

    pub fn end(self) -> Vec<u8> {
        self.tag(RecordType::MessageEnd).buf
    }
    pub fn bytes(self) -> Vec<u8> {
        self.buf
    }
}
