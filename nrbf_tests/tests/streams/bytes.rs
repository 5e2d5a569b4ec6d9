use nrbf_records::catalog::{BinaryType, RecordType};
use nrbf_types::serde::{LengthPrefixedString, PrimitiveType};

/// Stream bytes assembled field by field, as the canonical writer lays them out.
#[derive(Default)]
pub struct Bytes {
    buf: Vec<u8>,
}

impl Bytes {
    /// A version 1.0 header.
    pub fn header(root_id: i32) -> Self {
        Self::default()
            .tag(RecordType::SerializedStreamHeader)
            .i32(root_id)
            .i32(-1)
            .i32(1)
            .i32(0)
    }

    pub fn tag(self, rec_type: RecordType) -> Self {
        self.u8(rec_type as u8)
    }
    pub fn bin_type(self, bin_type: BinaryType) -> Self {
        self.u8(bin_type as u8)
    }
    pub fn prim(self, prim_type: PrimitiveType) -> Self {
        self.u8(prim_type as u8)
    }
    pub fn u8(mut self, b: u8) -> Self {
        self.buf.push(b);
        self
    }
    pub fn i32(mut self, i: i32) -> Self {
        self.buf.extend_from_slice(&i.to_le_bytes());
        self
    }
    pub fn f32(mut self, f: f32) -> Self {
        self.buf.extend_from_slice(&f.to_le_bytes());
        self
    }
    pub fn str(mut self, s: &str) -> Self {
        // Writing into a Vec cannot fail.
        let _ = LengthPrefixedString::ser(s, &mut self.buf);
        self
    }

    pub fn string(self, id: i32, s: &str) -> Self {
        self.tag(RecordType::BinaryObjectString).i32(id).str(s)
    }
    pub fn object_array(self, id: i32, len: i32) -> Self {
        self.tag(RecordType::ArraySingleObject).i32(id).i32(len)
    }
    pub fn system_class(self, id: i32, name: &str, members: &[&str]) -> Self {
        let mut this = self
            .tag(RecordType::SystemClassWithMembersAndTypes)
            .i32(id)
            .str(name)
            .i32(members.len() as i32);
        for member in members {
            this = this.str(member);
        }
        this
    }

    pub fn end(self) -> Vec<u8> {
        self.tag(RecordType::MessageEnd).buf
    }
    pub fn unterminated(self) -> Vec<u8> {
        self.buf
    }
}
