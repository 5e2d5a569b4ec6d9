use crate::catalog::{MemberType, MemberTypeInfo, RecordType, RecordTypeInt};
use crate::records::MemberValue;
use crate::Id;
use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::serde::LengthPrefixedString;
use nrbf_types::NrbfError;
use std::io::{Read, Write};
use std::sync::Arc;

/// Object id, type name, and member names of a class record.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ClassInfo {
    pub object_id: Id,
    pub name: String,
    pub member_names: Vec<String>,
}

impl ClassInfo {
    pub fn deser(r: &mut impl Read) -> Result<Self> {
        let (_, object_id) = Id::deser(r)?;
        let (_, name) = LengthPrefixedString::deser(r)?;
        let member_count = i32::from_le_bytes(io_utils::read_array::<4>(r, "member count")?);
        let member_count = usize::try_from(member_count).map_err(|_| {
            NrbfError::out_of_range(format!("Class {name:?} has member count {member_count}"))
        })?;

        let mut member_names = Vec::with_capacity(member_count.min(1024));
        for _ in 0..member_count {
            let (_, member_name) = LengthPrefixedString::deser(r)?;
            member_names.push(member_name);
        }

        Ok(Self {
            object_id,
            name,
            member_names,
        })
    }

    pub fn ser(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        self.object_id.ser(w, w_len)?;
        *w_len += *LengthPrefixedString::ser(&self.name, w)?;
        let member_count = i32::try_from(self.member_names.len())
            .map_err(|_| NrbfError::overflow("Member count"))?;
        io_utils::write_all(w, &member_count.to_le_bytes(), w_len)?;
        for member_name in self.member_names.iter() {
            *w_len += *LengthPrefixedString::ser(member_name, w)?;
        }
        Ok(())
    }
}

/// The shape of a class: what a later `ClassWithId` record reuses.
#[derive(PartialEq, Eq, Debug)]
pub struct ClassMetadata {
    pub name: String,
    pub member_names: Vec<String>,
    /// Absent for the `*WithMembers` record types, whose values are all self-describing records.
    pub member_types: Option<Vec<MemberType>>,
    /// Absent for system classes, which implicitly belong to the runtime's own library.
    pub library_id: Option<Id>,
}

impl ClassMetadata {
    pub fn member_index(&self, member_name: &str) -> Option<usize> {
        self.member_names.iter().position(|name| name == member_name)
    }
    pub fn member_type(&self, member_i: usize) -> Option<&MemberType> {
        self.member_types
            .as_ref()
            .and_then(|memb_types| memb_types.get(member_i))
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ClassKind {
    ClassWithMembersAndTypes,
    SystemClassWithMembersAndTypes,
    ClassWithMembers,
    SystemClassWithMembers,
    ClassWithId { metadata_id: Id },
}

#[derive(PartialEq, Clone, Debug)]
pub struct ClassRecord {
    pub object_id: Id,
    pub kind: ClassKind,
    pub metadata: Arc<ClassMetadata>,
    pub member_values: Vec<MemberValue>,
}

impl ClassRecord {
    pub fn record_type(&self) -> RecordType {
        match self.kind {
            ClassKind::ClassWithMembersAndTypes => RecordType::ClassWithMembersAndTypes,
            ClassKind::SystemClassWithMembersAndTypes => {
                RecordType::SystemClassWithMembersAndTypes
            }
            ClassKind::ClassWithMembers => RecordType::ClassWithMembers,
            ClassKind::SystemClassWithMembers => RecordType::SystemClassWithMembers,
            ClassKind::ClassWithId { .. } => RecordType::ClassWithId,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
    pub fn member_names(&self) -> &[String] {
        &self.metadata.member_names
    }
    pub fn library_id(&self) -> Option<Id> {
        self.metadata.library_id
    }

    pub fn member_value(&self, member_name: &str) -> Option<&MemberValue> {
        self.metadata
            .member_index(member_name)
            .and_then(|member_i| self.member_values.get(member_i))
    }
    pub fn member_type(&self, member_name: &str) -> Option<&MemberType> {
        self.metadata
            .member_index(member_name)
            .and_then(|member_i| self.metadata.member_type(member_i))
    }

    /// Writes the tag and the metadata part, ie everything before the member values.
    pub fn ser_head(&self, w: &mut impl Write, w_len: &mut usize) -> Result<()> {
        io_utils::write_all(w, &[*RecordTypeInt::from(self.record_type())], w_len)?;

        if let ClassKind::ClassWithId { metadata_id } = self.kind {
            self.object_id.ser(w, w_len)?;
            return metadata_id.ser(w, w_len);
        }

        let class_info = ClassInfo {
            object_id: self.object_id,
            name: self.metadata.name.clone(),
            member_names: self.metadata.member_names.clone(),
        };
        class_info.ser(w, w_len)?;

        if let Some(memb_types) = self.metadata.member_types.as_ref() {
            MemberTypeInfo::ser(memb_types, w, w_len)?;
        }

        match (self.kind, self.metadata.library_id) {
            (ClassKind::ClassWithMembersAndTypes | ClassKind::ClassWithMembers, Some(lib_id)) => {
                lib_id.ser(w, w_len)?;
            }
            (ClassKind::ClassWithMembersAndTypes | ClassKind::ClassWithMembers, None) => {
                return Err(NrbfError::corrupt(format!(
                    "Non-system class {:?} has no library",
                    self.metadata.name
                ))
                .into());
            }
            _ => {}
        }
        Ok(())
    }
}
