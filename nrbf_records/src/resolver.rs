use crate::catalog::{MemberType, RecordType};
use crate::records::{ArrayKind, ClassMetadata, Record};
use crate::Id;
use anyhow::Result;
use nrbf_types::serde::PrimitiveType;
use nrbf_types::NrbfError;
use std::collections::HashMap;
use std::sync::Arc;

/// Class shapes seen so far in a stream, keyed by the object id of the record that defined them.
///
/// `ClassWithId` records name one of these ids instead of repeating names and types.
/// A shape is cached as soon as its metadata is read, before its member values,
/// so that members may reuse the shape of the class that contains them.
#[derive(Default)]
pub struct MetadataCache {
    by_id: HashMap<Id, Arc<ClassMetadata>>,
}

impl MetadataCache {
    pub fn insert(&mut self, object_id: Id, metadata: Arc<ClassMetadata>) -> Result<()> {
        if self.by_id.contains_key(&object_id) {
            return Err(NrbfError::corrupt(format!("Duplicate class metadata id {object_id}")).into());
        }
        self.by_id.insert(object_id, metadata);
        Ok(())
    }

    pub fn resolve(&self, metadata_id: Id) -> Result<Arc<ClassMetadata>> {
        self.by_id.get(&metadata_id).cloned().ok_or_else(|| {
            NrbfError::corrupt(format!("ClassWithId names unknown metadata id {metadata_id}")).into()
        })
    }
}

/// How one member or element slot is laid out on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SlotLayout {
    /// An untagged primitive value.
    Inline(PrimitiveType),
    /// A record, from among those that the slot accepts.
    Record(SlotAccepts),
}

impl SlotLayout {
    /// `None` stands for a slot of an untyped class record, in which any value record may appear.
    pub fn of(memb_type: Option<&MemberType>) -> Self {
        match memb_type {
            None | Some(MemberType::Object) => Self::Record(SlotAccepts::Object),
            Some(MemberType::Primitive(prim_type)) => Self::Inline(*prim_type),
            Some(MemberType::String) => Self::Record(SlotAccepts::String),
            Some(MemberType::SystemClass(_) | MemberType::Class(_)) => {
                Self::Record(SlotAccepts::Class)
            }
            Some(MemberType::ObjectArray) => Self::Record(SlotAccepts::ObjectArray),
            Some(MemberType::StringArray) => Self::Record(SlotAccepts::StringArray),
            Some(MemberType::PrimitiveArray(prim_type)) => {
                Self::Record(SlotAccepts::PrimitiveArray(*prim_type))
            }
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SlotAccepts {
    String,
    Object,
    Class,
    ObjectArray,
    StringArray,
    PrimitiveArray(PrimitiveType),
}

impl SlotAccepts {
    /// References and nulls are accepted by every record slot.
    pub fn accepts(&self, record: &Record) -> bool {
        let rec_type = record.record_type();
        if matches!(
            rec_type,
            RecordType::MemberReference
                | RecordType::ObjectNull
                | RecordType::ObjectNullMultiple256
                | RecordType::ObjectNullMultiple
        ) {
            return true;
        }

        let is_class = matches!(record, Record::Class(_));
        match self {
            Self::String => rec_type == RecordType::BinaryObjectString,
            // Arrays of class-typed elements and nullable primitives are declared by class name.
            Self::Class => {
                is_class || matches!(record, Record::Array(_) | Record::MemberPrimitiveTyped(_))
            }
            Self::Object => {
                is_class
                    || matches!(
                        record,
                        Record::Array(_)
                            | Record::BinaryObjectString(_)
                            | Record::MemberPrimitiveTyped(_)
                    )
            }
            Self::ObjectArray => Self::array_matches(record, ArrayKind::SingleObject, |memb_type| {
                !matches!(memb_type, MemberType::Primitive(_) | MemberType::String)
            }),
            Self::StringArray => Self::array_matches(record, ArrayKind::SingleString, |memb_type| {
                *memb_type == MemberType::String
            }),
            Self::PrimitiveArray(prim_type) => {
                Self::array_matches(record, ArrayKind::SinglePrimitive, |memb_type| {
                    *memb_type == MemberType::Primitive(*prim_type)
                })
            }
        }
    }

    fn array_matches(
        record: &Record,
        single_kind: ArrayKind,
        binary_elem_ok: impl Fn(&MemberType) -> bool,
    ) -> bool {
        match record {
            Record::Array(array) => match array.kind {
                ArrayKind::Binary(_) => binary_elem_ok(&array.element_type),
                kind if kind == single_kind => match single_kind {
                    ArrayKind::SinglePrimitive => binary_elem_ok(&array.element_type),
                    _ => true,
                },
                _ => false,
            },
            _ => false,
        }
    }
}
