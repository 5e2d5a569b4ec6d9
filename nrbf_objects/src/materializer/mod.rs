use crate::{DrawingPrimitive, FrameworkObject, KnownTypes};
use anyhow::Result;
use nrbf_records::records::{ClassRecord, MemberValue, Record};
use nrbf_records::{BinaryFormattedObject, Id};
use nrbf_types::serde::PrimitiveValue;
use nrbf_types::NrbfError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

mod drawing;
mod framework;
#[cfg(test)]
mod materializer_test;

/// Reconstructs allow-listed shapes from a parsed stream.
///
/// Each `try_get_*` method returns `Ok(None)` when the graph is not one of the shapes it
/// supports (or the shape is not in [`KnownTypes`]), and `Err` with [`NrbfError::CorruptGraph`]
/// when the graph names a supported shape but its layout contradicts that shape.
pub struct Materializer<'a> {
    bfo: &'a BinaryFormattedObject,
    known_types: KnownTypes,
    strings: HashMap<Id, Arc<str>>,
    /// Classes being materialized, for cycle detection.
    visiting: HashSet<Id>,
}

/// A member or element value with its id resolved.
enum Resolved<'a> {
    Null,
    Primitive(PrimitiveValue),
    Record(&'a Record),
}

impl<'a> Materializer<'a> {
    pub fn new(bfo: &'a BinaryFormattedObject) -> Self {
        Self::with_known_types(bfo, KnownTypes::default())
    }

    pub fn with_known_types(bfo: &'a BinaryFormattedObject, known_types: KnownTypes) -> Self {
        Self {
            bfo,
            known_types,
            strings: HashMap::new(),
            visiting: HashSet::new(),
        }
    }

    pub fn try_get_framework_object(&mut self) -> Result<Option<FrameworkObject>> {
        let root = self.bfo.root_record()?;
        let obj = self.framework_object(root)?;
        if obj.is_none() {
            debug!("Declined framework object with root {}", describe(root));
        }
        Ok(obj)
    }

    /// Only a root string or a boxed primitive.
    pub fn try_get_primitive_type(&mut self) -> Result<Option<FrameworkObject>> {
        let root = self.bfo.root_record()?;
        let obj = match root {
            Record::BinaryObjectString(_) => self.root_string(root),
            Record::Class(class) => self
                .boxed_primitive(class)?
                .map(FrameworkObject::Primitive),
            _ => None,
        };
        if obj.is_none() {
            debug!("Declined primitive with root {}", describe(root));
        }
        Ok(obj)
    }

    pub fn try_get_drawing_primitives_object(&mut self) -> Result<Option<DrawingPrimitive>> {
        let root = self.bfo.root_record()?;
        let obj = match root {
            Record::Class(class) => self.drawing_primitive(class)?,
            _ => None,
        };
        if obj.is_none() {
            debug!("Declined drawing primitive with root {}", describe(root));
        }
        Ok(obj)
    }

    fn resolve(&self, val: &MemberValue) -> Result<Resolved<'a>> {
        let resolved = match val {
            MemberValue::Null => Resolved::Null,
            MemberValue::Primitive(prim_val) => Resolved::Primitive(*prim_val),
            MemberValue::Object(id) | MemberValue::Reference(id) => {
                Resolved::Record(self.bfo.record_map().get(*id)?)
            }
        };
        Ok(resolved)
    }

    /// The shared string of a string record. Every call for the same id yields the same `Arc`.
    fn string_of(&mut self, record: &Record) -> Option<Arc<str>> {
        let s = record.as_string()?;
        let arc = self
            .strings
            .entry(s.object_id)
            .or_insert_with(|| Arc::from(s.value.as_str()));
        Some(Arc::clone(arc))
    }

    /// A null, primitive, or string value. `None` for anything else.
    fn scalar(&mut self, val: &MemberValue) -> Result<Option<FrameworkObject>> {
        let obj = match self.resolve(val)? {
            Resolved::Null => Some(FrameworkObject::Null),
            Resolved::Primitive(prim_val) => Some(FrameworkObject::Primitive(prim_val)),
            Resolved::Record(record) => self.string_of(record).map(FrameworkObject::String),
        };
        Ok(obj)
    }

    /// A null or a string. Anything else contradicts the shape being materialized.
    fn opt_string(&mut self, val: &MemberValue, what: &str) -> Result<Option<Arc<str>>> {
        match self.resolve(val)? {
            Resolved::Null => Ok(None),
            Resolved::Record(record) => match self.string_of(record) {
                Some(s) => Ok(Some(s)),
                None => Err(mismatch(what, "a string")),
            },
            Resolved::Primitive(_) => Err(mismatch(what, "a string")),
        }
    }

    fn string_member(&mut self, class: &ClassRecord, name: &str) -> Result<Option<Arc<str>>> {
        let val = member(class, name)?;
        self.opt_string(val, name)
    }

    fn enter(&mut self, id: Id) -> Result<()> {
        if !self.visiting.insert(id) {
            return Err(NrbfError::corrupt(format!("Object {id} contains itself")).into());
        }
        Ok(())
    }
    fn leave(&mut self, id: Id) {
        self.visiting.remove(&id);
    }
}

fn describe(record: &Record) -> String {
    match record {
        Record::Class(class) => format!("class {:?}", class.name()),
        record => format!("{:?} record", record.record_type()),
    }
}

fn mismatch(what: &str, expected: &str) -> anyhow::Error {
    NrbfError::corrupt(format!("{what} is not {expected}")).into()
}

fn member<'c>(class: &'c ClassRecord, name: &str) -> Result<&'c MemberValue> {
    class.member_value(name).ok_or_else(|| {
        NrbfError::corrupt(format!("Class {:?} has no member {name:?}", class.name())).into()
    })
}

/// A primitive member, unpacked by `extract`.
fn primitive_member<T>(
    class: &ClassRecord,
    name: &str,
    expected: &str,
    extract: impl Fn(&PrimitiveValue) -> Option<T>,
) -> Result<T> {
    match member(class, name)? {
        MemberValue::Primitive(prim_val) => {
            extract(prim_val).ok_or_else(|| mismatch(name, expected))
        }
        _ => Err(mismatch(name, expected)),
    }
}

fn i32_member(class: &ClassRecord, name: &str) -> Result<i32> {
    primitive_member(class, name, "an Int32", |val| match val {
        PrimitiveValue::Int32(i) => Some(*i),
        _ => None,
    })
}

fn f32_member(class: &ClassRecord, name: &str) -> Result<f32> {
    primitive_member(class, name, "a Single", |val| match val {
        PrimitiveValue::Single(f) => Some(*f),
        _ => None,
    })
}

/// Framework shapes are system classes. A class of the same name from another library is not one.
fn is_system_class(class: &ClassRecord) -> bool {
    class.library_id().is_none()
}
