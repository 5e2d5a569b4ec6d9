use crate::{
    DrawingPrimitive, ExceptionInfo, FrameworkObject, Hashtable, KnownTypes, ListItems, ShapeKind,
    NOT_SUPPORTED_EXCEPTION_TYPE_NAME,
};
use anyhow::Result;
use nrbf_records::catalog::MemberType;
use nrbf_records::records::{
    BinaryLibrary, BinaryObjectString, ClassKind, ClassMetadata, ClassRecord, MemberValue, Record,
    SerializationHeader,
};
use nrbf_records::{BinaryFormattedObject, Id, RecordMap};
use nrbf_types::serde::{PrimitiveType, PrimitiveValue};
use nrbf_types::NrbfError;
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

mod drawing;
mod framework;

/// Writes allow-listed shapes as the record sequence of the canonical writer.
///
/// Ids are handed out in the canonical traversal order: the root first, then, breadth first,
/// each object that a member refers to, with strings defined inline where they first occur.
/// Every `try_write_*` call starts a fresh id sequence.
#[derive(Default)]
pub struct ObjectWriter {
    known_types: KnownTypes,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_known_types(known_types: KnownTypes) -> Self {
        Self { known_types }
    }

    /// Returns `false`, having written nothing, if the value is not a supported shape.
    pub fn try_write_framework_object(
        &self,
        w: &mut impl Write,
        value: &FrameworkObject,
    ) -> Result<bool> {
        if !self.is_writable(value) {
            debug!("Declined to write {}", framework_description(value));
            return Ok(false);
        }
        let mut ctx = WriteContext::new();
        let root_id = ctx.root(value)?;
        Self::flush(ctx, root_id, w)?;
        Ok(true)
    }

    /// Returns `false`, having written nothing, if the shape is not in the known types.
    pub fn try_write_drawing_primitives_object(
        &self,
        w: &mut impl Write,
        value: &DrawingPrimitive,
    ) -> Result<bool> {
        if !self.known_types.contains(value.shape_kind()) {
            debug!("Declined to write {:?}", value.shape_kind());
            return Ok(false);
        }
        let mut ctx = WriteContext::new();
        let root_id = ctx.drawing_root(value)?;
        Self::flush(ctx, root_id, w)?;
        Ok(true)
    }

    /// Writes only once the whole stream has been built.
    fn flush(ctx: WriteContext, root_id: Id, w: &mut impl Write) -> Result<()> {
        let bfo = ctx.finish(root_id)?;
        let bytes = bfo.to_bytes()?;
        w.write_all(&bytes)?;
        Ok(())
    }

    fn is_writable(&self, value: &FrameworkObject) -> bool {
        let known = |kind| self.known_types.contains(kind);
        match value {
            FrameworkObject::Null => false,
            FrameworkObject::Primitive(_) => known(ShapeKind::BoxedPrimitive),
            FrameworkObject::String(_) => known(ShapeKind::String),
            FrameworkObject::PrimitiveArray(prim_type, vals) => {
                known(ShapeKind::PrimitiveArray) && all_of_type(*prim_type, vals)
            }
            FrameworkObject::StringArray(_) => known(ShapeKind::StringArray),
            FrameworkObject::ObjectArray(objs) => {
                known(ShapeKind::ObjectArray) && objs.iter().all(FrameworkObject::is_scalar)
            }
            FrameworkObject::List(ListItems::Primitive(prim_type, vals)) => {
                known(ShapeKind::List) && all_of_type(*prim_type, vals)
            }
            FrameworkObject::List(ListItems::String(_)) => known(ShapeKind::List),
            FrameworkObject::ArrayList(objs) => {
                known(ShapeKind::ArrayList) && objs.iter().all(FrameworkObject::is_scalar)
            }
            FrameworkObject::Hashtable(table) => self.is_hashtable_writable(table),
            FrameworkObject::Exception(info) => self.is_exception_writable(info),
        }
    }

    fn is_hashtable_writable(&self, table: &Hashtable) -> bool {
        self.known_types.contains(ShapeKind::Hashtable)
            && table.iter().all(|(key, val)| {
                key.is_scalar() && *key != FrameworkObject::Null && val.is_scalar()
            })
    }

    fn is_exception_writable(&self, info: &ExceptionInfo) -> bool {
        let data_ok = match info.data.as_ref() {
            Some(table) => self.is_hashtable_writable(table),
            None => true,
        };
        let inner_ok = match info.inner_exception.as_ref() {
            Some(inner) => self.is_exception_writable(inner),
            None => true,
        };
        self.known_types.contains(ShapeKind::NotSupportedException)
            && &*info.class_name == NOT_SUPPORTED_EXCEPTION_TYPE_NAME
            && data_ok
            && inner_ok
    }
}

pub fn try_write_framework_object(w: &mut impl Write, value: &FrameworkObject) -> Result<bool> {
    ObjectWriter::new().try_write_framework_object(w, value)
}

pub fn try_write_drawing_primitives_object(
    w: &mut impl Write,
    value: &DrawingPrimitive,
) -> Result<bool> {
    ObjectWriter::new().try_write_drawing_primitives_object(w, value)
}

fn all_of_type(prim_type: PrimitiveType, vals: &[PrimitiveValue]) -> bool {
    vals.iter().all(|val| PrimitiveType::from(val) == prim_type)
}

/// A member of a class with member types whose value is the primitive itself.
fn primitive_member(
    name: &'static str,
    val: PrimitiveValue,
) -> (&'static str, MemberType, MemberValue) {
    let prim_type = PrimitiveType::from(&val);
    (name, MemberType::Primitive(prim_type), MemberValue::Primitive(val))
}

fn framework_description(value: &FrameworkObject) -> &'static str {
    match value {
        FrameworkObject::Null => "null",
        FrameworkObject::Primitive(_) => "primitive",
        FrameworkObject::String(_) => "string",
        FrameworkObject::PrimitiveArray(..) => "primitive array",
        FrameworkObject::StringArray(_) => "string array",
        FrameworkObject::ObjectArray(_) => "object array",
        FrameworkObject::List(_) => "list",
        FrameworkObject::ArrayList(_) => "array list",
        FrameworkObject::Hashtable(_) => "hashtable",
        FrameworkObject::Exception(_) => "exception",
    }
}

/// An object whose id has been handed out, to be written as a top-level record in its turn.
enum Pending<'v> {
    PrimitiveArray(Id, PrimitiveType, &'v [PrimitiveValue]),
    StringArray(Id, &'v [Option<Arc<str>>]),
    ObjectArray(Id, &'v [FrameworkObject]),
    HashtableKeys(Id, &'v Hashtable),
    HashtableValues(Id, &'v Hashtable),
    Hashtable(Id, &'v Hashtable),
    Exception(Id, &'v ExceptionInfo),
}

/// The state of one write: the id counter, the records built so far, and the interned strings.
struct WriteContext<'v> {
    last_id: i32,
    map: RecordMap,
    top_level_ids: Vec<Id>,
    pending: VecDeque<Pending<'v>>,
    strings: HashMap<Arc<str>, Id>,
    libraries: HashMap<&'static str, Id>,
    /// Class name to the id of the record that first defined the class's shape.
    class_shapes: HashMap<String, (Id, Arc<ClassMetadata>)>,
}

impl<'v> WriteContext<'v> {
    fn new() -> Self {
        Self {
            last_id: 0,
            map: RecordMap::new(),
            top_level_ids: vec![],
            pending: VecDeque::new(),
            strings: HashMap::new(),
            libraries: HashMap::new(),
            class_shapes: HashMap::new(),
        }
    }

    fn next_id(&mut self) -> Result<Id> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| NrbfError::overflow("Object ids exhausted"))?;
        Ok(Id::from(self.last_id))
    }

    /// Hands out an id now. The object is written once everything queued before it has been.
    fn defer(&mut self, make: impl FnOnce(Id) -> Pending<'v>) -> Result<MemberValue> {
        let id = self.next_id()?;
        self.pending.push_back(make(id));
        Ok(MemberValue::Reference(id))
    }

    /// The first occurrence of a string is defined inline; later ones refer to it.
    fn string(&mut self, s: &Arc<str>) -> Result<MemberValue> {
        if let Some(id) = self.strings.get(s) {
            return Ok(MemberValue::Reference(*id));
        }
        let id = self.next_id()?;
        self.map.insert(Record::BinaryObjectString(BinaryObjectString {
            object_id: id,
            value: s.to_string(),
        }))?;
        self.strings.insert(Arc::clone(s), id);
        Ok(MemberValue::Object(id))
    }

    fn opt_string(&mut self, s: Option<&Arc<str>>) -> Result<MemberValue> {
        match s {
            Some(s) => self.string(s),
            None => Ok(MemberValue::Null),
        }
    }

    fn scalar(&mut self, obj: &FrameworkObject) -> Result<MemberValue> {
        match obj {
            FrameworkObject::Null => Ok(MemberValue::Null),
            FrameworkObject::Primitive(prim_val) => Ok(MemberValue::Primitive(*prim_val)),
            FrameworkObject::String(s) => self.string(s),
            _ => Err(NrbfError::corrupt("Composite value in a scalar position").into()),
        }
    }

    fn library(&mut self, library_name: &'static str) -> Result<Id> {
        if let Some(lib_id) = self.libraries.get(library_name) {
            return Ok(*lib_id);
        }
        let lib_id = self.next_id()?;
        self.map.insert(Record::BinaryLibrary(BinaryLibrary {
            library_id: lib_id,
            library_name: library_name.to_string(),
        }))?;
        self.libraries.insert(library_name, lib_id);
        Ok(lib_id)
    }

    /// A class record with member types. A shape seen before is written as `ClassWithId`.
    fn class(
        &mut self,
        object_id: Id,
        name: String,
        members: Vec<(&str, MemberType, MemberValue)>,
        library_id: Option<Id>,
    ) -> Record {
        let (kind, metadata) = match self.class_shapes.get(&name) {
            Some((metadata_id, metadata)) => (
                ClassKind::ClassWithId {
                    metadata_id: *metadata_id,
                },
                Arc::clone(metadata),
            ),
            None => {
                let kind = match library_id {
                    Some(_) => ClassKind::ClassWithMembersAndTypes,
                    None => ClassKind::SystemClassWithMembersAndTypes,
                };
                let metadata = Arc::new(ClassMetadata {
                    name: name.clone(),
                    member_names: members.iter().map(|(n, _, _)| n.to_string()).collect(),
                    member_types: Some(members.iter().map(|(_, t, _)| t.clone()).collect()),
                    library_id,
                });
                self.class_shapes
                    .insert(name, (object_id, Arc::clone(&metadata)));
                (kind, metadata)
            }
        };
        Record::Class(ClassRecord {
            object_id,
            kind,
            metadata,
            member_values: members.into_iter().map(|(_, _, v)| v).collect(),
        })
    }

    fn push_top_level(&mut self, record: Record) -> Result<Id> {
        let id = self.map.insert(record)?;
        self.top_level_ids.push(id);
        Ok(id)
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(pending) = self.pending.pop_front() {
            let record = self.pending_record(pending)?;
            self.push_top_level(record)?;
        }
        Ok(())
    }

    fn finish(mut self, root_id: Id) -> Result<BinaryFormattedObject> {
        self.drain()?;
        BinaryFormattedObject::new(
            SerializationHeader::new(root_id),
            self.map,
            self.top_level_ids,
        )
    }
}
