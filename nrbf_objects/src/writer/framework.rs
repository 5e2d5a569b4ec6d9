use super::{primitive_member, Pending, WriteContext};
use crate::hash_helpers::{self, LOAD_FACTOR};
use crate::{
    ExceptionInfo, FrameworkObject, Hashtable, ListItems, ARRAY_LIST_TYPE_NAME,
    HASHTABLE_TYPE_NAME, LIST_TYPE_NAME_PREFIX, MSCORLIB_LIBRARY_NAME, STRING_TYPE_NAME,
};
use anyhow::Result;
use nrbf_records::catalog::MemberType;
use nrbf_records::records::{ArrayKind, ArrayRecord, MemberValue, Record};
use nrbf_records::Id;
use nrbf_types::serde::{PrimitiveType, PrimitiveValue};
use nrbf_types::NrbfError;
use std::sync::Arc;

fn int32(i: usize, what: &str) -> Result<MemberValue> {
    let i = i32::try_from(i).map_err(|_| NrbfError::overflow(format!("{what} {i}")))?;
    Ok(MemberValue::Primitive(PrimitiveValue::Int32(i)))
}

fn system_class_type(name: &str) -> MemberType {
    MemberType::SystemClass(name.to_string())
}

impl<'v> WriteContext<'v> {
    pub(super) fn root(&mut self, value: &'v FrameworkObject) -> Result<Id> {
        if let FrameworkObject::String(s) = value {
            return match self.string(s)? {
                MemberValue::Object(id) => {
                    self.top_level_ids.push(id);
                    Ok(id)
                }
                _ => Err(NrbfError::corrupt("Root string was already written").into()),
            };
        }
        let root_id = self.next_id()?;
        let record = self.root_record(root_id, value)?;
        self.push_top_level(record)
    }

    fn root_record(&mut self, root_id: Id, value: &'v FrameworkObject) -> Result<Record> {
        let record = match value {
            FrameworkObject::Primitive(prim_val) => self.boxed_primitive(root_id, prim_val),
            FrameworkObject::PrimitiveArray(prim_type, vals) => {
                self.primitive_array(root_id, *prim_type, vals)
            }
            FrameworkObject::StringArray(strs) => self.string_array(root_id, strs)?,
            FrameworkObject::ObjectArray(objs) => self.object_array(root_id, objs)?,
            FrameworkObject::List(items) => self.list(root_id, items)?,
            FrameworkObject::ArrayList(objs) => self.array_list(root_id, objs)?,
            FrameworkObject::Hashtable(table) => self.hashtable(root_id, table)?,
            FrameworkObject::Exception(info) => self.exception(root_id, info)?,
            FrameworkObject::Null | FrameworkObject::String(_) => {
                return Err(NrbfError::corrupt("Not a class or array root").into());
            }
        };
        Ok(record)
    }

    pub(super) fn pending_record(&mut self, pending: Pending<'v>) -> Result<Record> {
        match pending {
            Pending::PrimitiveArray(id, prim_type, vals) => {
                Ok(self.primitive_array(id, prim_type, vals))
            }
            Pending::StringArray(id, strs) => self.string_array(id, strs),
            Pending::ObjectArray(id, objs) => self.object_array(id, objs),
            Pending::HashtableKeys(id, table) => {
                let keys = table.iter().map(|(key, _)| key);
                self.scalar_array(id, keys)
            }
            Pending::HashtableValues(id, table) => {
                let vals = table.iter().map(|(_, val)| val);
                self.scalar_array(id, vals)
            }
            Pending::Hashtable(id, table) => self.hashtable(id, table),
            Pending::Exception(id, info) => self.exception(id, info),
        }
    }

    fn boxed_primitive(&mut self, object_id: Id, prim_val: &PrimitiveValue) -> Record {
        let prim_type = PrimitiveType::from(prim_val);
        let members = match prim_val {
            PrimitiveValue::DateTime(dt) => vec![
                primitive_member("ticks", PrimitiveValue::Int64(dt.ticks())),
                primitive_member("dateData", PrimitiveValue::UInt64(dt.to_date_data())),
            ],
            PrimitiveValue::TimeSpan(ts) => {
                vec![primitive_member("_ticks", PrimitiveValue::Int64(ts.ticks()))]
            }
            PrimitiveValue::Decimal(dec) => {
                let (flags, hi, lo, mid) = dec.to_parts();
                vec![
                    primitive_member("flags", PrimitiveValue::Int32(flags)),
                    primitive_member("hi", PrimitiveValue::Int32(hi)),
                    primitive_member("lo", PrimitiveValue::Int32(lo)),
                    primitive_member("mid", PrimitiveValue::Int32(mid)),
                ]
            }
            _ => vec![primitive_member("m_value", *prim_val)],
        };
        self.class(object_id, prim_type.type_name().to_string(), members, None)
    }

    fn primitive_array(&mut self, object_id: Id, prim_type: PrimitiveType, vals: &[PrimitiveValue]) -> Record {
        Record::Array(ArrayRecord {
            object_id,
            kind: ArrayKind::SinglePrimitive,
            element_type: MemberType::Primitive(prim_type),
            lengths: vec![vals.len() as i32],
            lower_bounds: vec![],
            elements: vals.iter().copied().map(MemberValue::Primitive).collect(),
        })
    }

    fn string_array(&mut self, object_id: Id, strs: &[Option<Arc<str>>]) -> Result<Record> {
        let mut elements = Vec::with_capacity(strs.len());
        for s in strs {
            elements.push(self.opt_string(s.as_ref())?);
        }
        Ok(Record::Array(ArrayRecord {
            object_id,
            kind: ArrayKind::SingleString,
            element_type: MemberType::String,
            lengths: vec![elements.len() as i32],
            lower_bounds: vec![],
            elements,
        }))
    }

    fn object_array(&mut self, object_id: Id, objs: &[FrameworkObject]) -> Result<Record> {
        self.scalar_array(object_id, objs.iter())
    }

    fn scalar_array<'o>(
        &mut self,
        object_id: Id,
        objs: impl Iterator<Item = &'o FrameworkObject>,
    ) -> Result<Record> {
        let mut elements = vec![];
        for obj in objs {
            elements.push(self.scalar(obj)?);
        }
        Ok(Record::Array(ArrayRecord {
            object_id,
            kind: ArrayKind::SingleObject,
            element_type: MemberType::Object,
            lengths: vec![elements.len() as i32],
            lower_bounds: vec![],
            elements,
        }))
    }

    fn list(&mut self, object_id: Id, items: &'v ListItems) -> Result<Record> {
        let (item_type_name, items_type, items_val) = match items {
            ListItems::Primitive(prim_type, vals) => (
                prim_type.type_name(),
                MemberType::PrimitiveArray(*prim_type),
                self.defer(|id| Pending::PrimitiveArray(id, *prim_type, vals))?,
            ),
            ListItems::String(strs) => (
                STRING_TYPE_NAME,
                MemberType::StringArray,
                self.defer(|id| Pending::StringArray(id, strs))?,
            ),
        };
        let name = format!("{LIST_TYPE_NAME_PREFIX}{item_type_name}, {MSCORLIB_LIBRARY_NAME}]]");
        let members = vec![
            ("_items", items_type, items_val),
            ("_size", MemberType::Primitive(PrimitiveType::Int32), int32(items.len(), "List size")?),
            ("_version", MemberType::Primitive(PrimitiveType::Int32), int32(items.len(), "List version")?),
        ];
        Ok(self.class(object_id, name, members, None))
    }

    fn array_list(&mut self, object_id: Id, objs: &'v [FrameworkObject]) -> Result<Record> {
        let items_val = self.defer(|id| Pending::ObjectArray(id, objs))?;
        let members = vec![
            ("_items", MemberType::ObjectArray, items_val),
            ("_size", MemberType::Primitive(PrimitiveType::Int32), int32(objs.len(), "ArrayList size")?),
            ("_version", MemberType::Primitive(PrimitiveType::Int32), int32(objs.len(), "ArrayList version")?),
        ];
        Ok(self.class(object_id, ARRAY_LIST_TYPE_NAME.to_string(), members, None))
    }

    /// Load factor, version, and bucket count are those of a default-constructed table
    /// into which the entries were inserted in order.
    fn hashtable(&mut self, object_id: Id, table: &'v Hashtable) -> Result<Record> {
        let hash_size = hash_helpers::hash_size_after_inserts(table.len());
        let keys_val = self.defer(|id| Pending::HashtableKeys(id, table))?;
        let vals_val = self.defer(|id| Pending::HashtableValues(id, table))?;
        let members = vec![
            (
                "LoadFactor",
                MemberType::Primitive(PrimitiveType::Single),
                MemberValue::Primitive(PrimitiveValue::Single(LOAD_FACTOR)),
            ),
            ("Version", MemberType::Primitive(PrimitiveType::Int32), int32(table.len(), "Hashtable version")?),
            ("Comparer", system_class_type("System.Collections.IComparer"), MemberValue::Null),
            (
                "HashCodeProvider",
                system_class_type("System.Collections.IHashCodeProvider"),
                MemberValue::Null,
            ),
            (
                "HashSize",
                MemberType::Primitive(PrimitiveType::Int32),
                MemberValue::Primitive(PrimitiveValue::Int32(hash_size)),
            ),
            ("Keys", MemberType::ObjectArray, keys_val),
            ("Values", MemberType::ObjectArray, vals_val),
        ];
        Ok(self.class(object_id, HASHTABLE_TYPE_NAME.to_string(), members, None))
    }

    fn exception(&mut self, object_id: Id, info: &'v ExceptionInfo) -> Result<Record> {
        let string_type = || MemberType::String;
        let int32_type = || MemberType::Primitive(PrimitiveType::Int32);

        let class_name = self.string(&info.class_name)?;
        let message = self.opt_string(info.message.as_ref())?;
        let data = match info.data.as_ref() {
            Some(table) => self.defer(|id| Pending::Hashtable(id, table))?,
            None => MemberValue::Null,
        };
        let inner_exception = match info.inner_exception.as_deref() {
            Some(inner) => self.defer(|id| Pending::Exception(id, inner))?,
            None => MemberValue::Null,
        };
        let help_url = self.opt_string(info.help_url.as_ref())?;
        let stack_trace = self.opt_string(info.stack_trace.as_ref())?;
        let source = self.opt_string(info.source.as_ref())?;

        let members = vec![
            ("ClassName", string_type(), class_name),
            ("Message", string_type(), message),
            ("Data", system_class_type("System.Collections.IDictionary"), data),
            ("InnerException", system_class_type("System.Exception"), inner_exception),
            ("HelpURL", string_type(), help_url),
            ("StackTraceString", string_type(), stack_trace),
            ("RemoteStackTraceString", string_type(), MemberValue::Null),
            ("RemoteStackIndex", int32_type(), MemberValue::Primitive(PrimitiveValue::Int32(0))),
            ("ExceptionMethod", string_type(), MemberValue::Null),
            ("HResult", int32_type(), MemberValue::Primitive(PrimitiveValue::Int32(info.hresult))),
            ("Source", string_type(), source),
            ("WatsonBuckets", MemberType::PrimitiveArray(PrimitiveType::Byte), MemberValue::Null),
        ];
        Ok(self.class(object_id, info.class_name.to_string(), members, None))
    }
}
