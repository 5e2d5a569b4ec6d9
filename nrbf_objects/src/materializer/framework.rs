use super::{f32_member, i32_member, is_system_class, member, mismatch, Materializer, Resolved};
use crate::{
    ExceptionInfo, FrameworkObject, Hashtable, ListItems, ShapeKind, ARRAY_LIST_TYPE_NAME,
    HASHTABLE_TYPE_NAME, LIST_TYPE_NAME_PREFIX, NOT_SUPPORTED_EXCEPTION_TYPE_NAME,
    STRING_TYPE_NAME,
};
use anyhow::Result;
use itertools::Itertools;
use nrbf_records::catalog::MemberType;
use nrbf_records::records::{ArrayKind, ArrayRecord, ClassRecord, MemberValue, Record};
use nrbf_types::serde::{DateTime, DateTimeKind, Decimal, PrimitiveType, PrimitiveValue};
use nrbf_types::NrbfError;
use std::sync::Arc;

pub const HASHTABLE_MEMBER_NAMES: [&str; 7] = [
    "LoadFactor",
    "Version",
    "Comparer",
    "HashCodeProvider",
    "HashSize",
    "Keys",
    "Values",
];

/// The element type of a one-dimensional, zero-based array. `None` for any other array.
fn single_dimension_element_type(array: &ArrayRecord) -> Option<&MemberType> {
    match array.kind {
        ArrayKind::Binary(_) if !array.is_single_dimension() => None,
        ArrayKind::Binary(_) if array.lower_bounds.iter().any(|bound| *bound != 0) => None,
        _ => Some(&array.element_type),
    }
}

impl<'a> Materializer<'a> {
    pub(super) fn framework_object(&mut self, record: &'a Record) -> Result<Option<FrameworkObject>> {
        match record {
            Record::BinaryObjectString(_) => Ok(self.root_string(record)),
            Record::Array(array) => self.array(array),
            Record::Class(class) => self.framework_class(class),
            _ => Ok(None),
        }
    }

    pub(super) fn root_string(&mut self, record: &Record) -> Option<FrameworkObject> {
        if !self.known_types.contains(ShapeKind::String) {
            return None;
        }
        self.string_of(record).map(FrameworkObject::String)
    }

    fn framework_class(&mut self, class: &'a ClassRecord) -> Result<Option<FrameworkObject>> {
        if let Some(prim_val) = self.boxed_primitive(class)? {
            return Ok(Some(FrameworkObject::Primitive(prim_val)));
        }
        if !is_system_class(class) {
            return Ok(None);
        }
        let name = class.name();
        let obj = if name == HASHTABLE_TYPE_NAME {
            self.hashtable(class)?.map(FrameworkObject::Hashtable)
        } else if name == ARRAY_LIST_TYPE_NAME {
            self.array_list(class)?
        } else if name.starts_with(LIST_TYPE_NAME_PREFIX) {
            self.list(class)?
        } else if name == NOT_SUPPORTED_EXCEPTION_TYPE_NAME {
            self.exception(class)?.map(FrameworkObject::Exception)
        } else {
            None
        };
        Ok(obj)
    }

    /// A primitive boxed as the system class of the same name.
    pub(super) fn boxed_primitive(&mut self, class: &ClassRecord) -> Result<Option<PrimitiveValue>> {
        let prim_type = match PrimitiveType::from_type_name(class.name()) {
            Some(prim_type) if is_system_class(class) => prim_type,
            _ => return Ok(None),
        };
        if !self.known_types.contains(ShapeKind::BoxedPrimitive) {
            return Ok(None);
        }

        let prim_val = match prim_type {
            PrimitiveType::DateTime => match class.member_value("dateData") {
                Some(MemberValue::Primitive(PrimitiveValue::UInt64(date_data))) => {
                    PrimitiveValue::DateTime(DateTime::from_date_data(*date_data)?)
                }
                Some(_) => return Err(mismatch("dateData", "a UInt64")),
                None => match class.member_value("ticks") {
                    Some(MemberValue::Primitive(PrimitiveValue::Int64(ticks))) => {
                        PrimitiveValue::DateTime(DateTime::new(*ticks, DateTimeKind::Unspecified)?)
                    }
                    _ => return Err(mismatch("ticks", "an Int64")),
                },
            },
            PrimitiveType::TimeSpan => match member(class, "_ticks")? {
                MemberValue::Primitive(PrimitiveValue::Int64(ticks)) => {
                    PrimitiveValue::TimeSpan((*ticks).into())
                }
                _ => return Err(mismatch("_ticks", "an Int64")),
            },
            PrimitiveType::Decimal => {
                let flags = i32_member(class, "flags")?;
                let hi = i32_member(class, "hi")?;
                let lo = i32_member(class, "lo")?;
                let mid = i32_member(class, "mid")?;
                PrimitiveValue::Decimal(Decimal::from_parts(flags, hi, lo, mid)?)
            }
            _ => match member(class, "m_value")? {
                MemberValue::Primitive(prim_val) if PrimitiveType::from(prim_val) == prim_type => {
                    *prim_val
                }
                _ => return Err(mismatch("m_value", prim_type.type_name())),
            },
        };
        Ok(Some(prim_val))
    }

    fn array(&mut self, array: &ArrayRecord) -> Result<Option<FrameworkObject>> {
        let obj = match single_dimension_element_type(array) {
            Some(MemberType::Primitive(prim_type))
                if self.known_types.contains(ShapeKind::PrimitiveArray) =>
            {
                let vals = Self::primitive_elements(array)?;
                Some(FrameworkObject::PrimitiveArray(*prim_type, vals))
            }
            Some(MemberType::String) if self.known_types.contains(ShapeKind::StringArray) => {
                Some(FrameworkObject::StringArray(self.string_elements(array)?))
            }
            Some(MemberType::Object) if self.known_types.contains(ShapeKind::ObjectArray) => {
                self.scalar_elements(array)?.map(FrameworkObject::ObjectArray)
            }
            _ => None,
        };
        Ok(obj)
    }

    fn primitive_elements(array: &ArrayRecord) -> Result<Vec<PrimitiveValue>> {
        array
            .elements
            .iter()
            .map(|val| match val {
                MemberValue::Primitive(prim_val) => Ok(*prim_val),
                _ => Err(mismatch("Primitive array element", "a primitive")),
            })
            .collect()
    }

    fn string_elements(&mut self, array: &ArrayRecord) -> Result<Vec<Option<Arc<str>>>> {
        let mut strs = Vec::with_capacity(array.elements.len());
        for val in array.elements.iter() {
            strs.push(self.opt_string(val, "String array element")?);
        }
        Ok(strs)
    }

    /// `None` if any element is other than null, primitive, or string.
    fn scalar_elements(&mut self, array: &ArrayRecord) -> Result<Option<Vec<FrameworkObject>>> {
        let mut objs = Vec::with_capacity(array.elements.len());
        for val in array.elements.iter() {
            match self.scalar(val)? {
                Some(obj) => objs.push(obj),
                None => return Ok(None),
            }
        }
        Ok(Some(objs))
    }

    fn member_array(&self, class: &ClassRecord, name: &str) -> Result<&'a ArrayRecord> {
        match self.resolve(member(class, name)?)? {
            Resolved::Record(Record::Array(array)) => Ok(array),
            _ => Err(mismatch(name, "an array")),
        }
    }

    /// `_size`, checked against the capacity of `_items`.
    fn collection_size(class: &ClassRecord, capacity: usize) -> Result<usize> {
        let size = i32_member(class, "_size")?;
        match usize::try_from(size) {
            Ok(size) if size <= capacity => Ok(size),
            _ => Err(NrbfError::corrupt(format!(
                "{} of size {size} with capacity {capacity}",
                class.name()
            ))
            .into()),
        }
    }

    fn list(&mut self, class: &ClassRecord) -> Result<Option<FrameworkObject>> {
        if !self.known_types.contains(ShapeKind::List) {
            return Ok(None);
        }
        let item_type_name = class
            .name()
            .strip_prefix(LIST_TYPE_NAME_PREFIX)
            .and_then(|rest| rest.split(',').next())
            .unwrap_or_default();

        let items = self.member_array(class, "_items")?;
        i32_member(class, "_version")?;
        let size = Self::collection_size(class, items.elements.len())?;

        let list_items = if item_type_name == STRING_TYPE_NAME {
            if single_dimension_element_type(items) != Some(&MemberType::String) {
                return Err(mismatch("_items", "a string array"));
            }
            let mut strs = self.string_elements(items)?;
            strs.truncate(size);
            ListItems::String(strs)
        } else if let Some(prim_type) = PrimitiveType::from_type_name(item_type_name) {
            if single_dimension_element_type(items) != Some(&MemberType::Primitive(prim_type)) {
                return Err(mismatch("_items", prim_type.type_name()));
            }
            let mut vals = Self::primitive_elements(items)?;
            vals.truncate(size);
            ListItems::Primitive(prim_type, vals)
        } else {
            return Ok(None);
        };
        Ok(Some(FrameworkObject::List(list_items)))
    }

    fn array_list(&mut self, class: &ClassRecord) -> Result<Option<FrameworkObject>> {
        if !self.known_types.contains(ShapeKind::ArrayList) {
            return Ok(None);
        }
        let items = self.member_array(class, "_items")?;
        if single_dimension_element_type(items) != Some(&MemberType::Object) {
            return Err(mismatch("_items", "an object array"));
        }
        i32_member(class, "_version")?;
        let size = Self::collection_size(class, items.elements.len())?;

        let objs = match self.scalar_elements(items)? {
            Some(objs) => objs.into_iter().take(size).collect_vec(),
            None => return Ok(None),
        };
        Ok(Some(FrameworkObject::ArrayList(objs)))
    }

    pub(super) fn hashtable(&mut self, class: &ClassRecord) -> Result<Option<Hashtable>> {
        if !self.known_types.contains(ShapeKind::Hashtable) || !is_system_class(class) {
            return Ok(None);
        }
        if class.member_names() != HASHTABLE_MEMBER_NAMES {
            return Err(NrbfError::corrupt(format!(
                "Hashtable members are {:?}",
                class.member_names()
            ))
            .into());
        }

        f32_member(class, "LoadFactor")?;
        i32_member(class, "Version")?;
        i32_member(class, "HashSize")?;
        for name in ["Comparer", "HashCodeProvider"] {
            if !member(class, name)?.is_null() {
                debug_declined(class, name);
                return Ok(None);
            }
        }

        let keys = self.member_array(class, "Keys")?;
        let vals = self.member_array(class, "Values")?;
        for (name, array) in [("Keys", keys), ("Values", vals)] {
            if single_dimension_element_type(array) != Some(&MemberType::Object) {
                return Err(mismatch(name, "an object array"));
            }
        }
        if keys.elements.len() != vals.elements.len() {
            return Err(NrbfError::corrupt(format!(
                "Hashtable with {} keys and {} values",
                keys.elements.len(),
                vals.elements.len()
            ))
            .into());
        }

        let mut table = Hashtable::new();
        for (key, val) in keys.elements.iter().zip_eq(vals.elements.iter()) {
            let key = match self.scalar(key)? {
                Some(FrameworkObject::Null) => {
                    return Err(NrbfError::corrupt("Hashtable with a null key").into());
                }
                Some(key) => key,
                None => return Ok(None),
            };
            let val = match self.scalar(val)? {
                Some(val) => val,
                None => return Ok(None),
            };
            if table.insert(key, val).is_some() {
                return Err(NrbfError::corrupt("Hashtable with a duplicate key").into());
            }
        }
        Ok(Some(table))
    }

    pub(super) fn exception(&mut self, class: &ClassRecord) -> Result<Option<ExceptionInfo>> {
        if !self.known_types.contains(ShapeKind::NotSupportedException)
            || !is_system_class(class)
            || class.name() != NOT_SUPPORTED_EXCEPTION_TYPE_NAME
        {
            return Ok(None);
        }
        self.enter(class.object_id)?;
        let info = self.exception_members(class);
        self.leave(class.object_id);
        info
    }

    fn exception_members(&mut self, class: &ClassRecord) -> Result<Option<ExceptionInfo>> {
        let class_name = self
            .string_member(class, "ClassName")?
            .ok_or_else(|| mismatch("ClassName", "a string"))?;
        let message = self.string_member(class, "Message")?;
        let stack_trace = self.string_member(class, "StackTraceString")?;
        let hresult = i32_member(class, "HResult")?;
        let help_url = match class.member_value("HelpURL") {
            Some(val) => self.opt_string(val, "HelpURL")?,
            None => None,
        };
        let source = match class.member_value("Source") {
            Some(val) => self.opt_string(val, "Source")?,
            None => None,
        };

        let data = match self.resolve(member(class, "Data")?)? {
            Resolved::Null => None,
            Resolved::Record(Record::Class(data_class)) if data_class.name() == HASHTABLE_TYPE_NAME => {
                match self.hashtable(data_class)? {
                    Some(table) => Some(table),
                    None => return Ok(None),
                }
            }
            Resolved::Record(Record::Class(_)) => {
                debug_declined(class, "Data");
                return Ok(None);
            }
            _ => return Err(mismatch("Data", "a dictionary")),
        };

        let inner_exception = match self.resolve(member(class, "InnerException")?)? {
            Resolved::Null => None,
            Resolved::Record(Record::Class(inner_class)) => match self.exception(inner_class)? {
                Some(inner) => Some(Box::new(inner)),
                None => return Ok(None),
            },
            _ => return Err(mismatch("InnerException", "an exception")),
        };

        Ok(Some(ExceptionInfo {
            class_name,
            message,
            data,
            inner_exception,
            help_url,
            stack_trace,
            source,
            hresult,
        }))
    }
}

fn debug_declined(class: &ClassRecord, member_name: &str) {
    tracing::debug!(
        "Declining {:?}: unsupported value of member {:?}",
        class.name(),
        member_name
    );
}
