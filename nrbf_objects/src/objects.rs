use nrbf_types::serde::{PrimitiveType, PrimitiveValue};
use std::sync::Arc;

/// A value of one of the allow-listed framework shapes.
///
/// Strings are shared: every slot that refers to the same string record
/// holds a clone of the same `Arc`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum FrameworkObject {
    Null,
    Primitive(PrimitiveValue),
    String(Arc<str>),
    PrimitiveArray(PrimitiveType, Vec<PrimitiveValue>),
    StringArray(Vec<Option<Arc<str>>>),
    /// Each element is `Null`, `Primitive`, or `String`.
    ObjectArray(Vec<FrameworkObject>),
    List(ListItems),
    /// Each element is `Null`, `Primitive`, or `String`.
    ArrayList(Vec<FrameworkObject>),
    Hashtable(Hashtable),
    Exception(ExceptionInfo),
}

impl FrameworkObject {
    pub fn string(s: &str) -> Self {
        Self::String(Arc::from(s))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Self::Primitive(val) => Some(val),
            _ => None,
        }
    }
    pub fn as_hashtable(&self) -> Option<&Hashtable> {
        match self {
            Self::Hashtable(table) => Some(table),
            _ => None,
        }
    }

    /// Whether this may appear as an element of an `ObjectArray` or `ArrayList`,
    /// or as a hashtable value.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Null | Self::Primitive(_) | Self::String(_))
    }
}

impl From<PrimitiveValue> for FrameworkObject {
    fn from(val: PrimitiveValue) -> Self {
        Self::Primitive(val)
    }
}

/// The items of a `List<T>`, up to its size.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ListItems {
    Primitive(PrimitiveType, Vec<PrimitiveValue>),
    String(Vec<Option<Arc<str>>>),
}

impl ListItems {
    pub fn len(&self) -> usize {
        match self {
            Self::Primitive(_, vals) => vals.len(),
            Self::String(strs) => strs.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entries in insertion order. Keys are primitives or strings; values are scalars.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Hashtable {
    entries: Vec<(FrameworkObject, FrameworkObject)>,
}

impl Hashtable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces and returns the value of an existing equal key.
    pub fn insert(&mut self, key: FrameworkObject, val: FrameworkObject) -> Option<FrameworkObject> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(std::mem::replace(v, val)),
            None => {
                self.entries.push((key, val));
                None
            }
        }
    }

    pub fn get(&self, key: &FrameworkObject) -> Option<&FrameworkObject> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&FrameworkObject> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FrameworkObject, FrameworkObject)> {
        self.entries.iter()
    }
}

impl FromIterator<(FrameworkObject, FrameworkObject)> for Hashtable {
    fn from_iter<I: IntoIterator<Item = (FrameworkObject, FrameworkObject)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, val) in iter {
            table.insert(key, val);
        }
        table
    }
}

/// The HRESULT of `System.NotSupportedException`, COR_E_NOTSUPPORTED.
pub const NOT_SUPPORTED_HRESULT: i32 = -2146233067;

/// The serialized state of a `System.NotSupportedException`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ExceptionInfo {
    pub class_name: Arc<str>,
    pub message: Option<Arc<str>>,
    pub data: Option<Hashtable>,
    pub inner_exception: Option<Box<ExceptionInfo>>,
    pub help_url: Option<Arc<str>>,
    pub stack_trace: Option<Arc<str>>,
    pub source: Option<Arc<str>>,
    pub hresult: i32,
}

impl ExceptionInfo {
    pub fn not_supported(message: &str) -> Self {
        Self {
            class_name: Arc::from(crate::NOT_SUPPORTED_EXCEPTION_TYPE_NAME),
            message: Some(Arc::from(message)),
            data: None,
            inner_exception: None,
            help_url: None,
            stack_trace: None,
            source: None,
            hresult: NOT_SUPPORTED_HRESULT,
        }
    }
}
