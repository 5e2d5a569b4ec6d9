use std::collections::HashSet;

pub const HASHTABLE_TYPE_NAME: &str = "System.Collections.Hashtable";
pub const ARRAY_LIST_TYPE_NAME: &str = "System.Collections.ArrayList";
pub const NOT_SUPPORTED_EXCEPTION_TYPE_NAME: &str = "System.NotSupportedException";
pub const LIST_TYPE_NAME_PREFIX: &str = "System.Collections.Generic.List`1[[";
pub const STRING_TYPE_NAME: &str = "System.String";

/// The runtime library that system classes implicitly belong to.
pub const MSCORLIB_LIBRARY_NAME: &str =
    "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";
pub const DRAWING_LIBRARY_NAME: &str =
    "System.Drawing, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b03f5f7f11d50a3a";

/// One allow-listed shape.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum ShapeKind {
    /// A primitive boxed at the root, eg a `System.Int32` class with an `m_value` member.
    BoxedPrimitive,
    String,
    PrimitiveArray,
    StringArray,
    /// An array of objects, each of which is null, a primitive, or a string.
    ObjectArray,
    /// `List<T>` of a primitive `T` or of strings.
    List,
    ArrayList,
    Hashtable,
    NotSupportedException,

    Point,
    PointF,
    Size,
    SizeF,
    Rectangle,
    RectangleF,
    Color,
}

pub const FRAMEWORK_SHAPES: [ShapeKind; 9] = [
    ShapeKind::BoxedPrimitive,
    ShapeKind::String,
    ShapeKind::PrimitiveArray,
    ShapeKind::StringArray,
    ShapeKind::ObjectArray,
    ShapeKind::List,
    ShapeKind::ArrayList,
    ShapeKind::Hashtable,
    ShapeKind::NotSupportedException,
];

pub const DRAWING_SHAPES: [ShapeKind; 7] = [
    ShapeKind::Point,
    ShapeKind::PointF,
    ShapeKind::Size,
    ShapeKind::SizeF,
    ShapeKind::Rectangle,
    ShapeKind::RectangleF,
    ShapeKind::Color,
];

impl ShapeKind {
    pub fn is_drawing(&self) -> bool {
        DRAWING_SHAPES.contains(self)
    }

    /// The full type name, for shapes that are identified by exactly one.
    pub fn type_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Hashtable => HASHTABLE_TYPE_NAME,
            Self::ArrayList => ARRAY_LIST_TYPE_NAME,
            Self::NotSupportedException => NOT_SUPPORTED_EXCEPTION_TYPE_NAME,
            Self::Point => "System.Drawing.Point",
            Self::PointF => "System.Drawing.PointF",
            Self::Size => "System.Drawing.Size",
            Self::SizeF => "System.Drawing.SizeF",
            Self::Rectangle => "System.Drawing.Rectangle",
            Self::RectangleF => "System.Drawing.RectangleF",
            Self::Color => "System.Drawing.Color",
            Self::BoxedPrimitive
            | Self::String
            | Self::PrimitiveArray
            | Self::StringArray
            | Self::ObjectArray
            | Self::List => return None,
        };
        Some(name)
    }

    pub fn from_drawing_type_name(name: &str) -> Option<Self> {
        DRAWING_SHAPES
            .iter()
            .copied()
            .find(|kind| kind.type_name() == Some(name))
    }
}

/// The allow-list consulted before any composite shape is reconstructed.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct KnownTypes {
    kinds: HashSet<ShapeKind>,
}

impl Default for KnownTypes {
    fn default() -> Self {
        Self::all()
    }
}

impl KnownTypes {
    pub fn none() -> Self {
        Self {
            kinds: HashSet::new(),
        }
    }
    pub fn framework() -> Self {
        Self {
            kinds: FRAMEWORK_SHAPES.into_iter().collect(),
        }
    }
    pub fn drawing() -> Self {
        Self {
            kinds: DRAWING_SHAPES.into_iter().collect(),
        }
    }
    pub fn all() -> Self {
        Self {
            kinds: FRAMEWORK_SHAPES.into_iter().chain(DRAWING_SHAPES).collect(),
        }
    }

    pub fn with(mut self, kind: ShapeKind) -> Self {
        self.kinds.insert(kind);
        self
    }
    pub fn without(mut self, kind: ShapeKind) -> Self {
        self.kinds.remove(&kind);
        self
    }

    pub fn contains(&self, kind: ShapeKind) -> bool {
        self.kinds.contains(&kind)
    }
}
