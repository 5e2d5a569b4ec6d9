use crate::ShapeKind;
use std::sync::Arc;

/// A value of one of the `System.Drawing` structs.
///
/// Float members are compared bitwise, so that `NaN` coordinates round trip.
#[derive(Clone, Debug)]
pub enum DrawingPrimitive {
    Point { x: i32, y: i32 },
    PointF { x: f32, y: f32 },
    Size { width: i32, height: i32 },
    SizeF { width: f32, height: f32 },
    Rectangle { x: i32, y: i32, width: i32, height: i32 },
    RectangleF { x: f32, y: f32, width: f32, height: f32 },
    Color(Color),
}

/// The serialized state of `System.Drawing.Color`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Color {
    /// Set only for named colors that are not known colors.
    pub name: Option<Arc<str>>,
    /// ARGB.
    pub value: i64,
    pub known_color: i16,
    pub state: i16,
}

impl Color {
    pub const STATE_KNOWN_COLOR_VALID: i16 = 0x0001;
    pub const STATE_ARGB_VALUE_VALID: i16 = 0x0002;
    pub const STATE_NAME_VALID: i16 = 0x0008;

    pub fn from_argb(argb: u32) -> Self {
        Self {
            name: None,
            value: argb as i64,
            known_color: 0,
            state: Self::STATE_ARGB_VALUE_VALID,
        }
    }
}

impl DrawingPrimitive {
    pub fn shape_kind(&self) -> ShapeKind {
        match self {
            Self::Point { .. } => ShapeKind::Point,
            Self::PointF { .. } => ShapeKind::PointF,
            Self::Size { .. } => ShapeKind::Size,
            Self::SizeF { .. } => ShapeKind::SizeF,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::RectangleF { .. } => ShapeKind::RectangleF,
            Self::Color(_) => ShapeKind::Color,
        }
    }
}

impl PartialEq for DrawingPrimitive {
    fn eq(&self, other: &Self) -> bool {
        let bits = |fs: &[f32]| fs.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        match (self, other) {
            (Self::Point { x: x1, y: y1 }, Self::Point { x: x2, y: y2 }) => (x1, y1) == (x2, y2),
            (Self::PointF { x: x1, y: y1 }, Self::PointF { x: x2, y: y2 }) => {
                bits(&[*x1, *y1]) == bits(&[*x2, *y2])
            }
            (
                Self::Size { width: w1, height: h1 },
                Self::Size { width: w2, height: h2 },
            ) => (w1, h1) == (w2, h2),
            (
                Self::SizeF { width: w1, height: h1 },
                Self::SizeF { width: w2, height: h2 },
            ) => bits(&[*w1, *h1]) == bits(&[*w2, *h2]),
            (
                Self::Rectangle { x: x1, y: y1, width: w1, height: h1 },
                Self::Rectangle { x: x2, y: y2, width: w2, height: h2 },
            ) => (x1, y1, w1, h1) == (x2, y2, w2, h2),
            (
                Self::RectangleF { x: x1, y: y1, width: w1, height: h1 },
                Self::RectangleF { x: x2, y: y2, width: w2, height: h2 },
            ) => bits(&[*x1, *y1, *w1, *h1]) == bits(&[*x2, *y2, *w2, *h2]),
            (Self::Color(c1), Self::Color(c2)) => c1 == c2,
            _ => false,
        }
    }
}
impl Eq for DrawingPrimitive {}
