use super::{f32_member, i32_member, primitive_member, Materializer};
use crate::{Color, DrawingPrimitive, ShapeKind};
use anyhow::Result;
use nrbf_records::records::ClassRecord;
use nrbf_types::serde::PrimitiveValue;

/// Library names are full assembly names; any version of the drawing assembly will do.
const DRAWING_LIBRARY_NAME_PREFIX: &str = "System.Drawing,";

impl<'a> Materializer<'a> {
    fn is_drawing_library(&self, class: &ClassRecord) -> Result<bool> {
        let lib_id = match class.library_id() {
            Some(lib_id) => lib_id,
            None => return Ok(false),
        };
        let is_drawing = self
            .bfo
            .record_map()
            .get(lib_id)?
            .as_library()
            .is_some_and(|lib| lib.library_name.starts_with(DRAWING_LIBRARY_NAME_PREFIX));
        Ok(is_drawing)
    }

    pub(super) fn drawing_primitive(&mut self, class: &ClassRecord) -> Result<Option<DrawingPrimitive>> {
        let kind = match ShapeKind::from_drawing_type_name(class.name()) {
            Some(kind) if self.known_types.contains(kind) => kind,
            _ => return Ok(None),
        };
        if !self.is_drawing_library(class)? {
            return Ok(None);
        }

        let prim = match kind {
            ShapeKind::Point => DrawingPrimitive::Point {
                x: i32_member(class, "x")?,
                y: i32_member(class, "y")?,
            },
            ShapeKind::PointF => DrawingPrimitive::PointF {
                x: f32_member(class, "x")?,
                y: f32_member(class, "y")?,
            },
            ShapeKind::Size => DrawingPrimitive::Size {
                width: i32_member(class, "width")?,
                height: i32_member(class, "height")?,
            },
            ShapeKind::SizeF => DrawingPrimitive::SizeF {
                width: f32_member(class, "width")?,
                height: f32_member(class, "height")?,
            },
            ShapeKind::Rectangle => DrawingPrimitive::Rectangle {
                x: i32_member(class, "x")?,
                y: i32_member(class, "y")?,
                width: i32_member(class, "width")?,
                height: i32_member(class, "height")?,
            },
            ShapeKind::RectangleF => DrawingPrimitive::RectangleF {
                x: f32_member(class, "x")?,
                y: f32_member(class, "y")?,
                width: f32_member(class, "width")?,
                height: f32_member(class, "height")?,
            },
            _ => DrawingPrimitive::Color(Color {
                name: self.string_member(class, "name")?,
                value: primitive_member(class, "value", "an Int64", |val| match val {
                    PrimitiveValue::Int64(i) => Some(*i),
                    _ => None,
                })?,
                known_color: i16_member(class, "knownColor")?,
                state: i16_member(class, "state")?,
            }),
        };
        Ok(Some(prim))
    }
}

fn i16_member(class: &ClassRecord, name: &str) -> Result<i16> {
    primitive_member(class, name, "an Int16", |val| match val {
        PrimitiveValue::Int16(i) => Some(*i),
        _ => None,
    })
}
