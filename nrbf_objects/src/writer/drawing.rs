use super::{primitive_member as member, WriteContext};
use crate::{DrawingPrimitive, DRAWING_LIBRARY_NAME};
use anyhow::Result;
use nrbf_records::catalog::MemberType;
use nrbf_records::records::MemberValue;
use nrbf_records::Id;
use nrbf_types::serde::PrimitiveValue;
use nrbf_types::NrbfError;

impl<'v> WriteContext<'v> {
    /// The struct is a class of the drawing library, whose record precedes the class's.
    pub(super) fn drawing_root(&mut self, value: &DrawingPrimitive) -> Result<Id> {
        let root_id = self.next_id()?;
        let lib_id = self.library(DRAWING_LIBRARY_NAME)?;
        let name = value
            .shape_kind()
            .type_name()
            .ok_or_else(|| NrbfError::corrupt(format!("{:?} has no type name", value.shape_kind())))?;

        use PrimitiveValue::{Int16, Int32, Int64, Single};
        let members = match value {
            DrawingPrimitive::Point { x, y } => vec![member("x", Int32(*x)), member("y", Int32(*y))],
            DrawingPrimitive::PointF { x, y } => {
                vec![member("x", Single(*x)), member("y", Single(*y))]
            }
            DrawingPrimitive::Size { width, height } => {
                vec![member("width", Int32(*width)), member("height", Int32(*height))]
            }
            DrawingPrimitive::SizeF { width, height } => {
                vec![member("width", Single(*width)), member("height", Single(*height))]
            }
            DrawingPrimitive::Rectangle { x, y, width, height } => vec![
                member("x", Int32(*x)),
                member("y", Int32(*y)),
                member("width", Int32(*width)),
                member("height", Int32(*height)),
            ],
            DrawingPrimitive::RectangleF { x, y, width, height } => vec![
                member("x", Single(*x)),
                member("y", Single(*y)),
                member("width", Single(*width)),
                member("height", Single(*height)),
            ],
            DrawingPrimitive::Color(color) => {
                let name_val = self.opt_string(color.name.as_ref())?;
                vec![
                    ("name", MemberType::String, name_val),
                    member("value", Int64(color.value)),
                    member("knownColor", Int16(color.known_color)),
                    member("state", Int16(color.state)),
                ]
            }
        };

        let record = self.class(root_id, name.to_string(), members, Some(lib_id));
        self.push_top_level(record)
    }
}
