use anyhow::Result;
use nrbf_types::io_utils;
use nrbf_types::NrbfError;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::io::Read;

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum BinaryArrayType {
    Single = 0,
    Jagged = 1,
    Rectangular = 2,
    SingleOffset = 3,
    JaggedOffset = 4,
    RectangularOffset = 5,
}
impl BinaryArrayType {
    pub fn deser(r: &mut impl Read) -> Result<Self> {
        let [int] = io_utils::read_array::<1>(r, "binary array type")?;
        BinaryArrayType::from_u8(int)
            .ok_or_else(|| NrbfError::corrupt(format!("Unknown binary array type {int}")).into())
    }

    pub fn has_lower_bounds(&self) -> bool {
        matches!(
            self,
            Self::SingleOffset | Self::JaggedOffset | Self::RectangularOffset
        )
    }

    pub fn is_single_dimension(&self) -> bool {
        matches!(
            self,
            Self::Single | Self::Jagged | Self::SingleOffset | Self::JaggedOffset
        )
    }
}
