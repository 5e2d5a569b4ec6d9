use crate::NrbfError;
use anyhow::Result;
use derive_more::{Deref, From, Into};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

/// 100ns ticks of 9999-12-31T23:59:59.9999999.
pub const MAX_DATE_TIME_TICKS: i64 = 3_155_378_975_999_999_999;

const KIND_SHIFT: u32 = 62;
const TICKS_MASK: u64 = (1 << KIND_SHIFT) - 1;

#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum DateTimeKind {
    Unspecified = 0,
    Utc = 1,
    Local = 2,
    /// A local time inside the repeated hour of a daylight-saving transition.
    LocalAmbiguousDst = 3,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct DateTime {
    ticks: i64,
    kind: DateTimeKind,
}
impl DateTime {
    pub const MIN: Self = Self {
        ticks: 0,
        kind: DateTimeKind::Unspecified,
    };
    pub const MAX: Self = Self {
        ticks: MAX_DATE_TIME_TICKS,
        kind: DateTimeKind::Unspecified,
    };

    pub fn new(ticks: i64, kind: DateTimeKind) -> Result<Self> {
        if !(0..=MAX_DATE_TIME_TICKS).contains(&ticks) {
            return Err(NrbfError::out_of_range(format!("DateTime ticks {ticks}")).into());
        }
        Ok(Self { ticks, kind })
    }

    pub fn ticks(&self) -> i64 {
        self.ticks
    }
    pub fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// Unpacks the 62-bit tick count and the 2-bit kind.
    pub fn from_date_data(date_data: u64) -> Result<Self> {
        let ticks = (date_data & TICKS_MASK) as i64;
        let kind_int = (date_data >> KIND_SHIFT) as u8;
        // Two bits always map onto one of the four kinds.
        let kind = DateTimeKind::from_u8(kind_int).unwrap_or(DateTimeKind::Unspecified);
        Self::new(ticks, kind)
    }

    pub fn to_date_data(&self) -> u64 {
        (self.ticks as u64) | ((self.kind as u64) << KIND_SHIFT)
    }
}

/// A signed duration in 100ns ticks.
#[derive(From, Into, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct TimeSpan(i64);
impl TimeSpan {
    pub const MIN: Self = Self(i64::MIN);
    pub const MAX: Self = Self(i64::MAX);

    pub fn ticks(&self) -> i64 {
        self.0
    }
}
