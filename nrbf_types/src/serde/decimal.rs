use crate::NrbfError;
use anyhow::Result;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const MAX_DECIMAL_SCALE: u8 = 28;
const MANTISSA_LIMIT: u128 = 1 << 96;

const FLAGS_SCALE_SHIFT: u32 = 16;
const FLAGS_SIGN_BIT: u32 = 1 << 31;
const FLAGS_LEGAL_BITS: u32 = FLAGS_SIGN_BIT | (0xFF << FLAGS_SCALE_SHIFT);

fn invariant_text_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(-)?([0-9]+)(?:\.([0-9]+))?$").expect("The decimal pattern is valid.")
    })
}

/// A 96-bit scaled integer: `(-1)^negative * mantissa / 10^scale`.
///
/// On the wire a decimal is its invariant-culture text, eg `"-12.3400"`.
/// Trailing zeros are significant, so `1.0` and `1.00` are distinct values.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Decimal {
    negative: bool,
    mantissa: u128,
    scale: u8,
}

impl Decimal {
    pub const ZERO: Self = Self {
        negative: false,
        mantissa: 0,
        scale: 0,
    };
    pub const MAX: Self = Self {
        negative: false,
        mantissa: MANTISSA_LIMIT - 1,
        scale: 0,
    };
    pub const MIN: Self = Self {
        negative: true,
        mantissa: MANTISSA_LIMIT - 1,
        scale: 0,
    };

    pub fn new(negative: bool, mantissa: u128, scale: u8) -> Result<Self> {
        if mantissa >= MANTISSA_LIMIT {
            return Err(NrbfError::out_of_range("Decimal mantissa exceeds 96 bits").into());
        }
        if scale > MAX_DECIMAL_SCALE {
            return Err(NrbfError::out_of_range(format!("Decimal scale {scale}")).into());
        }
        Ok(Self {
            negative,
            mantissa,
            scale,
        })
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }
    pub fn mantissa(&self) -> u128 {
        self.mantissa
    }
    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn parse(text: &str) -> Result<Self> {
        let caps = invariant_text_regex()
            .captures(text)
            .ok_or_else(|| NrbfError::invalid_data(format!("Not a decimal: {text:?}")))?;
        let negative = caps.get(1).is_some();
        let int_digits = caps.get(2).map_or("", |m| m.as_str());
        let frac_digits = caps.get(3).map_or("", |m| m.as_str());

        let scale = u8::try_from(frac_digits.len())
            .ok()
            .filter(|scale| *scale <= MAX_DECIMAL_SCALE)
            .ok_or_else(|| NrbfError::out_of_range(format!("Decimal scale of {text:?}")))?;

        let mut mantissa = 0u128;
        for digit in int_digits.bytes().chain(frac_digits.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((digit - b'0') as u128))
                .filter(|m| *m < MANTISSA_LIMIT)
                .ok_or_else(|| NrbfError::out_of_range(format!("Decimal {text:?}")))?;
        }

        Self::new(negative, mantissa, scale)
    }

    /// Unpacks the four-int layout used by a boxed decimal's members.
    pub fn from_parts(flags: i32, hi: i32, lo: i32, mid: i32) -> Result<Self> {
        let flags = flags as u32;
        if flags & !FLAGS_LEGAL_BITS != 0 {
            return Err(NrbfError::invalid_data(format!("Decimal flags {flags:#x}")).into());
        }
        let scale = ((flags >> FLAGS_SCALE_SHIFT) & 0xFF) as u8;
        let negative = flags & FLAGS_SIGN_BIT != 0;
        let mantissa = ((hi as u32 as u128) << 64) | ((mid as u32 as u128) << 32) | (lo as u32 as u128);
        Self::new(negative, mantissa, scale)
    }

    /// Returns `(flags, hi, lo, mid)`.
    pub fn to_parts(&self) -> (i32, i32, i32, i32) {
        let mut flags = (self.scale as u32) << FLAGS_SCALE_SHIFT;
        if self.negative {
            flags |= FLAGS_SIGN_BIT;
        }
        let lo = self.mantissa as u32;
        let mid = (self.mantissa >> 32) as u32;
        let hi = (self.mantissa >> 64) as u32;
        (flags as i32, hi as i32, lo as i32, mid as i32)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        let scale = self.scale as usize;
        let digits = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        if self.negative {
            write!(f, "-")?;
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        if scale == 0 {
            write!(f, "{int_part}")
        } else {
            write!(f, "{int_part}.{frac_part}")
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_round_trip() -> Result<()> {
        for text in [
            "0",
            "1.00",
            "-12.3400",
            "0.0000000000000000000000000001",
            "79228162514264337593543950335",
            "-79228162514264337593543950335",
            "7.9228162514264337593543950335",
        ] {
            let dec = Decimal::parse(text)?;
            assert_eq!(dec.to_string(), text);
        }
        assert_eq!(Decimal::parse("79228162514264337593543950335")?, Decimal::MAX);
        assert_eq!(Decimal::parse("-79228162514264337593543950335")?, Decimal::MIN);
        Ok(())
    }

    #[test]
    fn bad_text_rejected() {
        for text in ["", "1.", ".5", "1e5", "+1", "1,0", " 1"] {
            let err = Decimal::parse(text).unwrap_err();
            assert!(matches!(
                NrbfError::kind_of(&err),
                Some(NrbfError::InvalidData(_))
            ));
        }
        for text in [
            "79228162514264337593543950336",
            "0.00000000000000000000000000001",
        ] {
            let err = Decimal::parse(text).unwrap_err();
            assert!(NrbfError::kind_of(&err).unwrap().is_out_of_range());
        }
    }

    #[test]
    fn parts_round_trip() -> Result<()> {
        let dec = Decimal::parse("-12345678901234567890.123")?;
        let (flags, hi, lo, mid) = dec.to_parts();
        assert_eq!((flags as u32) >> 31, 1);
        assert_eq!(((flags as u32) >> 16) & 0xFF, 3);
        assert_eq!(Decimal::from_parts(flags, hi, lo, mid)?, dec);

        let err = Decimal::from_parts(1, 0, 0, 0).unwrap_err();
        assert!(matches!(
            NrbfError::kind_of(&err),
            Some(NrbfError::InvalidData(_))
        ));
        Ok(())
    }
}
