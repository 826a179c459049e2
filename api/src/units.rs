//! Fixed-point token amounts as they are stored on chain.

use std::fmt;

use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

/// Number of decimals every tracked token uses.
pub const DECIMALS: u32 = 18;

/// An error that can occur when parsing a string into a `TokenAmount`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseTokenAmountError {
    /// The string is not a plain non-negative decimal number.
    #[error("invalid token amount format")]
    InvalidFormat,
    /// The string has more fractional digits than the token supports.
    #[error("too many decimal places for the token")]
    TooManyDecimals,
}

/// How many fractional digits a derived value is shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumIs)]
pub enum DisplayPrecision {
    Mobile,
    #[default]
    Desktop,
}

impl DisplayPrecision {
    pub fn for_viewport(is_mobile: bool) -> Self {
        if is_mobile {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn fraction_digits(&self) -> u32 {
        match self {
            Self::Mobile => 4,
            Self::Desktop => 8,
        }
    }
}

/// An unsigned token amount in base units, scaled by `10^DECIMALS`.
///
/// `Display` matches the usual ether formatting: the whole part, a point,
/// and the fractional part with trailing zeros removed but at least one digit
/// kept (`1.0`, `0.25`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenAmount(BigUint);

impl TokenAmount {
    pub fn from_raw(raw: BigUint) -> Self {
        Self(raw)
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Exactly one whole token.
    pub fn one() -> Self {
        Self(scale(DECIMALS))
    }

    pub fn raw(&self) -> &BigUint {
        &self.0
    }

    /// Parses a decimal string of whole tokens, e.g. `"12.5"`.
    pub fn parse(s: &str) -> Result<Self, ParseTokenAmountError> {
        let s = s.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(ParseTokenAmountError::InvalidFormat);
        }
        if frac.len() > DECIMALS as usize {
            return Err(ParseTokenAmountError::TooManyDecimals);
        }

        let parse_part = |part: &str| -> Result<BigUint, ParseTokenAmountError> {
            if part.is_empty() {
                Ok(BigUint::zero())
            } else {
                part.parse::<BigUint>()
                    .map_err(|_| ParseTokenAmountError::InvalidFormat)
            }
        };

        let whole_units = parse_part(whole)? * scale(DECIMALS);
        let frac_units = parse_part(frac)? * scale(DECIMALS - frac.len() as u32);
        Ok(Self(whole_units + frac_units))
    }

    /// Multiplies two fixed-point amounts and rescales the product back down.
    ///
    /// The multiplication happens first so no precision is lost to an early
    /// division; the final division truncates.
    pub fn mul_scaled(&self, other: &TokenAmount) -> TokenAmount {
        Self((&self.0 * &other.0) / scale(DECIMALS))
    }

    /// Formats with exactly `digits` fractional digits, rounding half up.
    pub fn to_fixed(&self, digits: u32) -> String {
        let digits = digits.min(DECIMALS);
        let step = scale(DECIMALS - digits);
        let mut quotient = &self.0 / &step;
        let remainder = &self.0 % &step;
        if remainder * 2u32 >= step {
            quotient += 1u32;
        }

        if digits == 0 {
            return quotient.to_string();
        }
        let unit = scale(digits);
        let whole = &quotient / &unit;
        let frac = (&quotient % &unit).to_string();
        format!("{}.{:0>width$}", whole, frac, width = digits as usize)
    }

    /// Rounds to the precision's digit count, then drops trailing zeros and a
    /// dangling point: `"1.5000"` becomes `"1.5"`, `"2.0000"` becomes `"2"`.
    pub fn to_display(&self, precision: DisplayPrecision) -> String {
        trim_fraction(&self.to_fixed(precision.fraction_digits()))
    }
}

impl From<u64> for TokenAmount {
    /// Interprets the value as base units.
    fn from(raw: u64) -> Self {
        Self(BigUint::from(raw))
    }
}

impl From<U256> for TokenAmount {
    fn from(raw: U256) -> Self {
        Self(BigUint::from_bytes_be(&raw.to_be_bytes::<32>()))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = scale(DECIMALS);
        let whole = &self.0 / &unit;
        let frac = format!(
            "{:0>width$}",
            (&self.0 % &unit).to_string(),
            width = DECIMALS as usize
        );
        let frac = frac.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };
        write!(f, "{}.{}", whole, frac)
    }
}

fn scale(exponent: u32) -> BigUint {
    BigUint::from(10u32).pow(exponent)
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
