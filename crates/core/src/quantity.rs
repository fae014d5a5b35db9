//! Whole-unit stock quantities.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// A non-negative count of stock units, at most [`Quantity::MAX`].
///
/// Fractional units do not exist; inputs that are not whole, non-negative
/// numbers are rejected with [`DomainError::InvalidQuantity`] before they can
/// reach an entity. The upper bound keeps every level representable in the
/// signed running-stock column.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u64", into = "u64")]
pub struct Quantity(u64);

const MAX_UNITS: u64 = i64::MAX as u64;

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);
    pub const MAX: Quantity = Quantity(MAX_UNITS);

    /// Values above [`Quantity::MAX`] are clamped to it.
    pub const fn new(units: u64) -> Self {
        if units > MAX_UNITS {
            Self(MAX_UNITS)
        } else {
            Self(units)
        }
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Lossless, since every quantity fits in `i64`.
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }

    /// Coerce free text into a quantity.
    ///
    /// Accepts integer text (`"12"`, `" 12 "`) and integral decimal text
    /// (`"12.0"`). Rejects negatives, fractions and anything non-numeric.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<u64>() {
            return Self::try_from(value);
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::try_from(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value.fract() == 0.0 => {
                if value < 0.0 {
                    return Err(DomainError::invalid_quantity(format!(
                        "`{trimmed}` is negative"
                    )));
                }
                // 2^63 is the first float past the bound.
                if value >= MAX_UNITS as f64 {
                    return Err(DomainError::invalid_quantity(format!(
                        "`{trimmed}` is out of range"
                    )));
                }
                Ok(Self(value as u64))
            }
            _ => Err(DomainError::invalid_quantity(format!(
                "`{trimmed}` is not a whole number"
            ))),
        }
    }

    /// `None` past [`Quantity::MAX`].
    pub fn checked_add(self, other: Quantity) -> Option<Quantity> {
        self.0
            .checked_add(other.0)
            .filter(|units| *units <= MAX_UNITS)
            .map(Quantity)
    }

    pub fn checked_sub(self, other: Quantity) -> Option<Quantity> {
        self.0.checked_sub(other.0).map(Quantity)
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Quantity)
            .map_err(|_| DomainError::invalid_quantity(format!("{value} is negative")))
    }
}

impl TryFrom<u64> for Quantity {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > MAX_UNITS {
            return Err(DomainError::invalid_quantity(format!(
                "{value} exceeds the largest stock level ({MAX_UNITS})"
            )));
        }
        Ok(Self(value))
    }
}

impl From<Quantity> for u64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
