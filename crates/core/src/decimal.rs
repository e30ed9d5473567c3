//! Fixed-point decimal columns.
//!
//! Prices and weights are money-like quantities and must never go through
//! binary floating point. Columns are described by a total digit budget and a
//! number of fractional digits, and values are stored rescaled to exactly that
//! many fractional digits (so `19.9` is kept as `19.90`).

use rust_decimal::Decimal;

use crate::error::{DomainError, DomainResult};

/// Shape of a fixed-point decimal column.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecimalField {
    pub name: &'static str,
    pub max_digits: u32,
    pub decimal_places: u32,
}

impl DecimalField {
    /// Product price: 10 digits, 2 fractional.
    pub const PRICE: DecimalField = DecimalField::new("price", 10, 2);

    /// Product weight: 6 digits, 2 fractional.
    pub const WEIGHT: DecimalField = DecimalField::new("weight", 6, 2);

    pub const fn new(name: &'static str, max_digits: u32, decimal_places: u32) -> Self {
        Self {
            name,
            max_digits,
            decimal_places,
        }
    }

    /// Validate `value` against the column and rescale it to `decimal_places`.
    pub fn clean(&self, value: Decimal) -> DomainResult<Decimal> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation(format!(
                "{} must not be negative (got {value})",
                self.name
            )));
        }

        let normalized = value.normalize();
        if normalized.scale() > self.decimal_places {
            return Err(DomainError::validation(format!(
                "{} allows at most {} decimal places (got {value})",
                self.name, self.decimal_places
            )));
        }

        let whole_digits = integer_digits(normalized);
        let max_whole = self.max_digits - self.decimal_places;
        if whole_digits > max_whole {
            return Err(DomainError::validation(format!(
                "{} allows at most {max_whole} digits before the decimal point (got {value})",
                self.name
            )));
        }

        let mut cleaned = normalized.abs();
        cleaned.rescale(self.decimal_places);
        Ok(cleaned)
    }

    /// Parse an exact decimal string and validate it against the column.
    pub fn parse(&self, raw: &str) -> DomainResult<Decimal> {
        let value = Decimal::from_str_exact(raw.trim())
            .map_err(|e| DomainError::validation(format!("{}: invalid decimal {raw:?}: {e}", self.name)))?;
        self.clean(value)
    }
}

fn integer_digits(value: Decimal) -> u32 {
    let whole = value.trunc().abs();
    if whole.is_zero() {
        0
    } else {
        whole.normalize().to_string().len() as u32
    }
}
