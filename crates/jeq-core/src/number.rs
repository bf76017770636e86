use std::fmt;

use serde_json::Number as JsonNumber;

use crate::{hash::hash_bytes, ParseError};

const POS_INT_TAG: u8 = 0x01;
const NEG_INT_TAG: u8 = 0x02;
const FLOAT_TAG: u8 = 0x03;

/// A JSON number as written in the source document.
///
/// Integers and floats are kept apart: `1` and `1.0` are different numbers.
/// Equality is the equality of [`serde_json::Number`], so `0.0 == -0.0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Number(JsonNumber);

impl Number {
    /// Creates a number from a float after validating finiteness.
    ///
    /// ```
    /// # use jeq_core::Number;
    /// let num = Number::from_f64(2.5)?;
    /// assert_eq!(num.as_f64(), Some(2.5));
    /// # Ok::<(), jeq_core::ParseError>(())
    /// ```
    pub fn from_f64(value: f64) -> Result<Self, ParseError> {
        JsonNumber::from_f64(value).map(Self).ok_or(ParseError::NotFinite { value })
    }

    /// Returns the value as `f64` when representable.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    /// Hash code consistent with equality.
    ///
    /// Both zero floats hash alike because they compare equal.
    #[must_use]
    pub fn hash_code(&self) -> crate::hash::HashCode {
        let mut bytes = [0u8; 9];
        if let Some(value) = self.0.as_u64() {
            bytes[0] = POS_INT_TAG;
            bytes[1..].copy_from_slice(&value.to_le_bytes());
        } else if let Some(value) = self.0.as_i64() {
            bytes[0] = NEG_INT_TAG;
            bytes[1..].copy_from_slice(&value.to_le_bytes());
        } else {
            let value = self.0.as_f64().unwrap_or_default();
            let value = if value == 0.0 { 0.0 } else { value };
            bytes[0] = FLOAT_TAG;
            bytes[1..].copy_from_slice(&value.to_bits().to_le_bytes());
        }
        hash_bytes(&bytes)
    }
}

impl From<JsonNumber> for Number {
    fn from(value: JsonNumber) -> Self {
        Self(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(JsonNumber::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(JsonNumber::from(value))
    }
}

impl From<Number> for JsonNumber {
    fn from(value: Number) -> Self {
        value.0
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_and_floats_are_distinct() {
        let int = Number::from(1_i64);
        let float = Number::from_f64(1.0).unwrap();
        assert_ne!(int, float);
        assert_ne!(int.hash_code(), float.hash_code());
    }

    #[test]
    fn signed_zero_hashes_alike() {
        let pos = Number::from_f64(0.0).unwrap();
        let neg = Number::from_f64(-0.0).unwrap();
        assert_eq!(pos, neg);
        assert_eq!(pos.hash_code(), neg.hash_code());
    }

    #[test]
    fn non_finite_is_rejected() {
        let err = Number::from_f64(f64::NAN).unwrap_err();
        assert!(matches!(err, ParseError::NotFinite { .. }));
    }
}
