//! Range checks for option values and backoff arithmetic

use crate::error::{MiragicError, Result};
use std::fmt::Display;

/// Validator for numeric option values
pub struct NumericValidator;

impl NumericValidator {
    /// Check `value` against an inclusive `(min, max)` range
    ///
    /// The error names the option and the range, e.g.
    /// `Invalid threshold: 256 (valid range: 0-255)`.
    pub fn validate_range<T>(name: &str, value: T, (min, max): (T, T)) -> Result<T>
    where
        T: PartialOrd + Display + Copy,
    {
        if value < min || value > max {
            return Err(MiragicError::option_value_error(
                name,
                value,
                &format!("{}-{}", min, max),
            ));
        }
        Ok(value)
    }

    /// Check a strength-like value in `0.0..=1.0`; NaN and infinities fail
    pub fn validate_unit_interval(name: &str, value: f32) -> Result<f32> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(MiragicError::option_value_error(name, value, "0.0-1.0"));
        }
        Ok(value)
    }

    /// Clamp to `min..=max`; NaN maps to `min`
    pub fn clamp_to_range(value: f64, min: f64, max: f64) -> f64 {
        if value.is_nan() {
            return min;
        }
        value.clamp(min, max)
    }
}
