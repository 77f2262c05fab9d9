//! Field validation for catalog entities
//!
//! Every value written by the store passes through these checks first.
//! Invalid input returns ValidationError, not panic.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for product, category and branch names
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length for serial numbers
pub const MAX_SERIAL_LEN: usize = 40;

/// Serial numbers are plain digit strings (product id followed by category id)
static SERIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("invalid serial regex"));

/// Validation error for catalog fields
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Numeric value outside the accepted range
    OutOfRange { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::OutOfRange { field, value } => {
                write!(f, "{} out of range: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a display name (product, category, branch).
///
/// Leading/trailing whitespace does not count towards emptiness;
/// length is measured in characters, not bytes.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Check a price: finite and not negative.
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "price",
            value: price.to_string(),
        });
    }
    Ok(())
}

/// Check a serial number: 1..=40 ASCII digits.
pub fn validate_serial_number(number: &str) -> Result<(), ValidationError> {
    if number.is_empty() {
        return Err(ValidationError::Empty {
            field: "serial number",
        });
    }

    if number.len() > MAX_SERIAL_LEN {
        return Err(ValidationError::TooLong {
            field: "serial number",
            max: MAX_SERIAL_LEN,
        });
    }

    if !SERIAL_RE.is_match(number) {
        return Err(ValidationError::InvalidFormat {
            field: "serial number",
            reason: "must contain digits only",
        });
    }

    Ok(())
}
