//! Error Types Module
//!
//! A single error enum shared by the layout and sun position engines.

use thiserror::Error;

/// Errors reported by the layout and sun position engines.
#[derive(Debug, Error)]
pub enum TwinError {
    /// A length, depth, height, distance, radius or period that is not a
    /// positive finite number.
    #[error("invalid {what}: {value} (must be a positive finite number)")]
    InvalidDimension { what: &'static str, value: f64 },

    /// The fault table does not cover every slot the layout would place.
    #[error("fault table has {available} entries but {required} panels would be placed")]
    OutOfRangeFault { required: usize, available: usize },

    /// Latitude or longitude outside its valid range.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// The astronomical angle source failed.
    #[error("ephemeris calculation failed: {0}")]
    Ephemeris(String),

    /// Date or time input that could not be resolved to an instant.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    #[error("fault data could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("fault data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reject anything that is not a positive finite number.
pub fn require_positive(what: &'static str, value: f64) -> Result<f64, TwinError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TwinError::InvalidDimension { what, value })
    }
}

// ===================== TESTS =====================
