//! Geographic Location Module
//!
//! Observer location used by the ephemeris sun model.

use serde::Serialize;

use crate::error::TwinError;

// ===================== GEO POINT =====================

/// Observer location in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a validated location.
    ///
    /// # Errors
    /// Returns `InvalidLocation` if either coordinate is out of range or not
    /// a number.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TwinError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(TwinError::InvalidLocation(format!(
                "latitude must be between -90 and 90, got {}",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(TwinError::InvalidLocation(format!(
                "longitude must be between -180 and 180, got {}",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

// ===================== TESTS =====================
