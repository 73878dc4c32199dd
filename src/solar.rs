//! Sun Position Module
//!
//! Converts the sun's horizontal coordinates into a Cartesian light position
//! (y up). Two models are available: an ephemeris model that asks an
//! `AngleSource` for altitude/azimuth at an instant and location, and a
//! circular orbit driven only by elapsed time.
//!
//! The default angle source uses the NREL SPA (Solar Position Algorithm).

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use serde::Serialize;
use solar_positioning::{spa, time::DeltaT, types::RefractionCorrection};
use std::f64::consts::TAU;

use crate::error::{TwinError, require_positive};
use crate::geo::GeoPoint;

// ===================== CONSTANTS =====================

/// Default standoff distance of the ephemeris sun from the origin
pub const DEFAULT_SUN_DISTANCE: f64 = 300.0;

/// Default radius of the animated orbit
pub const DEFAULT_ORBIT_RADIUS: f64 = 100.0;

/// Default duration of one animated orbit, in seconds
pub const DEFAULT_ORBIT_PERIOD: f64 = 10.0;

// ===================== TYPES =====================

/// Sun direction in the observer's horizontal frame, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalAngles {
    /// Angle above the horizon (negative below it)
    pub altitude: f64,
    /// Angle around the vertical axis; zero reference set by the source
    pub azimuth: f64,
}

/// Cartesian sun position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SunPosition {
    /// Place the sun `distance` away in the direction given by `angles`.
    pub fn from_angles(angles: HorizontalAngles, distance: f64) -> Self {
        let (sin_alt, cos_alt) = angles.altitude.sin_cos();
        let (sin_az, cos_az) = angles.azimuth.sin_cos();
        Self {
            x: distance * cos_alt * sin_az,
            y: distance * sin_alt,
            z: distance * cos_alt * cos_az,
        }
    }

    /// True when the sun is below the horizon plane.
    pub fn is_below_horizon(&self) -> bool {
        self.y < 0.0
    }
}

// ===================== ANGLE SOURCES =====================

/// Source of the sun's altitude and azimuth for an instant and location.
pub trait AngleSource {
    fn angles(&self, at: DateTime<Tz>, location: GeoPoint) -> Result<HorizontalAngles, TwinError>;
}

/// SPA-backed angle source.
///
/// Azimuth is measured from north, clockwise (east = pi/2).
#[derive(Clone, Copy)]
pub struct SpaAngles {
    /// Observer altitude above mean sea level in meters
    pub elevation: f64,
    /// Atmospheric refraction correction
    pub refr: Option<RefractionCorrection>,
}

impl Default for SpaAngles {
    fn default() -> Self {
        Self { elevation: 0.0, refr: Some(RefractionCorrection::standard()) }
    }
}

impl SpaAngles {
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn without_refraction(mut self) -> Self {
        self.refr = None;
        self
    }
}

impl AngleSource for SpaAngles {
    fn angles(&self, at: DateTime<Tz>, location: GeoPoint) -> Result<HorizontalAngles, TwinError> {
        let delta_t = DeltaT::estimate_from_date(at.year(), at.month())
            .map_err(|e| TwinError::Ephemeris(e.to_string()))?;
        let pos = spa::solar_position(
            at,
            location.latitude,
            location.longitude,
            self.elevation,
            delta_t,
            self.refr,
        )
        .map_err(|e| TwinError::Ephemeris(e.to_string()))?;

        log::debug!(
            "SPA at {}: elevation {:.4}°, azimuth {:.4}°",
            at.format("%Y-%m-%d %H:%M:%S %Z"),
            pos.elevation_angle(),
            pos.azimuth()
        );

        Ok(HorizontalAngles {
            altitude: pos.elevation_angle().to_radians(),
            azimuth: pos.azimuth().to_radians(),
        })
    }
}

// ===================== SUN MODELS =====================

/// Ephemeris sun position at `distance` from the origin.
///
/// # Errors
/// `InvalidDimension` for a non-positive distance (checked before the
/// source is consulted); source failures pass through unchanged.
pub fn position<S: AngleSource>(
    source: &S,
    at: DateTime<Tz>,
    location: GeoPoint,
    distance: f64,
) -> Result<SunPosition, TwinError> {
    let distance = require_positive("sun distance", distance)?;
    let angles = source.angles(at, location)?;
    Ok(SunPosition::from_angles(angles, distance))
}

/// Time-driven circular orbit in the horizontal plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    pub radius: f64,
    /// Seconds per revolution
    pub period: f64,
}

impl Default for CircularOrbit {
    fn default() -> Self {
        Self { radius: DEFAULT_ORBIT_RADIUS, period: DEFAULT_ORBIT_PERIOD }
    }
}

impl CircularOrbit {
    pub fn new(radius: f64, period: f64) -> Self {
        Self { radius, period }
    }

    /// Position after `elapsed` seconds, starting on the +x axis.
    pub fn position(&self, elapsed: f64) -> Result<SunPosition, TwinError> {
        let radius = require_positive("orbit radius", self.radius)?;
        let period = require_positive("orbit period", self.period)?;
        if !elapsed.is_finite() {
            return Err(TwinError::InvalidDimension { what: "elapsed time", value: elapsed });
        }
        let (sin, cos) = (elapsed * TAU / period).sin_cos();
        Ok(SunPosition { x: radius * cos, y: 0.0, z: radius * sin })
    }
}

/// Inputs that drive either sun model
#[derive(Debug, Clone, Copy)]
pub struct SunClock {
    /// Instant used by the ephemeris model
    pub timestamp: DateTime<Tz>,
    /// Seconds since animation start, used by the orbit model
    pub elapsed: f64,
}

/// Interchangeable sun position strategies
#[derive(Clone, Copy)]
pub enum SunModel<S = SpaAngles> {
    Orbit(CircularOrbit),
    Ephemeris { location: GeoPoint, distance: f64, source: S },
}

impl<S: AngleSource> SunModel<S> {
    /// Ephemeris when a location is configured, otherwise the orbit.
    pub fn select(location: Option<GeoPoint>, distance: f64, orbit: CircularOrbit, source: S) -> Self {
        match location {
            Some(location) => SunModel::Ephemeris { location, distance, source },
            None => SunModel::Orbit(orbit),
        }
    }

    pub fn position(&self, clock: &SunClock) -> Result<SunPosition, TwinError> {
        match self {
            SunModel::Orbit(orbit) => orbit.position(clock.elapsed),
            SunModel::Ephemeris { location, distance, source } => {
                position(source, clock.timestamp, *location, *distance)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SunModel::Orbit(_) => "orbit",
            SunModel::Ephemeris { .. } => "ephemeris",
        }
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    /// Angle source returning fixed angles
    struct Fixed(HorizontalAngles);

    impl AngleSource for Fixed {
        fn angles(&self, _: DateTime<Tz>, _: GeoPoint) -> Result<HorizontalAngles, TwinError> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl AngleSource for Failing {
        fn angles(&self, _: DateTime<Tz>, _: GeoPoint) -> Result<HorizontalAngles, TwinError> {
            Err(TwinError::Ephemeris("no data".into()))
        }
    }

    fn noon() -> DateTime<Tz> {
        UTC.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap()
    }

    fn helsinki() -> GeoPoint {
        GeoPoint::new(60.17, 24.94).unwrap()
    }

    fn assert_close(p: SunPosition, x: f64, y: f64, z: f64) {
        assert!(
            (p.x - x).abs() < EPS && (p.y - y).abs() < EPS && (p.z - z).abs() < EPS,
            "got ({}, {}, {}), expected ({}, {}, {})",
            p.x,
            p.y,
            p.z,
            x,
            y,
            z
        );
    }

    #[test]
    fn test_horizon_north_is_plus_z() {
        let src = Fixed(HorizontalAngles { altitude: 0.0, azimuth: 0.0 });
        let p = position(&src, noon(), helsinki(), 300.0).unwrap();
        assert_close(p, 0.0, 0.0, 300.0);
    }

    #[test]
    fn test_zenith_ignores_azimuth() {
        for azimuth in [0.0, 1.0, PI, 5.5] {
            let src = Fixed(HorizontalAngles { altitude: FRAC_PI_2, azimuth });
            let p = position(&src, noon(), helsinki(), 300.0).unwrap();
            assert_close(p, 0.0, 300.0, 0.0);
        }
    }

    #[test]
    fn test_east_and_below_horizon() {
        let p = SunPosition::from_angles(HorizontalAngles { altitude: 0.0, azimuth: FRAC_PI_2 }, 10.0);
        assert_close(p, 10.0, 0.0, 0.0);

        let p = SunPosition::from_angles(HorizontalAngles { altitude: -FRAC_PI_2 / 3.0, azimuth: PI }, 2.0);
        assert!(p.is_below_horizon());
        assert!((p.y + 1.0).abs() < EPS);
        assert!((p.x.hypot(p.y).hypot(p.z) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_distance_must_be_positive() {
        let src = Fixed(HorizontalAngles { altitude: 0.3, azimuth: 0.3 });
        for d in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                position(&src, noon(), helsinki(), d),
                Err(TwinError::InvalidDimension { what: "sun distance", .. })
            ));
        }
    }

    #[test]
    fn test_source_errors_propagate() {
        let err = position(&Failing, noon(), helsinki(), 300.0).unwrap_err();
        assert!(matches!(err, TwinError::Ephemeris(msg) if msg == "no data"));
    }

    #[test]
    fn test_orbit_positions() {
        let orbit = CircularOrbit::default();
        let start = orbit.position(0.0).unwrap();
        assert_close(start, 100.0, 0.0, 0.0);

        let quarter = orbit.position(2.5).unwrap();
        assert!((quarter.x).abs() < 1e-9);
        assert!((quarter.z - 100.0).abs() < 1e-9);

        let full = orbit.position(10.0).unwrap();
        assert!((full.x - 100.0).abs() < 1e-9 && full.z.abs() < 1e-9);
        assert_eq!(full.y, 0.0);
    }

    #[test]
    fn test_orbit_rejects_bad_parameters() {
        assert!(CircularOrbit::new(0.0, 10.0).position(1.0).is_err());
        assert!(CircularOrbit::new(100.0, -1.0).position(1.0).is_err());
        assert!(CircularOrbit::default().position(f64::INFINITY).is_err());
    }

    #[test]
    fn test_model_selection_by_location() {
        let orbit = CircularOrbit::default();
        let src = Fixed(HorizontalAngles { altitude: 0.0, azimuth: 0.0 });
        let clock = SunClock { timestamp: noon(), elapsed: 0.0 };

        let model = SunModel::select(None, 300.0, orbit, Fixed(src.0));
        assert_eq!(model.name(), "orbit");
        assert_close(model.position(&clock).unwrap(), 100.0, 0.0, 0.0);

        let model = SunModel::select(Some(helsinki()), 300.0, orbit, src);
        assert_eq!(model.name(), "ephemeris");
        assert_close(model.position(&clock).unwrap(), 0.0, 0.0, 300.0);
    }

    #[test]
    fn test_spa_helsinki_solstice_noon() {
        // Solar noon in Helsinki is around 10:21 UTC; max altitude ~53.3°
        let at = UTC.with_ymd_and_hms(2025, 6, 21, 10, 21, 0).unwrap();
        let angles = SpaAngles::default().angles(at, helsinki()).unwrap();
        let alt = angles.altitude.to_degrees();
        assert!(alt > 52.5 && alt < 54.0, "altitude {}", alt);

        // Due south: -z, x near zero
        let p = position(&SpaAngles::default(), at, helsinki(), 300.0).unwrap();
        assert!(p.y > 0.0);
        assert!(p.z < 0.0);
        assert!(p.x.abs() < 10.0, "x = {}", p.x);
    }

    #[test]
    fn test_spa_helsinki_midnight_is_below_horizon() {
        let at = UTC.with_ymd_and_hms(2025, 6, 21, 22, 21, 0).unwrap();
        let p = position(&SpaAngles::default().without_refraction(), at, helsinki(), 300.0).unwrap();
        assert!(p.is_below_horizon(), "y = {}", p.y);
        // Near due north
        assert!(p.z > 0.0);
    }

    #[test]
    fn test_spa_magnitude_equals_distance() {
        let at = UTC.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).unwrap();
        let loc = GeoPoint::new(-33.87, 151.21).unwrap();
        let p = position(&SpaAngles::default(), at, loc, 250.0).unwrap();
        assert!((p.x.hypot(p.y).hypot(p.z) - 250.0).abs() < 1e-6);
    }
}
