//! Command-Line Interface Module
//!
//! Handles argument parsing and validation for the solar-twin application.

use clap::Parser;
use std::path::PathBuf;

use solar_twin::error::TwinError;
use solar_twin::faults::FaultTable;
use solar_twin::geo::GeoPoint;
use solar_twin::layout::{FrameSpec, GridLayout, PanelElevation, PanelSpec};
use solar_twin::scene::{DEFAULT_COVER_OFFSET, DEFAULT_COVER_THICKNESS, SceneRequest};
use solar_twin::solar::{CircularOrbit, SpaAngles, SunModel};

/// Panel count used when neither a count nor a fault file is given
const DEFAULT_PANEL_COUNT: usize = 25;

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    // ===================== FRAME AND PANELS =====================
    /// Frame length (x axis)
    #[arg(long, default_value_t = 50.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_FRAME_LENGTH")]
    pub frame_length: f64,
    /// Frame depth (z axis)
    #[arg(long, default_value_t = 50.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_FRAME_DEPTH")]
    pub frame_depth: f64,
    /// Frame height (y axis)
    #[arg(long, default_value_t = 5.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_FRAME_HEIGHT")]
    pub frame_height: f64,

    /// Requested panel length, before gap adjustment
    #[arg(long, default_value_t = 10.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_PANEL_LENGTH")]
    pub panel_length: f64,
    /// Requested panel depth, before gap adjustment
    #[arg(long, default_value_t = 10.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_PANEL_DEPTH")]
    pub panel_depth: f64,
    /// Panel height (never adjusted)
    #[arg(long, default_value_t = 3.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_PANEL_HEIGHT")]
    pub panel_height: f64,

    /// Spacing between adjacent panels
    #[arg(long, default_value_t = 1.0, value_parser = parse_non_negative_f64, env = "SOLAR_TWIN_GAP")]
    pub gap: f64,

    /// Rest panels on the mounting plane (centre at half the panel height)
    /// instead of the fixed 0.5 lift
    #[arg(long)]
    pub half_height_elevation: bool,

    /// Maximum number of panels to place
    /// Defaults to the fault file's length, or 25 without one
    #[arg(long, value_parser = parse_panel_count, env = "SOLAR_TWIN_PANEL_COUNT")]
    pub panel_count: Option<usize>,

    /// Comma-separated row-major indices of faulty panels (e.g. "16" or "3,7")
    #[arg(long, value_delimiter = ',', conflicts_with = "fault_file")]
    pub faulty_panels: Vec<usize>,

    /// JSON fault file: {"panels": [{"hasError": false}, ...]}
    #[arg(long, env = "SOLAR_TWIN_FAULT_FILE")]
    pub fault_file: Option<PathBuf>,

    /// Height of the frame centre above the ground
    #[arg(long, default_value_t = 3.0, allow_hyphen_values = true, value_parser = parse_finite_f64, env = "SOLAR_TWIN_MOUNT_HEIGHT")]
    pub mount_height: f64,

    // ===================== SUN =====================
    /// Sun light intensity
    #[arg(long, default_value_t = 25.0, value_parser = parse_non_negative_f64, env = "SOLAR_TWIN_SUN_INTENSITY")]
    pub sun_intensity: f64,

    /// Observer latitude in decimal degrees (-90 to 90); enables the ephemeris sun
    #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude, requires = "longitude", env = "SOLAR_TWIN_LATITUDE")]
    pub latitude: Option<f64>,
    /// Observer longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude, requires = "latitude", env = "SOLAR_TWIN_LONGITUDE")]
    pub longitude: Option<f64>,

    /// Distance of the ephemeris sun from the origin
    #[arg(long, default_value_t = 300.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_SUN_DISTANCE")]
    pub distance: f64,

    /// Observer altitude above mean sea level (meters, may be negative)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true, value_parser = parse_altitude, env = "SOLAR_TWIN_ELEVATION")]
    pub elevation: f64,

    /// Disable atmospheric refraction correction
    #[arg(long)]
    pub no_refraction: bool,

    /// Radius of the animated sun orbit (used without a location)
    #[arg(long, default_value_t = 100.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_ORBIT_RADIUS")]
    pub orbit_radius: f64,
    /// Seconds per animated orbit
    #[arg(long, default_value_t = 10.0, value_parser = parse_positive_f64, env = "SOLAR_TWIN_ORBIT_PERIOD")]
    pub orbit_period: f64,
    /// Seconds elapsed since the animation started
    #[arg(long, default_value_t = 0.0, value_parser = parse_non_negative_f64)]
    pub elapsed: f64,

    // ===================== TIME =====================
    /// Date for the ephemeris sun (e.g., "2024-12-25" or "today"); defaults to now
    #[arg(long)]
    pub date: Option<String>,
    /// Time of day (HH:MM[:SS[.fffffffff]] or "now")
    #[arg(long)]
    pub at: Option<String>,
    /// Time zone to use ("system", "location", or IANA time zone name)
    #[arg(long, default_value = "system", env = "SOLAR_TWIN_TIMEZONE")]
    pub timezone: String,
    /// Use UTC time zone
    #[arg(long)]
    pub utc: bool,

    // ===================== OUTPUT =====================
    /// Print the scene as JSON for a renderer
    #[arg(long, env = "SOLAR_TWIN_JSON")]
    pub json: bool,
    /// List every placed panel
    #[arg(long)]
    pub panels: bool,
}

impl Args {
    pub fn location(&self) -> Result<Option<GeoPoint>, TwinError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    /// Fault table from the fault file or the faulty panel list.
    pub fn fault_table(&self) -> Result<FaultTable, TwinError> {
        match &self.fault_file {
            Some(path) => FaultTable::load(path),
            None => FaultTable::with_faulty(
                self.panel_count.unwrap_or(DEFAULT_PANEL_COUNT),
                &self.faulty_panels,
            ),
        }
    }

    pub fn scene_request(&self, faults: &FaultTable) -> SceneRequest {
        let elevation = if self.half_height_elevation {
            PanelElevation::HalfHeight
        } else {
            PanelElevation::default()
        };
        SceneRequest {
            frame: FrameSpec::new(self.frame_length, self.frame_depth, self.frame_height),
            panel: PanelSpec::new(self.panel_length, self.panel_depth, self.panel_height),
            max_panels: self.panel_count.unwrap_or(faults.len()),
            grid: GridLayout::new().with_gap(self.gap).with_elevation(elevation),
            mount_height: self.mount_height,
            sun_intensity: self.sun_intensity,
            cover_thickness: DEFAULT_COVER_THICKNESS,
            cover_offset: DEFAULT_COVER_OFFSET,
        }
    }

    pub fn sun_model(&self) -> Result<SunModel, TwinError> {
        let mut source = SpaAngles::default().with_elevation(self.elevation);
        if self.no_refraction {
            source = source.without_refraction();
        }
        Ok(SunModel::select(
            self.location()?,
            self.distance,
            CircularOrbit::new(self.orbit_radius, self.orbit_period),
            source,
        ))
    }
}

// ===================== CLI VALUE PARSERS =====================

fn parse_latitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-90.0..=90.0).contains(&v) {
        return Err(format!("Latitude must be between -90 and 90, got {}", v));
    }
    Ok(v)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-180.0..=180.0).contains(&v) {
        return Err(format!("Longitude must be between -180 and 180, got {}", v));
    }
    Ok(v)
}

fn parse_altitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-500.0..=11000.0).contains(&v) {
        return Err(format!("Altitude must be between -500 and 11000 meters, got {}", v));
    }
    Ok(v)
}

fn parse_finite_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !v.is_finite() {
        return Err(format!("Value must be finite, got {}", v));
    }
    Ok(v)
}

fn parse_positive_f64(s: &str) -> Result<f64, String> {
    let v = parse_finite_f64(s)?;
    if v <= 0.0 {
        return Err(format!("Value must be positive, got {}", v));
    }
    Ok(v)
}

fn parse_non_negative_f64(s: &str) -> Result<f64, String> {
    let v = parse_finite_f64(s)?;
    if v < 0.0 {
        return Err(format!("Value must not be negative, got {}", v));
    }
    Ok(v)
}

fn parse_panel_count(s: &str) -> Result<usize, String> {
    let v: usize = s.parse().map_err(|_| format!("Invalid integer: {}", s))?;
    if v == 0 {
        return Err("Panel count must be at least 1".to_string());
    }
    Ok(v)
}

// ===================== TESTS =====================
