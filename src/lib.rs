//! Geometry engine for a solar installation digital twin.
//!
//! Two independent computations feed an external renderer:
//! - [`layout`] places a gap-separated grid of panels inside a mounting frame
//!   and tags each with its fault status;
//! - [`solar`] turns the sun's altitude/azimuth (from the NREL SPA ephemeris
//!   or an animated orbit) into a Cartesian light position.
//!
//! [`scene`] composes both into the description a renderer draws.

pub mod error;
pub mod faults;
pub mod geo;
pub mod layout;
pub mod output;
pub mod scene;
pub mod solar;
pub mod time;

pub use error::TwinError;
