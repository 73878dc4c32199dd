//! Scene Composition Module
//!
//! Combines a panel layout and a sun position into the renderer-facing
//! description of the installation: the frame's wireframe box raised to its
//! mounting height, the glass cover above it, the placed panels and the sun
//! light. Nothing here is cached; callers rebuild the scene whenever any
//! input changes.

use serde::Serialize;

use crate::error::{TwinError, require_positive};
use crate::faults::FaultTable;
use crate::layout::{FrameSpec, GridLayout, GridShape, PanelPlacement, PanelSpec};
use crate::solar::{AngleSource, SunClock, SunModel, SunPosition};

// ===================== CONSTANTS =====================

/// Default height of the frame centre above the ground
pub const DEFAULT_MOUNT_HEIGHT: f64 = 3.0;

/// Default directional light intensity
pub const DEFAULT_SUN_INTENSITY: f64 = 25.0;

/// Default thickness of the glass cover
pub const DEFAULT_COVER_THICKNESS: f64 = 1.0;

/// Default distance from the frame centre to the glass cover centre
pub const DEFAULT_COVER_OFFSET: f64 = 5.0;

// ===================== TYPES =====================

/// Axis-aligned box given by centre and extent (x, y, z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxGeometry {
    pub center: [f64; 3],
    pub size: [f64; 3],
}

/// Directional light standing in for the sun
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunLight {
    pub model: &'static str,
    pub position: SunPosition,
    pub intensity: f64,
    pub below_horizon: bool,
}

/// Everything a renderer needs to draw the installation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Frame wireframe in world coordinates
    pub frame: BoxGeometry,
    /// Glass cover in world coordinates
    pub cover: BoxGeometry,
    /// Height of the frame centre; panel positions are relative to it
    pub mount_height: f64,
    pub shape: GridShape,
    pub panels: Vec<PanelPlacement>,
    pub sun: SunLight,
}

impl Scene {
    pub fn faulty_panels(&self) -> impl Iterator<Item = &PanelPlacement> {
        self.panels.iter().filter(|p| p.has_error)
    }
}

/// Scalar inputs of one scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRequest {
    pub frame: FrameSpec,
    pub panel: PanelSpec,
    pub max_panels: usize,
    pub grid: GridLayout,
    pub mount_height: f64,
    pub sun_intensity: f64,
    pub cover_thickness: f64,
    pub cover_offset: f64,
}

impl Default for SceneRequest {
    fn default() -> Self {
        Self {
            frame: FrameSpec::new(50.0, 50.0, 5.0),
            panel: PanelSpec::new(10.0, 10.0, 3.0),
            max_panels: 25,
            grid: GridLayout::default(),
            mount_height: DEFAULT_MOUNT_HEIGHT,
            sun_intensity: DEFAULT_SUN_INTENSITY,
            cover_thickness: DEFAULT_COVER_THICKNESS,
            cover_offset: DEFAULT_COVER_OFFSET,
        }
    }
}

// ===================== COMPOSITION =====================

/// Lay out the panels, position the sun and assemble the scene.
///
/// # Errors
/// Any layout or sun position error; nothing partial is returned.
pub fn build_scene<S: AngleSource>(
    request: &SceneRequest,
    faults: &FaultTable,
    sun: &SunModel<S>,
    clock: &SunClock,
) -> Result<Scene, TwinError> {
    for (what, value) in
        [("mount height", request.mount_height), ("cover offset", request.cover_offset)]
    {
        if !value.is_finite() {
            return Err(TwinError::InvalidDimension { what, value });
        }
    }
    if !request.sun_intensity.is_finite() || request.sun_intensity < 0.0 {
        return Err(TwinError::InvalidDimension {
            what: "sun intensity",
            value: request.sun_intensity,
        });
    }
    require_positive("cover thickness", request.cover_thickness)?;

    let (shape, panels) =
        request.grid.place_with_shape(&request.frame, &request.panel, request.max_panels, faults)?;
    let position = sun.position(clock)?;
    if position.is_below_horizon() {
        log::warn!("sun is below the horizon (y = {:.2})", position.y);
    }

    let FrameSpec { length, depth, height } = request.frame;
    let frame = BoxGeometry { center: [0.0, request.mount_height, 0.0], size: [length, height, depth] };
    let cover = BoxGeometry {
        center: [0.0, request.mount_height + request.cover_offset, 0.0],
        size: [length, request.cover_thickness, depth],
    };

    log::info!(
        "scene: {} of {} slots filled, {} faulty, sun ({}) at ({:.1}, {:.1}, {:.1})",
        panels.len(),
        shape.columns.saturating_mul(shape.rows),
        panels.iter().filter(|p| p.has_error).count(),
        sun.name(),
        position.x,
        position.y,
        position.z
    );

    Ok(Scene {
        frame,
        cover,
        mount_height: request.mount_height,
        shape,
        panels,
        sun: SunLight {
            model: sun.name(),
            position,
            intensity: request.sun_intensity,
            below_horizon: position.is_below_horizon(),
        },
    })
}

// ===================== TESTS =====================
