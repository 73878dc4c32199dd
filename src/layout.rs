//! Panel Grid Layout Module
//!
//! Places a rectangular grid of panels inside a mounting frame. Panels are
//! shrunk uniformly so that `columns` panels plus `columns - 1` gaps exactly
//! span the frame length (and likewise for depth), and the grid is centred
//! on the frame's footprint.
//!
//! Coordinates are frame-local with y up: length runs along x, depth along
//! z, height along y.

use serde::Serialize;

use crate::error::{TwinError, require_positive};
use crate::faults::FaultTable;

// ===================== CONSTANTS =====================

/// Default spacing between adjacent panels, in frame units
pub const DEFAULT_GAP: f64 = 1.0;

/// Default height of panel centres above the mounting plane
pub const DEFAULT_PANEL_LIFT: f64 = 0.5;

// ===================== INPUT TYPES =====================

/// Outer dimensions of the mounting frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSpec {
    pub length: f64,
    pub depth: f64,
    pub height: f64,
}

impl FrameSpec {
    pub fn new(length: f64, depth: f64, height: f64) -> Self {
        Self { length, depth, height }
    }

    pub fn validate(&self) -> Result<(), TwinError> {
        require_positive("frame length", self.length)?;
        require_positive("frame depth", self.depth)?;
        require_positive("frame height", self.height)?;
        Ok(())
    }
}

/// Requested dimensions of a single panel, before gap adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelSpec {
    pub length: f64,
    pub depth: f64,
    pub height: f64,
}

impl PanelSpec {
    pub fn new(length: f64, depth: f64, height: f64) -> Self {
        Self { length, depth, height }
    }

    pub fn validate(&self) -> Result<(), TwinError> {
        require_positive("panel length", self.length)?;
        require_positive("panel depth", self.depth)?;
        require_positive("panel height", self.height)?;
        Ok(())
    }
}

/// Vertical placement of panel centres, shared by every panel in a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelElevation {
    /// Constant offset above the mounting plane
    Fixed(f64),
    /// Half the panel height, so the panel rests on the mounting plane
    HalfHeight,
}

impl Default for PanelElevation {
    fn default() -> Self {
        PanelElevation::Fixed(DEFAULT_PANEL_LIFT)
    }
}

// ===================== OUTPUT TYPES =====================

/// One placed panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelPlacement {
    /// Row-major slot index, also the fault table index
    pub index: usize,
    /// Centre (x, y, z)
    pub position: [f64; 3],
    /// Extent (length, height, depth) along (x, y, z)
    pub size: [f64; 3],
    pub has_error: bool,
}

/// Grid dimensions derived from a frame and a requested panel size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
    /// Number of panels that will be placed
    pub total: usize,
    /// Gap-adjusted panel length (0 when the grid is degenerate)
    pub panel_length: f64,
    /// Gap-adjusted panel depth (0 when the grid is degenerate)
    pub panel_depth: f64,
    pub panel_height: f64,
}

impl GridShape {
    pub fn is_degenerate(&self) -> bool {
        self.total == 0
    }
}

// ===================== LAYOUT ENGINE =====================

/// Grid layout configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Spacing between adjacent panels along both axes
    pub gap: f64,
    /// Vertical offset convention
    pub elevation: PanelElevation,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { gap: DEFAULT_GAP, elevation: PanelElevation::default() }
    }
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_elevation(mut self, elevation: PanelElevation) -> Self {
        self.elevation = elevation;
        self
    }

    fn validate(&self) -> Result<(), TwinError> {
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(TwinError::InvalidDimension { what: "panel gap", value: self.gap });
        }
        if let PanelElevation::Fixed(lift) = self.elevation
            && !lift.is_finite()
        {
            return Err(TwinError::InvalidDimension { what: "panel elevation", value: lift });
        }
        Ok(())
    }

    /// Compute the grid dimensions without placing panels.
    ///
    /// Column and row counts use the requested panel size; the adjusted
    /// panel size then absorbs the gaps.
    ///
    /// # Errors
    /// `InvalidDimension` for non-positive inputs, a negative gap, or a zero
    /// panel count.
    pub fn shape(
        &self,
        frame: &FrameSpec,
        panel: &PanelSpec,
        max_count: usize,
    ) -> Result<GridShape, TwinError> {
        frame.validate()?;
        panel.validate()?;
        self.validate()?;
        if max_count == 0 {
            return Err(TwinError::InvalidDimension { what: "panel count", value: 0.0 });
        }

        let columns = (frame.length / panel.length).floor() as usize;
        let rows = (frame.depth / panel.depth).floor() as usize;

        if columns == 0 || rows == 0 {
            log::debug!("grid is degenerate: {} columns x {} rows", columns, rows);
            return Ok(GridShape {
                columns,
                rows,
                total: 0,
                panel_length: 0.0,
                panel_depth: 0.0,
                panel_height: panel.height,
            });
        }

        let panel_length = (frame.length - (columns - 1) as f64 * self.gap) / columns as f64;
        let panel_depth = (frame.depth - (rows - 1) as f64 * self.gap) / rows as f64;

        let total = columns.saturating_mul(rows).min(max_count);
        log::debug!(
            "grid {}x{} (placing {}), adjusted panel {:.4} x {:.4}",
            columns,
            rows,
            total,
            panel_length,
            panel_depth
        );

        Ok(GridShape { columns, rows, total, panel_length, panel_depth, panel_height: panel.height })
    }

    /// Place panels in row-major order.
    ///
    /// Enumeration visits row 0 from the first column to the last, then
    /// row 1, and stops as soon as `min(columns * rows, max_count)` panels
    /// are placed. Placement `i` takes its fault flag from `faults[i]`.
    ///
    /// # Errors
    /// Everything `shape` reports, plus `OutOfRangeFault` if the fault table
    /// is shorter than the number of placements.
    pub fn place(
        &self,
        frame: &FrameSpec,
        panel: &PanelSpec,
        max_count: usize,
        faults: &FaultTable,
    ) -> Result<Vec<PanelPlacement>, TwinError> {
        self.place_with_shape(frame, panel, max_count, faults).map(|(_, placements)| placements)
    }

    /// Like `place`, also returning the grid shape the placements were built from.
    pub fn place_with_shape(
        &self,
        frame: &FrameSpec,
        panel: &PanelSpec,
        max_count: usize,
        faults: &FaultTable,
    ) -> Result<(GridShape, Vec<PanelPlacement>), TwinError> {
        let shape = self.shape(frame, panel, max_count)?;
        if shape.is_degenerate() {
            return Ok((shape, Vec::new()));
        }
        if faults.len() < shape.total {
            return Err(TwinError::OutOfRangeFault {
                required: shape.total,
                available: faults.len(),
            });
        }

        let y = match self.elevation {
            PanelElevation::Fixed(lift) => lift,
            PanelElevation::HalfHeight => panel.height / 2.0,
        };
        let size = [shape.panel_length, shape.panel_height, shape.panel_depth];

        let mut placements = Vec::with_capacity(shape.total);
        'rows: for row in 0..shape.rows {
            for col in 0..shape.columns {
                if placements.len() == shape.total {
                    break 'rows;
                }
                let index = placements.len();
                let x = col as f64 * (shape.panel_length + self.gap) - frame.length / 2.0
                    + shape.panel_length / 2.0;
                let z = row as f64 * (shape.panel_depth + self.gap) - frame.depth / 2.0
                    + shape.panel_depth / 2.0;
                placements.push(PanelPlacement {
                    index,
                    position: [x, y, z],
                    size,
                    has_error: faults.get(index).unwrap_or(false),
                });
            }
        }

        Ok((shape, placements))
    }
}

/// Lay out panels with the default gap and elevation.
pub fn layout(
    frame: &FrameSpec,
    panel: &PanelSpec,
    max_count: usize,
    faults: &FaultTable,
) -> Result<Vec<PanelPlacement>, TwinError> {
    GridLayout::default().place(frame, panel, max_count, faults)
}

// ===================== TESTS =====================
