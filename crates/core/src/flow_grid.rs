//! The flow field: a noise grid converted to per-cell direction angles.
//!
//! A [`FlowGrid`] is built wholesale from viewport geometry and a
//! [`NoiseParams`] and is never modified afterwards. Owners replace the whole
//! grid on any parameter change, so readers always see a consistent snapshot.

use crate::error::FlowError;
use crate::grid::Grid;
use crate::noise::{self, NoiseParams};
use std::f64::consts::TAU;

/// Scale from raw noise value to a greyscale intensity.
pub const INTENSITY_SCALE: f64 = 255.0;

/// Direction angles laid over the viewport, one per square cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGrid {
    cell_size: f64,
    raw_values: Grid,
    angles: Grid,
}

impl FlowGrid {
    /// Builds a flow grid covering a `width x height` viewport.
    ///
    /// `rows = floor(height / cell_size)`, `columns = floor(width / cell_size)`.
    /// Each angle is the raw noise value times 2π; no renormalization is
    /// applied, so periodic noise may wind several turns.
    ///
    /// `cell_size` must be positive; callers validate it through
    /// [`FlowConfig`](crate::config::FlowConfig).
    pub fn build(width: f64, height: f64, cell_size: f64, params: &NoiseParams) -> Self {
        let rows = cells_along(height, cell_size);
        let columns = cells_along(width, cell_size);
        let raw_values = noise::generate(rows, columns, params);
        let angles = raw_values.map(|v| v * TAU);
        log::debug!(
            "built {} flow grid: {rows} rows x {columns} columns, cell size {cell_size}",
            params.kind()
        );
        Self {
            cell_size,
            raw_values,
            angles,
        }
    }

    pub fn rows(&self) -> usize {
        self.angles.rows()
    }

    pub fn columns(&self) -> usize {
        self.angles.columns()
    }

    /// World units per cell edge.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Per-cell angles in radians.
    pub fn angles(&self) -> &Grid {
        &self.angles
    }

    /// Per-cell noise values before the 2π scaling.
    pub fn raw_values(&self) -> &Grid {
        &self.raw_values
    }

    /// Raw values scaled to greyscale intensity (`raw * 255`), unclamped.
    pub fn intensities(&self) -> Grid {
        self.raw_values.map(|v| v * INTENSITY_SCALE)
    }

    /// Maps a world position to its `(column, row)` cell.
    ///
    /// The result may lie outside the grid. NaN coordinates map to `i64::MIN`
    /// so they are always out of bounds.
    pub fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        let cx = (x / self.cell_size).floor();
        let cy = (y / self.cell_size).floor();
        (to_cell(cx), to_cell(cy))
    }

    /// Angle of the cell containing world position `(x, y)`.
    ///
    /// Returns `FlowError::OutOfBounds` when the cell lies outside the grid.
    /// Particles treat that as "no direction this tick".
    pub fn lookup(&self, x: f64, y: f64) -> Result<f64, FlowError> {
        let (cx, cy) = self.cell_of(x, y);
        self.angles.get(cx, cy)
    }
}

fn cells_along(extent: f64, cell_size: f64) -> usize {
    if extent.is_nan() || cell_size.is_nan() || extent <= 0.0 || cell_size <= 0.0 {
        return 0;
    }
    (extent / cell_size).floor() as usize
}

fn to_cell(v: f64) -> i64 {
    if v.is_nan() {
        i64::MIN
    } else {
        v as i64
    }
}
