//! Error types for the flow-field core.

use thiserror::Error;

/// Errors produced by grid, config and rendering operations.
#[derive(Debug, Error, PartialEq)]
pub enum FlowError {
    /// A world position mapped to a cell outside the current grid.
    ///
    /// Cell coordinates are signed because positions left of or above the
    /// origin map to negative cells.
    #[error("cell ({x}, {y}) out of bounds for grid of {columns} columns x {rows} rows")]
    OutOfBounds {
        x: i64,
        y: i64,
        columns: usize,
        rows: usize,
    },

    /// A configuration value was non-finite or outside the range that
    /// clamping can repair.
    #[error("invalid parameter '{name}': {value}")]
    InvalidParameter { name: String, value: f64 },

    /// A noise strategy name was not recognized.
    #[error("unknown noise type: {0}")]
    UnknownNoise(String),

    /// A raster target had zero or overflowing dimensions.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
