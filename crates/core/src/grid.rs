//! Row-major 2D grid of scalar values with bounds-checked lookup.
//!
//! Unlike a toroidal field, a `Grid` never wraps: any cell outside
//! `[0, columns) x [0, rows)` is reported as [`FlowError::OutOfBounds`].
//! Values are stored as-is with no clamping, since periodic noise produces
//! values outside [0, 1].

use crate::error::FlowError;

/// A `rows x columns` grid of `f64` values in row-major order.
///
/// Zero rows or zero columns is a valid, empty grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Builds a grid by evaluating `f(row, column)` for every cell in
    /// row-major order.
    ///
    /// Callers bound the shape; an overflowing cell count only skips the
    /// up-front allocation.
    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows.checked_mul(columns).unwrap_or(0));
        for y in 0..rows {
            for x in 0..columns {
                data.push(f(y, x));
            }
        }
        Self {
            rows,
            columns,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// True when the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read-only access to the row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at column `x`, row `y`.
    ///
    /// Returns `FlowError::OutOfBounds` for any negative or overflowing index.
    pub fn get(&self, x: i64, y: i64) -> Result<f64, FlowError> {
        if x < 0 || y < 0 || x as u64 >= self.columns as u64 || y as u64 >= self.rows as u64 {
            return Err(FlowError::OutOfBounds {
                x,
                y,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(self.data[y as usize * self.columns + x as usize])
    }

    /// Applies `f` to every value, producing a grid of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Grid {
        Grid {
            rows: self.rows,
            columns: self.columns,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let columns = self.columns;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % columns, i / columns, v))
    }
}
