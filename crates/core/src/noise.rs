//! Noise field generators: the scalar grids a [`FlowGrid`](crate::flow_grid::FlowGrid)
//! turns into angles.
//!
//! Two interchangeable strategies share one entry point, [`generate`]:
//!
//! - **Periodic**: `(cos(x * zoom) + sin(y * zoom)) * curve`. The range is
//!   ±2·curve and is deliberately left un-normalized, so downstream scaling
//!   treats it as a fractional turn exactly like the gradient output.
//! - **Gradient**: layered 3D Perlin noise sampled on a 2D slice at depth
//!   `z_offset`, normalized to [0, 1]. Sliding `z_offset` animates the field
//!   without discontinuities.
//!
//! Both are pure functions of their inputs.

use crate::error::FlowError;
use crate::grid::Grid;
use ::noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// World-to-noise scale applied to cell coordinates in gradient mode.
pub const GRADIENT_SCALE: f64 = 0.1;
/// Number of Perlin octaves summed per gradient sample.
const OCTAVES: u32 = 4;
/// Amplitude falloff between octaves.
const PERSISTENCE: f64 = 0.5;
/// Frequency growth between octaves.
const LACUNARITY: f64 = 2.0;

/// Which noise strategy drives the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    /// Deterministic trigonometric pattern.
    Periodic,
    /// Seeded, layered Perlin noise.
    #[default]
    #[serde(alias = "perlin")]
    Gradient,
}

impl NoiseKind {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            NoiseKind::Periodic => "periodic",
            NoiseKind::Gradient => "gradient",
        }
    }

    /// Names accepted by [`NoiseKind::from_str`].
    pub fn list_names() -> &'static [&'static str] {
        &["gradient", "perlin", "periodic"]
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "periodic" => Ok(NoiseKind::Periodic),
            "gradient" | "perlin" => Ok(NoiseKind::Gradient),
            _ => Err(FlowError::UnknownNoise(s.to_string())),
        }
    }
}

/// Parameters for one noise generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseParams {
    Periodic {
        zoom: f64,
        curve: f64,
    },
    Gradient {
        /// Depth of the sampled slice.
        z_offset: f64,
        /// Amount [`NoiseParams::advance`] adds to `z_offset`.
        increment: f64,
        seed: u32,
    },
}

impl NoiseParams {
    pub fn kind(&self) -> NoiseKind {
        match self {
            NoiseParams::Periodic { .. } => NoiseKind::Periodic,
            NoiseParams::Gradient { .. } => NoiseKind::Gradient,
        }
    }

    /// Moves a gradient slice forward by its increment.
    ///
    /// Periodic parameters have no time axis and are returned unchanged.
    pub fn advance(self) -> Self {
        match self {
            NoiseParams::Gradient {
                z_offset,
                increment,
                seed,
            } => NoiseParams::Gradient {
                z_offset: z_offset + increment,
                increment,
                seed,
            },
            periodic => periodic,
        }
    }
}

/// Generates a `rows x columns` grid of noise values.
///
/// Row index is `y`, column index is `x`. Never fails; degenerate shapes
/// produce an empty grid.
pub fn generate(rows: usize, columns: usize, params: &NoiseParams) -> Grid {
    match *params {
        NoiseParams::Periodic { zoom, curve } => {
            Grid::from_fn(rows, columns, |y, x| periodic_value(x, y, zoom, curve))
        }
        NoiseParams::Gradient { z_offset, seed, .. } => {
            let perlin = Perlin::new(seed);
            Grid::from_fn(rows, columns, |y, x| {
                layered_perlin(
                    &perlin,
                    x as f64 * GRADIENT_SCALE,
                    y as f64 * GRADIENT_SCALE,
                    z_offset,
                )
            })
        }
    }
}

fn periodic_value(x: usize, y: usize, zoom: f64, curve: f64) -> f64 {
    ((x as f64 * zoom).cos() + (y as f64 * zoom).sin()) * curve
}

/// Sums [`OCTAVES`] Perlin samples and maps the result from [-1, 1] to [0, 1].
fn layered_perlin(perlin: &Perlin, x: f64, y: f64, z: f64) -> f64 {
    let (sum, total, _, _) =
        (0..OCTAVES).fold((0.0, 0.0, 1.0, 1.0), |(sum, total, amp, freq), _| {
            (
                sum + perlin.get([x * freq, y * freq, z * freq]) * amp,
                total + amp,
                amp * PERSISTENCE,
                freq * LACUNARITY,
            )
        });
    ((sum / total + 1.0) * 0.5).clamp(0.0, 1.0)
}
