//! Scene composition: flow-field overlays and particle trails drawn onto a
//! [`Raster`].
//!
//! [`render_frame`] honors the overlay switches carried by the system's
//! config. Layers are drawn grid, arrows, noise, trails; the noise fill
//! overwrites whatever lies beneath it.

use crate::raster::Raster;
use flowfield_core::{FlowError, FlowGrid};
use flowfield_particles::ParticleSystem;
use glam::DVec2;
use std::f64::consts::PI;

/// Arrow shaft length as a fraction of the cell edge.
pub const ARROW_LENGTH_FACTOR: f64 = 0.4;
/// Length of each arrowhead stroke, in pixels.
pub const ARROW_HEAD_LENGTH: f64 = 3.0;
/// Angle between the shaft and each arrowhead stroke.
pub const ARROW_HEAD_ANGLE: f64 = PI / 7.0;

const GRID_INTENSITY: u8 = 204;
const ARROW_INTENSITY: u8 = 255;
const TRAIL_INTENSITY: u8 = 180;

/// Draws one frame of `system` at its configured viewport size.
pub fn render_frame(system: &ParticleSystem) -> Result<Raster, FlowError> {
    let config = system.config();
    let mut raster = Raster::new(pixels_along(config.width), pixels_along(config.height))?;
    let grid = system.flow_grid();

    if config.show_grid {
        draw_grid_lines(&mut raster, grid);
    }
    if config.show_arrows {
        draw_arrows(&mut raster, grid);
    }
    if config.show_noise {
        draw_noise(&mut raster, grid);
    }
    for trail in system.trails() {
        raster.polyline(trail, TRAIL_INTENSITY);
    }
    Ok(raster)
}

/// Fills every cell with its greyscale intensity, `raw * 255` clamped to a
/// byte.
pub fn draw_noise(raster: &mut Raster, grid: &FlowGrid) {
    let cell = grid.cell_size();
    for (x, y, v) in grid.intensities().iter() {
        raster.fill_rect(x as f64 * cell, y as f64 * cell, cell, cell, to_byte(v));
    }
}

/// Outlines every cell of the grid.
pub fn draw_grid_lines(raster: &mut Raster, grid: &FlowGrid) {
    let cell = grid.cell_size();
    let right = grid.columns() as f64 * cell;
    let bottom = grid.rows() as f64 * cell;
    for c in 0..=grid.columns() {
        let x = c as f64 * cell;
        raster.line(DVec2::new(x, 0.0), DVec2::new(x, bottom), GRID_INTENSITY);
    }
    for r in 0..=grid.rows() {
        let y = r as f64 * cell;
        raster.line(DVec2::new(0.0, y), DVec2::new(right, y), GRID_INTENSITY);
    }
}

/// Draws one arrow per cell from its center along the cell's angle.
pub fn draw_arrows(raster: &mut Raster, grid: &FlowGrid) {
    let cell = grid.cell_size();
    for (x, y, angle) in grid.angles().iter() {
        let center = DVec2::new((x as f64 + 0.5) * cell, (y as f64 + 0.5) * cell);
        let [shaft, left, right] = arrow_strokes(center, angle, cell);
        for (from, to) in [shaft, left, right] {
            raster.line(from, to, ARROW_INTENSITY);
        }
    }
}

/// The shaft and two head strokes of an arrow, as `(from, to)` pairs.
pub fn arrow_strokes(center: DVec2, angle: f64, cell_size: f64) -> [(DVec2, DVec2); 3] {
    let tip = center + DVec2::from_angle(angle) * cell_size * ARROW_LENGTH_FACTOR;
    let head = |offset: f64| tip - DVec2::from_angle(angle + offset) * ARROW_HEAD_LENGTH;
    [
        (center, tip),
        (tip, head(-ARROW_HEAD_ANGLE)),
        (tip, head(ARROW_HEAD_ANGLE)),
    ]
}

/// A raster with one pixel per cell showing the noise intensity.
pub fn noise_raster(grid: &FlowGrid) -> Result<Raster, FlowError> {
    let mut raster = Raster::new(grid.columns(), grid.rows())?;
    for (x, y, v) in grid.intensities().iter() {
        raster.fill_rect(x as f64, y as f64, 1.0, 1.0, to_byte(v));
    }
    Ok(raster)
}

fn to_byte(intensity: f64) -> u8 {
    if intensity.is_nan() {
        return 0;
    }
    intensity.round().clamp(0.0, 255.0) as u8
}

fn pixels_along(extent: f64) -> usize {
    if extent.is_nan() || extent <= 0.0 {
        0
    } else {
        extent.floor() as usize
    }
}
