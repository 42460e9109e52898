//! PNG output for rendered frames and raw noise grids.
//!
//! Feature-gated behind `png` (default on) so consumers that only need the
//! in-memory [`Raster`] avoid the `image` dependency.

use crate::draw::noise_raster;
use crate::raster::Raster;
use flowfield_core::{FlowError, FlowGrid};
use std::path::Path;

/// Writes a raster as an RGBA PNG.
///
/// Returns `FlowError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `FlowError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), FlowError> {
    let w = u32::try_from(raster.width()).map_err(|_| FlowError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| FlowError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.to_rgba())
        .ok_or_else(|| FlowError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FlowError::Io(e.to_string()))?;
    log::debug!("wrote {w}x{h} snapshot to {}", path.display());
    Ok(())
}

/// Writes a flow grid's noise intensities, one pixel per cell.
pub fn write_noise_png(grid: &FlowGrid, path: &Path) -> Result<(), FlowError> {
    write_png(&noise_raster(grid)?, path)
}
