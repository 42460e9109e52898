#![deny(unsafe_code)]
//! Headless rendering for the flow-field particle system.
//!
//! [`raster`] is a small greyscale buffer with line primitives, [`draw`]
//! composes the field overlays and particle trails onto it, and
//! [`snapshot`] (behind the `png` feature) writes the result to disk.

pub mod draw;
pub mod raster;
#[cfg(feature = "png")]
pub mod snapshot;

pub use draw::{noise_raster, render_frame};
pub use raster::Raster;
