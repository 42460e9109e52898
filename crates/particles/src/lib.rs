#![deny(unsafe_code)]
//! Trailing particles advected through a flow field.
//!
//! A [`ParticleSystem`] owns a fixed pool of [`Particle`]s and the shared
//! [`FlowGrid`](flowfield_core::FlowGrid). Each tick every particle reads
//! the angle of its cell, moves, extends its trail, and is recycled when it
//! leaves the active [`Region`] or runs out of lifetime.

pub mod particle;
pub mod region;
pub mod system;

pub use particle::{Outcome, Particle};
pub use region::Region;
pub use system::{ParticleSystem, StepStats};
