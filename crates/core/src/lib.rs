#![deny(unsafe_code)]
//! Core types for the flow-field particle system.
//!
//! Provides the `Grid` storage type, the periodic and gradient noise
//! generators, the `FlowGrid` angle field, the immutable `FlowConfig`, the
//! `Xorshift64` PRNG, `FlowError`, and the `Simulation` trait.

pub mod config;
pub mod error;
pub mod flow_grid;
pub mod grid;
pub mod noise;
pub mod params;
pub mod prng;
pub mod simulation;

pub use config::{FlowConfig, Toggle};
pub use error::FlowError;
pub use flow_grid::FlowGrid;
pub use grid::Grid;
pub use noise::{NoiseKind, NoiseParams};
pub use prng::Xorshift64;
pub use simulation::Simulation;
