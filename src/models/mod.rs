//! Base-model parameter sets and the prediction blend.
//!
//! Kept small and pure so the training pipeline can consume parameter sets
//! and derived grids without pulling in any execution machinery.

pub mod params;

pub use params::*;
