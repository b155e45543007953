//! Configuration schema types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the per-column imputation rules and the plan that orders them
//! - the curated outlier row-id lists
//! - diagnostics, screening, and stage toggles

pub mod types;

pub use types::*;
