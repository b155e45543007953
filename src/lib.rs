//! `ames-config` library crate.
//!
//! Typed configuration registry and run-log helpers for an Ames
//! housing-price regression pipeline. The registry is built once at process
//! start and passed by reference to the pipeline stages, so that:
//!
//! - every setting is typed and validated, not a loose literal
//! - invalid rule shapes cannot be constructed in the first place
//! - a run's exact configuration can be snapshotted and reloaded

pub mod domain;
pub mod error;
pub mod impute;
pub mod io;
pub mod models;
pub mod registry;
pub mod runlog;
