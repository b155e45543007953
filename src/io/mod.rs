//! Registry snapshot read/write.
//!
//! The snapshot is the "portable" representation of a run's configuration:
//! pretty JSON written next to the run's artifacts, reloadable later to
//! reproduce the run. The schema is the serde shape of
//! `registry::PipelineConfig`.

use std::fs::File;
use std::path::Path;

use crate::error::ConfigError;
use crate::registry::PipelineConfig;

/// Write a config snapshot as pretty JSON.
pub fn write_config_json(path: &Path, config: &PipelineConfig) -> Result<(), ConfigError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;
    Ok(())
}

/// Read a config snapshot.
///
/// The cross-field invariants are re-checked on the way in, so a hand-edited
/// snapshot with an out-of-range outlier id or a degenerate fold count is
/// rejected here rather than somewhere mid-run.
pub fn read_config_json(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let file = File::open(path)?;
    let config: PipelineConfig = serde_json::from_reader(file)?;
    config.validate()?;
    Ok(config)
}
