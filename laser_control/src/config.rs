//! TOML configuration loader with validation.
//!
//! Loads `LaserControlConfig` and the `Job` to run, and validates both before
//! anything touches the ring or the outputs.

use std::path::Path;

use laser_common::config::{ConfigError, ConfigLoader};
use laser_common::laser::config::LaserControlConfig;
use laser_common::laser::job::Job;

/// Complete validated configuration bundle, ready for runtime use.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: LaserControlConfig,
    pub job: Job,
}

/// Load and validate the controller configuration and the job file.
pub fn load_config(config_path: &Path, job_path: &Path) -> Result<LoadedConfig, ConfigError> {
    let config = LaserControlConfig::load(config_path)?;
    config.validate()?;

    let job = Job::load(job_path)?;
    job.validate()?;

    Ok(LoadedConfig { config, job })
}

/// Load config from TOML strings (for testing).
pub fn load_config_from_strings(
    config_toml: &str,
    job_toml: &str,
) -> Result<LoadedConfig, ConfigError> {
    let config = LaserControlConfig::from_toml(config_toml)?;
    config.validate()?;

    let job = Job::from_toml(job_toml)?;
    job.validate()?;

    Ok(LoadedConfig { config, job })
}
