//! Prelude module for common re-exports.
//!
//! ```rust
//! use laser_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::laser::config::{LaserConfig, LaserControlConfig, RunnerConfig};
pub use crate::laser::job::{Job, JobLine};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DEFAULT_FAN_ON_DUTY, MAX_MOVE_QUEUE, POWER_BUFFER_LEN};

// ─── Power ──────────────────────────────────────────────────────────
pub use crate::power::{Power, pct_to_power};
