//! Configuration structures for the laser controller.
//!
//! All config types use `serde::Deserialize` for TOML loading. Optional fields
//! use `#[serde(default)]` so a minimal file only needs `[shared]`.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{DEFAULT_FAN_ON_DUTY, DEFAULT_STEPS_PER_TICK, MAX_MOVE_QUEUE};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level laser controller configuration.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "laser-control"
///
/// [laser]
/// fan_on_duty = 128
///
/// [runner]
/// steps_per_tick = 4
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserControlConfig {
    /// Common service fields.
    pub shared: SharedConfig,

    /// Actuator settings.
    #[serde(default)]
    pub laser: LaserConfig,

    /// Job runner settings.
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl LaserControlConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.laser.validate().map_err(ConfigError::ValidationError)?;
        self.runner.validate().map_err(ConfigError::ValidationError)?;
        Ok(())
    }
}

// ─── Actuator ───────────────────────────────────────────────────────

/// Laser / cooling fan output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaserConfig {
    /// Fan PWM duty while cooling (1..=255, default: 128).
    #[serde(default = "default_fan_on_duty")]
    pub fan_on_duty: u8,

    /// Fan output stage is active-low; the idle level is driven high on shutdown.
    #[serde(default)]
    pub fan_output_inverted: bool,
}

fn default_fan_on_duty() -> u8 {
    DEFAULT_FAN_ON_DUTY
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            fan_on_duty: DEFAULT_FAN_ON_DUTY,
            fan_output_inverted: false,
        }
    }
}

impl LaserConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.fan_on_duty == 0 {
            return Err("laser.fan_on_duty must be > 0".to_string());
        }
        Ok(())
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

/// Deterministic job runner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Step interrupts executed per foreground tick (default: 4).
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: u32,

    /// Planner slots in use (1..=MAX_MOVE_QUEUE, default: MAX_MOVE_QUEUE).
    #[serde(default = "default_move_queue_depth")]
    pub move_queue_depth: usize,
}

fn default_steps_per_tick() -> u32 {
    DEFAULT_STEPS_PER_TICK
}
fn default_move_queue_depth() -> usize {
    MAX_MOVE_QUEUE
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            steps_per_tick: DEFAULT_STEPS_PER_TICK,
            move_queue_depth: MAX_MOVE_QUEUE,
        }
    }
}

impl RunnerConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.steps_per_tick == 0 {
            return Err("runner.steps_per_tick must be > 0".to_string());
        }
        if self.move_queue_depth == 0 || self.move_queue_depth > MAX_MOVE_QUEUE {
            return Err(format!(
                "runner.move_queue_depth {} out of range [1, {}]",
                self.move_queue_depth, MAX_MOVE_QUEUE
            ));
        }
        Ok(())
    }
}
