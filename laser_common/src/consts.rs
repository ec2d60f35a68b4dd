//! System-wide constants for the laser power workspace.
//!
//! Single source of truth for buffer sizing and actuator defaults.

use static_assertions::const_assert;

/// Number of slots in the laser power ring.
///
/// 1650 pixels across a 165 mm X travel, plus a few. One slot is always kept
/// free, so the ring holds at most `POWER_BUFFER_LEN - 1` samples.
pub const POWER_BUFFER_LEN: usize = 1700;

/// Full-scale laser power (PWM counts).
pub const MAX_POWER: u8 = 255;

/// Fan PWM duty driven while the laser needs cooling (~50 %).
pub const DEFAULT_FAN_ON_DUTY: u8 = 128;

/// Planner slots available to the job runner.
pub const MAX_MOVE_QUEUE: usize = 16;

/// Default number of step interrupts simulated per foreground tick.
pub const DEFAULT_STEPS_PER_TICK: u32 = 4;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/laser.toml";

// Ring cursors are stored as `u16`.
const_assert!(POWER_BUFFER_LEN >= 2);
const_assert!(POWER_BUFFER_LEN <= u16::MAX as usize);
const_assert!(DEFAULT_FAN_ON_DUTY > 0);
const_assert!(MAX_MOVE_QUEUE > 0);
