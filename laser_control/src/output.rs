//! Laser and fan output seam.
//!
//! [`LaserOutputs`] is the only path to the laser PWM and fan PWM channels;
//! the actuator owns its implementation exclusively. [`SimulatedOutputs`]
//! records every write for the job runner and tests.

use laser_common::power::Power;

/// Hardware outputs driven by the laser actuator.
pub trait LaserOutputs {
    /// Drive the laser PWM channel (0 = off).
    fn write_laser(&mut self, power: Power);

    /// Drive the cooling fan PWM channel (0 = off).
    fn write_fan(&mut self, duty: u8);

    /// Park the fan pin at its idle level after PWM has been stopped.
    ///
    /// `idle_high` is set for an active-low output stage.
    fn release_fan(&mut self, _idle_high: bool) {}
}

/// In-memory outputs with write counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedOutputs {
    laser: Power,
    fan: u8,
    fan_idle_high: bool,
    laser_writes: u64,
    fan_writes: u64,
}

impl SimulatedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last laser PWM value written.
    pub fn laser(&self) -> Power {
        self.laser
    }

    /// Last fan PWM value written.
    pub fn fan(&self) -> u8 {
        self.fan
    }

    /// Idle level of the fan pin after the last release.
    pub fn fan_idle_high(&self) -> bool {
        self.fan_idle_high
    }

    pub fn laser_writes(&self) -> u64 {
        self.laser_writes
    }

    pub fn fan_writes(&self) -> u64 {
        self.fan_writes
    }
}

impl LaserOutputs for SimulatedOutputs {
    fn write_laser(&mut self, power: Power) {
        self.laser = power;
        self.laser_writes += 1;
    }

    fn write_fan(&mut self, duty: u8) {
        self.fan = duty;
        self.fan_writes += 1;
    }

    fn release_fan(&mut self, idle_high: bool) {
        self.fan_idle_high = idle_high;
    }
}
