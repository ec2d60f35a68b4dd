//! Laser actuator: laser PWM plus the cooling fan that follows it.
//!
//! Two independent flags, `laser_on` and `fan_on`. Every transition is
//! immediate except fan on → off, which waits until the laser is off *and*
//! the power ring has fully drained, so cooling keeps running while power
//! values for already-queued moves are still in flight.
//!
//! | Call              | laser_on     | fan_on                          |
//! |-------------------|--------------|---------------------------------|
//! | `set_laser(p>0)`  | true         | true                            |
//! | `set_laser(0)`    | false        | unchanged                       |
//! | `manage_laser()`  | unchanged    | false if !laser_on && drained   |
//! | `disable_laser()` | false        | false                           |
//!
//! Foreground only.

use bitflags::bitflags;
use laser_common::laser::config::LaserConfig;
use laser_common::power::{Power, power_to_pct};
use tracing::debug;

use crate::output::LaserOutputs;
use crate::ring::PowerRing;

bitflags! {
    /// Actuator state snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActuatorFlags: u8 {
        /// Laser PWM is non-zero.
        const LASER_ON = 0x01;
        /// Cooling fan is running.
        const FAN_ON   = 0x02;
    }
}

/// Laser + fan state machine owning the output channels.
#[derive(Debug)]
pub struct LaserActuator<O: LaserOutputs> {
    outputs: O,
    config: LaserConfig,
    laser_on: bool,
    fan_on: bool,
    power: Power,
}

impl<O: LaserOutputs> LaserActuator<O> {
    /// Take ownership of the outputs and drive both channels off.
    pub fn new(outputs: O, config: LaserConfig) -> Self {
        let mut actuator = Self {
            outputs,
            config,
            laser_on: false,
            fan_on: false,
            power: 0,
        };
        actuator.outputs.write_laser(0);
        actuator.shut_fan_off();
        actuator
    }

    /// Apply a laser power. Idempotent; safe to call every tick.
    ///
    /// Any non-zero power turns the fan on. The laser output is always
    /// rewritten, including for 0.
    pub fn set_laser(&mut self, power: Power) {
        self.laser_on = power > 0;
        if self.laser_on {
            self.turn_fan_on(power);
        }
        self.power = power;
        self.outputs.write_laser(power);
    }

    /// Immediate shutdown of laser and fan regardless of pending power data.
    ///
    /// Emergency / head-removal path. Idempotent.
    pub fn disable_laser(&mut self) {
        self.set_laser(0);
        self.shut_fan_off();
        debug!("laser disabled");
    }

    /// Periodic tick: stop the fan once the laser is off and the ring is empty.
    pub fn manage_laser<const N: usize>(&mut self, ring: &PowerRing<N>) {
        if self.fan_on && !self.laser_on && ring.is_empty() {
            self.shut_fan_off();
            debug!("power ring drained, cooling fan off");
        }
    }

    #[inline]
    pub fn is_laser_on(&self) -> bool {
        self.laser_on
    }

    #[inline]
    pub fn is_fan_on(&self) -> bool {
        self.fan_on
    }

    /// Last power written to the laser output.
    #[inline]
    pub fn power(&self) -> Power {
        self.power
    }

    pub fn flags(&self) -> ActuatorFlags {
        let mut flags = ActuatorFlags::empty();
        flags.set(ActuatorFlags::LASER_ON, self.laser_on);
        flags.set(ActuatorFlags::FAN_ON, self.fan_on);
        flags
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    fn turn_fan_on(&mut self, power: Power) {
        if !self.fan_on {
            debug!(
                duty = self.config.fan_on_duty,
                laser_pct = power_to_pct(power),
                "cooling fan on"
            );
        }
        self.fan_on = true;
        self.outputs.write_fan(self.config.fan_on_duty);
    }

    fn shut_fan_off(&mut self) {
        self.fan_on = false;
        self.outputs.write_fan(0);
        self.outputs.release_fan(self.config.fan_output_inverted);
    }
}
