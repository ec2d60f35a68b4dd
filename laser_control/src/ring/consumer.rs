//! Step-context side of the ring.
//!
//! One sample is taken per executed motor step, strictly from the claimed
//! segment. Runs under the step-generation deadline: O(1), no blocking, no
//! logging, no allocation.

use laser_common::power::Power;

use super::PowerRing;

/// Interrupt-context handle; owns the `oldest` cursor.
#[derive(Debug)]
pub struct StepConsumer<'a, const N: usize> {
    ring: &'a PowerRing<N>,
}

impl<'a, const N: usize> StepConsumer<'a, N> {
    pub(super) const fn new(ring: &'a PowerRing<N>) -> Self {
        Self { ring }
    }

    /// Power for the step being executed.
    ///
    /// Returns 0 once the claimed segment is exhausted; committed but
    /// unclaimed samples are never handed out.
    #[inline]
    pub fn next_power(&mut self) -> Power {
        self.ring.pop()
    }

    /// Claimed samples still waiting for a step.
    #[inline]
    pub fn pending(&self) -> usize {
        self.ring.claimed_len()
    }
}
