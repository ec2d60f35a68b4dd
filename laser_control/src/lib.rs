//! # Laser Control Library
//!
//! Laser power buffering between the G-code parser and the stepper
//! interrupt, and the laser/fan actuator that consumes it.
//!
//! ## Contexts
//!
//! 1. **Foreground**: parses lines, appends power values, commits, claims
//!    or rolls back ([`ring::LineWriter`], [`pipeline::LinePipeline`]) and
//!    runs the fan drain check ([`actuator::LaserActuator::manage_laser`]).
//! 2. **Step interrupt**: pops one claimed power value per executed step
//!    ([`ring::StepConsumer`]).
//!
//! ## Lock-Free Handoff
//!
//! The two contexts share one [`ring::PowerRing`] with no locks: each of its
//! four cursors has exactly one writer. The ring performs no allocation and
//! every operation is O(1).

#![deny(clippy::disallowed_types)]

pub mod actuator;
pub mod config;
pub mod cycle;
pub mod output;
pub mod pipeline;
pub mod ring;
