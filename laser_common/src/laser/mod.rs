//! Laser controller shared types.
//!
//! Configuration for the actuator and the job runner, and the job file
//! format consumed by the runner.

pub mod config;
pub mod job;
