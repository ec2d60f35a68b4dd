//! Laser Common Library
//!
//! This crate provides shared constants, configuration loading utilities and
//! power-value conversion for the laser power workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Buffer sizing and actuator constants
//! - [`config`] - Configuration loading traits and types
//! - [`laser`] - Laser controller configuration and job description
//! - [`power`] - Percentage to PWM power conversion
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use laser_common::consts::POWER_BUFFER_LEN;
//! use laser_common::config::{ConfigLoader, SharedConfig};
//! ```

pub mod config;
pub mod consts;
pub mod laser;
pub mod power;
pub mod prelude;
