//! Job file format.
//!
//! A job is the sequence of command lines the runner feeds through the line
//! pipeline, with the outcome of the external collaborators (checksum and
//! motion acceptance) recorded per line.
//!
//! ```toml
//! [[lines]]
//! powers = [10.0, 20.0, 55.5]
//!
//! [[lines]]
//! powers = [80.0]
//! motion = false
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Complete job description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    /// Command lines in arrival order.
    #[serde(default)]
    pub lines: Vec<JobLine>,
}

/// One command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLine {
    /// Laser power values carried by the line [%].
    #[serde(default)]
    pub powers: Vec<f32>,

    /// Result of the checksum stage.
    #[serde(default = "default_true")]
    pub checksum_ok: bool,

    /// Whether the line enqueues a move.
    #[serde(default = "default_true")]
    pub motion: bool,

    /// Steps executed by the move (default: one per power value).
    #[serde(default)]
    pub steps: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl JobLine {
    /// A moving line with one step per power value.
    pub fn moving(powers: &[f32]) -> Self {
        Self {
            powers: powers.to_vec(),
            checksum_ok: true,
            motion: true,
            steps: None,
        }
    }

    /// Number of step interrupts the line's move runs for.
    pub fn step_count(&self) -> u32 {
        self.steps.unwrap_or(self.powers.len() as u32)
    }
}

impl Job {
    /// Validate every line.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, line) in self.lines.iter().enumerate() {
            if let Some(pct) = line.powers.iter().find(|p| !p.is_finite()) {
                return Err(ConfigError::ValidationError(format!(
                    "line {}: power {pct} is not finite",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}
