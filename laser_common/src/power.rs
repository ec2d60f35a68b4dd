//! Laser power conversion.
//!
//! G-code carries laser power as a percentage (`L` words, 0.0–100.0). The
//! ring and the PWM output work in 8-bit counts.

use crate::consts::MAX_POWER;

/// 8-bit laser intensity: 0 = off, 255 = full power.
pub type Power = u8;

/// Convert a power percentage to PWM counts.
///
/// Linear, `round(pct * 2.55)`, clamped to `[0, 255]`. `NaN` maps to 0.
#[inline]
pub fn pct_to_power(pct: f32) -> Power {
    if pct.is_nan() || pct <= 0.0 {
        0
    } else if pct >= 100.0 {
        MAX_POWER
    } else {
        (pct * MAX_POWER as f32 / 100.0).round().min(MAX_POWER as f32) as Power
    }
}

/// Convert PWM counts back to a percentage (for diagnostics).
#[inline]
pub fn power_to_pct(power: Power) -> f32 {
    power as f32 * 100.0 / MAX_POWER as f32
}
