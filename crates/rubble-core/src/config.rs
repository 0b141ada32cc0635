//! Runtime tuning knobs.
//!
//! `Tunables::default()` mirrors the constants module; a host may override
//! a handful of top-level knobs from a JSON file. Everything else stays a
//! compile-time constant.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::ConfigError;

/// Tuning overrides applied when the engine is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Gravity for all free-falling bodies (units/s²).
    pub gravity: f64,
    /// Scale applied to every debris pool cap.
    pub debris_cap_scale: f64,
    /// Scale applied to every weapon's base damage.
    pub damage_scale: f64,
    /// Aggregate sticky-bomb damage cap per building per batch.
    pub sticky_batch_cap: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            gravity: constants::GRAVITY,
            debris_cap_scale: 1.0,
            damage_scale: 1.0,
            sticky_batch_cap: constants::STICKY_BATCH_CAP,
        }
    }
}

impl Tunables {
    /// Parse and validate tunables from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tunables: Tunables = serde_json::from_str(json)?;
        tunables.validate()?;
        Ok(tunables)
    }

    /// Check every knob is within its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "gravity",
                message: format!("must be positive, got {}", self.gravity),
            });
        }
        if !(self.debris_cap_scale > 0.0 && self.debris_cap_scale <= 4.0) {
            return Err(ConfigError::InvalidValue {
                field: "debris_cap_scale",
                message: format!("must be in (0, 4], got {}", self.debris_cap_scale),
            });
        }
        if !(self.damage_scale > 0.0 && self.damage_scale <= 10.0) {
            return Err(ConfigError::InvalidValue {
                field: "damage_scale",
                message: format!("must be in (0, 10], got {}", self.damage_scale),
            });
        }
        if !(self.sticky_batch_cap > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "sticky_batch_cap",
                message: format!("must be positive, got {}", self.sticky_batch_cap),
            });
        }
        Ok(())
    }
}
