// echosounder_core/src/settings.rs

//! Access to the flat `key -> scalar` settings store that carries calibration.
//!
//! The core never reads files itself. Whatever loads the settings file hands
//! over something implementing [`SettingsSource`], and the calibration code
//! pulls the keys it needs out of it.

use std::collections::{BTreeMap, HashMap};

use crate::error::{ConfigError, Result};

// --- Required keys ---
pub const POSITION_X: &str = "Echosounder.position.x";
pub const POSITION_Y: &str = "Echosounder.position.y";
pub const POSITION_Z: &str = "Echosounder.position.z";
pub const DIRECTION_X: &str = "Echosounder.direction.x";
pub const DIRECTION_Y: &str = "Echosounder.direction.y";
pub const DIRECTION_Z: &str = "Echosounder.direction.z";
pub const HALF_ANGLE: &str = "Echosounder.angle";
pub const ENABLED: &str = "Echosounder.enabled";
pub const PROJ_00: &str = "Camera.proj00";
pub const PROJ_02: &str = "Camera.proj02";
pub const PROJ_11: &str = "Camera.proj11";
pub const PROJ_12: &str = "Camera.proj12";
pub const IMAGE_HEIGHT: &str = "Camera.height";

// --- Optional keys ---
pub const CONFIDENCE_THRESHOLD: &str = "Echosounder.confidence_threshold";
pub const UP_X: &str = "Echosounder.up.x";
pub const UP_Y: &str = "Echosounder.up.y";
pub const UP_Z: &str = "Echosounder.up.z";
pub const SOLVER_STEP: &str = "Echosounder.solver.step";
pub const SOLVER_TOLERANCE: &str = "Echosounder.solver.tolerance";
pub const SOLVER_MAX_ITERATIONS: &str = "Echosounder.solver.max_iterations";
pub const SOLVER_STRATEGY: &str = "Echosounder.solver.strategy";

/// Every key that must be present for calibration to succeed.
pub const REQUIRED_KEYS: [&str; 13] = [
    POSITION_X,
    POSITION_Y,
    POSITION_Z,
    DIRECTION_X,
    DIRECTION_Y,
    DIRECTION_Z,
    HALF_ANGLE,
    ENABLED,
    PROJ_00,
    PROJ_02,
    PROJ_11,
    PROJ_12,
    IMAGE_HEIGHT,
];

/// The contract for any flat store of numeric settings.
/// Booleans are encoded as scalars (non-zero means `true`).
pub trait SettingsSource {
    /// Returns the scalar stored under `key`, if any.
    fn scalar(&self, key: &str) -> Option<f64>;

    /// Fetches a required, finite scalar.
    fn required(&self, key: &str) -> Result<f64> {
        let value = self
            .scalar(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            });
        }
        Ok(value)
    }

    /// Fetches an optional scalar, falling back to `default` when absent.
    /// A present but non-finite value is still an error.
    fn optional(&self, key: &str, default: f64) -> Result<f64> {
        match self.scalar(key) {
            None => Ok(default),
            Some(_) => self.required(key),
        }
    }

    /// Fetches a required flag.
    fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.required(key)? != 0.0)
    }

    /// Fetches a required, strictly positive integer (e.g. an image height).
    fn positive_integer(&self, key: &str) -> Result<u32> {
        let value = self.required(key)?;
        if value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            });
        }
        Ok(value as u32)
    }

    /// Fetches an optional signed integer, falling back to `default` when
    /// absent. Fractional or out-of-range values are rejected.
    fn optional_integer(&self, key: &str, default: i32) -> Result<i32> {
        let value = self.optional(key, default as f64)?;
        if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            });
        }
        Ok(value as i32)
    }
}

impl SettingsSource for HashMap<String, f64> {
    fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

impl SettingsSource for BTreeMap<String, f64> {
    fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for &S {
    fn scalar(&self, key: &str) -> Option<f64> {
        (**self).scalar(key)
    }
}
