// echosounder_sim/src/simulation/config/mod.rs

//! This module handles loading the settings file from disk and splitting it
//! into the flat calibration store for the core and the driver's own
//! scenario configuration.

mod flatten;

pub mod structs;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use log::{info, warn};
use std::path::Path;

use crate::error::{Result, SimError};

// Re-export public types
pub use flatten::FlatSettings;
pub use structs::{ScenarioConfig, SimFile, SyncConfig};

/// Everything read from one settings file.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    /// Flat `key -> scalar` view for the fusion core.
    pub calibration: FlatSettings,
    pub file: SimFile,
}

/// Loads and parses the settings file at `path`.
pub fn load_settings_file(path: &Path) -> Result<LoadedSettings> {
    if !path.exists() {
        return Err(SimError::MissingFile(path.to_path_buf()));
    }
    info!("Loading settings from: {}", path.display());
    load_settings(Figment::new().merge(Toml::file(path)))
}

/// Parses settings from an in-memory TOML document.
pub fn load_settings_str(toml: &str) -> Result<LoadedSettings> {
    load_settings(Figment::new().merge(Toml::string(toml)))
}

fn load_settings(figment: Figment) -> Result<LoadedSettings> {
    let tree: toml::Value = figment.extract()?;
    let calibration = FlatSettings::from_toml(&tree);
    let file: SimFile = figment.extract()?;

    if calibration.is_empty() {
        warn!("Settings contain no numeric values; calibration will fail");
    } else {
        info!("Loaded {} numeric settings", calibration.len());
    }
    Ok(LoadedSettings { calibration, file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use echosounder_core::settings::SettingsSource;

    #[test]
    fn test_scenario_defaults_when_section_missing() {
        let loaded = load_settings_str("[Camera]\nheight = 480\n").unwrap();
        assert_eq!(loaded.file.scenario, ScenarioConfig::default());
        assert_eq!(loaded.file.sync, SyncConfig::default());
        assert_eq!(loaded.calibration.scalar("Camera.height"), Some(480.0));
    }

    #[test]
    fn test_scenario_overrides_are_applied() {
        let loaded = load_settings_str(
            r#"
            [scenario]
            frames = 12
            monocular_scale = 2.5

            [sync]
            tolerance = 0.02
            "#,
        )
        .unwrap();
        assert_eq!(loaded.file.scenario.frames, 12);
        assert_eq!(loaded.file.scenario.monocular_scale, 2.5);
        assert_eq!(loaded.file.scenario.seabed_depth, 4.0);
        assert_eq!(loaded.file.sync.tolerance, 0.02);
    }

    #[test]
    fn test_unknown_scenario_field_is_rejected() {
        assert!(load_settings_str("[scenario]\nframez = 3\n").is_err());
    }
}
