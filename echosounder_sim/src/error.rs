// echosounder_sim/src/error.rs

use echosounder_core::error::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Calibration error: {0}")]
    Calibration(#[from] ConfigError),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    #[error("Settings file not found: {}", .0.display())]
    MissingFile(std::path::PathBuf),

    #[error("Invalid scenario: {0}")]
    Scenario(String),
}

impl From<figment::Error> for SimError {
    fn from(e: figment::Error) -> Self {
        SimError::Settings(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
