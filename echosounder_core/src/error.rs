// echosounder_core/src/error.rs

use thiserror::Error;

/// Failures that can occur while building an [`EchosounderIntegration`](crate::integration::EchosounderIntegration).
///
/// Every variant is a calibration problem. Once an instance exists, none of its
/// queries can fail; bad readings simply fail the confidence gate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting: '{0}'")]
    MissingKey(String),

    #[error("Setting '{key}' has an invalid value: {value}")]
    InvalidValue { key: String, value: f64 },

    #[error("Echosounder direction vector has zero length")]
    ZeroDirection,

    #[error("World up vector has zero length")]
    ZeroUpVector,

    #[error("Echosounder direction is parallel to the world up vector; the sonar frame is undefined")]
    DegenerateBoresight,

    #[error("Image height must be positive, got {0}")]
    InvalidImageHeight(u32),

    #[error("Invalid solver parameter: {0}")]
    InvalidSolverParameter(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
