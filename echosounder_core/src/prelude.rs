// echosounder_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::footprint::FootprintProjector;
pub use crate::settings::SettingsSource;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::calibration::{Calibration, CameraIntrinsics, SensorExtrinsics, SonarToCamera};
pub use crate::error::ConfigError;
pub use crate::footprint::Footprint;
pub use crate::matching::{select_best_match, FootprintCircle};
pub use crate::reading::{ConfidenceGate, ReadingState};
pub use crate::types::{CameraPoint, MapIndex, PixelPoint, RangeSample, WorldPoint};

// --- Estimation Algorithms ---
pub use crate::estimation::{ScaleCorrection, ScaleSolver, SearchStrategy, SolverOutcome, SolverParams};

// --- Concrete Implementations (Export common ones for convenience) ---
pub use crate::footprint::LateralOffsetProjector;
pub use crate::integration::EchosounderIntegration;
