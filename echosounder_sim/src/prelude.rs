// echosounder_sim/src/prelude.rs

// Re-export the entire echosounder_core prelude so you can easily access
// pure types like `ReadingState`, `Footprint`, `MapIndex`, etc.
pub use echosounder_core::prelude::*;

// Re-export common simulation-specific types.
pub use crate::cli::Cli;
pub use crate::error::SimError;
pub use crate::simulation::config::{load_settings_file, load_settings_str, LoadedSettings};
pub use crate::simulation::config::structs::*;
pub use crate::simulation::core::prng::{seeded_rng, SimulationRng};
pub use crate::simulation::core::runner::{run as run_scenario, RunSummary};
pub use crate::simulation::core::sync::{ApproximateTimeSync, Stamped, SyncedPair};
pub use crate::simulation::scenario::{Feature, ImageFrame, Ping, ScenarioData, SeabedScenario};
