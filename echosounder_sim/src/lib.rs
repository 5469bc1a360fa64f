// echosounder_sim/src/lib.rs

// This prelude is for convenience for other files WITHIN the echosounder_sim crate.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod simulation;

use log::info;

use echosounder_core::integration::EchosounderIntegration;

use crate::cli::Cli;
use crate::error::Result;
use crate::simulation::config::load_settings_file;
use crate::simulation::core::prng::seeded_rng;
use crate::simulation::core::runner::{self, RunSummary};
use crate::simulation::core::sync::ApproximateTimeSync;
use crate::simulation::scenario::SeabedScenario;

/// Loads settings, builds the integration, generates the survey and replays it.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let mut loaded = load_settings_file(&cli.settings)?;
    cli.apply_overrides(&mut loaded.file);

    let integration = EchosounderIntegration::from_settings(&loaded.calibration)?;

    let scenario_config = &loaded.file.scenario;
    info!(
        "Scenario: {} frames at {} Hz, processed height {}, seed {}, hidden scale {}",
        scenario_config.frames,
        scenario_config.frame_rate,
        scenario_config.image_height,
        scenario_config.seed,
        scenario_config.monocular_scale
    );
    let data = SeabedScenario::new(scenario_config, integration.calibration())?
        .generate(&mut seeded_rng(scenario_config.seed))?;

    let pairs = ApproximateTimeSync::new(loaded.file.sync.tolerance).pair(&data.frames, &data.pings);
    let summary = runner::run(&integration, &data, &pairs);
    summary.log();
    Ok(summary)
}
