// echosounder_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::simulation::config::SimFile;

/// Replays a synthetic seabed survey through the echosounder fusion core.
///
/// Anything given on the command line overrides the matching value in the
/// settings file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the settings TOML file.
    #[arg(short, long, default_value = "assets/echosounder.toml")]
    pub settings: PathBuf,

    /// Number of image frames to generate.
    #[arg(long)]
    pub frames: Option<usize>,

    /// Seed for the scenario's random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rows of the processed images (may differ from the calibration height).
    #[arg(long)]
    pub image_height: Option<u32>,

    /// The hidden monocular scale factor baked into the map points.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Largest accepted gap between an image and its ping, in seconds.
    #[arg(long)]
    pub sync_tolerance: Option<f64>,
}

impl Cli {
    /// Applies the command-line overrides on top of the loaded file.
    pub fn apply_overrides(&self, file: &mut SimFile) {
        let scenario = &mut file.scenario;
        if let Some(frames) = self.frames {
            scenario.frames = frames;
        }
        if let Some(seed) = self.seed {
            scenario.seed = seed;
        }
        if let Some(h) = self.image_height {
            scenario.image_height = h;
        }
        if let Some(scale) = self.scale {
            scenario.monocular_scale = scale;
        }
        if let Some(tolerance) = self.sync_tolerance {
            file.sync.tolerance = tolerance;
        }
    }
}
