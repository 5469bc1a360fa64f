// echosounder_sim/src/simulation/config/structs.rs

use serde::Deserialize;

/// The parts of the settings file the driver itself reads. The calibration
/// tables (`[Echosounder]`, `[Camera]`) are consumed by the core through
/// [`FlatSettings`](super::FlatSettings) and ignored here.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SimFile {
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Parameters of the synthetic seabed survey.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScenarioConfig {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: u64,
    /// Number of image frames to generate.
    pub frames: usize,
    /// Camera frame rate in Hz.
    pub frame_rate: f64,
    /// Rows of the images handed to the tracker. May differ from the
    /// calibration height.
    pub image_height: u32,
    /// Mean seabed distance below the camera, in metres.
    pub seabed_depth: f64,
    /// Amplitude of the seabed undulation, in metres.
    pub seabed_amplitude: f64,
    /// Wavelength of the seabed undulation, in metres.
    pub seabed_wavelength: f64,
    /// Forward speed of the camera, in m/s.
    pub camera_speed: f64,
    /// Randomly placed features per frame.
    pub features_per_frame: usize,
    /// Extra features placed inside the beam footprint each frame.
    pub footprint_features: usize,
    /// The unknown factor by which monocular reconstruction inflates distances.
    pub monocular_scale: f64,
    /// Standard deviation of the range noise, in metres (one-way).
    pub range_noise_stddev: f64,
    /// Confidence values are drawn uniformly from this range.
    pub confidence_range: [i32; 2],
    /// Mean delay between an image and its ping, in seconds.
    pub ping_latency: f64,
    /// Standard deviation of the ping delay, in seconds.
    pub ping_jitter: f64,
    /// Probability that a ping is lost.
    pub ping_dropout: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frames: 200,
            frame_rate: 10.0,
            image_height: 240,
            seabed_depth: 4.0,
            seabed_amplitude: 0.3,
            seabed_wavelength: 12.0,
            camera_speed: 0.3,
            features_per_frame: 150,
            footprint_features: 3,
            monocular_scale: 1.7,
            range_noise_stddev: 0.02,
            confidence_range: [60, 255],
            ping_latency: 0.01,
            ping_jitter: 0.005,
            ping_dropout: 0.05,
        }
    }
}

/// Tuning for pairing images with pings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SyncConfig {
    /// Largest accepted time gap between an image and its ping, in seconds.
    pub tolerance: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}
