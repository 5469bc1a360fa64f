// echosounder_sim/src/simulation/scenario/mod.rs

//! Synthetic sensor data: image frames with tracked features, and the
//! echosounder pings that go with them.

mod seabed;

pub use seabed::SeabedScenario;

use echosounder_core::types::{CameraPoint, PixelPoint, RangeSample};
use nalgebra::Isometry3;

use crate::simulation::core::sync::Stamped;

/// One tracked feature as the visual front end would report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    /// Map point id, used as the association index when the feature is bound
    /// to a ping.
    pub id: u64,
    /// Keypoint location in the processed image.
    pub pixel: PixelPoint,
    /// The monocular map point, in the camera frame, at the tracker's scale.
    pub map_point: CameraPoint,
    /// The metric point the feature was generated from.
    pub true_point: CameraPoint,
}

/// An image as handed to the tracker.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    pub timestamp: f64,
    /// Camera pose in the world (`Twc`).
    pub camera_to_world: Isometry3<f64>,
    /// Rows of the processed image.
    pub image_height: u32,
    pub features: Vec<Feature>,
    /// Ground-truth one-way range along the boresight.
    pub true_range: f64,
}

/// A ping from the echosounder driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ping {
    pub timestamp: f64,
    pub sample: RangeSample,
}

impl Stamped for ImageFrame {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

impl Stamped for Ping {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Everything a scenario produces, both streams sorted by time.
#[derive(Debug, Clone, Default)]
pub struct ScenarioData {
    pub frames: Vec<ImageFrame>,
    pub pings: Vec<Ping>,
}
