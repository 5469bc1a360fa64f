// echosounder_core/src/types.rs

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

// --- Core Type Aliases ---
/// A pixel coordinate `(u, v)` in some image.
pub type PixelPoint = Point2<f64>;
/// A 3D point expressed in the camera frame (x right, y down, z forward).
pub type CameraPoint = Point3<f64>;
/// A 3D point expressed in the world/map frame.
pub type WorldPoint = Point3<f64>;

/// The default "up" axis used to build the sonar frame.
pub const DEFAULT_WORLD_UP: Vector3<f64> = Vector3::new(0.0, 1.0, 0.0);

// --- Core Identifier ---
/// Identifies the map entity (usually a map point) that the current range
/// reading has been bound to. This is a plain back-reference: nothing here
/// checks that the entity is still alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapIndex(pub u64);

/// A raw sample delivered by the range sensor driver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeSample {
    /// The distance as reported by the sensor. This is halved before use.
    pub raw_distance: f64,
    /// Sensor-reported confidence for this ping.
    pub confidence: i32,
}

impl RangeSample {
    pub fn new(raw_distance: f64, confidence: i32) -> Self {
        Self {
            raw_distance,
            confidence,
        }
    }
}
