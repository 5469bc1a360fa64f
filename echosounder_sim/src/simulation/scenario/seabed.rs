// echosounder_sim/src/simulation/scenario/seabed.rs

use std::f64::consts::PI;

use echosounder_core::calibration::Calibration;
use echosounder_core::types::RangeSample;
use log::info;
use nalgebra::{Isometry3, Point2};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimError};
use crate::simulation::config::ScenarioConfig;
use crate::simulation::scenario::{Feature, ImageFrame, Ping, ScenarioData};

/// A downward-looking camera flying a straight line over an undulating seabed.
///
/// The world frame coincides with the camera frame at `t = 0`; the camera
/// moves along world +x and the seabed lies at world depth
/// `z = depth + amplitude * sin(2 pi x / wavelength)`.
#[derive(Debug)]
pub struct SeabedScenario<'a> {
    config: &'a ScenarioConfig,
    calibration: &'a Calibration,
}

impl<'a> SeabedScenario<'a> {
    pub fn new(config: &'a ScenarioConfig, calibration: &'a Calibration) -> Result<Self> {
        let invalid = |msg: &str| Err(SimError::Scenario(msg.to_string()));

        if !(config.frame_rate > 0.0) {
            return invalid("frame_rate must be positive");
        }
        if config.image_height == 0 {
            return invalid("image_height must be positive");
        }
        if !(config.monocular_scale > 0.0) {
            return invalid("monocular_scale must be positive");
        }
        if !(config.seabed_wavelength > 0.0) {
            return invalid("seabed_wavelength must be positive");
        }
        if config.seabed_depth - config.seabed_amplitude.abs() <= calibration.extrinsics.position.z
        {
            return invalid("seabed must stay below the echosounder");
        }
        if !(0.0..=1.0).contains(&config.ping_dropout) {
            return invalid("ping_dropout must lie in [0, 1]");
        }
        if !(config.range_noise_stddev >= 0.0 && config.ping_jitter >= 0.0) {
            return invalid("noise standard deviations must be non-negative");
        }
        if config.confidence_range[0] > config.confidence_range[1] {
            return invalid("confidence_range must be [min, max]");
        }
        if !(calibration.extrinsics.direction.z > 0.0) {
            return invalid("the echosounder must point towards the seabed (+z)");
        }

        Ok(Self {
            config,
            calibration,
        })
    }

    /// Seabed depth below the world origin at world position `x`.
    pub fn depth_at(&self, x: f64) -> f64 {
        let c = self.config;
        c.seabed_depth + c.seabed_amplitude * (2.0 * PI * x / c.seabed_wavelength).sin()
    }

    /// Generates every frame and ping of the survey.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<ScenarioData> {
        let c = self.config;
        let ext = &self.calibration.extrinsics;
        let intr = &self.calibration.intrinsics;

        let range_noise = Normal::new(0.0, c.range_noise_stddev)
            .map_err(|e| SimError::Scenario(e.to_string()))?;
        let ping_jitter =
            Normal::new(0.0, c.ping_jitter).map_err(|e| SimError::Scenario(e.to_string()))?;

        // Pixel scale from calibration resolution to processed resolution.
        let to_processed = c.image_height as f64 / intr.calibration_image_height as f64;
        let width = c.image_height as f64 * 4.0 / 3.0;
        let height = c.image_height as f64;

        let dt = 1.0 / c.frame_rate;
        let mut next_id = 0_u64;
        let mut data = ScenarioData::default();

        for k in 0..c.frames {
            let timestamp = k as f64 * dt;
            let camera_x = c.camera_speed * timestamp;
            let camera_to_world = Isometry3::translation(camera_x, 0.0, 0.0);
            // The seabed is treated as locally flat under each frame.
            let depth = self.depth_at(camera_x);

            let true_range = (depth - ext.position.z) / ext.direction.z;

            let mut features = Vec::with_capacity(c.features_per_frame + c.footprint_features);
            let mut push_feature = |pixel: Point2<f64>| {
                let true_point = intr.back_project(&(pixel / to_processed), depth);
                features.push(Feature {
                    id: next_id,
                    pixel,
                    map_point: true_point * c.monocular_scale,
                    true_point,
                });
                next_id += 1;
            };

            for _ in 0..c.features_per_frame {
                push_feature(Point2::new(
                    rng.gen_range(0.0..width),
                    rng.gen_range(0.0..height),
                ));
            }

            // A few features on the patch the beam actually hits, so the
            // footprint has something to match.
            let hit_px = intr.project_direction(&ext.point_at(true_range));
            let radius_px = intr.fx() * ext.footprint_radius(true_range) / depth;
            for _ in 0..c.footprint_features {
                let angle = rng.gen_range(0.0..2.0 * PI);
                let r = rng.gen_range(0.0..=0.5 * radius_px);
                let px_cal = Point2::new(hit_px.x + r * angle.cos(), hit_px.y + r * angle.sin());
                push_feature(px_cal * to_processed);
            }

            data.frames.push(ImageFrame {
                timestamp,
                camera_to_world,
                image_height: c.image_height,
                features,
                true_range,
            });

            if rng.gen_bool(c.ping_dropout) {
                continue;
            }
            let measured = true_range + range_noise.sample(rng);
            let confidence = rng.gen_range(c.confidence_range[0]..=c.confidence_range[1]);
            data.pings.push(Ping {
                timestamp: timestamp + c.ping_latency + ping_jitter.sample(rng),
                // The driver reports twice the one-way range.
                sample: RangeSample::new(2.0 * measured, confidence),
            });
        }

        data.pings
            .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        info!(
            "Generated {} frames and {} pings over {:.1} s",
            data.frames.len(),
            data.pings.len(),
            c.frames as f64 * dt
        );
        Ok(data)
    }
}
