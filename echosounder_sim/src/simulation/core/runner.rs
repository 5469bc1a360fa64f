// echosounder_sim/src/simulation/core/runner.rs

//! Drives the fusion core the way the tracker and mapper would: update the
//! reading per synchronized frame, gate it, associate a feature, correct
//! scale, and inject the sonar point into the map.

use echosounder_core::integration::EchosounderIntegration;
use echosounder_core::matching::select_best_match;
use echosounder_core::types::{MapIndex, PixelPoint, WorldPoint};
use log::{debug, info};

use crate::simulation::core::sync::SyncedPair;
use crate::simulation::scenario::ScenarioData;

/// What came out of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    /// Frames that had a ping paired with them.
    pub frames_with_ping: usize,
    /// Frames whose ping passed the confidence gate.
    pub confident_frames: usize,
    /// Features that fell inside a confident footprint, over all frames.
    pub matched_features: usize,
    /// Scale ratios from every solve, in frame order.
    pub ratios: Vec<f64>,
    /// Solves that reached tolerance.
    pub converged: usize,
    /// Sonar points injected into the map, in world coordinates.
    pub sonar_points: Vec<WorldPoint>,
    /// The last map point a reading was bound to.
    pub last_association: Option<MapIndex>,
}

impl RunSummary {
    pub fn mean_ratio(&self) -> Option<f64> {
        if self.ratios.is_empty() {
            return None;
        }
        Some(self.ratios.iter().sum::<f64>() / self.ratios.len() as f64)
    }

    pub fn log(&self) {
        info!("Run complete:");
        info!("- frames: {}", self.frames);
        info!("- frames with ping: {}", self.frames_with_ping);
        info!("- confident frames: {}", self.confident_frames);
        info!("- matched features: {}", self.matched_features);
        info!(
            "- scale corrections: {} ({} converged)",
            self.ratios.len(),
            self.converged
        );
        match self.mean_ratio() {
            Some(r) => info!("- mean depth ratio: {:.4} (implied scale {:.4})", r, 1.0 / r),
            None => info!("- mean depth ratio: n/a"),
        }
        info!("- sonar points: {}", self.sonar_points.len());
    }
}

/// Feeds every synchronized frame through `integration`.
pub fn run(
    integration: &EchosounderIntegration,
    data: &ScenarioData,
    pairs: &[SyncedPair],
) -> RunSummary {
    let calibration_height = integration
        .calibration()
        .intrinsics
        .calibration_image_height;
    let mut summary = RunSummary {
        frames: data.frames.len(),
        ..RunSummary::default()
    };

    for pair in pairs {
        let frame = &data.frames[pair.frame_index];
        let Some(ping) = pair.ping_index.map(|i| &data.pings[i]) else {
            continue;
        };
        summary.frames_with_ping += 1;

        let reading = integration.update_sample(ping.sample);
        if !integration.is_confident_in(&reading) {
            debug!(
                "Frame {}: ping not trusted (distance {:.3}, confidence {})",
                pair.frame_index, reading.distance, reading.confidence
            );
            continue;
        }
        summary.confident_frames += 1;

        summary.matched_features += frame
            .features
            .iter()
            .filter(|f| integration.matches_in(&reading, &f.pixel, frame.image_height))
            .count();

        let pixels: Vec<PixelPoint> = frame.features.iter().map(|f| f.pixel).collect();
        if let Some(best) = select_best_match(
            &reading.footprint,
            &pixels,
            calibration_height,
            frame.image_height,
        ) {
            let feature = &frame.features[best];
            let correction = integration.correct_scale_in(reading.distance, &feature.map_point);
            debug!(
                "Frame {}: feature {} matched, ratio {:.4} after {} steps",
                pair.frame_index, feature.id, correction.ratio, correction.iterations
            );
            summary.ratios.push(correction.ratio);
            if correction.converged() {
                summary.converged += 1;
            }
            integration.bind_association(MapIndex(feature.id));
        }

        let sonar_point = integration.project_sonar_point();
        summary
            .sonar_points
            .push(integration.transform_to_world(&sonar_point, &frame.camera_to_world));
    }

    summary.last_association = integration.association();
    summary
}
