// echosounder_core/src/integration.rs

use std::sync::{Mutex, PoisonError, RwLock};

use log::debug;
use nalgebra::{Isometry3, Matrix4};

use crate::calibration::{self, Calibration};
use crate::error::{ConfigError, Result};
use crate::estimation::{ScaleCorrection, ScaleSolver, SearchStrategy, SolverParams};
use crate::footprint::{FootprintProjector, LateralOffsetProjector};
use crate::reading::{ConfidenceGate, ReadingState};
use crate::settings::{self, SettingsSource};
use crate::types::{CameraPoint, MapIndex, PixelPoint, RangeSample, WorldPoint};

/// Fuses echosounder pings with the monocular tracker.
///
/// Calibration is fixed at construction. Each ping replaces the current
/// [`ReadingState`] wholesale under a write lock, so queries running on other
/// threads see either the old reading or the new one, never a mix.
///
/// Before the first ping nothing matches, the gate is closed and the sonar
/// point sits at the sensor position.
#[derive(Debug)]
pub struct EchosounderIntegration {
    calibration: Calibration,
    gate: ConfidenceGate,
    projector: Box<dyn FootprintProjector>,
    solver: ScaleSolver,
    reading: RwLock<Option<ReadingState>>,
    association: Mutex<Option<MapIndex>>,
}

impl EchosounderIntegration {
    /// Creates an instance from explicit parts.
    pub fn new(
        calibration: Calibration,
        projector: Box<dyn FootprintProjector>,
        solver_params: SolverParams,
    ) -> Result<Self> {
        let solver = ScaleSolver::new(solver_params)?;
        let gate = ConfidenceGate::new(
            calibration.extrinsics.enabled,
            calibration.confidence_threshold,
        );
        Ok(Self {
            calibration,
            gate,
            projector,
            solver,
            reading: RwLock::new(None),
            association: Mutex::new(None),
        })
    }

    /// Reads calibration and solver tuning from a flat settings store and uses
    /// the lateral-offset footprint model.
    pub fn from_settings(source: &dyn SettingsSource) -> Result<Self> {
        let calibration = Calibration::from_settings(source)?;
        let solver_params = solver_params_from_settings(source)?;
        Self::new(calibration, Box::new(LateralOffsetProjector), solver_params)
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn solver_params(&self) -> &SolverParams {
        self.solver.params()
    }

    // --- Reading update ---

    /// Takes a new ping and recomputes the footprint. Never fails; nonsense
    /// values simply fail the confidence gate later.
    pub fn update_reading(&self, raw_distance: f64, confidence: i32) -> ReadingState {
        self.update_sample(RangeSample::new(raw_distance, confidence))
    }

    /// Same as [`Self::update_reading`] for an already-packaged sample.
    pub fn update_sample(&self, sample: RangeSample) -> ReadingState {
        let state = ReadingState::from_sample(
            sample,
            &self.calibration.extrinsics,
            &self.calibration.intrinsics,
            self.projector.as_ref(),
        );
        debug!(
            "Echosounder reading: distance {:.3}, confidence {}, footprint radius {:.4}, centre px ({:.1}, {:.1})",
            state.distance,
            state.confidence,
            state.footprint.radius,
            state.footprint.center_px.x,
            state.footprint.center_px.y
        );

        *self.reading.write().unwrap_or_else(PoisonError::into_inner) = Some(state);
        state
    }

    /// A snapshot of the current reading, if any ping has arrived.
    pub fn reading(&self) -> Option<ReadingState> {
        *self.reading.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current one-way range, or `0.0` before the first ping.
    pub fn distance(&self) -> f64 {
        self.reading().map_or(0.0, |r| r.distance)
    }

    // --- Queries ---

    /// Whether the current reading should be trusted. Call this before using
    /// any of the other query results.
    pub fn is_confident(&self) -> bool {
        self.reading()
            .map_or(false, |r| self.is_confident_in(&r))
    }

    /// Gate check against an explicit snapshot.
    pub fn is_confident_in(&self, reading: &ReadingState) -> bool {
        self.gate.is_confident(reading)
    }

    /// Whether `candidate` (in an image `image_height` rows tall) falls
    /// inside the current footprint.
    pub fn matches(&self, candidate: &PixelPoint, image_height: u32) -> bool {
        self.reading()
            .map_or(false, |r| self.matches_in(&r, candidate, image_height))
    }

    /// Footprint check against an explicit snapshot.
    pub fn matches_in(
        &self,
        reading: &ReadingState,
        candidate: &PixelPoint,
        image_height: u32,
    ) -> bool {
        reading.footprint.matches(
            candidate,
            self.calibration.intrinsics.calibration_image_height,
            image_height,
        )
    }

    /// Solves for the scale factor that brings `target` (camera frame) to the
    /// measured range. The mapper applies `ratio` to the whole reconstruction.
    pub fn correct_scale(&self, target: &CameraPoint) -> ScaleCorrection {
        self.correct_scale_in(self.distance(), target)
    }

    /// Scale correction against an explicit range.
    pub fn correct_scale_in(&self, distance: f64, target: &CameraPoint) -> ScaleCorrection {
        self.solver
            .correct(target, &self.calibration.extrinsics.position, distance)
    }

    /// Shorthand for `correct_scale(target).ratio`.
    pub fn depth_ratio(&self, target: &CameraPoint) -> f64 {
        self.correct_scale(target).ratio
    }

    /// The ping as a 3D point in the camera frame, on the beam centre line.
    pub fn project_sonar_point(&self) -> CameraPoint {
        self.calibration
            .sonar_to_camera
            .project_range(self.distance())
    }

    /// Moves a camera-frame point into the world using the tracker's current
    /// camera pose `Twc`. The pose is not retained.
    pub fn transform_to_world(
        &self,
        point: &CameraPoint,
        camera_to_world: &Isometry3<f64>,
    ) -> WorldPoint {
        calibration::transform_to_world(point, camera_to_world)
    }

    /// Like [`Self::transform_to_world`] for a homogeneous 4x4 `Twc`.
    pub fn transform_to_world_homogeneous(
        &self,
        point: &CameraPoint,
        camera_to_world: &Matrix4<f64>,
    ) -> Option<WorldPoint> {
        calibration::transform_to_world_homogeneous(point, camera_to_world)
    }

    // --- Association bookkeeping ---

    /// Records which map entity the current reading was bound to.
    pub fn bind_association(&self, index: MapIndex) {
        *self
            .association
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(index);
    }

    /// The most recently bound map entity, if any.
    pub fn association(&self) -> Option<MapIndex> {
        *self
            .association
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reads solver tuning, falling back to the defaults for any missing key.
pub fn solver_params_from_settings(source: &dyn SettingsSource) -> Result<SolverParams> {
    let defaults = SolverParams::default();

    let max_iterations = source.optional(
        settings::SOLVER_MAX_ITERATIONS,
        defaults.max_iterations as f64,
    )?;
    if max_iterations < 0.0 || max_iterations.fract() != 0.0 || max_iterations > u32::MAX as f64 {
        return Err(ConfigError::InvalidValue {
            key: settings::SOLVER_MAX_ITERATIONS.to_string(),
            value: max_iterations,
        });
    }

    let strategy_code = source.optional(settings::SOLVER_STRATEGY, 0.0)?;
    let strategy =
        SearchStrategy::from_code(strategy_code).ok_or_else(|| ConfigError::InvalidValue {
            key: settings::SOLVER_STRATEGY.to_string(),
            value: strategy_code,
        })?;

    let params = SolverParams {
        step: source.optional(settings::SOLVER_STEP, defaults.step)?,
        tolerance: source.optional(settings::SOLVER_TOLERANCE, defaults.tolerance)?,
        max_iterations: max_iterations as u32,
        strategy,
    };
    params.validate()?;
    Ok(params)
}
