// echosounder_core/src/estimation/scale.rs

use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Points closer than this to the search origin have no usable ray.
const MIN_RAY_NORM: f64 = 1e-9;

/// Which ray the search slides the point along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Move along the ray from the camera origin through the point, even
    /// though the error is measured against the sensor position. When the
    /// sensor sits at the camera origin the two coincide.
    #[default]
    RayFromOrigin,
    /// Move along the ray from the sensor position through the point, so the
    /// step direction agrees with the error being minimised.
    RayFromSensor,
}

impl SearchStrategy {
    /// Decodes the numeric form used in flat settings stores.
    pub fn from_code(code: f64) -> Option<Self> {
        match code as i64 {
            _ if code.fract() != 0.0 => None,
            0 => Some(Self::RayFromOrigin),
            1 => Some(Self::RayFromSensor),
            _ => None,
        }
    }
}

/// Tuning for the fixed-step radial search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Distance moved per iteration, in camera-frame units.
    pub step: f64,
    /// Accepted absolute range error.
    pub tolerance: f64,
    /// Hard cap on the number of steps.
    pub max_iterations: u32,
    pub strategy: SearchStrategy,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            step: 0.01,
            tolerance: 0.05,
            max_iterations: 20_000,
            strategy: SearchStrategy::RayFromOrigin,
        }
    }
}

impl SolverParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::InvalidSolverParameter("step must be positive"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ConfigError::InvalidSolverParameter(
                "tolerance must be non-negative",
            ));
        }
        Ok(())
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverOutcome {
    /// The range error dropped within tolerance.
    Converged,
    /// The iteration cap was hit first; the ratio is a best effort.
    IterationLimit,
    /// The target (or the point mid-search) sat on the ray origin, so no
    /// direction could be formed. The ratio is left at whatever was reached.
    DegenerateTarget,
}

/// The result of a scale-correction solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleCorrection {
    /// `|final| / |initial|`, both measured from the camera origin.
    /// Always finite.
    pub ratio: f64,
    /// Number of steps actually taken.
    pub iterations: u32,
    pub outcome: SolverOutcome,
    /// Where the search ended, in the camera frame.
    pub corrected_point: Point3<f64>,
}

impl ScaleCorrection {
    pub fn converged(&self) -> bool {
        self.outcome == SolverOutcome::Converged
    }

    fn degenerate(target: Point3<f64>) -> Self {
        Self {
            ratio: 1.0,
            iterations: 0,
            outcome: SolverOutcome::DegenerateTarget,
            corrected_point: target,
        }
    }
}

/// Estimates the factor by which a monocular map point must be scaled so its
/// distance to the echosounder matches the measured range.
///
/// This is a fixed-step search, not a closed-form solve: the point is nudged
/// by `step` towards or away from the ray origin until the range error is
/// within `tolerance` or `max_iterations` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleSolver {
    params: SolverParams,
}

impl ScaleSolver {
    pub fn new(params: SolverParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Runs the search for `target` (camera frame) against a sensor at
    /// `sensor_position` that measured `measured_distance`.
    pub fn correct(
        &self,
        target: &Point3<f64>,
        sensor_position: &Point3<f64>,
        measured_distance: f64,
    ) -> ScaleCorrection {
        let p = &self.params;
        let initial_norm = target.coords.norm();
        if initial_norm < MIN_RAY_NORM {
            warn!("Scale correction skipped: target point is at the camera origin");
            return ScaleCorrection::degenerate(*target);
        }

        let mut point = *target;
        let mut iterations = 0;
        let outcome = loop {
            let error = (point - *sensor_position).norm() - measured_distance;
            if error.abs() <= p.tolerance {
                break SolverOutcome::Converged;
            }
            if iterations >= p.max_iterations {
                break SolverOutcome::IterationLimit;
            }

            let Some(ray) = self.ray(&point, sensor_position) else {
                break SolverOutcome::DegenerateTarget;
            };
            if error > 0.0 {
                point -= ray * p.step;
            } else {
                point += ray * p.step;
            }
            iterations += 1;
        };

        let ratio = point.coords.norm() / initial_norm;
        debug!(
            "Scale correction: range {:.3}, first dist {:.3}, final dist {:.3}, ratio {:.4}, {} steps",
            measured_distance,
            initial_norm,
            point.coords.norm(),
            ratio,
            iterations
        );
        match outcome {
            SolverOutcome::IterationLimit => warn!(
                "Scale correction hit the {} iteration cap; returning best-effort ratio {:.4}",
                p.max_iterations, ratio
            ),
            SolverOutcome::DegenerateTarget => {
                warn!("Scale correction stopped: search point reached the ray origin")
            }
            SolverOutcome::Converged => {}
        }

        ScaleCorrection {
            ratio,
            iterations,
            outcome,
            corrected_point: point,
        }
    }

    /// Unit vector along which the point is moved, or `None` at the ray origin.
    fn ray(&self, point: &Point3<f64>, sensor_position: &Point3<f64>) -> Option<Vector3<f64>> {
        let v = match self.params.strategy {
            SearchStrategy::RayFromOrigin => point.coords,
            SearchStrategy::RayFromSensor => point - sensor_position,
        };
        v.try_normalize(MIN_RAY_NORM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_point_already_at_range_needs_no_steps() {
        let solver = ScaleSolver::default();
        let target = Point3::new(0.0, 0.0, 2.0);
        let c = solver.correct(&target, &Point3::origin(), 2.0);
        assert_eq!(c.ratio, 1.0);
        assert_eq!(c.iterations, 0);
        assert!(c.converged());
    }

    #[test]
    fn test_far_point_is_pulled_in() {
        let solver = ScaleSolver::default();
        let target = Point3::new(0.0, 3.0, 4.0); // |t| = 5
        let c = solver.correct(&target, &Point3::origin(), 2.5);
        assert!(c.converged());
        assert_abs_diff_eq!(c.ratio, 0.5, epsilon = 0.011);
        // The point stays on its original ray.
        assert_abs_diff_eq!(
            c.corrected_point.coords.normalize(),
            target.coords.normalize(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_near_point_is_pushed_out() {
        let solver = ScaleSolver::default();
        let target = Point3::new(0.0, 0.0, 0.5);
        let c = solver.correct(&target, &Point3::origin(), 2.0);
        assert!(c.converged());
        assert!(c.ratio > 1.0);
        assert_abs_diff_eq!(c.corrected_point.z, 2.0, epsilon = 0.06);
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let params = SolverParams {
            max_iterations: 10,
            ..SolverParams::default()
        };
        let solver = ScaleSolver::new(params).unwrap();
        let target = Point3::new(0.0, 0.0, 100.0);
        let c = solver.correct(&target, &Point3::origin(), 1.0);
        assert_eq!(c.outcome, SolverOutcome::IterationLimit);
        assert_eq!(c.iterations, 10);
        assert_relative_eq!(c.ratio, 99.9 / 100.0, epsilon = 1e-9);
        assert!(c.ratio.is_finite());
    }

    #[test]
    fn test_origin_target_is_degenerate() {
        let solver = ScaleSolver::default();
        let c = solver.correct(&Point3::origin(), &Point3::origin(), 2.0);
        assert_eq!(c.outcome, SolverOutcome::DegenerateTarget);
        assert_eq!(c.ratio, 1.0);
        assert_eq!(c.iterations, 0);
    }

    #[test]
    fn test_sensor_ray_target_at_sensor_is_degenerate() {
        let params = SolverParams {
            strategy: SearchStrategy::RayFromSensor,
            ..SolverParams::default()
        };
        let sensor = Point3::new(1.0, 0.0, 0.0);
        let c = ScaleSolver::new(params).unwrap().correct(&sensor, &sensor, 2.0);
        assert_eq!(c.outcome, SolverOutcome::DegenerateTarget);
        assert_eq!(c.ratio, 1.0);
        assert_eq!(c.iterations, 0);
        assert_eq!(c.corrected_point, sensor);
    }

    #[test]
    fn test_origin_ray_ignores_sensor_offset_direction() {
        // Sensor offset to the side: the default strategy still slides along
        // the camera ray, the sensor strategy slides along the sensor ray.
        let sensor = Point3::new(1.0, 0.0, 0.0);
        let target = Point3::new(1.0, 0.0, 4.0);

        let from_origin = ScaleSolver::default().correct(&target, &sensor, 2.0);
        assert!(from_origin.converged());
        let dir = from_origin.corrected_point.coords.normalize();
        assert_abs_diff_eq!(dir, target.coords.normalize(), epsilon = 1e-9);

        let params = SolverParams {
            strategy: SearchStrategy::RayFromSensor,
            ..SolverParams::default()
        };
        let from_sensor = ScaleSolver::new(params).unwrap().correct(&target, &sensor, 2.0);
        assert!(from_sensor.converged());
        assert_abs_diff_eq!(from_sensor.corrected_point.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            (from_sensor.corrected_point - sensor).norm(),
            2.0,
            epsilon = 0.05 + 1e-9
        );
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let bad_step = SolverParams {
            step: 0.0,
            ..SolverParams::default()
        };
        assert!(ScaleSolver::new(bad_step).is_err());
        let bad_tol = SolverParams {
            tolerance: -1.0,
            ..SolverParams::default()
        };
        assert!(ScaleSolver::new(bad_tol).is_err());
    }

    #[test]
    fn test_strategy_codes() {
        assert_eq!(SearchStrategy::from_code(0.0), Some(SearchStrategy::RayFromOrigin));
        assert_eq!(SearchStrategy::from_code(1.0), Some(SearchStrategy::RayFromSensor));
        assert_eq!(SearchStrategy::from_code(0.5), None);
        assert_eq!(SearchStrategy::from_code(7.0), None);
    }
}
