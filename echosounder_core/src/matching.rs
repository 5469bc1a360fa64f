// echosounder_core/src/matching.rs

//! Image-space test for "does this feature sit inside the sonar footprint?".

use nalgebra::Point2;

use crate::footprint::Footprint;
use crate::types::PixelPoint;

/// The footprint circle at the resolution of the image being processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintCircle {
    pub center: PixelPoint,
    pub radius: f64,
}

impl FootprintCircle {
    pub fn contains(&self, candidate: &PixelPoint) -> bool {
        (*candidate - self.center).norm() <= self.radius
    }
}

impl Footprint {
    /// Maps the cached pixels from calibration resolution to an image that is
    /// `current_image_height` rows tall. Scaling is uniform: there is no
    /// separate horizontal factor and no crop offset.
    ///
    /// The radius is the horizontal distance from centre to edge, matching
    /// the lateral-offset construction of the edge point. Returns `None` for
    /// a zero-height image.
    pub fn rescaled(
        &self,
        calibration_image_height: u32,
        current_image_height: u32,
    ) -> Option<FootprintCircle> {
        if current_image_height == 0 {
            return None;
        }
        let scale = calibration_image_height as f64 / current_image_height as f64;

        let center = Point2::from(self.center_px.coords / scale);
        let edge = Point2::from(self.edge_px.coords / scale);

        Some(FootprintCircle {
            center,
            radius: edge.x - center.x,
        })
    }

    /// `true` iff `candidate` lies within the rescaled footprint circle
    /// (boundary included). Pure; safe to call for every feature of every frame.
    pub fn matches(
        &self,
        candidate: &PixelPoint,
        calibration_image_height: u32,
        current_image_height: u32,
    ) -> bool {
        self.rescaled(calibration_image_height, current_image_height)
            .map_or(false, |circle| circle.contains(candidate))
    }
}

/// Among `candidates`, returns the index of the matching one closest to the
/// footprint centre, or `None` when nothing matches.
pub fn select_best_match(
    footprint: &Footprint,
    candidates: &[PixelPoint],
    calibration_image_height: u32,
    current_image_height: u32,
) -> Option<usize> {
    let circle = footprint.rescaled(calibration_image_height, current_image_height)?;

    candidates
        .iter()
        .enumerate()
        .filter(|(_, px)| circle.contains(px))
        .map(|(i, px)| (i, (*px - circle.center).norm()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Point3;

    fn footprint(center: (f64, f64), radius_px: f64) -> Footprint {
        Footprint {
            radius: 0.0,
            center_point: Point3::origin(),
            edge_point: Point3::origin(),
            center_px: Point2::new(center.0, center.1),
            edge_px: Point2::new(center.0 + radius_px, center.1),
        }
    }

    #[test]
    fn test_centre_always_matches() {
        let fp = footprint((320.0, 240.0), 10.0);
        assert!(fp.matches(&Point2::new(320.0, 240.0), 480, 480));
        assert!(fp.matches(&Point2::new(160.0, 120.0), 480, 240));
    }

    #[test]
    fn test_boundary_is_sharp() {
        let fp = footprint((320.0, 240.0), 10.0);
        let eps = 1e-6;
        assert!(fp.matches(&Point2::new(330.0 - eps, 240.0), 480, 480));
        assert!(!fp.matches(&Point2::new(330.0 + eps, 240.0), 480, 480));
        assert!(fp.matches(&Point2::new(320.0, 250.0 - eps), 480, 480));
        assert!(!fp.matches(&Point2::new(320.0, 250.0 + eps), 480, 480));
    }

    #[test]
    fn test_rescale_divides_by_height_ratio() {
        let fp = footprint((320.0, 240.0), 10.0);
        let circle = fp.rescaled(480, 240).unwrap();
        assert_abs_diff_eq!(circle.center, Point2::new(160.0, 120.0), epsilon = 1e-12);
        assert_abs_diff_eq!(circle.radius, 5.0, epsilon = 1e-12);

        let upscaled = fp.rescaled(480, 960).unwrap();
        assert_abs_diff_eq!(upscaled.radius, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rescale_invariance() {
        let fp = footprint((300.0, 200.0), 12.0);
        let candidates = [
            Point2::new(300.0, 200.0),
            Point2::new(311.0, 201.0),
            Point2::new(313.0, 200.0),
            Point2::new(290.0, 195.0),
            Point2::new(0.0, 0.0),
        ];
        for px in candidates {
            let at_calibration = fp.matches(&px, 480, 480);
            for factor in [0.25, 0.5, 2.0, 4.0] {
                let height = (480.0 * factor) as u32;
                let scaled = Point2::from(px.coords * factor);
                assert_eq!(fp.matches(&scaled, 480, height), at_calibration);
            }
        }
    }

    #[test]
    fn test_zero_height_never_matches() {
        let fp = footprint((0.0, 0.0), 10.0);
        assert!(!fp.matches(&Point2::new(0.0, 0.0), 480, 0));
    }

    #[test]
    fn test_non_finite_footprint_never_matches() {
        let fp = footprint((f64::NAN, f64::NAN), f64::NAN);
        assert!(!fp.matches(&Point2::new(0.0, 0.0), 480, 480));
    }

    #[test]
    fn test_select_best_match_prefers_nearest_to_centre() {
        let fp = footprint((100.0, 100.0), 10.0);
        let candidates = [
            Point2::new(0.0, 0.0),
            Point2::new(105.0, 100.0),
            Point2::new(101.0, 101.0),
            Point2::new(100.0, 109.0),
        ];
        assert_eq!(select_best_match(&fp, &candidates, 480, 480), Some(2));
        assert_eq!(select_best_match(&fp, &candidates[..1], 480, 480), None);
    }
}
