// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Geometry primitives over 2D keypoints.
//!
//! Every function here is total: missing joints and degenerate geometry
//! produce fixed sentinel values instead of errors, so a single bad joint
//! never drops a whole frame.

use std::f64::consts::PI;

use crate::keypoints::{Joint, NormalizedKeypoints, Point, is_point_missing};

/// Guard added to the ray-length product in [`angle`].
pub const ANGLE_EPSILON: f64 = 1e-6;

/// Angle reported for a joint with no usable geometry (fully extended).
pub const NEUTRAL_ANGLE: f64 = 180.0;

/// Replacement for `+Infinity` in [`sanitize_value`]; negated for `-Infinity`.
pub const INFINITY_SENTINEL: f64 = 10.0;

/// Coordinate axis selector for relative-position features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component index into a [`Point`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

/// Calculate the angle at vertex `b` between rays `b -> a` and `b -> c`.
///
/// Uses the cosine law with [`ANGLE_EPSILON`] added to the denominator and
/// the cosine clamped to `[-1, 1]` before `acos`.
///
/// # Arguments
///
/// * `a` - End point of the first ray.
/// * `b` - Vertex.
/// * `c` - End point of the second ray.
///
/// # Returns
///
/// Angle in degrees within `[0, 180]`. Zero-length rays and non-finite
/// inputs yield [`NEUTRAL_ANGLE`].
#[must_use]
pub fn angle(a: Point, b: Point, c: Point) -> f64 {
    let ba = [a[0] - b[0], a[1] - b[1]];
    let bc = [c[0] - b[0], c[1] - b[1]];

    let norm_ba = (ba[0] * ba[0] + ba[1] * ba[1]).sqrt();
    let norm_bc = (bc[0] * bc[0] + bc[1] * bc[1]).sqrt();
    if norm_ba == 0.0 || norm_bc == 0.0 {
        return NEUTRAL_ANGLE;
    }

    let dot = ba[0] * bc[0] + ba[1] * bc[1];
    let cosine = dot / (norm_ba * norm_bc + ANGLE_EPSILON);
    if cosine.is_nan() {
        return NEUTRAL_ANGLE;
    }

    // `* 180 / PI` rather than `to_degrees()` to match the reference rounding.
    cosine.clamp(-1.0, 1.0).acos() * 180.0 / PI
}

/// Euclidean distance between two points.
///
/// Returns `0.0` when either point is missing.
#[must_use]
pub fn distance(p1: Point, p2: Point) -> f64 {
    if is_point_missing(Some(&p1)) || is_point_missing(Some(&p2)) {
        return 0.0;
    }
    let dx = p1[0] - p2[0];
    let dy = p1[1] - p2[1];
    (dx * dx + dy * dy).sqrt()
}

/// Replace non-finite values with bounded sentinels.
///
/// `NaN` becomes `0.0`, `+Infinity` becomes `10.0` and `-Infinity` becomes
/// `-10.0`. Finite values pass through unchanged.
#[must_use]
pub fn sanitize_value(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else if x == f64::INFINITY {
        INFINITY_SENTINEL
    } else if x == f64::NEG_INFINITY {
        -INFINITY_SENTINEL
    } else {
        x
    }
}

/// Angle at joint `b`, or [`NEUTRAL_ANGLE`] if any of the three joints is missing.
#[must_use]
pub fn safe_angle(kps: &NormalizedKeypoints, a: Joint, b: Joint, c: Joint) -> f64 {
    match (kps.point(a), kps.point(b), kps.point(c)) {
        (Some(pa), Some(pb), Some(pc)) => angle(pa, pb, pc),
        _ => NEUTRAL_ANGLE,
    }
}

/// Offset of `point` from `reference` along `axis`, or `0.0` if either is missing.
#[must_use]
pub fn safe_relative_pos(kps: &NormalizedKeypoints, point: Joint, reference: Joint, axis: Axis) -> f64 {
    match (kps.point(point), kps.point(reference)) {
        (Some(p), Some(r)) => p[axis.index()] - r[axis.index()],
        _ => 0.0,
    }
}

/// Distance between two named joints, or `0.0` if either is missing.
#[must_use]
pub fn safe_distance(kps: &NormalizedKeypoints, first: Joint, second: Joint) -> f64 {
    distance(kps.get(first), kps.get(second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoints::NUM_KEYPOINTS;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_angle_right_angle() {
        let deg = angle([1.0, 0.0], [0.0, 0.0], [0.0, 1.0]);
        assert!((deg - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_straight_line() {
        // The epsilon guard keeps the cosine just above -1.
        let deg = angle([-1.0, 0.0], [0.0, 0.0], [1.0, 0.0]);
        assert!(deg > 179.9 && deg <= 180.0);
    }

    #[test]
    fn test_angle_folded() {
        let deg = angle([1.0, 0.0], [0.0, 0.0], [2.0, 0.0]);
        assert!(deg < 0.2);
    }

    #[test]
    fn test_angle_degenerate() {
        let p = [3.0, 4.0];
        assert!((angle(p, p, p) - NEUTRAL_ANGLE).abs() < TOL);
        assert!((angle(p, p, [5.0, 5.0]) - NEUTRAL_ANGLE).abs() < TOL);
        assert!((angle([f64::NAN, 0.0], p, [5.0, 5.0]) - NEUTRAL_ANGLE).abs() < TOL);
    }

    #[test]
    fn test_angle_symmetric() {
        let a = [0.3, -1.2];
        let b = [0.1, 0.4];
        let c = [-2.0, 0.9];
        assert_eq!(angle(a, b, c).to_bits(), angle(c, b, a).to_bits());
    }

    #[test]
    fn test_distance() {
        assert!((distance([1.0, 1.0], [4.0, 5.0]) - 5.0).abs() < TOL);
        assert!(distance([2.0, 2.0], [2.0, 2.0]).abs() < TOL);
        assert!(distance([0.0, 0.0], [4.0, 5.0]).abs() < TOL);
        assert!(distance([4.0, 5.0], [0.0, 0.0]).abs() < TOL);
    }

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value(f64::NAN), 0.0);
        assert_eq!(sanitize_value(f64::INFINITY), 10.0);
        assert_eq!(sanitize_value(f64::NEG_INFINITY), -10.0);
        assert_eq!(sanitize_value(42.5), 42.5);
        assert_eq!(sanitize_value(-1e300), -1e300);
    }

    fn sample_keypoints() -> NormalizedKeypoints {
        let mut points = [[0.0, 0.0]; NUM_KEYPOINTS];
        points[Joint::LeftShoulder.index()] = [-0.5, -1.0];
        points[Joint::LeftElbow.index()] = [-0.5, -0.5];
        points[Joint::LeftWrist.index()] = [0.0, -0.5];
        NormalizedKeypoints::from_points(points)
    }

    #[test]
    fn test_safe_angle() {
        let kps = sample_keypoints();
        let elbow = safe_angle(&kps, Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist);
        assert!((elbow - 90.0).abs() < 1e-4);

        let missing = safe_angle(&kps, Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist);
        assert!((missing - NEUTRAL_ANGLE).abs() < TOL);
    }

    #[test]
    fn test_safe_relative_pos() {
        let kps = sample_keypoints();
        let dy = safe_relative_pos(&kps, Joint::LeftWrist, Joint::LeftShoulder, Axis::Y);
        let dx = safe_relative_pos(&kps, Joint::LeftWrist, Joint::LeftShoulder, Axis::X);
        assert!((dy - 0.5).abs() < TOL);
        assert!((dx - 0.5).abs() < TOL);
        assert!(safe_relative_pos(&kps, Joint::RightWrist, Joint::LeftShoulder, Axis::Y).abs() < TOL);
    }

    #[test]
    fn test_safe_distance() {
        let kps = sample_keypoints();
        assert!((safe_distance(&kps, Joint::LeftShoulder, Joint::LeftElbow) - 0.5).abs() < TOL);
        assert!(safe_distance(&kps, Joint::LeftShoulder, Joint::RightShoulder).abs() < TOL);
    }
}
