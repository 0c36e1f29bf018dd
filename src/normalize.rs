// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Body-frame normalization of raw COCO-17 keypoints.
//!
//! A pose is re-centred on a root point (hip centre, falling back to the
//! shoulder centre) and divided by a body-size scale (shoulder width,
//! falling back to hip width). The fallback order differs between root and
//! scale and must stay that way: every downstream feature depends on it.

use serde::{Deserialize, Serialize};

use crate::keypoints::{Joint, NUM_KEYPOINTS, NormalizedKeypoints, Point, is_point_missing};

/// Lower bound for the normalization scale.
pub const MIN_SCALE: f64 = 20.0;

/// Upper bound for the normalization scale.
pub const MAX_SCALE: f64 = 500.0;

/// Scale used when neither shoulders nor hips are available.
pub const DEFAULT_SCALE: f64 = 100.0;

/// Origin and divisor applied to raw keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    /// Coordinate-space origin the body is re-centred on.
    pub root: Point,
    /// Body-size divisor, always within `[MIN_SCALE, MAX_SCALE]` when estimated.
    pub scale: f64,
}

impl Default for NormalizationParams {
    fn default() -> Self {
        Self {
            root: [0.0, 0.0],
            scale: DEFAULT_SCALE,
        }
    }
}

fn valid_point(keypoints: &[Option<Point>], joint: Joint) -> Option<Point> {
    let point = keypoints.get(joint.index()).copied().flatten();
    (!is_point_missing(point.as_ref())).then_some(point).flatten()
}

fn midpoint(a: Point, b: Point) -> Point {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

fn euclidean(a: Point, b: Point) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Estimate the root point and scale of a raw COCO-17 pose.
///
/// Root is the hip midpoint when both hips are valid, else the shoulder
/// midpoint when both shoulders are valid, else `[0, 0]`. Scale is the
/// shoulder width when both shoulders are valid, else the hip width when
/// both hips are valid, else [`DEFAULT_SCALE`]. The scale is always clamped
/// to `[MIN_SCALE, MAX_SCALE]`.
///
/// # Arguments
///
/// * `keypoints` - Raw keypoint slots in COCO-17 order. Slots beyond the end
///   of a short slice count as missing.
///
/// # Returns
///
/// * The estimated [`NormalizationParams`].
#[must_use]
pub fn calculate_normalization_params(keypoints: &[Option<Point>]) -> NormalizationParams {
    let left_shoulder = valid_point(keypoints, Joint::LeftShoulder);
    let right_shoulder = valid_point(keypoints, Joint::RightShoulder);
    let left_hip = valid_point(keypoints, Joint::LeftHip);
    let right_hip = valid_point(keypoints, Joint::RightHip);

    let root = match (left_hip, right_hip, left_shoulder, right_shoulder) {
        (Some(lh), Some(rh), _, _) => midpoint(lh, rh),
        (_, _, Some(ls), Some(rs)) => midpoint(ls, rs),
        _ => [0.0, 0.0],
    };

    let scale = match (left_shoulder, right_shoulder, left_hip, right_hip) {
        (Some(ls), Some(rs), _, _) => euclidean(ls, rs),
        (_, _, Some(lh), Some(rh)) => euclidean(lh, rh),
        _ => DEFAULT_SCALE,
    };

    NormalizationParams {
        root,
        scale: clamp_scale(scale),
    }
}

/// Clamp a scale into `[MIN_SCALE, MAX_SCALE]`. `NaN` falls back to [`DEFAULT_SCALE`].
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        DEFAULT_SCALE
    } else {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    }
}

/// Map raw keypoints into the body frame.
///
/// Each present slot becomes `(raw - root) / scale`; absent or malformed
/// slots become `[0.0, 0.0]`. If the slice does not hold exactly 17 slots,
/// every joint maps to `[0.0, 0.0]`.
///
/// # Arguments
///
/// * `keypoints` - Raw keypoint slots in COCO-17 order.
/// * `params` - Normalization parameters. Estimated with
///   [`calculate_normalization_params`] when `None`.
///
/// # Returns
///
/// * A [`NormalizedKeypoints`] map holding all 17 joints.
#[must_use]
pub fn normalize_keypoints(
    keypoints: &[Option<Point>],
    params: Option<&NormalizationParams>,
) -> NormalizedKeypoints {
    if keypoints.len() != NUM_KEYPOINTS {
        crate::verbose!(
            "Expected {NUM_KEYPOINTS} keypoints, got {}. Using an all-zero pose.",
            keypoints.len()
        );
        return NormalizedKeypoints::zeros();
    }

    let params = params.copied().unwrap_or_else(|| calculate_normalization_params(keypoints));
    let [root_x, root_y] = params.root;

    let mut points = [[0.0, 0.0]; NUM_KEYPOINTS];
    for (out, raw) in points.iter_mut().zip(keypoints) {
        if let Some([x, y]) = raw {
            *out = [(x - root_x) / params.scale, (y - root_y) / params.scale];
        }
    }
    NormalizedKeypoints::from_points(points)
}
