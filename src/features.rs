// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Static 32-dimensional pose features.
//!
//! The layout below is the exchange format with the downstream form-scoring
//! model. Entries are never reordered, inserted or removed independently of
//! that model.
//!
//! | Indices | Kind | Content |
//! |---------|------|---------|
//! | 0-9     | angle (degrees) | shoulder, elbow, hip and knee flexion; torso tilt and lean |
//! | 10-17   | relative y | wrists, elbows, knees and ankles against their shoulder/hip |
//! | 18-25   | relative x | same pairs as 10-17 on the x axis |
//! | 26-31   | distance | left/right separation of wrists, elbows, shoulders, hips, knees, ankles |

use crate::geometry::{Axis, safe_angle, safe_distance, safe_relative_pos, sanitize_value};
use crate::keypoints::{Joint, NormalizedKeypoints};

use FeatureKind::{Angle, Distance, Relative};
use Joint::{
    LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle, RightElbow, RightHip,
    RightKnee, RightShoulder, RightWrist,
};

/// Number of features per frame.
pub const FEATURE_DIM: usize = 32;

/// Fixed-length pose feature vector.
pub type FeatureVector = [f64; FEATURE_DIM];

/// Index of the wrist separation feature.
pub const WRIST_SEPARATION: usize = 26;
/// Index of the elbow separation feature.
pub const ELBOW_SEPARATION: usize = 27;
/// Index of the shoulder width feature.
pub const SHOULDER_WIDTH: usize = 28;
/// Index of the hip width feature.
pub const HIP_WIDTH: usize = 29;
/// Index of the knee separation feature.
pub const KNEE_SEPARATION: usize = 30;
/// Index of the ankle separation feature.
pub const ANKLE_SEPARATION: usize = 31;

/// How a single feature is computed from the normalized keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Angle at the middle joint, in degrees.
    Angle(Joint, Joint, Joint),
    /// Offset of the first joint from the second along an axis.
    Relative(Joint, Joint, Axis),
    /// Distance between two joints.
    Distance(Joint, Joint),
}

/// A named entry of the feature layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    /// Stable feature name, used as a column header.
    pub name: &'static str,
    /// Computation rule.
    pub kind: FeatureKind,
}

impl FeatureSpec {
    const fn new(name: &'static str, kind: FeatureKind) -> Self {
        Self { name, kind }
    }

    /// Evaluate this feature on a normalized pose, before sanitization.
    #[must_use]
    pub fn evaluate(&self, kps: &NormalizedKeypoints) -> f64 {
        match self.kind {
            FeatureKind::Angle(a, b, c) => safe_angle(kps, a, b, c),
            FeatureKind::Relative(point, reference, axis) => safe_relative_pos(kps, point, reference, axis),
            FeatureKind::Distance(a, b) => safe_distance(kps, a, b),
        }
    }
}

/// The feature layout, in output order.
pub static FEATURE_LAYOUT: [FeatureSpec; FEATURE_DIM] = [
    FeatureSpec::new("left_shoulder_flexion", Angle(LeftElbow, LeftShoulder, LeftWrist)),
    FeatureSpec::new("left_elbow_flexion", Angle(LeftShoulder, LeftElbow, LeftWrist)),
    FeatureSpec::new("right_shoulder_flexion", Angle(RightElbow, RightShoulder, RightWrist)),
    FeatureSpec::new("right_elbow_flexion", Angle(RightShoulder, RightElbow, RightWrist)),
    FeatureSpec::new("left_hip_flexion", Angle(LeftKnee, LeftHip, LeftAnkle)),
    FeatureSpec::new("left_knee_flexion", Angle(LeftHip, LeftKnee, LeftAnkle)),
    FeatureSpec::new("right_hip_flexion", Angle(RightKnee, RightHip, RightAnkle)),
    FeatureSpec::new("right_knee_flexion", Angle(RightHip, RightKnee, RightAnkle)),
    FeatureSpec::new("torso_tilt", Angle(LeftShoulder, LeftHip, RightHip)),
    FeatureSpec::new("torso_lean", Angle(LeftHip, LeftShoulder, RightShoulder)),
    FeatureSpec::new("left_wrist_rel_y", Relative(LeftWrist, LeftShoulder, Axis::Y)),
    FeatureSpec::new("left_elbow_rel_y", Relative(LeftElbow, LeftShoulder, Axis::Y)),
    FeatureSpec::new("right_wrist_rel_y", Relative(RightWrist, RightShoulder, Axis::Y)),
    FeatureSpec::new("right_elbow_rel_y", Relative(RightElbow, RightShoulder, Axis::Y)),
    FeatureSpec::new("left_knee_rel_y", Relative(LeftKnee, LeftHip, Axis::Y)),
    FeatureSpec::new("left_ankle_rel_y", Relative(LeftAnkle, LeftHip, Axis::Y)),
    FeatureSpec::new("right_knee_rel_y", Relative(RightKnee, RightHip, Axis::Y)),
    FeatureSpec::new("right_ankle_rel_y", Relative(RightAnkle, RightHip, Axis::Y)),
    FeatureSpec::new("left_wrist_rel_x", Relative(LeftWrist, LeftShoulder, Axis::X)),
    FeatureSpec::new("left_elbow_rel_x", Relative(LeftElbow, LeftShoulder, Axis::X)),
    FeatureSpec::new("right_wrist_rel_x", Relative(RightWrist, RightShoulder, Axis::X)),
    FeatureSpec::new("right_elbow_rel_x", Relative(RightElbow, RightShoulder, Axis::X)),
    FeatureSpec::new("left_knee_rel_x", Relative(LeftKnee, LeftHip, Axis::X)),
    FeatureSpec::new("left_ankle_rel_x", Relative(LeftAnkle, LeftHip, Axis::X)),
    FeatureSpec::new("right_knee_rel_x", Relative(RightKnee, RightHip, Axis::X)),
    FeatureSpec::new("right_ankle_rel_x", Relative(RightAnkle, RightHip, Axis::X)),
    FeatureSpec::new("wrist_separation", Distance(LeftWrist, RightWrist)),
    FeatureSpec::new("elbow_separation", Distance(LeftElbow, RightElbow)),
    FeatureSpec::new("shoulder_width", Distance(LeftShoulder, RightShoulder)),
    FeatureSpec::new("hip_width", Distance(LeftHip, RightHip)),
    FeatureSpec::new("knee_separation", Distance(LeftKnee, RightKnee)),
    FeatureSpec::new("ankle_separation", Distance(LeftAnkle, RightAnkle)),
];

/// Feature names in output order.
#[must_use]
pub fn feature_names() -> [&'static str; FEATURE_DIM] {
    FEATURE_LAYOUT.map(|spec| spec.name)
}

/// Extract the 32 static features from a normalized pose.
///
/// Every value passes through [`sanitize_value`], so the result is always finite.
///
/// # Arguments
///
/// * `kps` - Normalized keypoints.
///
/// # Returns
///
/// * The [`FeatureVector`] in [`FEATURE_LAYOUT`] order.
#[must_use]
pub fn extract_static_features(kps: &NormalizedKeypoints) -> FeatureVector {
    FEATURE_LAYOUT.map(|spec| sanitize_value(spec.evaluate(kps)))
}

/// Pad with `0.0` or truncate a slice to exactly [`FEATURE_DIM`] values.
#[must_use]
pub fn fit_to_dimension(values: &[f64]) -> FeatureVector {
    let mut out = [0.0; FEATURE_DIM];
    for (o, v) in out.iter_mut().zip(values) {
        *o = *v;
    }
    out
}
