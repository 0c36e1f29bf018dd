// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! COCO-17 keypoint layout and keypoint containers.
//!
//! Raw detector output arrives as 17 positional `[x, y]` slots. This module
//! names those slots ([`Joint`]), converts loosely shaped input into typed
//! slots ([`parse_raw_points`]), and holds the normalized, name-addressable
//! map produced by [`crate::normalize::normalize_keypoints`].

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A 2D point `[x, y]`.
pub type Point = [f64; 2];

/// Number of keypoints in the COCO-17 layout.
pub const NUM_KEYPOINTS: usize = 17;

/// Coordinates within this distance of the origin on both axes mark an undetected joint.
pub const MISSING_EPSILON: f64 = 1e-6;

/// Canonical joint names in COCO-17 order.
pub const KEYPOINT_NAMES: [&str; NUM_KEYPOINTS] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// COCO-Pose skeleton structure (pairs of keypoint indices)
pub const SKELETON: [[usize; 2]; 19] = [
    [15, 13], // left ankle to left knee
    [13, 11], // left knee to left hip
    [16, 14], // right ankle to right knee
    [14, 12], // right knee to right hip
    [11, 12], // left hip to right hip
    [5, 11],  // left shoulder to left hip
    [6, 12],  // right shoulder to right hip
    [5, 6],   // left shoulder to right shoulder
    [5, 7],   // left shoulder to left elbow
    [6, 8],   // right shoulder to right elbow
    [7, 9],   // left elbow to left wrist
    [8, 10],  // right elbow to right wrist
    [1, 2],   // left eye to right eye
    [0, 1],   // nose to left eye
    [0, 2],   // nose to right eye
    [1, 3],   // left eye to left ear
    [2, 4],   // right eye to right ear
    [3, 5],   // left ear to left shoulder
    [4, 6],   // right ear to right shoulder
];

/// A joint of the COCO-17 body layout.
///
/// The discriminant is the joint's position in a raw detector array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Joint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl Joint {
    /// All joints in COCO-17 order.
    pub const ALL: [Self; NUM_KEYPOINTS] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Position of this joint in a raw COCO-17 array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        KEYPOINT_NAMES[self as usize]
    }

    /// Joint at a raw array position, if the position is inside the layout.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Joint {
    type Err = JointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEYPOINT_NAMES
            .iter()
            .position(|name| *name == s)
            .and_then(Self::from_index)
            .ok_or_else(|| JointParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown joint name.
#[derive(Debug, Clone)]
pub struct JointParseError(String);

impl fmt::Display for JointParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown joint '{}', expected a COCO-17 keypoint name", self.0)
    }
}

impl std::error::Error for JointParseError {}

/// Whether a point is absent or sits on the "not detected" origin sentinel.
///
/// A genuine detection at exactly `(0, 0)` is indistinguishable from the
/// sentinel and is treated as missing.
#[must_use]
pub fn is_point_missing(point: Option<&Point>) -> bool {
    point.is_none_or(|p| p[0].abs() < MISSING_EPSILON && p[1].abs() < MISSING_EPSILON)
}

/// Convert loosely shaped points into typed raw keypoint slots.
///
/// `None` entries stay `None`; entries that do not have exactly two
/// coordinates become `None`. The number of slots is preserved, so a
/// wrong-length frame is still detected downstream.
#[must_use]
pub fn parse_raw_points(points: Vec<Option<Vec<f64>>>) -> Vec<Option<Point>> {
    points
        .into_iter()
        .map(|p| match p.as_deref() {
            Some(&[x, y]) => Some([x, y]),
            _ => None,
        })
        .collect()
}

/// Keypoints re-centred on the body root and divided by the body scale.
///
/// Always holds exactly one point per COCO-17 joint. A raw slot that was
/// absent or malformed maps to `[0.0, 0.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedKeypoints {
    points: [Point; NUM_KEYPOINTS],
}

impl NormalizedKeypoints {
    /// Map with every joint at the origin.
    #[must_use]
    pub const fn zeros() -> Self {
        Self {
            points: [[0.0, 0.0]; NUM_KEYPOINTS],
        }
    }

    /// Build from points already in COCO-17 order.
    #[must_use]
    pub const fn from_points(points: [Point; NUM_KEYPOINTS]) -> Self {
        Self { points }
    }

    /// Stored coordinates of a joint.
    #[must_use]
    pub const fn get(&self, joint: Joint) -> Point {
        self.points[joint as usize]
    }

    /// Coordinates of a joint, or `None` if the joint counts as missing.
    #[must_use]
    pub fn point(&self, joint: Joint) -> Option<Point> {
        let p = self.get(joint);
        (!is_point_missing(Some(&p))).then_some(p)
    }

    /// Number of joints that are not missing.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        Joint::ALL.iter().filter(|j| self.point(**j).is_some()).count()
    }

    /// Number of skeleton limbs whose two end joints are both present.
    #[must_use]
    pub fn visible_limbs(&self) -> usize {
        SKELETON
            .iter()
            .filter(|[a, b]| {
                !is_point_missing(Some(&self.points[*a])) && !is_point_missing(Some(&self.points[*b]))
            })
            .count()
    }

    /// Iterate `(joint, point)` pairs in COCO-17 order.
    pub fn iter(&self) -> impl Iterator<Item = (Joint, Point)> + '_ {
        Joint::ALL.iter().map(|j| (*j, self.get(*j)))
    }
}

impl Default for NormalizedKeypoints {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Serialize for NormalizedKeypoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_KEYPOINTS))?;
        for (joint, point) in self.iter() {
            map.serialize_entry(joint.as_str(), &point)?;
        }
        map.end()
    }
}
