// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Body-part emphasis weights for feature comparison.
//!
//! A therapist selects the body regions an exercise targets. The weight
//! vector emphasises the features of those regions and suppresses the rest,
//! while keeping the cross-body separation features partly informative.

use std::fmt;
use std::str::FromStr;

use crate::features::{
    ANKLE_SEPARATION, ELBOW_SEPARATION, FEATURE_DIM, HIP_WIDTH, KNEE_SEPARATION, SHOULDER_WIDTH,
    WRIST_SEPARATION,
};

/// Weight vector, parallel-indexed to [`crate::features::FeatureVector`].
pub type WeightVector = [f64; FEATURE_DIM];

/// Default weight for features of an active body part.
pub const DEFAULT_HIGH_WEIGHT: f64 = 5.0;

/// Default weight for features of inactive body parts.
pub const DEFAULT_LOW_WEIGHT: f64 = 0.1;

/// Minimum weight of the shoulder and hip width features.
pub const REFERENCE_WIDTH_FLOOR: f64 = 1.0;

/// Minimum weight of the wrist, elbow, knee and ankle separation features.
pub const SEPARATION_FLOOR: f64 = 0.5;

const REFERENCE_WIDTHS: [usize; 2] = [SHOULDER_WIDTH, HIP_WIDTH];
const SEPARATIONS: [usize; 4] = [WRIST_SEPARATION, ELBOW_SEPARATION, KNEE_SEPARATION, ANKLE_SEPARATION];

/// A selectable body region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    LeftArm,
    RightArm,
    Torso,
    LeftLeg,
    RightLeg,
}

impl BodyPart {
    /// All body parts.
    pub const ALL: [Self; 5] = [Self::LeftArm, Self::RightArm, Self::Torso, Self::LeftLeg, Self::RightLeg];

    /// Label used by the exercise editor.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LeftArm => "Left_Arm",
            Self::RightArm => "Right_Arm",
            Self::Torso => "Torso",
            Self::LeftLeg => "Left_Leg",
            Self::RightLeg => "Right_Leg",
        }
    }

    /// Feature indices emphasised when this part is active.
    #[must_use]
    pub const fn feature_indices(&self) -> &'static [usize] {
        match self {
            Self::LeftArm => &[0, 1, 10, 11, 18, 19],
            Self::RightArm => &[2, 3, 12, 13, 20, 21],
            Self::Torso => &[8, 9, 29],
            Self::LeftLeg => &[4, 5, 14, 15, 22, 23],
            Self::RightLeg => &[6, 7, 16, 17, 24, 25],
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyPart {
    type Err = BodyPartParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "left_arm" => Ok(Self::LeftArm),
            "right_arm" => Ok(Self::RightArm),
            "torso" => Ok(Self::Torso),
            "left_leg" => Ok(Self::LeftLeg),
            "right_leg" => Ok(Self::RightLeg),
            _ => Err(BodyPartParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown body-part label.
#[derive(Debug, Clone)]
pub struct BodyPartParseError(String);

impl fmt::Display for BodyPartParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid body part '{}', expected one of: Left_Arm, Right_Arm, Torso, Left_Leg, Right_Leg",
            self.0
        )
    }
}

impl std::error::Error for BodyPartParseError {}

/// Emphasis and suppression weights.
///
/// # Example
///
/// ```rust
/// use pose_features::WeightConfig;
///
/// let config = WeightConfig::new().with_high(4.0).with_low(0.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightConfig {
    /// Weight of features belonging to an active part.
    pub high_weight: f64,
    /// Weight of every other feature.
    pub low_weight: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            high_weight: DEFAULT_HIGH_WEIGHT,
            low_weight: DEFAULT_LOW_WEIGHT,
        }
    }
}

impl WeightConfig {
    /// Create a configuration with the default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight of active-part features.
    #[must_use]
    pub const fn with_high(mut self, weight: f64) -> Self {
        self.high_weight = weight;
        self
    }

    /// Set the weight of inactive features.
    #[must_use]
    pub const fn with_low(mut self, weight: f64) -> Self {
        self.low_weight = weight;
        self
    }
}

/// Build the weight vector for a selection of body parts.
///
/// With no active parts every weight is `1.0`. Otherwise every feature
/// starts at the low weight and the features of each active part are set to
/// the high weight. Afterwards, shoulder and hip width are raised to at least
/// `1.0` and the wrist, elbow, knee and ankle separations to at least `0.5`,
/// if they were left at the low weight.
///
/// # Arguments
///
/// * `active_parts` - Selected body parts. Duplicates are harmless.
/// * `config` - High and low weights.
///
/// # Returns
///
/// * The [`WeightVector`].
#[must_use]
#[allow(clippy::float_cmp)]
pub fn generate_dynamic_weights(active_parts: &[BodyPart], config: &WeightConfig) -> WeightVector {
    if active_parts.is_empty() {
        return [1.0; FEATURE_DIM];
    }

    let mut weights = [config.low_weight; FEATURE_DIM];
    for part in active_parts {
        for &idx in part.feature_indices() {
            weights[idx] = config.high_weight;
        }
    }

    // Only entries still at the low weight are raised.
    for (indices, floor) in [
        (&REFERENCE_WIDTHS[..], REFERENCE_WIDTH_FLOOR),
        (&SEPARATIONS[..], SEPARATION_FLOOR),
    ] {
        for &idx in indices {
            if weights[idx] == config.low_weight {
                weights[idx] = weights[idx].max(floor);
            }
        }
    }

    weights
}

/// Build the weight vector from free-form labels.
///
/// Unknown labels are skipped. If no label is recognised the result is the
/// neutral all-ones vector.
#[must_use]
pub fn generate_dynamic_weights_from_labels<S: AsRef<str>>(labels: &[S], config: &WeightConfig) -> WeightVector {
    let parts: Vec<BodyPart> = labels
        .iter()
        .filter_map(|label| match label.as_ref().parse::<BodyPart>() {
            Ok(part) => Some(part),
            Err(e) => {
                crate::verbose!("Skipping {e}");
                None
            }
        })
        .collect();
    generate_dynamic_weights(&parts, config)
}
