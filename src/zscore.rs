// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Z-score rescaling of feature vectors with offline-trained statistics.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};
use crate::features::{FEATURE_DIM, FeatureVector, fit_to_dimension};

/// Floor applied to each standard deviation before dividing.
pub const MIN_STD: f64 = 1e-6;

/// Per-dimension feature statistics.
///
/// Either array may be absent, in which case [`z_score_normalize`] passes
/// features through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormStats {
    /// Mean of each feature over the training set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_mean: Option<Vec<f64>>,
    /// Standard deviation of each feature over the training set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_std: Option<Vec<f64>>,
}

impl NormStats {
    /// Create statistics from mean and standard deviation arrays.
    #[must_use]
    pub const fn new(feature_mean: Vec<f64>, feature_std: Vec<f64>) -> Self {
        Self {
            feature_mean: Some(feature_mean),
            feature_std: Some(feature_std),
        }
    }

    /// Parse statistics from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::ParseError`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let stats: Self = serde_json::from_str(json)?;
        stats.warn_on_dimension_mismatch();
        Ok(stats)
    }

    /// Load statistics from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            FeatureError::IoError(format!("Failed to read statistics {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Whether both arrays are present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.feature_mean.is_some() && self.feature_std.is_some()
    }

    fn warn_on_dimension_mismatch(&self) {
        for (name, values) in [("feature_mean", &self.feature_mean), ("feature_std", &self.feature_std)] {
            let len = values.as_ref().map_or(FEATURE_DIM, Vec::len);
            if len != FEATURE_DIM {
                crate::warn!("{name} has {len} values, expected {FEATURE_DIM}. Missing dimensions are zero-filled.");
            }
        }
    }
}

/// Rescale features as `(x - mean) / max(std, MIN_STD)`.
///
/// Only the first `min(len(mean), len(std), 32)` dimensions are rescaled;
/// the remaining dimensions are zero. Without statistics (or with either
/// array absent) the features are returned unchanged.
///
/// # Arguments
///
/// * `features` - Feature vector to rescale.
/// * `stats` - Optional training statistics.
///
/// # Returns
///
/// * The rescaled [`FeatureVector`].
#[must_use]
pub fn z_score_normalize(features: &FeatureVector, stats: Option<&NormStats>) -> FeatureVector {
    let Some(NormStats {
        feature_mean: Some(mean),
        feature_std: Some(std),
    }) = stats
    else {
        return *features;
    };

    let scaled: Vec<f64> = features
        .iter()
        .zip(mean)
        .zip(std)
        .map(|((x, m), s)| (x - m) / s.max(MIN_STD))
        .collect();
    fit_to_dimension(&scaled)
}
