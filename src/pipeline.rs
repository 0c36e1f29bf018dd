// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pipeline configuration and per-frame processing.
//!
//! This module defines the [`PipelineConfig`] struct, which bundles the
//! optional inputs of the feature pipeline (fixed normalization parameters,
//! z-score statistics, body-part selection and weights), and the
//! [`FeaturePipeline`] that runs raw keypoints through every stage.

use ndarray::Array2;
use serde::Serialize;

use crate::features::{FEATURE_DIM, FeatureVector, extract_static_features};
use crate::keypoints::{NormalizedKeypoints, Point};
use crate::normalize::{NormalizationParams, calculate_normalization_params, normalize_keypoints};
use crate::weights::{BodyPart, WeightConfig, WeightVector, generate_dynamic_weights};
use crate::zscore::{NormStats, z_score_normalize};

/// Configuration for the feature pipeline.
///
/// It uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use pose_features::{BodyPart, NormStats, PipelineConfig};
///
/// let config = PipelineConfig::new()
///     .with_stats(NormStats::new(vec![0.0; 32], vec![1.0; 32]))
///     .with_active_parts(vec![BodyPart::LeftArm, BodyPart::Torso])
///     .with_high_weight(4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Fixed normalization parameters.
    /// If `None`, parameters are estimated from every frame.
    pub params: Option<NormalizationParams>,
    /// Z-score statistics. If `None`, no z-scored vector is produced.
    pub stats: Option<NormStats>,
    /// Body parts the exercise targets.
    pub active_parts: Vec<BodyPart>,
    /// Emphasis and suppression weights.
    pub weights: WeightConfig,
}

impl PipelineConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use fixed normalization parameters instead of estimating them per frame.
    #[must_use]
    pub const fn with_params(mut self, params: NormalizationParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the z-score statistics.
    #[must_use]
    pub fn with_stats(mut self, stats: NormStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Set the targeted body parts.
    #[must_use]
    pub fn with_active_parts(mut self, parts: Vec<BodyPart>) -> Self {
        self.active_parts = parts;
        self
    }

    /// Set the weight of targeted features.
    #[must_use]
    pub const fn with_high_weight(mut self, weight: f64) -> Self {
        self.weights.high_weight = weight;
        self
    }

    /// Set the weight of untargeted features.
    #[must_use]
    pub const fn with_low_weight(mut self, weight: f64) -> Self {
        self.weights.low_weight = weight;
        self
    }
}

/// Everything the pipeline derives from one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameFeatures {
    /// Parameters used to normalize the frame.
    pub params: NormalizationParams,
    /// Normalized keypoints.
    pub keypoints: NormalizedKeypoints,
    /// Raw 32-d feature vector.
    pub features: FeatureVector,
    /// Z-scored features, when statistics are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zscored: Option<FeatureVector>,
    /// Weight vector for the configured body parts.
    pub weights: WeightVector,
}

impl FrameFeatures {
    /// The vector to hand to the matcher: z-scored if available, raw otherwise.
    #[must_use]
    pub fn model_input(&self) -> &FeatureVector {
        self.zscored.as_ref().unwrap_or(&self.features)
    }
}

/// Stateless feature pipeline.
///
/// Holds only read-only configuration, so one pipeline can be shared across
/// threads and frames can be processed in any order.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    config: PipelineConfig,
    weights: WeightVector,
}

impl FeaturePipeline {
    /// Create a pipeline. The weight vector is computed once here.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        let weights = generate_dynamic_weights(&config.active_parts, &config.weights);
        Self { config, weights }
    }

    /// Pipeline configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Weight vector for the configured body parts.
    #[must_use]
    pub const fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// Run one frame through normalization, feature extraction and z-scoring.
    ///
    /// # Arguments
    ///
    /// * `keypoints` - Raw keypoint slots in COCO-17 order.
    ///
    /// # Returns
    ///
    /// * The [`FrameFeatures`] for the frame.
    #[must_use]
    pub fn process(&self, keypoints: &[Option<Point>]) -> FrameFeatures {
        let params = self
            .config
            .params
            .unwrap_or_else(|| calculate_normalization_params(keypoints));
        let normalized = normalize_keypoints(keypoints, Some(&params));
        let features = extract_static_features(&normalized);
        let zscored = self
            .config
            .stats
            .as_ref()
            .map(|stats| z_score_normalize(&features, Some(stats)));

        FrameFeatures {
            params,
            keypoints: normalized,
            features,
            zscored,
            weights: self.weights,
        }
    }

    /// Process many frames into an `(n_frames, 32)` matrix of model inputs.
    #[must_use]
    pub fn process_batch(&self, frames: &[Vec<Option<Point>>]) -> Array2<f64> {
        let mut out = Array2::zeros((frames.len(), FEATURE_DIM));
        for (mut row, frame) in out.rows_mut().into_iter().zip(frames) {
            let result = self.process(frame);
            for (dst, src) in row.iter_mut().zip(result.model_input()) {
                *dst = *src;
            }
        }
        out
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

/// Weighted Euclidean distance `sqrt(sum(w * (a - b)^2))`.
#[must_use]
pub fn weighted_distance(a: &FeatureVector, b: &FeatureVector, weights: &WeightVector) -> f64 {
    a.iter()
        .zip(b)
        .zip(weights)
        .map(|((x, y), w)| w * (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity of two feature vectors. Zero-norm input yields `0.0`.
#[must_use]
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
