// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Pose Features
//!
//! Scale- and translation-invariant feature extraction for 2D human poses,
//! used to score and match physiotherapy exercise form.
//!
//! A pose detector produces 17 `[x, y]` keypoints per frame in COCO-17
//! order. This library turns each frame into a fixed 32-dimensional feature
//! vector (joint angles, relative limb positions and cross-body distances)
//! that a downstream matcher compares against a reference exercise. The
//! vector's layout is a contract with that matcher: the same input always
//! yields the same 32 numbers.
//!
//! ## Pipeline
//!
//! ```text
//! raw keypoints ─► NormalizationParams ─► NormalizedKeypoints ─► FeatureVector ─► z-scored FeatureVector
//! body parts ───────────────────────────────────────────────────► WeightVector
//! ```
//!
//! Every stage is a pure function. Missing joints and degenerate geometry
//! produce documented sentinel values (`180.0` for angles, `0.0` for
//! positions and distances) instead of errors, and every output value is
//! finite.
//!
//! ## Quick Start
//!
//! ```rust
//! use pose_features::{BodyPart, FeaturePipeline, PipelineConfig};
//!
//! let mut frame = vec![Some([0.0, 0.0]); 17];
//! frame[5] = Some([100.0, 100.0]); // left shoulder
//! frame[6] = Some([200.0, 100.0]); // right shoulder
//! frame[11] = Some([120.0, 300.0]); // left hip
//! frame[12] = Some([180.0, 300.0]); // right hip
//!
//! let pipeline = FeaturePipeline::new(
//!     PipelineConfig::new().with_active_parts(vec![BodyPart::LeftArm]),
//! );
//! let result = pipeline.process(&frame);
//!
//! assert_eq!(result.params.root, [150.0, 300.0]);
//! assert!((result.features[28] - 1.0).abs() < 1e-12); // shoulder width
//! assert_eq!(result.weights[0], 5.0);
//! ```
//!
//! The individual stages are available as free functions:
//!
//! ```rust
//! use pose_features::{
//!     calculate_normalization_params, extract_static_features, normalize_keypoints,
//!     z_score_normalize, NormStats,
//! };
//!
//! let frame = vec![Some([10.0, 20.0]); 17];
//! let params = calculate_normalization_params(&frame);
//! let normalized = normalize_keypoints(&frame, Some(&params));
//! let features = extract_static_features(&normalized);
//!
//! let stats = NormStats::new(vec![0.0; 32], vec![1.0; 32]);
//! let zscored = z_score_normalize(&features, Some(&stats));
//! assert_eq!(zscored, features);
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Features for every frame of a JSON Lines file
//! pose-features extract --input frames.jsonl
//!
//! # Z-scored features emphasising the left arm, as CSV
//! pose-features extract -i frames.jsonl --stats stats.json --parts Left_Arm --format csv
//!
//! # Weight vector for a body-part selection
//! pose-features weights --parts Left_Leg,Right_Leg
//!
//! # Weighted distance between a live frame and a reference pose
//! pose-features compare --frame live.json --reference target.json --parts Right_Arm
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`keypoints`] | COCO-17 [`Joint`] layout and [`NormalizedKeypoints`] |
//! | [`geometry`] | Angle, distance and sanitization primitives |
//! | [`normalize`] | Root/scale estimation and keypoint normalization |
//! | [`features`] | The 32-entry [`FEATURE_LAYOUT`] and extractor |
//! | [`zscore`] | Z-score rescaling with [`NormStats`] |
//! | [`weights`] | [`BodyPart`] emphasis weights |
//! | [`pipeline`] | [`PipelineConfig`] and [`FeaturePipeline`] |
//! | [`batch`] | Batched extraction into `ndarray` matrices |
//! | [`io`] | Frame file parsing and feature output |
//! | [`error`] | Error types ([`FeatureError`], [`Result`]) |

// Modules
pub mod batch;
pub mod cli;
pub mod error;
pub mod features;
pub mod geometry;
pub mod io;
pub mod keypoints;
pub mod normalize;
pub mod pipeline;
pub mod weights;
pub mod zscore;

// Re-export main types for convenience
pub use error::{FeatureError, Result};
pub use features::{FEATURE_DIM, FEATURE_LAYOUT, FeatureVector, extract_static_features};
pub use geometry::{angle, distance, sanitize_value};
pub use keypoints::{Joint, NUM_KEYPOINTS, NormalizedKeypoints, Point, is_point_missing};
pub use normalize::{NormalizationParams, calculate_normalization_params, normalize_keypoints};
pub use pipeline::{FeaturePipeline, FrameFeatures, PipelineConfig};
pub use weights::{BodyPart, WeightConfig, WeightVector, generate_dynamic_weights};
pub use zscore::{NormStats, z_score_normalize};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
