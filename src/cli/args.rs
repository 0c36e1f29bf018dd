// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::{FeatureError, Result};
use crate::weights::{BodyPart, DEFAULT_HIGH_WEIGHT, DEFAULT_LOW_WEIGHT, WeightConfig};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Examples:
    pose-features extract --input frames.jsonl
    pose-features extract -i frames.json --stats stats.json --parts Left_Arm,Torso
    pose-features extract -i frames.jsonl --format csv --output runs/features.csv
    pose-features weights --parts Left_Leg,Right_Leg --high-weight 4
    pose-features compare --frame live.json --reference target.json --parts Right_Arm"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract 32-d pose features from keypoint frames
    Extract(ExtractArgs),
    /// Print the weight vector for a body-part selection
    Weights(WeightsArgs),
    /// Compare a frame against a reference pose
    Compare(CompareArgs),
}

/// Output encoding for extracted features.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON object per frame with params, keypoints, features and weights
    #[default]
    Json,
    /// One CSV row of model-input features per frame
    Csv,
}

/// Body-part selection and emphasis weights.
#[derive(Args, Debug, Clone)]
pub struct WeightArgs {
    /// Targeted body parts (Left_Arm, Right_Arm, Torso, Left_Leg, Right_Leg)
    #[arg(short, long, value_delimiter = ',')]
    pub parts: Vec<BodyPart>,

    /// Weight of features belonging to a targeted part
    #[arg(long, default_value_t = DEFAULT_HIGH_WEIGHT)]
    pub high_weight: f64,

    /// Weight of all other features
    #[arg(long, default_value_t = DEFAULT_LOW_WEIGHT)]
    pub low_weight: f64,
}

impl WeightArgs {
    /// Validated weight configuration described by these arguments.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::ConfigError`] if either weight is negative or not finite.
    pub fn config(&self) -> Result<WeightConfig> {
        for (flag, value) in [("--high-weight", self.high_weight), ("--low-weight", self.low_weight)] {
            if !value.is_finite() || value < 0.0 {
                return Err(FeatureError::ConfigError(format!(
                    "{flag} must be a finite, non-negative number, got {value}"
                )));
            }
        }
        Ok(WeightConfig {
            high_weight: self.high_weight,
            low_weight: self.low_weight,
        })
    }
}

/// Arguments for the extract command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Keypoint frames (.json with one frame or an array of frames, or .jsonl)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Z-score statistics file with feature_mean and feature_std
    #[arg(long)]
    pub stats: Option<PathBuf>,

    #[command(flatten)]
    pub weights: WeightArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Frames per batch for CSV output
    #[arg(long, default_value_t = 64)]
    pub batch: usize,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Arguments for the weights command.
#[derive(Args, Debug)]
pub struct WeightsArgs {
    #[command(flatten)]
    pub weights: WeightArgs,
}

/// Arguments for the compare command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Frame to score (first frame of the file is used)
    #[arg(long)]
    pub frame: PathBuf,

    /// Reference pose (first frame of the file is used)
    #[arg(long)]
    pub reference: PathBuf,

    /// Z-score statistics file with feature_mean and feature_std
    #[arg(long)]
    pub stats: Option<PathBuf>,

    #[command(flatten)]
    pub weights: WeightArgs,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}
