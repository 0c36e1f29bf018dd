// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{CompareArgs, WeightsArgs};
use crate::cli::extract::build_config;
use crate::error::{FeatureError, Result};
use crate::features::feature_names;
use crate::io::read_frames;
use crate::keypoints::Point;
use crate::pipeline::{FeaturePipeline, cosine_similarity, weighted_distance};
use crate::verbose;
use crate::weights::generate_dynamic_weights;

#[derive(Debug, Serialize)]
struct Comparison {
    weighted_distance: f64,
    cosine_similarity: f64,
    /// Features with the largest weighted squared difference, largest first.
    top_deviations: Vec<Deviation>,
}

#[derive(Debug, Serialize)]
struct Deviation {
    feature: &'static str,
    frame: f64,
    reference: f64,
    weighted_sq_diff: f64,
}

fn first_frame(path: &Path) -> Result<Vec<Option<Point>>> {
    read_frames(path)?
        .into_iter()
        .next()
        .ok_or_else(|| FeatureError::ParseError(format!("{} contains no frames", path.display())))
}

/// Score a frame against a reference pose and print the result as JSON.
///
/// # Errors
///
/// Returns an error if either frame file or the statistics file cannot be read.
pub fn run_comparison(args: &CompareArgs) -> Result<()> {
    let config = build_config(args.stats.as_deref(), &args.weights)?;
    let pipeline = FeaturePipeline::new(config);

    let frame = pipeline.process(&first_frame(&args.frame)?);
    let reference = pipeline.process(&first_frame(&args.reference)?);
    let (a, b) = (frame.model_input(), reference.model_input());
    let weights = pipeline.weights();

    let mut deviations: Vec<Deviation> = feature_names()
        .iter()
        .enumerate()
        .map(|(i, name)| Deviation {
            feature: *name,
            frame: a[i],
            reference: b[i],
            weighted_sq_diff: weights[i] * (a[i] - b[i]) * (a[i] - b[i]),
        })
        .collect();
    deviations.sort_by(|x, y| y.weighted_sq_diff.total_cmp(&x.weighted_sq_diff));
    deviations.truncate(5);

    let comparison = Comparison {
        weighted_distance: weighted_distance(a, b, weights),
        cosine_similarity: cosine_similarity(a, b),
        top_deviations: deviations,
    };
    verbose!(
        "{} vs {}: distance {:.4}",
        args.frame.display(),
        args.reference.display(),
        comparison.weighted_distance
    );
    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct WeightEntry {
    index: usize,
    feature: &'static str,
    weight: f64,
}

/// Print the weight vector for a body-part selection as a JSON array in feature order.
///
/// # Errors
///
/// Returns an error if a weight is negative or not finite, or if the output
/// cannot be serialized.
pub fn run_weights(args: &WeightsArgs) -> Result<()> {
    let weights = generate_dynamic_weights(&args.weights.parts, &args.weights.config()?);
    let entries: Vec<WeightEntry> = feature_names()
        .into_iter()
        .zip(weights)
        .enumerate()
        .map(|(index, (feature, weight))| WeightEntry { index, feature, weight })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    #[test]
    fn test_first_frame_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();
        assert!(matches!(first_frame(&path), Err(FeatureError::ParseError(_))));
    }

    #[test]
    fn test_run_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.json");
        let reference = dir.path().join("reference.json");
        fs::write(&frame, serde_json::to_string(&vec![[10.0, 20.0]; 17]).unwrap()).unwrap();
        fs::write(&reference, serde_json::to_string(&vec![[30.0, 50.0]; 17]).unwrap()).unwrap();

        let cli = Cli::parse_from([
            "app",
            "compare",
            "--frame",
            frame.to_str().unwrap(),
            "--reference",
            reference.to_str().unwrap(),
            "--parts",
            "Left_Arm",
        ]);
        match cli.command {
            Commands::Compare(args) => run_comparison(&args).unwrap(),
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_run_weights_rejects_invalid_weights() {
        let cli = Cli::parse_from(["app", "weights", "--parts", "Torso", "--high-weight=-3", "--low-weight", "NaN"]);
        match cli.command {
            Commands::Weights(args) => {
                assert!(matches!(run_weights(&args), Err(FeatureError::ConfigError(_))));
            }
            _ => panic!("expected weights"),
        }
    }

    #[test]
    fn test_run_weights() {
        let cli = Cli::parse_from(["app", "weights", "--parts", "Torso"]);
        match cli.command {
            Commands::Weights(args) => run_weights(&args).unwrap(),
            _ => panic!("expected weights"),
        }
    }
}
