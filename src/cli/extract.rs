// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::io::{self, Write};
use std::time::Instant;

use crate::batch::BatchProcessor;
use crate::cli::args::{ExtractArgs, OutputFormat, WeightArgs};
use crate::error::Result;
use crate::features::FeatureVector;
use crate::io::{FrameRecord, create_output, read_frames, write_csv, write_json};
use crate::keypoints::{NUM_KEYPOINTS, SKELETON};
use crate::pipeline::{FeaturePipeline, FrameFeatures, PipelineConfig};
use crate::zscore::NormStats;
use crate::{VERSION, section, success, verbose, warn};

/// Build the pipeline configuration shared by the extract and compare commands.
///
/// # Errors
///
/// Returns an error if a weight is negative or not finite, or if the
/// statistics file cannot be loaded.
pub fn build_config(stats: Option<&std::path::Path>, weights: &WeightArgs) -> Result<PipelineConfig> {
    let weight_config = weights.config()?;
    let mut config = PipelineConfig::new()
        .with_active_parts(weights.parts.clone())
        .with_high_weight(weight_config.high_weight)
        .with_low_weight(weight_config.low_weight);

    if let Some(path) = stats {
        let stats = NormStats::load(path)?;
        if !stats.is_complete() {
            warn!(
                "{} lacks feature_mean or feature_std. Features will not be z-scored.",
                path.display()
            );
        }
        config = config.with_stats(stats);
    }
    Ok(config)
}

/// Run feature extraction over a frame file.
///
/// # Errors
///
/// Returns an error if the input, statistics or output file cannot be read or written.
pub fn run_extraction(args: &ExtractArgs) -> Result<()> {
    section!("pose-features {VERSION} 🚀");

    let config = build_config(args.stats.as_deref(), &args.weights)?;
    let frames = read_frames(&args.input)?;
    verbose!(
        "{}: {} from {}",
        args.input.display(),
        count_label(frames.len(), "frame"),
        if config.stats.is_some() { "z-scored" } else { "raw" }
    );
    if frames.is_empty() {
        warn!("No frames found in {}", args.input.display());
    }

    let pipeline = FeaturePipeline::new(config);
    let start = Instant::now();

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(create_output(path)?),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Json => {
            let results: Vec<FrameFeatures> = frames.iter().map(|f| pipeline.process(f)).collect();
            for (i, (frame, result)) in frames.iter().zip(&results).enumerate() {
                verbose!("frame {}/{}: {}", i + 1, frames.len(), format_frame_summary(frame.len(), result));
            }
            let records: Vec<FrameRecord<'_>> = results
                .iter()
                .enumerate()
                .map(|(frame, result)| FrameRecord { frame, result })
                .collect();
            write_json(writer, &records)?;
        }
        OutputFormat::Csv => {
            let mut rows: Vec<FeatureVector> = Vec::with_capacity(frames.len());
            {
                let mut processor = BatchProcessor::new(&pipeline, args.batch, |matrix, labels, offset| {
                    verbose!("batch at frame {offset}: {}", count_label(labels.len(), "frame"));
                    for row in matrix.rows() {
                        let mut features = [0.0; crate::features::FEATURE_DIM];
                        for (dst, src) in features.iter_mut().zip(row.iter()) {
                            *dst = *src;
                        }
                        rows.push(features);
                    }
                });
                for (i, frame) in frames.into_iter().enumerate() {
                    processor.add(frame, format!("frame {i}"));
                }
                processor.flush();
            }
            write_csv(writer, &rows)?;
        }
    }

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if let Some(path) = &args.output {
        success!("Features saved to {}", path.display());
    }
    verbose!("Speed: {elapsed_ms:.2}ms total");
    Ok(())
}

/// Describe a processed frame, e.g. "15/17 keypoints, 17 limbs, scale 92.4".
fn format_frame_summary(raw_len: usize, result: &FrameFeatures) -> String {
    if raw_len != NUM_KEYPOINTS {
        return format!("{raw_len} keypoints (expected {NUM_KEYPOINTS}), skipped");
    }
    format!(
        "{}/{NUM_KEYPOINTS} keypoints, {}/{} limbs, scale {:.1}",
        result.keypoints.visible_count(),
        result.keypoints.visible_limbs(),
        SKELETON.len(),
        result.params.scale
    )
}

/// Format a count with its noun, e.g. "1 frame", "3 frames".
fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
