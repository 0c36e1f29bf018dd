// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Batch processing module.
//!
//! This module provides the [`BatchProcessor`] struct, which buffers frames
//! and runs them through the feature pipeline as one `(n, 32)` matrix.

use ndarray::Array2;

use crate::keypoints::Point;
use crate::pipeline::FeaturePipeline;

/// A processor for handling batched feature extraction.
///
/// This struct collects frames into batches, runs the pipeline on each full
/// batch, and invokes a callback with the feature matrix.
///
/// # Example
///
/// ```rust
/// use pose_features::{FeaturePipeline, batch::BatchProcessor};
///
/// let pipeline = FeaturePipeline::default();
/// let mut processor = BatchProcessor::new(&pipeline, 8, |matrix, labels, offset| {
///     println!("frames {offset}..{}: {} rows", offset + labels.len(), matrix.nrows());
/// });
///
/// processor.add(vec![None; 17], "frame-0".to_string());
/// processor.flush();
/// ```
pub struct BatchProcessor<'a, F>
where
    F: FnMut(Array2<f64>, &[String], usize),
{
    pipeline: &'a FeaturePipeline,
    batch_size: usize,
    frames: Vec<Vec<Option<Point>>>,
    labels: Vec<String>,
    callback: F,
    frame_count: usize,
}

impl<'a, F> BatchProcessor<'a, F>
where
    F: FnMut(Array2<f64>, &[String], usize),
{
    /// Create a new `BatchProcessor`.
    ///
    /// # Arguments
    ///
    /// * `pipeline` - The feature pipeline to run.
    /// * `batch_size` - Frames per batch. `0` is treated as `1`.
    /// * `callback` - A closure receiving the feature matrix, the frame labels and the
    ///   index of the first frame in the batch.
    pub fn new(pipeline: &'a FeaturePipeline, batch_size: usize, callback: F) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            pipeline,
            batch_size,
            frames: Vec::with_capacity(batch_size),
            labels: Vec::with_capacity(batch_size),
            callback,
            frame_count: 0,
        }
    }

    /// Add a frame to the batch.
    ///
    /// If the batch becomes full, it is automatically processed.
    pub fn add(&mut self, frame: Vec<Option<Point>>, label: String) {
        self.frames.push(frame);
        self.labels.push(label);

        if self.frames.len() >= self.batch_size {
            self.process();
        }
    }

    /// Process any remaining frames in the batch.
    ///
    /// This should be called after all frames have been added to ensure the last partial batch is processed.
    pub fn flush(&mut self) {
        self.process();
    }

    /// Number of frames processed so far.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn process(&mut self) {
        if self.frames.is_empty() {
            return;
        }

        let matrix = self.pipeline.process_batch(&self.frames);
        (self.callback)(matrix, &self.labels, self.frame_count);

        self.frame_count += self.frames.len();
        self.frames.clear();
        self.labels.clear();
    }
}
