// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! I/O utilities for keypoint frame files and feature output.
//!
//! Frame files are JSON, holding either one frame (`[[x, y], ...]`) or an
//! array of frames, or JSON Lines with one frame per line. `null` points and
//! points without exactly two coordinates are read as missing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};
use crate::features::{FeatureVector, feature_names};
use crate::keypoints::{Point, parse_raw_points};
use crate::pipeline::FrameFeatures;

type LooseFrame = Vec<Option<Vec<f64>>>;

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameDocument {
    Frames(Vec<LooseFrame>),
    Frame(LooseFrame),
}

/// Parse frames from a JSON document.
///
/// # Errors
///
/// Returns [`FeatureError::ParseError`] if the document is neither a frame nor an array of frames.
pub fn parse_frames_json(json: &str) -> Result<Vec<Vec<Option<Point>>>> {
    let document: FrameDocument = serde_json::from_str(json)
        .map_err(|e| FeatureError::ParseError(format!("expected a frame or an array of frames: {e}")))?;
    let frames = match document {
        FrameDocument::Frames(frames) => frames,
        FrameDocument::Frame(frame) => vec![frame],
    };
    Ok(frames.into_iter().map(parse_raw_points).collect())
}

/// Parse frames from JSON Lines, skipping blank lines.
///
/// # Errors
///
/// Returns [`FeatureError::ParseError`] naming the first malformed line.
pub fn parse_frames_jsonl(text: &str) -> Result<Vec<Vec<Option<Point>>>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<LooseFrame>(line)
                .map(parse_raw_points)
                .map_err(|e| FeatureError::ParseError(format!("line {}: {e}", i + 1)))
        })
        .collect()
}

/// Read frames from a file. `.jsonl` and `.ndjson` files are read as JSON Lines.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Option<Point>>>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| FeatureError::IoError(format!("Failed to read {}: {e}", path.display())))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl" | "ndjson") => parse_frames_jsonl(&contents),
        _ => parse_frames_json(&contents),
    }
}

/// One output record.
#[derive(Debug, Serialize)]
pub struct FrameRecord<'a> {
    /// Frame index within the input.
    pub frame: usize,
    /// Pipeline output for the frame.
    #[serde(flatten)]
    pub result: &'a FrameFeatures,
}

/// Write records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: W, records: &[FrameRecord<'_>]) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write feature vectors as CSV with a `frame` column and one column per feature.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(writer: W, rows: &[FeatureVector]) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "frame,{}", feature_names().join(","))?;
    for (i, row) in rows.iter().enumerate() {
        let values: Vec<String> = row.iter().map(f64::to_string).collect();
        writeln!(writer, "{i},{}", values.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

/// Open an output file, creating its parent directory if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            FeatureError::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;
    }
    File::create(path).map_err(|e| FeatureError::IoError(format!("Failed to create {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FeaturePipeline;

    #[test]
    fn test_parse_single_frame() {
        let frames = parse_frames_json("[[1, 2], null, [3], [4, 5]]").unwrap();
        assert_eq!(frames, vec![vec![Some([1.0, 2.0]), None, None, Some([4.0, 5.0])]]);
    }

    #[test]
    fn test_parse_frame_array() {
        let frames = parse_frames_json("[[[1, 2], [3, 4]], [[5, 6]]]").unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], vec![Some([5.0, 6.0])]);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_frames_json(r#"{"a": 1}"#), Err(FeatureError::ParseError(_))));
    }

    #[test]
    fn test_parse_jsonl() {
        let frames = parse_frames_jsonl("[[1, 2]]\n\n[null, [3, 4]]\n").unwrap();
        assert_eq!(frames, vec![vec![Some([1.0, 2.0])], vec![None, Some([3.0, 4.0])]]);

        let err = parse_frames_jsonl("[[1, 2]]\nnope\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_read_frames_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        fs::write(&path, "[[1, 2]]\n[[3, 4]]\n").unwrap();
        assert_eq!(read_frames(&path).unwrap().len(), 2);

        assert!(matches!(read_frames(dir.path().join("missing.json")), Err(FeatureError::IoError(_))));
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &[[0.5; 32]]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("frame,left_shoulder_flexion,"));
        assert!(lines.next().unwrap().starts_with("0,0.5,0.5"));
    }

    #[test]
    fn test_write_json() {
        let result = FeaturePipeline::default().process(&[]);
        let mut out = Vec::new();
        write_json(&mut out, &[FrameRecord { frame: 0, result: &result }]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["frame"], 0);
        assert_eq!(value[0]["features"].as_array().unwrap().len(), 32);
        assert!(value[0].get("zscored").is_none());
        assert!(value[0]["keypoints"]["nose"].is_array());
    }

    #[test]
    fn test_create_output_makes_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        create_output(&path).unwrap();
        assert!(path.exists());
    }
}
