//! YOLO label reading.
//!
//! A YOLO label is a `.txt` file next to its image (same stem), with one
//! `class_index x_center y_center width height` row per object and all
//! geometry normalized to the image size.

use std::fs;
use std::path::{Path, PathBuf};

use super::YoloBox;
use crate::error::PrepError;

/// Image extensions picked up by discovery, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];
pub const LABEL_EXTENSION: &str = "txt";

/// One parsed row together with its 1-based line number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloRow {
    pub line: usize,
    pub bbox: YoloBox,
}

/// Read every non-blank row of a YOLO label file.
///
/// Any malformed row fails the whole file.
pub fn read_label_file(path: &Path) -> Result<Vec<YoloRow>, PrepError> {
    let content = fs::read_to_string(path).map_err(PrepError::Io)?;
    from_label_str(&content, path)
}

/// Parse YOLO label text already in memory. `path` is used for error context.
pub fn from_label_str(content: &str, path: &Path) -> Result<Vec<YoloRow>, PrepError> {
    let mut rows = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        if let Some(bbox) = parse_label_line(line, path, line_num)? {
            rows.push(YoloRow {
                line: line_num,
                bbox,
            });
        }
    }
    Ok(rows)
}

/// Path of the label file that belongs to `image`, if one exists.
pub fn sibling_label_path(image: &Path) -> Option<PathBuf> {
    let candidate = image.with_extension(LABEL_EXTENSION);
    candidate.is_file().then_some(candidate)
}

pub fn is_image_path(path: &Path) -> bool {
    has_extension(path, &IMAGE_EXTENSIONS)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// Read pixel width and height from an image header.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), PrepError> {
    let size = imagesize::size(path).map_err(|source| PrepError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| PrepError::ImageDimensionInvalid {
            path: path.to_path_buf(),
            message: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| PrepError::ImageDimensionInvalid {
            path: path.to_path_buf(),
            message: format!("image height {} does not fit in u32", size.height),
        })?;

    Ok((width, height))
}

fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<YoloBox>, PrepError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Columns after the fifth (confidence, track id) are ignored.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(5).collect();

    if tokens.len() < 5 {
        return Err(PrepError::YoloLabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "expected at least 5 tokens (class x_center y_center width height), found {}",
                tokens.len()
            ),
        });
    }

    let class_id = tokens[0]
        .parse::<usize>()
        .map_err(|_| PrepError::YoloLabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "invalid class index '{}'; expected a non-negative integer",
                tokens[0]
            ),
        })?;

    let cx = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
    let cy = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
    let w = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let h = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    Ok(Some(YoloBox {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

/// Fuzz-only entrypoint for YOLO single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), PrepError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, PrepError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PrepError::YoloLabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected a finite number"),
        })
}
