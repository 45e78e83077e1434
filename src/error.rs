use std::path::PathBuf;
use thiserror::Error;

/// The main error type for detprep operations.
///
/// Per-file copy failures during staging are not errors: they are recorded
/// in [`StagingReport`](crate::stage::StagingReport) and the run continues.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Labels file not found at {path}; please provide a text file with the labels")]
    LabelsNotFound { path: PathBuf },

    #[error("Invalid labels file {path}: {message}")]
    ClassCatalogInvalid { path: PathBuf, message: String },

    #[error("Invalid data directory {path}: {message}")]
    DataDirInvalid { path: PathBuf, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("No .jpg or .png images found under {path}; please provide a folder path with images")]
    NoImagesFound { path: PathBuf },

    #[error("Failed while traversing {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    #[error("Failed to parse YOLO label {path} line {line}: {message}")]
    YoloLabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(
        "Class index {class_id} in {path} line {line} is out of range for a catalog of {class_count} class(es)"
    )]
    ClassIndexOutOfRange {
        path: PathBuf,
        line: usize,
        class_id: usize,
        class_count: usize,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Invalid image dimensions in {path}: {message}")]
    ImageDimensionInvalid { path: PathBuf, message: String },

    #[error("Failed to parse VOC XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Category '{name}' in {path} is not present in the class catalog")]
    CatalogMismatch { path: PathBuf, name: String },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize run summary: {0}")]
    ReportSerialize(#[source] serde_json::Error),
}

