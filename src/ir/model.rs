//! Document models for the two exported annotation formats.
//!
//! [`VocDocument`] is the per-image box document; [`Dataset`] is the
//! per-partition aggregate. Both are format-agnostic here: the `io_*`
//! modules own the on-disk schemas.

use serde::{Deserialize, Serialize};

use super::bbox::PixelBox;
use super::ids::{CategoryId, ImageId};

/// Folder name recorded in every generated VOC document.
pub const VOC_FOLDER: &str = "images";
/// Colour channel count recorded in every generated VOC document.
pub const VOC_DEPTH: u32 = 3;
/// Placeholder pose for generated VOC objects.
pub const VOC_POSE: &str = "Unspecified";

/// All annotations for one image, in absolute pixel coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocDocument {
    pub folder: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub objects: Vec<VocObject>,
}

impl VocDocument {
    /// Creates an empty document with the fixed folder and depth.
    pub fn new(filename: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            folder: VOC_FOLDER.to_string(),
            filename: filename.into(),
            width,
            height,
            depth: VOC_DEPTH,
            objects: Vec::new(),
        }
    }
}

/// One labelled box inside a [`VocDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub pose: String,
    pub truncated: u8,
    pub difficult: u8,
    pub bbox: PixelBox,
}

impl VocObject {
    /// Creates an object with the placeholder pose/truncated/difficult values.
    pub fn new(name: impl Into<String>, bbox: PixelBox) -> Self {
        Self {
            name: name.into(),
            pose: VOC_POSE.to_string(),
            truncated: 0,
            difficult: 0,
            bbox,
        }
    }
}

/// One partition's aggregate annotation document.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub info: DatasetInfo,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    /// Always the full class catalog, whether or not a class is used.
    pub categories: Vec<Category>,
}

impl Dataset {
    /// Number of objects across all images.
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }
}

/// Metadata block written at the top of every aggregate document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub description: String,
    pub url: String,
    pub version: String,
    pub year: u32,
    pub contributor: String,
    pub date_created: String,
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self {
            description: "Annotations for images in COCO format".to_string(),
            url: String::new(),
            version: "1.0".to_string(),
            year: 2022,
            contributor: String::new(),
            date_created: String::new(),
        }
    }
}

/// An image entry of the aggregate document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

/// A category entry of the aggregate document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    /// Creates a category with the `"none"` supercategory.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: "none".to_string(),
        }
    }
}

/// An annotation entry of the aggregate document.
///
/// Annotation ids are implicit: an annotation is identified by its position
/// in [`Dataset::annotations`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub image_id: ImageId,
    pub category_id: CategoryId,
    pub bbox: PixelBox,
    pub iscrowd: u8,
}

impl Annotation {
    pub fn new(image_id: ImageId, category_id: CategoryId, bbox: PixelBox) -> Self {
        Self {
            image_id,
            category_id,
            bbox,
            iscrowd: 0,
        }
    }

    /// Box area, always derived from the same corners as the bbox.
    pub fn area(&self) -> i64 {
        self.bbox.area()
    }
}
