//! COCO JSON writer.
//!
//! One aggregate document per partition:
//!
//! ```text
//! { info, licenses: [], images: [{file_name, height, width, id}],
//!   annotations: [{image_id, category_id, bbox: [x, y, w, h], area, iscrowd}],
//!   categories: [{supercategory, id, name}] }
//! ```
//!
//! Annotation ids are implicit list positions, so annotations carry no `id`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::model::{Dataset, DatasetInfo};
use crate::error::PrepError;

// ============================================================================
// COCO Schema Types (internal to this module)
// ============================================================================

#[derive(Debug, Serialize)]
struct CocoDataset<'a> {
    info: &'a DatasetInfo,
    licenses: Vec<serde_json::Value>,
    images: Vec<CocoImage<'a>>,
    annotations: Vec<CocoAnnotation>,
    categories: Vec<CocoCategory<'a>>,
}

#[derive(Debug, Serialize)]
struct CocoImage<'a> {
    file_name: &'a str,
    height: u32,
    width: u32,
    id: u64,
}

#[derive(Debug, Serialize)]
struct CocoAnnotation {
    image_id: u64,
    category_id: u64,
    /// [x, y, width, height] with (x, y) as top-left corner
    bbox: [i64; 4],
    area: i64,
    iscrowd: u8,
}

#[derive(Debug, Serialize)]
struct CocoCategory<'a> {
    supercategory: &'a str,
    id: u64,
    name: &'a str,
}

// ============================================================================
// Public API
// ============================================================================

/// Writes a partition's aggregate document to a COCO JSON file.
pub fn write_coco_json(path: &Path, dataset: &Dataset) -> Result<(), PrepError> {
    let file = File::create(path).map_err(PrepError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &to_coco(dataset)).map_err(|source| {
        PrepError::CocoJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(PrepError::Io)
}

/// Writes a dataset to a COCO JSON string.
///
/// Useful for testing without file I/O.
pub fn to_coco_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_coco(dataset))
}

fn to_coco(dataset: &Dataset) -> CocoDataset<'_> {
    let images = dataset
        .images
        .iter()
        .map(|img| CocoImage {
            file_name: &img.file_name,
            height: img.height,
            width: img.width,
            id: img.id.as_u64(),
        })
        .collect();

    let annotations = dataset
        .annotations
        .iter()
        .map(|ann| CocoAnnotation {
            image_id: ann.image_id.as_u64(),
            category_id: ann.category_id.as_u64(),
            bbox: ann.bbox.to_xywh(),
            area: ann.area(),
            iscrowd: ann.iscrowd,
        })
        .collect();

    let categories = dataset
        .categories
        .iter()
        .map(|cat| CocoCategory {
            supercategory: &cat.supercategory,
            id: cat.id.as_u64(),
            name: &cat.name,
        })
        .collect();

    CocoDataset {
        info: &dataset.info,
        licenses: Vec::new(),
        images,
        annotations,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Annotation, Category, CategoryId, Image, ImageId, PixelBox};

    fn sample_dataset() -> Dataset {
        Dataset {
            info: DatasetInfo::default(),
            images: vec![Image::new(0usize, "0_img.png", 200, 100)],
            annotations: vec![Annotation::new(
                ImageId::new(0),
                CategoryId::new(1),
                PixelBox::from_xyxy(60, 20, 140, 80),
            )],
            categories: vec![Category::new(0usize, "cat"), Category::new(1usize, "dog")],
        }
    }

    #[test]
    fn coco_string_matches_schema() {
        let json = to_coco_string(&sample_dataset()).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse back");

        assert_eq!(value["licenses"], serde_json::json!([]));
        assert_eq!(value["info"]["version"], "1.0");
        assert_eq!(value["info"]["year"], 2022);
        assert_eq!(
            value["images"][0],
            serde_json::json!({"file_name": "0_img.png", "height": 100, "width": 200, "id": 0})
        );
        assert_eq!(
            value["annotations"][0],
            serde_json::json!({
                "image_id": 0,
                "category_id": 1,
                "bbox": [60, 20, 80, 60],
                "area": 4800,
                "iscrowd": 0
            })
        );
        assert_eq!(
            value["categories"][1],
            serde_json::json!({"supercategory": "none", "id": 1, "name": "dog"})
        );
    }

    #[test]
    fn coco_keys_keep_schema_order() {
        let json = to_coco_string(&sample_dataset()).expect("serialize");
        let info = json.find("\"info\"").expect("info key");
        let licenses = json.find("\"licenses\"").expect("licenses key");
        let images = json.find("\"images\"").expect("images key");
        let annotations = json.find("\"annotations\"").expect("annotations key");
        let categories = json.find("\"categories\"").expect("categories key");
        assert!(info < licenses && licenses < images);
        assert!(images < annotations && annotations < categories);
    }

    #[test]
    fn write_coco_json_creates_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("Train.json");
        write_coco_json(&path, &sample_dataset()).expect("write coco");

        let text = std::fs::read_to_string(&path).expect("read coco");
        assert!(text.contains("\"area\": 4800"));
    }
}
