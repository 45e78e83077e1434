//! Output directory layout under the dataset root.
//!
//! ```text
//! <root>/Images/<Partition>/
//! <root>/Annotations/Yolo/<Partition>/
//! <root>/Annotations/VOC/<Partition>/
//! <root>/Annotations/COCO/<Partition>/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PrepError;
use crate::split::Partition;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetLayout {
    pub root: PathBuf,
    pub images_dir: PathBuf,
    pub yolo_dir: PathBuf,
    pub voc_dir: PathBuf,
    pub coco_dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: &Path) -> Self {
        let annotations = root.join("Annotations");
        Self {
            root: root.to_path_buf(),
            images_dir: root.join("Images"),
            yolo_dir: annotations.join("Yolo"),
            voc_dir: annotations.join("VOC"),
            coco_dir: annotations.join("COCO"),
        }
    }

    pub fn images(&self, partition: Partition) -> PathBuf {
        self.images_dir.join(partition.dir_name())
    }

    pub fn yolo(&self, partition: Partition) -> PathBuf {
        self.yolo_dir.join(partition.dir_name())
    }

    pub fn voc(&self, partition: Partition) -> PathBuf {
        self.voc_dir.join(partition.dir_name())
    }

    pub fn coco(&self, partition: Partition) -> PathBuf {
        self.coco_dir.join(partition.dir_name())
    }

    /// `Annotations/COCO/<P>/<P>.json`
    pub fn coco_file(&self, partition: Partition) -> PathBuf {
        self.coco(partition).join(format!("{}.json", partition.dir_name()))
    }

    /// Create every partition directory. Existing directories are kept.
    pub fn create_dirs(&self) -> Result<(), PrepError> {
        for partition in Partition::ALL {
            for dir in [
                self.images(partition),
                self.yolo(partition),
                self.voc(partition),
                self.coco(partition),
            ] {
                fs::create_dir_all(&dir).map_err(PrepError::Io)?;
            }
        }
        Ok(())
    }
}
