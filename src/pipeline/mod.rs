//! End-to-end dataset preparation.
//!
//! catalog → split → stage → YOLO→VOC → VOC→COCO, strictly in order. Each
//! stage finishes before the next starts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::conversion::{self, ConversionReport};
use crate::error::PrepError;
use crate::ir::{ClassCatalog, DatasetInfo};
use crate::layout::DatasetLayout;
use crate::split::{self, Partition};
use crate::stage::{self, StagingReport};

/// Resolved options for one run.
#[derive(Clone, Debug)]
pub struct PrepareOptions {
    /// Dataset root: searched for images and receives all output.
    pub data_dir: PathBuf,
    /// Labels file, one class name per line.
    pub labels_path: PathBuf,
    /// Held-out percentage, `1..=100`.
    pub split_percent: u32,
    /// Fixes the shuffle when set.
    pub seed: Option<u64>,
    /// Info block written into every COCO document.
    pub info: DatasetInfo,
}

/// What a completed run produced.
#[derive(Clone, Debug, Serialize)]
pub struct PrepareSummary {
    pub data_dir: PathBuf,
    pub classes: usize,
    pub discovered: usize,
    pub threshold: u32,
    pub staging: StagingReport,
    pub conversion: ConversionReport,
}

impl fmt::Display for PrepareSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Prepared {} ({} image(s), {} class(es), every {} image(s) held out)",
            self.data_dir.display(),
            self.discovered,
            self.classes,
            self.threshold
        )?;
        writeln!(f)?;
        writeln!(f, "Staging:")?;
        write!(f, "{}", self.staging)?;
        writeln!(f)?;
        writeln!(f, "COCO:")?;
        write!(f, "{}", self.conversion)
    }
}

/// Run the whole pipeline.
///
/// Configuration problems (missing labels file, bad data directory, invalid
/// split, no images) are reported before any file is copied. Copy failures
/// are collected in the summary; parse failures abort the run.
pub fn prepare_dataset(opts: &PrepareOptions) -> Result<PrepareSummary, PrepError> {
    if !opts.labels_path.is_file() {
        return Err(PrepError::LabelsNotFound {
            path: opts.labels_path.clone(),
        });
    }
    check_data_dir(&opts.data_dir)?;
    let cadence = split::SplitCadence::new(opts.split_percent)?;
    let threshold = cadence.threshold();

    let catalog = ClassCatalog::load(&opts.labels_path)?;
    log::info!(
        "loaded {} class(es) from {}",
        catalog.len(),
        opts.labels_path.display()
    );

    let assignment = split::split_dataset(&opts.data_dir, cadence, opts.seed)?;
    if assignment.is_empty() {
        return Err(PrepError::NoImagesFound {
            path: opts.data_dir.clone(),
        });
    }
    split::write_manifests(&opts.data_dir, &assignment)?;
    for partition in Partition::ALL {
        log::info!("{}: {} image(s)", partition, assignment.get(partition).len());
    }

    let layout = DatasetLayout::new(&opts.data_dir);
    layout.create_dirs()?;

    let staged = stage::stage_assignment(&assignment, &layout);
    let voc_paths = conversion::yolo_to_voc(&staged, &layout, &catalog)?;
    let conversion = conversion::voc_to_coco(&voc_paths, &layout, &catalog, &opts.info)?;

    Ok(PrepareSummary {
        data_dir: opts.data_dir.clone(),
        classes: catalog.len(),
        discovered: assignment.total(),
        threshold,
        staging: staged.report,
        conversion,
    })
}

fn check_data_dir(path: &Path) -> Result<(), PrepError> {
    if !path.exists() {
        return Err(PrepError::DataDirInvalid {
            path: path.to_path_buf(),
            message: "directory does not exist".to_string(),
        });
    }
    if !path.is_dir() {
        return Err(PrepError::DataDirInvalid {
            path: path.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options(root: &Path) -> PrepareOptions {
        PrepareOptions {
            data_dir: root.to_path_buf(),
            labels_path: root.join("labels.txt"),
            split_percent: 40,
            seed: Some(1),
            info: DatasetInfo::default(),
        }
    }

    #[test]
    fn missing_labels_fails_before_touching_files() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = prepare_dataset(&options(temp.path())).unwrap_err();
        assert!(matches!(err, PrepError::LabelsNotFound { .. }));
        assert!(!temp.path().join("train.txt").exists());
    }

    #[test]
    fn missing_data_dir_is_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("labels.txt"), "cat\n").expect("write labels");
        let mut opts = options(temp.path());
        opts.data_dir = temp.path().join("nope");

        let err = prepare_dataset(&opts).unwrap_err();
        assert!(matches!(err, PrepError::DataDirInvalid { .. }));
    }

    #[test]
    fn zero_split_is_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("labels.txt"), "cat\n").expect("write labels");
        let mut opts = options(temp.path());
        opts.split_percent = 0;

        let err = prepare_dataset(&opts).unwrap_err();
        assert!(matches!(err, PrepError::InvalidConfiguration { .. }));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("labels.txt"), "cat\n").expect("write labels");

        let err = prepare_dataset(&options(temp.path())).unwrap_err();
        assert!(matches!(err, PrepError::NoImagesFound { .. }));
        assert!(!temp.path().join("Images").exists());
    }
}
