//! Copy partitioned sources into the dataset layout.
//!
//! Each source is copied as `<index>_<basename>`, where `index` is the
//! source's position in its partition's assignment (skipped sources still
//! consume an index). The label is copied first, then the image; a source
//! only counts as staged when both copies succeed.

pub mod report;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::layout::DatasetLayout;
use crate::progress;
use crate::split::{Partition, PartitionAssignment, SourcePair};

pub use report::{SkipReason, StagingCounts, StagingIssue, StagingReport};

/// A source whose image and label were both copied into the layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedPair {
    pub source_image: PathBuf,
    pub image: PathBuf,
    pub label: PathBuf,
}

/// Result of staging one source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    Staged(StagedPair),
    Skipped(SkipReason),
}

/// Staged pairs per partition plus the report of what was skipped.
#[derive(Clone, Debug, Default)]
pub struct StagedDataset {
    pub partitions: BTreeMap<Partition, Vec<StagedPair>>,
    pub report: StagingReport,
}

impl StagedDataset {
    pub fn get(&self, partition: Partition) -> &[StagedPair] {
        self.partitions
            .get(&partition)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Stage every partition of `assignment` into `layout`.
///
/// The partition directories must already exist.
pub fn stage_assignment(assignment: &PartitionAssignment, layout: &DatasetLayout) -> StagedDataset {
    let mut staged = StagedDataset::default();

    for (partition, sources) in assignment.iter() {
        staged.report.record_assigned(partition, sources.len());
        let bar = progress::bar(sources.len(), format!("Copying files to '{partition}' folder"));

        let mut pairs = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            match stage_source(index, source, &layout.images(partition), &layout.yolo(partition)) {
                StageOutcome::Staged(pair) => {
                    staged.report.record_staged(partition);
                    pairs.push(pair);
                }
                StageOutcome::Skipped(reason) => {
                    log::warn!(
                        "skipping {} in {}: {}",
                        source.image.display(),
                        partition,
                        reason
                    );
                    staged.report.record_skipped(StagingIssue {
                        partition,
                        source: source.image.clone(),
                        reason,
                    });
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        log::info!("staged {} of {} file(s) into {}", pairs.len(), sources.len(), partition);
        staged.partitions.insert(partition, pairs);
    }

    staged
}

/// Copy one source's label into `labels_dir` and image into `images_dir`.
pub fn stage_source(
    index: usize,
    source: &SourcePair,
    images_dir: &Path,
    labels_dir: &Path,
) -> StageOutcome {
    let Some(label) = source.label.as_deref() else {
        return StageOutcome::Skipped(SkipReason::MissingLabel);
    };

    let label_dst = prefixed_destination(labels_dir, index, label);
    if let Err(reason) = copy_file(label, &label_dst) {
        return StageOutcome::Skipped(reason);
    }

    let image_dst = prefixed_destination(images_dir, index, &source.image);
    if let Err(reason) = copy_file(&source.image, &image_dst) {
        if let Err(err) = fs::remove_file(&label_dst) {
            log::warn!(
                "could not remove orphaned label copy {}: {}",
                label_dst.display(),
                err
            );
        }
        return StageOutcome::Skipped(reason);
    }

    StageOutcome::Staged(StagedPair {
        source_image: source.image.clone(),
        image: image_dst,
        label: label_dst,
    })
}

fn prefixed_destination(dir: &Path, index: usize, source: &Path) -> PathBuf {
    let basename = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{index}_{basename}"))
}

fn copy_file(from: &Path, to: &Path) -> Result<(), SkipReason> {
    fs::copy(from, to).map(|_| ()).map_err(|err| match err.kind() {
        io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied {
            path: from.to_path_buf(),
        },
        _ => SkipReason::CopyFailed {
            path: from.to_path_buf(),
            message: err.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_source(dir: &Path, stem: &str, with_label: bool) -> SourcePair {
        let image = dir.join(format!("{stem}.jpg"));
        fs::write(&image, b"image").expect("write image");
        let label = with_label.then(|| {
            let label = dir.join(format!("{stem}.txt"));
            fs::write(&label, "0 0.5 0.5 0.1 0.1\n").expect("write label");
            label
        });
        SourcePair { image, label }
    }

    #[test]
    fn stage_source_copies_both_files_with_prefix() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let src = temp.path().join("src");
        let images = temp.path().join("images");
        let labels = temp.path().join("labels");
        for dir in [&src, &images, &labels] {
            fs::create_dir_all(dir).expect("create dir");
        }

        let source = write_source(&src, "cat", true);
        let outcome = stage_source(4, &source, &images, &labels);

        let StageOutcome::Staged(pair) = outcome else {
            panic!("expected staged outcome, got {outcome:?}");
        };
        assert_eq!(pair.image, images.join("4_cat.jpg"));
        assert_eq!(pair.label, labels.join("4_cat.txt"));
        assert_eq!(pair.source_image, source.image);
        assert_eq!(fs::read(&pair.image).expect("read image"), b"image");
    }

    #[test]
    fn stage_source_skips_missing_label() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let source = write_source(temp.path(), "dog", false);

        let outcome = stage_source(0, &source, temp.path(), temp.path());
        assert_eq!(outcome, StageOutcome::Skipped(SkipReason::MissingLabel));
    }

    #[test]
    fn stage_source_reports_copy_failure_and_drops_label_copy() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let labels = temp.path().join("labels");
        fs::create_dir_all(&labels).expect("create labels dir");

        let mut source = write_source(temp.path(), "bird", true);
        source.image = temp.path().join("vanished.jpg");

        // Images dir does not exist, so the image copy fails.
        let outcome = stage_source(0, &source, &temp.path().join("missing"), &labels);
        assert!(matches!(
            outcome,
            StageOutcome::Skipped(SkipReason::CopyFailed { .. })
        ));
        assert!(!labels.join("0_bird.txt").exists());
    }

    #[test]
    fn stage_assignment_keeps_indices_for_skipped_sources() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let src = temp.path().join("src");
        fs::create_dir_all(&src).expect("create src");
        let layout = DatasetLayout::new(temp.path());
        layout.create_dirs().expect("create layout");

        let assignment = PartitionAssignment {
            train: vec![
                write_source(&src, "a", true),
                write_source(&src, "b", false),
                write_source(&src, "c", true),
            ],
            test: vec![],
            valid: vec![write_source(&src, "d", true)],
        };

        let staged = stage_assignment(&assignment, &layout);

        let train = staged.get(Partition::Train);
        assert_eq!(train.len(), 2);
        assert_eq!(train[0].image, layout.images(Partition::Train).join("0_a.jpg"));
        assert_eq!(train[1].image, layout.images(Partition::Train).join("2_c.jpg"));
        assert_eq!(train[1].label, layout.yolo(Partition::Train).join("2_c.txt"));
        assert!(staged.get(Partition::Test).is_empty());
        assert_eq!(staged.get(Partition::Valid).len(), 1);

        assert_eq!(staged.report.skipped_count(), 1);
        assert_eq!(staged.report.issues[0].source, src.join("b.jpg"));
        assert_eq!(staged.report.counts(Partition::Train).assigned, 3);
    }
}
