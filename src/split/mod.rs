//! Train/Test/Valid partitioning.
//!
//! Images are discovered, shuffled, and then walked with a cyclic counter:
//! every T-th image (T = round(100 / percent)) is held out, alternating
//! between Valid and Test, and the rest go to Train.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::PrepError;
use crate::ir::io_yolo::{is_image_path, sibling_label_path};

/// One of the three dataset subsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Partition {
    Train,
    Test,
    Valid,
}

impl Partition {
    /// Processing order for staging and conversion.
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Test, Partition::Valid];

    /// Directory name used under `Images/` and `Annotations/*/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Partition::Train => "Train",
            Partition::Test => "Test",
            Partition::Valid => "Valid",
        }
    }

    /// Manifest file name written at the dataset root.
    pub fn manifest_name(self) -> &'static str {
        match self {
            Partition::Train => "train.txt",
            Partition::Test => "test.txt",
            Partition::Valid => "valid.txt",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A discovered image and its sibling YOLO label, if one exists.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePair {
    pub image: PathBuf,
    pub label: Option<PathBuf>,
}

impl SourcePair {
    /// Pair `image` with its `.txt` sibling by checking the filesystem.
    pub fn resolve(image: PathBuf) -> Self {
        let label = sibling_label_path(&image);
        Self { image, label }
    }
}

/// Ordered sources per partition. Built once, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionAssignment {
    pub train: Vec<SourcePair>,
    pub test: Vec<SourcePair>,
    pub valid: Vec<SourcePair>,
}

impl PartitionAssignment {
    pub fn get(&self, partition: Partition) -> &[SourcePair] {
        match partition {
            Partition::Train => &self.train,
            Partition::Test => &self.test,
            Partition::Valid => &self.valid,
        }
    }

    fn get_mut(&mut self, partition: Partition) -> &mut Vec<SourcePair> {
        match partition {
            Partition::Train => &mut self.train,
            Partition::Test => &mut self.test,
            Partition::Valid => &mut self.valid,
        }
    }

    /// Partitions with their sources, in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (Partition, &[SourcePair])> {
        Partition::ALL
            .into_iter()
            .map(move |partition| (partition, self.get(partition)))
    }

    pub fn total(&self) -> usize {
        self.train.len() + self.test.len() + self.valid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Counter state for the held-out cadence.
///
/// Starts at 1; when it reaches the threshold the image is held out and the
/// counter resets. Held-out images alternate Valid, Test, Valid, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitCadence {
    counter: u32,
    threshold: u32,
    next_holdout: Partition,
}

impl SplitCadence {
    /// Build the cadence for a held-out percentage in `1..=100`.
    ///
    /// The threshold uses round-half-to-even, so 40% gives T = 2 (every
    /// second image held out) and 25% gives T = 4.
    pub fn new(percent: u32) -> Result<Self, PrepError> {
        if percent == 0 || percent > 100 {
            return Err(PrepError::InvalidConfiguration {
                message: format!("split percentage must be between 1 and 100, got {percent}"),
            });
        }

        let threshold = (100.0 / percent as f64).round_ties_even() as u32;

        Ok(Self {
            counter: 1,
            threshold,
            next_holdout: Partition::Valid,
        })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Partition for the next image in shuffled order.
    pub fn next_partition(&mut self) -> Partition {
        if self.counter == self.threshold {
            self.counter = 1;
            let held_out = self.next_holdout;
            self.next_holdout = match held_out {
                Partition::Valid => Partition::Test,
                _ => Partition::Valid,
            };
            held_out
        } else {
            self.counter += 1;
            Partition::Train
        }
    }
}

/// Recursively find `.jpg`/`.png` images under `root`, sorted by path.
///
/// The staged output trees under `root` are skipped so that a second run
/// does not treat its own copies as sources.
pub fn discover_images(root: &Path) -> Result<Vec<SourcePair>, PrepError> {
    let excluded: Vec<PathBuf> = Partition::ALL
        .iter()
        .map(|partition| root.join("Images").join(partition.dir_name()))
        .chain(std::iter::once(root.join("Annotations")))
        .collect();

    let mut images = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !excluded.iter().any(|dir| entry.path() == dir));

    for entry in walker {
        let entry = entry.map_err(|source| PrepError::DirectoryTraversal {
            path: root.to_path_buf(),
            message: source.to_string(),
        })?;

        if entry.file_type().is_file() && is_image_path(entry.path()) {
            images.push(entry.path().to_path_buf());
        }
    }

    images.sort();
    Ok(images.into_iter().map(SourcePair::resolve).collect())
}

/// Shuffle sources uniformly. A seed makes the permutation reproducible.
pub fn shuffle_sources(sources: &mut [SourcePair], seed: Option<u64>) {
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        sources.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        sources.shuffle(&mut rng);
    }
}

/// Walk sources in order and route each one through the cadence.
pub fn partition_sources(
    sources: Vec<SourcePair>,
    mut cadence: SplitCadence,
) -> PartitionAssignment {
    sources
        .into_iter()
        .fold(PartitionAssignment::default(), |mut assignment, source| {
            assignment.get_mut(cadence.next_partition()).push(source);
            assignment
        })
}

/// Discover, shuffle and partition the images under `root`.
pub fn split_dataset(
    root: &Path,
    cadence: SplitCadence,
    seed: Option<u64>,
) -> Result<PartitionAssignment, PrepError> {
    let mut sources = discover_images(root)?;
    log::info!(
        "found {} image(s) under {}; holding out every {} image(s)",
        sources.len(),
        root.display(),
        cadence.threshold()
    );

    shuffle_sources(&mut sources, seed);
    Ok(partition_sources(sources, cadence))
}

/// Write `train.txt`, `test.txt` and `valid.txt` under `root`, one image
/// path per line. Empty partitions still get an (empty) manifest.
pub fn write_manifests(root: &Path, assignment: &PartitionAssignment) -> Result<(), PrepError> {
    for (partition, sources) in assignment.iter() {
        let path = root.join(partition.manifest_name());
        let mut writer = BufWriter::new(File::create(&path).map_err(PrepError::Io)?);
        for source in sources {
            writeln!(writer, "{}", source.image.display()).map_err(PrepError::Io)?;
        }
        writer.flush().map_err(PrepError::Io)?;
        log::debug!("wrote {} ({} entries)", path.display(), sources.len());
    }
    Ok(())
}
