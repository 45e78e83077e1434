//! Per-partition conversion counts.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::split::Partition;

/// What the two conversion stages produced.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    pub partitions: BTreeMap<Partition, ConversionCounts>,
}

impl ConversionReport {
    pub fn counts(&self, partition: Partition) -> ConversionCounts {
        self.partitions
            .get(&partition)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn record(&mut self, partition: Partition, counts: ConversionCounts) {
        self.partitions.insert(partition, counts);
    }

    pub fn total_annotations(&self) -> usize {
        self.partitions.values().map(|c| c.annotations).sum()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for partition in Partition::ALL {
            let counts = self.counts(partition);
            write!(
                f,
                "  {}: {} images, {} categories, {} annotations",
                partition, counts.images, counts.categories, counts.annotations
            )?;
            if let Some(path) = &counts.coco_path {
                write!(f, " -> {}", path.display())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Counts for one partition's aggregate document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coco_path: Option<PathBuf>,
}
