//! Staging report types.
//!
//! Copy failures never abort a run; each one becomes a [`StagingIssue`]
//! here, and the per-partition counts show how many sources made it through.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::split::Partition;

/// Outcome of staging every partition.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StagingReport {
    pub partitions: BTreeMap<Partition, StagingCounts>,
    pub issues: Vec<StagingIssue>,
}

impl StagingReport {
    pub fn counts(&self, partition: Partition) -> StagingCounts {
        self.partitions.get(&partition).copied().unwrap_or_default()
    }

    pub(crate) fn record_assigned(&mut self, partition: Partition, assigned: usize) {
        self.partitions.entry(partition).or_default().assigned = assigned;
    }

    pub(crate) fn record_staged(&mut self, partition: Partition) {
        self.partitions.entry(partition).or_default().staged += 1;
    }

    pub(crate) fn record_skipped(&mut self, issue: StagingIssue) {
        self.partitions.entry(issue.partition).or_default().skipped += 1;
        self.issues.push(issue);
    }

    pub fn skipped_count(&self) -> usize {
        self.issues.len()
    }

    pub fn staged_count(&self) -> usize {
        self.partitions.values().map(|counts| counts.staged).sum()
    }
}

impl fmt::Display for StagingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for partition in Partition::ALL {
            let counts = self.counts(partition);
            writeln!(
                f,
                "  {}: {} assigned, {} staged, {} skipped",
                partition, counts.assigned, counts.staged, counts.skipped
            )?;
        }

        if !self.issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped ({}):", self.issues.len())?;
            for issue in &self.issues {
                writeln!(f, "  - {}", issue)?;
            }
        }

        Ok(())
    }
}

/// Per-partition staging counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StagingCounts {
    pub assigned: usize,
    pub staged: usize,
    pub skipped: usize,
}

/// One source that was left out of its partition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StagingIssue {
    pub partition: Partition,
    pub source: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for StagingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.partition, self.source.display(), self.reason)
    }
}

/// Why a source was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No `.txt` label next to the image.
    MissingLabel,
    /// The copy was refused by the filesystem.
    PermissionDenied { path: PathBuf },
    /// Any other copy failure.
    CopyFailed { path: PathBuf, message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingLabel => write!(f, "no sibling .txt label"),
            SkipReason::PermissionDenied { path } => {
                write!(f, "permission denied copying {}", path.display())
            }
            SkipReason::CopyFailed { path, message } => {
                write!(f, "failed to copy {}: {}", path.display(), message)
            }
        }
    }
}
