use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of walking one include root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootReport {
    /// The absolute include root that was walked.
    pub root: PathBuf,
    /// Input files transformed and written to every output directory.
    pub files_written: usize,
    /// Files rejected by the filter hook or by binary detection. Entries matching
    /// an exclude pattern are pruned and not counted.
    pub files_skipped: usize,
    /// Subdirectories visited below the root.
    pub directories: usize,
}

/// Counters folded up the directory tree.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WalkStats {
    pub files_written: usize,
    pub files_skipped: usize,
    pub directories: usize,
}

impl WalkStats {
    pub(crate) fn written() -> Self {
        Self {
            files_written: 1,
            ..Self::default()
        }
    }
    pub(crate) fn skipped() -> Self {
        Self {
            files_skipped: 1,
            ..Self::default()
        }
    }
    pub(crate) fn directories(count: usize) -> Self {
        Self {
            directories: count,
            ..Self::default()
        }
    }
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            files_written: self.files_written + other.files_written,
            files_skipped: self.files_skipped + other.files_skipped,
            directories: self.directories + other.directories,
        }
    }
    pub(crate) fn into_report(self, root: PathBuf) -> RootReport {
        RootReport {
            root,
            files_written: self.files_written,
            files_skipped: self.files_skipped,
            directories: self.directories,
        }
    }
}
