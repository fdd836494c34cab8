//! Mutable state scoped to one traversal.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use dirscan_core::ScanStats;

use crate::owner::NameCache;
use crate::progress::ScanSummary;

/// State threaded through one scan invocation.
///
/// The ancestor stack holds the real paths of the directories currently
/// being descended. It follows the recursion: a path is pushed before its
/// children are visited and popped afterwards, so two branches reaching the
/// same directory without nesting never see each other.
#[derive(Debug)]
pub struct ScanSession {
    start_device: Option<u64>,
    ancestors: Vec<PathBuf>,
    names: NameCache,
    stats: ScanStats,
    started: Instant,
}

impl ScanSession {
    /// Create a fresh session.
    pub fn new() -> Self {
        Self {
            start_device: None,
            ancestors: Vec::new(),
            names: NameCache::new(),
            stats: ScanStats::new(),
            started: Instant::now(),
        }
    }

    /// Device of the first root reported, once known.
    pub fn start_device(&self) -> Option<u64> {
        self.start_device
    }

    /// Forget the start device so that the next root sets a new one.
    pub fn reset_start_device(&mut self) {
        self.start_device = None;
    }

    /// Number of directories currently being descended.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Statistics so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Time since the session was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Read-only view handed to reporters.
    pub fn context(&self) -> ScanContext {
        ScanContext {
            start_device: self.start_device,
            depth: self.depth(),
        }
    }

    /// Consume the session into a summary.
    pub fn into_summary(self) -> ScanSummary {
        ScanSummary {
            duration: self.started.elapsed(),
            start_device: self.start_device,
            stats: self.stats,
        }
    }

    /// Record the device of a root node. Only the first call per baseline wins.
    pub(crate) fn set_baseline(&mut self, device: u64) {
        if self.ancestors.is_empty() && self.start_device.is_none() {
            self.start_device = Some(device);
        }
    }

    pub(crate) fn is_ancestor(&self, real_path: &Path) -> bool {
        self.ancestors.iter().any(|p| p == real_path)
    }

    pub(crate) fn push(&mut self, real_path: PathBuf) {
        self.ancestors.push(real_path);
    }

    pub(crate) fn pop(&mut self) {
        self.ancestors.pop();
    }

    pub(crate) fn names_mut(&mut self) -> &mut NameCache {
        &mut self.names
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ScanStats {
        &mut self.stats
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What a reporter may know about the traversal when it receives a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanContext {
    /// Device of the first root.
    pub start_device: Option<u64>,
    /// Depth of the node being reported; roots are at depth 0.
    pub depth: usize,
}

impl ScanContext {
    /// Check if `device` differs from the start device.
    pub fn is_foreign_device(&self, device: u64) -> bool {
        self.start_device.is_some_and(|start| start != device)
    }
}
