//! Running scan statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::node::{NodeKind, NodeRecord};

/// Counters accumulated while a scan runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Nodes handed to the reporter.
    pub nodes: u64,
    /// Regular files reported.
    pub files: u64,
    /// Directories reported.
    pub dirs: u64,
    /// Symbolic links reported.
    pub symlinks: u64,
    /// Other node types reported.
    pub other: u64,
    /// Sum of non-dereferenced sizes of all reported nodes.
    pub total_size: u64,
    /// Maximum depth reached (roots are depth 0).
    pub max_depth: u32,
    /// Issues reported, keyed by code.
    pub errors: BTreeMap<u16, u64>,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reported node.
    pub fn record_node(&mut self, record: &NodeRecord, depth: u32) {
        self.nodes += 1;
        self.total_size += record.size;
        self.max_depth = self.max_depth.max(depth);

        match record.kind {
            NodeKind::Directory => self.dirs += 1,
            NodeKind::File => self.files += 1,
            NodeKind::Symlink => self.symlinks += 1,
            NodeKind::Other => self.other += 1,
        }
    }

    /// Record a reported issue.
    pub fn record_error(&mut self, code: ErrorCode) {
        *self.errors.entry(code.as_u16()).or_default() += 1;
    }

    /// Total number of issues.
    pub fn error_count(&self) -> u64 {
        self.errors.values().sum()
    }

    /// Number of issues with the given code.
    pub fn errors_of(&self, code: ErrorCode) -> u64 {
        self.errors.get(&code.as_u16()).copied().unwrap_or(0)
    }
}
