//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

use dirscan_core::ScanStats;

use crate::session::ScanSession;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of nodes reported so far.
    pub nodes_reported: u64,
    /// Number of directories reported so far.
    pub dirs_scanned: u64,
    /// Total bytes of reported nodes so far.
    pub bytes_scanned: u64,
    /// Most recently reported path.
    pub current_path: PathBuf,
    /// Number of issues reported.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            nodes_reported: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Snapshot a running session.
    pub(crate) fn snapshot(session: &ScanSession, current_path: PathBuf) -> Self {
        let stats = session.stats();
        Self {
            nodes_reported: stats.nodes,
            dirs_scanned: stats.dirs,
            bytes_scanned: stats.total_size,
            current_path,
            errors_count: stats.error_count(),
            elapsed: session.elapsed(),
        }
    }

    /// Calculate scan rate in nodes per second.
    pub fn nodes_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.nodes_reported as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a complete multi-root scan.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Final counters.
    pub stats: ScanStats,
    /// Device the scan was baselined on, if any root could be inspected.
    pub start_device: Option<u64>,
    /// Wall time of the scan.
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_without_elapsed_time() {
        let progress = ScanProgress {
            nodes_reported: 10,
            ..ScanProgress::new()
        };
        assert_eq!(progress.nodes_per_second(), 0.0);
    }

    #[test]
    fn test_rate() {
        let progress = ScanProgress {
            nodes_reported: 10,
            elapsed: Duration::from_secs(2),
            ..ScanProgress::new()
        };
        assert_eq!(progress.nodes_per_second(), 5.0);
    }

    #[test]
    fn test_snapshot_of_fresh_session() {
        let session = ScanSession::new();
        let progress = ScanProgress::snapshot(&session, PathBuf::from("x"));
        assert_eq!(progress.nodes_reported, 0);
        assert_eq!(progress.current_path, PathBuf::from("x"));
    }
}
