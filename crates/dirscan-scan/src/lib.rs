//! Traversal engine and node inspector for dirscan.
//!
//! # Overview
//!
//! `dirscan-scan` walks one or more root paths depth-first and hands every
//! node it finds to a [`Reporter`]. Key features:
//!
//! - **Non-dereferencing inspection**: symlinks are reported as links, with
//!   canonical paths that keep the link's own name
//! - **Loop detection** per descent branch when following directory links
//! - **Device boundaries** and **flatten mode** as descent policies
//! - **Error isolation**: a failing node only abandons its own branch
//!
//! # Example
//!
//! ```rust,no_run
//! use dirscan_scan::{DirScanner, RecordingReporter, ScanConfig};
//!
//! let config = ScanConfig::builder().follow_symlinks(true).build().unwrap();
//! let scanner = DirScanner::new(config);
//! let mut reporter = RecordingReporter::new();
//! let summary = scanner.scan_roots(["/path/to/scan"], &mut reporter);
//!
//! println!("{} nodes, {} errors", summary.stats.nodes, summary.stats.error_count());
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use dirscan_scan::{DirScanner, ScanConfig};
//!
//! let scanner = DirScanner::new(ScanConfig::new());
//! let mut progress_rx = scanner.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Scanned {} nodes", progress.nodes_reported);
//!     }
//! });
//! ```

mod inspect;
mod owner;
mod progress;
mod reporter;
mod scanner;
mod session;

pub use inspect::{canonical_path, inspect, inspect_with, real_path};
pub use owner::{NameCache, lookup_group, lookup_user};
pub use progress::{ScanProgress, ScanSummary};
pub use reporter::{FnReporter, RecordingReporter, Reporter, reporter_fn};
pub use scanner::DirScanner;
pub use session::{ScanContext, ScanSession};

// Re-export core types for convenience
pub use dirscan_core::{
    DeviceBaseline, ErrorCode, InodeInfo, InspectError, NameLookup, NodeKind, NodeRecord,
    Ownership, ScanConfig, ScanIssue, ScanStats, Timestamps,
};
