//! Depth-first traversal engine.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use dirscan_core::{DeviceBaseline, InspectError, NodeKind, NodeRecord, ScanConfig, ScanIssue};

use crate::inspect::inspect_with;
use crate::progress::{ScanProgress, ScanSummary};
use crate::reporter::Reporter;
use crate::session::ScanSession;

/// Number of reported nodes between two progress snapshots.
const PROGRESS_INTERVAL: u64 = 1000;

/// Sequential depth-first scanner.
///
/// Every visited path is inspected, reported, and then descended only if it
/// is a directory that passes the symlink, flatten, device and loop checks.
pub struct DirScanner {
    config: ScanConfig,
    progress_tx: broadcast::Sender<ScanProgress>,
}

/// Outcome of the descent checks for one reported node.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Descent {
    /// Walk the children. Carries the real path to push on the ancestor stack.
    Enter(PathBuf),
    /// Leave the node as a leaf.
    Skip(SkipReason),
    /// The directory is already being descended in this branch.
    Loop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    NotADirectory,
    Symlink,
    Flatten,
    OtherDevice,
    Unresolved,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::NotADirectory => "not a directory",
            SkipReason::Symlink => "symlink not followed",
            SkipReason::Flatten => "flatten",
            SkipReason::OtherDevice => "other device",
            SkipReason::Unresolved => "target unresolved",
        }
    }
}

impl DirScanner {
    /// Create a new scanner.
    pub fn new(config: ScanConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            progress_tx,
        }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan several roots in order with one session.
    ///
    /// The start device is taken once from the first root, or once per root
    /// with [`DeviceBaseline::PerRoot`].
    pub fn scan_roots<I, P, R>(&self, roots: I, reporter: &mut R) -> ScanSummary
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        R: Reporter + ?Sized,
    {
        let mut session = ScanSession::new();
        info!(config = ?self.config, "scan started");

        for root in roots {
            if self.config.device_baseline == DeviceBaseline::PerRoot {
                session.reset_start_device();
            }
            self.scan(root, &mut session, reporter);
        }

        self.send_progress(&session, PathBuf::new());
        let summary = session.into_summary();
        info!(
            nodes = summary.stats.nodes,
            errors = summary.stats.error_count(),
            elapsed_ms = summary.duration.as_millis() as u64,
            "scan finished"
        );
        summary
    }

    /// Scan `path` and, if it is a directory, everything below it.
    ///
    /// Failures are reported through `reporter` and never abort the walk
    /// beyond the failing branch.
    pub fn scan<R>(&self, path: impl AsRef<Path>, session: &mut ScanSession, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        self.visit(path.as_ref(), session, reporter);
    }

    fn visit<R>(&self, path: &Path, session: &mut ScanSession, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        trace!(path = %path.display(), "visit");

        let record = match inspect_with(path, session.names_mut()) {
            Ok(record) => record,
            Err(err) => {
                self.report_failure(&err, session, reporter);
                return;
            }
        };

        self.report_node(&record, session, reporter);

        let real_path = match self.descent(&record, session) {
            Descent::Enter(real_path) => real_path,
            Descent::Skip(SkipReason::NotADirectory) => return,
            Descent::Skip(reason) => {
                debug!(path = %path.display(), reason = reason.as_str(), "not descending");
                return;
            }
            Descent::Loop => {
                let issue = ScanIssue::dir_loop(path, &record.canonical_path);
                self.report_issue(issue, session, reporter);
                return;
            }
        };

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                self.report_issue(ScanIssue::dir_read(path, &err), session, reporter);
                return;
            }
        };

        session.push(real_path);
        for entry in entries {
            match entry {
                Ok(entry) => self.visit(&path.join(entry.file_name()), session, reporter),
                Err(err) => {
                    self.report_issue(ScanIssue::dir_read(path, &err), session, reporter);
                    break;
                }
            }
        }
        session.pop();
    }

    /// Decide whether a reported node is walked. Checks short-circuit in order:
    /// directory-ness, flatten, device boundary, loop.
    pub(crate) fn descent(&self, record: &NodeRecord, session: &ScanSession) -> Descent {
        match record.kind {
            NodeKind::Directory => {}
            // The link itself was reported; a failed target check is not an error.
            NodeKind::Symlink if points_to_dir(&record.path) => {
                if !self.config.follow_symlinks {
                    return Descent::Skip(SkipReason::Symlink);
                }
            }
            _ => return Descent::Skip(SkipReason::NotADirectory),
        }

        if self.config.flatten && session.depth() > 0 {
            return Descent::Skip(SkipReason::Flatten);
        }

        if self.config.same_device && session.start_device() != Some(record.device()) {
            return Descent::Skip(SkipReason::OtherDevice);
        }

        let Some(real_path) = &record.real_path else {
            return Descent::Skip(SkipReason::Unresolved);
        };
        if session.is_ancestor(real_path) {
            return Descent::Loop;
        }

        Descent::Enter(real_path.clone())
    }

    fn report_node<R>(&self, record: &NodeRecord, session: &mut ScanSession, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        session.set_baseline(record.device());

        let ctx = session.context();
        session.stats_mut().record_node(record, ctx.depth as u32);
        reporter.on_node(record, &ctx);

        if session.stats().nodes % PROGRESS_INTERVAL == 0 {
            self.send_progress(session, record.path.clone());
        }
    }

    fn report_failure<R>(&self, err: &InspectError, session: &mut ScanSession, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        // An unreadable link target still leaves a reportable node.
        if let Some(record) = err.record() {
            self.report_node(record, session, reporter);
        }
        self.report_issue(ScanIssue::from(err), session, reporter);
    }

    fn report_issue<R>(&self, issue: ScanIssue, session: &mut ScanSession, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        warn!(code = %issue.code, path = %issue.path.display(), "{}", issue.message);
        session.stats_mut().record_error(issue.code);
        reporter.on_error(&issue);
    }

    fn send_progress(&self, session: &ScanSession, current_path: PathBuf) {
        if self.progress_tx.receiver_count() > 0 {
            let _ = self
                .progress_tx
                .send(ScanProgress::snapshot(session, current_path));
        }
    }
}

impl Default for DirScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

fn points_to_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
