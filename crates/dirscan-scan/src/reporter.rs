//! Reporting sinks for traversal output.

use dirscan_core::{ErrorCode, NodeRecord, ScanIssue};

use crate::session::ScanContext;

/// Receives every node and every issue of a traversal.
///
/// Both callbacks run synchronously on the traversal thread, nodes in
/// depth-first pre-order. Implementations must not panic; failures inside a
/// reporter are the reporter's own business.
pub trait Reporter {
    /// Called once per successfully inspected node, before its children.
    fn on_node(&mut self, record: &NodeRecord, ctx: &ScanContext);

    /// Called once per failure. Only the failing branch is abandoned.
    fn on_error(&mut self, issue: &ScanIssue);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn on_node(&mut self, record: &NodeRecord, ctx: &ScanContext) {
        (**self).on_node(record, ctx);
    }

    fn on_error(&mut self, issue: &ScanIssue) {
        (**self).on_error(issue);
    }
}

/// Reporter built from two closures.
pub struct FnReporter<N, E> {
    on_node: N,
    on_error: E,
}

/// Build a reporter from a node callback and an error callback.
///
/// ```rust,no_run
/// use dirscan_scan::{DirScanner, ScanConfig, reporter_fn};
///
/// let mut count = 0;
/// let mut reporter = reporter_fn(
///     |_record, _ctx| count += 1,
///     |issue| eprintln!("{}", issue.message),
/// );
/// DirScanner::new(ScanConfig::new()).scan_roots(["."], &mut reporter);
/// ```
pub fn reporter_fn<N, E>(on_node: N, on_error: E) -> FnReporter<N, E>
where
    N: FnMut(&NodeRecord, &ScanContext),
    E: FnMut(&ScanIssue),
{
    FnReporter { on_node, on_error }
}

impl<N, E> Reporter for FnReporter<N, E>
where
    N: FnMut(&NodeRecord, &ScanContext),
    E: FnMut(&ScanIssue),
{
    fn on_node(&mut self, record: &NodeRecord, ctx: &ScanContext) {
        (self.on_node)(record, ctx);
    }

    fn on_error(&mut self, issue: &ScanIssue) {
        (self.on_error)(issue);
    }
}

/// Reporter that keeps everything it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    /// Reported nodes, in traversal order.
    pub nodes: Vec<NodeRecord>,
    /// Depth of each reported node.
    pub depths: Vec<usize>,
    /// Reported issues, in traversal order.
    pub issues: Vec<ScanIssue>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues with the given code.
    pub fn issues_with(&self, code: ErrorCode) -> impl Iterator<Item = &ScanIssue> {
        self.issues.iter().filter(move |issue| issue.code == code)
    }

    /// Position of the first node whose supplied path ends with `suffix`.
    pub fn position_of(&self, suffix: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.path.ends_with(suffix))
    }
}

impl Reporter for RecordingReporter {
    fn on_node(&mut self, record: &NodeRecord, ctx: &ScanContext) {
        self.nodes.push(record.clone());
        self.depths.push(ctx.depth);
    }

    fn on_error(&mut self, issue: &ScanIssue) {
        self.issues.push(issue.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fn_reporter_forwards_errors() {
        let mut seen = Vec::new();
        {
            let mut reporter = reporter_fn(|_, _| {}, |issue: &ScanIssue| seen.push(issue.code));
            reporter.on_error(&ScanIssue::new("x", "boom", ErrorCode::DirRead));
        }
        assert_eq!(seen, vec![ErrorCode::DirRead]);
    }

    #[test]
    fn test_recording_reporter_filters_issues() {
        let mut reporter = RecordingReporter::new();
        reporter.on_error(&ScanIssue::new("a", "loop", ErrorCode::DirLoop));
        reporter.on_error(&ScanIssue::new("b", "read", ErrorCode::DirRead));
        reporter.on_error(&ScanIssue::dir_loop("c", &PathBuf::from("/c")));

        assert_eq!(reporter.issues_with(ErrorCode::DirLoop).count(), 2);
        assert_eq!(reporter.issues_with(ErrorCode::ReadLink).count(), 0);
    }
}
