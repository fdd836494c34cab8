//! Output reporters for the command line.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use serde_json::{Map, Value, json};

use dirscan_scan::{NodeKind, NodeRecord, Reporter, ScanConfig, ScanContext, ScanIssue, real_path};

const HUMAN_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Column selection for the tab-separated listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Add access time columns.
    pub access: bool,
    /// Add human-readable local times beside unix timestamps.
    pub human_time: bool,
}

/// Writer that keeps the first I/O error instead of failing mid-scan.
struct Sink<W> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> Sink<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn write_with(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_none() {
            if let Err(err) = f(&mut self.writer) {
                self.error = Some(err);
            }
        }
    }

    fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Tab-separated listing, one row per node, errors one per line.
pub struct TextReporter<W: Write, E: Write> {
    out: Sink<W>,
    err: Sink<E>,
    options: TextOptions,
}

impl<W: Write, E: Write> TextReporter<W, E> {
    pub fn new(out: W, err: E, options: TextOptions) -> Self {
        Self {
            out: Sink::new(out),
            err: Sink::new(err),
            options,
        }
    }

    /// Print the run description and the column header row.
    pub fn write_header(&mut self, targets: &[PathBuf], config: &ScanConfig) -> io::Result<()> {
        let now = Local::now();
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let start_device = targets
            .first()
            .and_then(|t| dirscan_scan::inspect(t).ok())
            .map(|r| r.device().to_string())
            .unwrap_or_default();
        let argv: Vec<String> = std::env::args().collect();
        let settings = serde_json::to_string(config).map_err(io::Error::from)?;
        let argv = serde_json::to_string(&argv).map_err(io::Error::from)?;
        let columns = self.column_names().join("\t");

        let w = &mut self.out.writer;
        writeln!(w, "time: {}", now.timestamp())?;
        writeln!(w, "date: {}", now.to_rfc2822())?;
        writeln!(w, "TZ: {}", std::env::var("TZ").unwrap_or_default())?;
        writeln!(w, "dirscan version: {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(w, "cwd: {cwd}")?;
        for target in targets {
            let real = real_path(target)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            writeln!(w, "target: {} (realpath: {real})", target.display())?;
        }
        writeln!(w, "start device: {start_device}")?;
        writeln!(w, "settings: {settings}")?;
        writeln!(w, "argv: {argv}")?;
        writeln!(w, "=====================================")?;
        writeln!(w, "{columns}")
    }

    /// Flush output and surface the first write failure, if any.
    pub fn finish(self) -> io::Result<(W, E)> {
        let out = self.out.finish()?;
        let err = self.err.finish()?;
        Ok((out, err))
    }

    fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec!["Unique path", "Type", "Size", "ctime"];
        if self.options.human_time {
            names.push("Change time");
        }
        names.push("mtime");
        if self.options.human_time {
            names.push("Modify time");
        }
        if self.options.access {
            names.push("atime");
            if self.options.human_time {
                names.push("Access time");
            }
        }
        names.push("Extended");
        names
    }

    fn row(&self, record: &NodeRecord, ctx: &ScanContext) -> Vec<String> {
        let times = &record.timestamps;
        let mut row = vec![
            record.canonical_path.display().to_string(),
            type_label(record).to_string(),
            record.size.to_string(),
        ];

        self.push_time(&mut row, times.changed);
        self.push_time(&mut row, times.modified);
        if self.options.access {
            self.push_time(&mut row, times.accessed);
        }

        let mut extended = Map::new();
        if let Some(target) = &record.link_target {
            extended.insert("target".into(), json!(target.display().to_string()));
        }
        if ctx.is_foreign_device(record.device()) {
            extended.insert("device".into(), json!(record.device()));
        }
        if !extended.is_empty() {
            row.push(Value::Object(extended).to_string());
        }

        row
    }

    fn push_time(&self, row: &mut Vec<String>, time: DateTime<Utc>) {
        row.push(time.timestamp().to_string());
        if self.options.human_time {
            row.push(
                time.with_timezone(&Local)
                    .format(HUMAN_TIME_FORMAT)
                    .to_string(),
            );
        }
    }
}

impl<W: Write, E: Write> Reporter for TextReporter<W, E> {
    fn on_node(&mut self, record: &NodeRecord, ctx: &ScanContext) {
        let line = self.row(record, ctx).join("\t");
        self.out.write_with(|w| writeln!(w, "{line}"));
    }

    fn on_error(&mut self, issue: &ScanIssue) {
        self.err.write_with(|w| writeln!(w, "{}", issue.message));
    }
}

/// One JSON object per line: node records on `out`, issues on `err`.
pub struct JsonReporter<W: Write, E: Write> {
    out: Sink<W>,
    err: Sink<E>,
}

impl<W: Write, E: Write> JsonReporter<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out: Sink::new(out),
            err: Sink::new(err),
        }
    }

    /// Flush output and surface the first write failure, if any.
    pub fn finish(self) -> io::Result<(W, E)> {
        let out = self.out.finish()?;
        let err = self.err.finish()?;
        Ok((out, err))
    }
}

impl<W: Write, E: Write> Reporter for JsonReporter<W, E> {
    fn on_node(&mut self, record: &NodeRecord, _ctx: &ScanContext) {
        self.out.write_with(|w| {
            serde_json::to_writer(&mut *w, record)?;
            writeln!(w)
        });
    }

    fn on_error(&mut self, issue: &ScanIssue) {
        self.err.write_with(|w| {
            let value = json!({
                "path": issue.path.display().to_string(),
                "code": issue.code.as_u16(),
                "kind": issue.code.to_string(),
                "message": issue.message,
            });
            serde_json::to_writer(&mut *w, &value)?;
            writeln!(w)
        });
    }
}

/// Type column: one letter for common kinds, a name for special files.
fn type_label(record: &NodeRecord) -> &'static str {
    match record.kind {
        NodeKind::Other => special_file_label(record.mode),
        kind => kind.short_label(),
    }
}

fn special_file_label(mode: u32) -> &'static str {
    match mode & 0o170000 {
        0o010000 => "fifo",
        0o020000 => "char",
        0o060000 => "block",
        0o140000 => "socket",
        _ => "unknown",
    }
}
