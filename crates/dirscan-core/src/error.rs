//! Error taxonomy for inspection and traversal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::NodeRecord;

/// Stable numeric error codes, suitable for persisting and comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[repr(u16)]
pub enum ErrorCode {
    /// A symbolic link leads back into a directory of the current branch.
    #[strum(serialize = "ERR_DIR_LOOP")]
    DirLoop = 1000,
    /// A directory listing could not be opened or enumerated.
    #[strum(serialize = "ERR_DIR_READ")]
    DirRead = 1001,
    /// A symbolic link's target could not be read.
    #[strum(serialize = "ERR_READLINK")]
    ReadLink = 1002,
    /// The path vanished before it could be inspected.
    #[strum(serialize = "ERR_NOT_FOUND")]
    NotFound = 1003,
    /// Canonical or real path computation failed.
    #[strum(serialize = "ERR_RESOLUTION")]
    Resolution = 1004,
    /// Non-dereferencing stat failed for another reason.
    #[strum(serialize = "ERR_STAT")]
    Stat = 1005,
}

impl ErrorCode {
    /// Numeric value of the code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Failure of the node inspector.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The path does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The entry exists but could not be stat'ed.
    #[error("Cannot stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An ancestor directory could not be resolved.
    #[error("Cannot resolve {path}: {source}")]
    Resolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A symlink was stat'ed but its target could not be read. The record is
    /// complete except for `link_target`.
    #[error("{source} ({})", .record.canonical_path.display())]
    LinkRead {
        record: Box<NodeRecord>,
        #[source]
        source: std::io::Error,
    },
}

impl InspectError {
    /// Create a stat error with path context.
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Stat { path, source },
        }
    }

    /// Create a resolution error with path context.
    pub fn resolution(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Resolution {
            path: path.into(),
            source,
        }
    }

    /// Path the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Stat { path, .. } | Self::Resolution { path, .. } => {
                path
            }
            Self::LinkRead { record, .. } => &record.path,
        }
    }

    /// The record built before the failure, for failures that still yield one.
    pub fn record(&self) -> Option<&NodeRecord> {
        match self {
            Self::LinkRead { record, .. } => Some(record.as_ref()),
            _ => None,
        }
    }

    /// Error code reported for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Stat { .. } => ErrorCode::Stat,
            Self::Resolution { .. } => ErrorCode::Resolution,
            Self::LinkRead { .. } => ErrorCode::ReadLink,
        }
    }
}

/// Non-fatal problem surfaced through a reporter's error callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanIssue {
    /// Path where the problem occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Stable error code.
    pub code: ErrorCode,
}

impl ScanIssue {
    /// Create a new scan issue.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
        }
    }

    /// A directory loop through `path`, whose canonical form is `canonical`.
    pub fn dir_loop(path: impl Into<PathBuf>, canonical: &Path) -> Self {
        let path = path.into();
        Self {
            message: format!("Infinite loop : {} ({})", path.display(), canonical.display()),
            path,
            code: ErrorCode::DirLoop,
        }
    }

    /// A directory whose listing failed.
    pub fn dir_read(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Cannot read directory {}: {error}", path.display()),
            path,
            code: ErrorCode::DirRead,
        }
    }
}

impl From<&InspectError> for ScanIssue {
    fn from(err: &InspectError) -> Self {
        Self::new(err.path(), err.to_string(), err.code())
    }
}
