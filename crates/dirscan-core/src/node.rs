//! File system node records.

use std::fs::FileType;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Type of file system node, taken from the non-dereferenced file type bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// Directory.
    Directory,
    /// Regular file.
    File,
    /// Symbolic link (never dereferenced).
    Symlink,
    /// Anything else: FIFOs, sockets, block and character devices.
    Other,
}

impl NodeKind {
    /// Classify a file type as returned by `symlink_metadata`.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            NodeKind::Symlink
        } else if file_type.is_dir() {
            NodeKind::Directory
        } else if file_type.is_file() {
            NodeKind::File
        } else {
            NodeKind::Other
        }
    }

    /// One-letter label used in tabular listings.
    pub fn short_label(self) -> &'static str {
        match self {
            NodeKind::Directory => "d",
            NodeKind::File => "f",
            NodeKind::Symlink => "l",
            NodeKind::Other => "o",
        }
    }
}

/// Inode and device pair identifying a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InodeInfo {
    /// Inode number.
    pub inode: u64,
    /// Device ID.
    pub device: u64,
}

impl InodeInfo {
    /// Create new inode info.
    pub fn new(inode: u64, device: u64) -> Self {
        Self { inode, device }
    }
}

/// Access, modification and status change times of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Last access time.
    pub accessed: DateTime<Utc>,
    /// Last content modification time.
    pub modified: DateTime<Utc>,
    /// Last status change time.
    pub changed: DateTime<Utc>,
}

impl Timestamps {
    /// Build timestamps from `(seconds, nanoseconds)` pairs as found in `stat`.
    pub fn from_unix(accessed: (i64, i64), modified: (i64, i64), changed: (i64, i64)) -> Self {
        Self {
            accessed: unix_time(accessed),
            modified: unix_time(modified),
            changed: unix_time(changed),
        }
    }

    /// Build timestamps from `SystemTime`s. Missing values fall back to the epoch.
    pub fn from_system_times(
        accessed: Option<SystemTime>,
        modified: Option<SystemTime>,
        changed: Option<SystemTime>,
    ) -> Self {
        let convert = |t: Option<SystemTime>| {
            t.map(DateTime::<Utc>::from).unwrap_or(DateTime::UNIX_EPOCH)
        };
        Self {
            accessed: convert(accessed),
            modified: convert(modified),
            changed: convert(changed),
        }
    }
}

fn unix_time((secs, nanos): (i64, i64)) -> DateTime<Utc> {
    let nanos = u32::try_from(nanos).unwrap_or(0);
    DateTime::from_timestamp(secs, nanos).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Outcome of an owner or group name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "name")]
pub enum NameLookup {
    /// The id maps to this name.
    Resolved(CompactString),
    /// The database has no entry for the id.
    Unknown,
    /// The platform has no user/group database.
    Unsupported,
}

impl NameLookup {
    /// Resolved name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            NameLookup::Resolved(name) => Some(name.as_str()),
            NameLookup::Unknown | NameLookup::Unsupported => None,
        }
    }
}

/// Numeric owner ids plus best-effort names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
    pub owner: NameLookup,
    pub group: NameLookup,
}

impl Ownership {
    /// Ownership without names, for platforms lacking a user database.
    pub fn unresolved(uid: u32, gid: u32) -> Self {
        Self {
            uid,
            gid,
            owner: NameLookup::Unsupported,
            group: NameLookup::Unsupported,
        }
    }
}

/// Immutable snapshot of one file system entry taken at scan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Path as supplied by the caller or built during traversal. May be relative.
    pub path: PathBuf,

    /// Absolute path with every ancestor resolved but the final component
    /// left as-is, so a link is distinguished from its target.
    pub canonical_path: PathBuf,

    /// Absolute path with the final component dereferenced as well.
    /// `None` only for a symlink whose target cannot be resolved.
    pub real_path: Option<PathBuf>,

    /// Node type.
    pub kind: NodeKind,

    /// Device and inode of the entry itself (not of a link target).
    pub inode: InodeInfo,

    /// Size in bytes as reported for the entry without dereferencing.
    pub size: u64,

    /// Access, modify and change times.
    pub timestamps: Timestamps,

    /// Raw permission and type bits.
    pub mode: u32,

    /// Owner and group.
    pub ownership: Ownership,

    /// Raw (unresolved) link target. Only set for symlinks.
    pub link_target: Option<PathBuf>,
}

impl NodeRecord {
    /// Device the entry resides on.
    pub fn device(&self) -> u64 {
        self.inode.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_timestamps() {
        let ts = Timestamps::from_unix((10, 0), (20, 500), (30, 0));
        assert_eq!(ts.accessed.timestamp(), 10);
        assert_eq!(ts.modified.timestamp(), 20);
        assert_eq!(ts.modified.timestamp_subsec_nanos(), 500);
        assert_eq!(ts.changed.timestamp(), 30);
    }

    #[test]
    fn test_invalid_nanos_fall_back_to_whole_seconds() {
        let ts = Timestamps::from_unix((10, -1), (0, 0), (0, 0));
        assert_eq!(ts.accessed.timestamp(), 10);
        assert_eq!(ts.accessed.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_missing_system_times() {
        let ts = Timestamps::from_system_times(None, Some(SystemTime::UNIX_EPOCH), None);
        assert_eq!(ts.accessed, DateTime::UNIX_EPOCH);
        assert_eq!(ts.modified, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(NodeKind::Directory.short_label(), "d");
        assert_eq!(NodeKind::Symlink.to_string(), "symlink");
        assert_eq!(NodeKind::Other.short_label(), "o");
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(NameLookup::Resolved("root".into()).name(), Some("root"));
        assert_eq!(NameLookup::Unknown.name(), None);
        assert_eq!(Ownership::unresolved(0, 0).owner, NameLookup::Unsupported);
    }
}
