//! Node inspector: metadata snapshot of a single path.
//!
//! Inspection never follows the final path component. A symlink is reported
//! as a symlink, with its raw target read separately.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use dirscan_core::{InodeInfo, InspectError, NodeKind, NodeRecord, Timestamps};

use crate::owner::NameCache;

/// Inspect `path` without a shared name cache.
pub fn inspect(path: impl AsRef<Path>) -> Result<NodeRecord, InspectError> {
    inspect_with(path.as_ref(), &mut NameCache::new())
}

/// Inspect `path`, resolving owner and group names through `names`.
///
/// # Errors
///
/// - [`InspectError::NotFound`] if nothing exists at `path`.
/// - [`InspectError::Stat`] if the entry cannot be stat'ed.
/// - [`InspectError::Resolution`] if the parent directory cannot be resolved.
/// - [`InspectError::LinkRead`] if `path` is a symlink whose target cannot be
///   read. The error carries the otherwise complete record.
pub fn inspect_with(path: &Path, names: &mut NameCache) -> Result<NodeRecord, InspectError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| InspectError::stat(path, e))?;
    let kind = NodeKind::from_file_type(metadata.file_type());

    let canonical_path = resolve_parent(path)?;
    let real_path = match kind {
        // Dangling or unreadable target: the link itself is still a valid node.
        NodeKind::Symlink => fs::canonicalize(path).ok(),
        _ => Some(canonical_path.clone()),
    };

    let mut record = NodeRecord {
        path: path.to_path_buf(),
        canonical_path,
        real_path,
        kind,
        inode: InodeInfo::new(get_ino(&metadata), get_dev(&metadata)),
        size: metadata.len(),
        timestamps: get_timestamps(&metadata),
        mode: get_mode(&metadata),
        ownership: names.ownership(get_uid(&metadata), get_gid(&metadata)),
        link_target: None,
    };

    if kind == NodeKind::Symlink {
        match fs::read_link(path) {
            Ok(target) => record.link_target = Some(target),
            Err(source) => {
                return Err(InspectError::LinkRead {
                    record: Box::new(record),
                    source,
                });
            }
        }
    }

    Ok(record)
}

/// Absolute path of `path` with its ancestors resolved and the final
/// component kept as-is.
///
/// Fails with [`InspectError::NotFound`] if nothing exists at `path`; a
/// dangling symlink exists and resolves fine.
pub fn canonical_path(path: impl AsRef<Path>) -> Result<PathBuf, InspectError> {
    let path = path.as_ref();
    fs::symlink_metadata(path).map_err(|e| InspectError::stat(path, e))?;
    resolve_parent(path)
}

/// Absolute path of `path` with every component, including the last,
/// dereferenced.
pub fn real_path(path: impl AsRef<Path>) -> Result<PathBuf, InspectError> {
    let path = path.as_ref();
    fs::symlink_metadata(path).map_err(|e| InspectError::stat(path, e))?;
    fs::canonicalize(path).map_err(|e| InspectError::resolution(path, e))
}

fn resolve_parent(path: &Path) -> Result<PathBuf, InspectError> {
    let resolve = |p: &Path| fs::canonicalize(p).map_err(|e| InspectError::resolution(path, e));

    // `/`, `.` and paths ending in `..` have no final name and are never links.
    let Some(name) = path.file_name() else {
        return resolve(path);
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(resolve(parent)?.join(name))
}

// Cross-platform metadata helpers

/// Get the device ID from metadata.
#[cfg(unix)]
fn get_dev(metadata: &Metadata) -> u64 {
    metadata.dev()
}

#[cfg(not(unix))]
fn get_dev(_metadata: &Metadata) -> u64 {
    0
}

/// Get the inode number from metadata.
#[cfg(unix)]
fn get_ino(metadata: &Metadata) -> u64 {
    metadata.ino()
}

#[cfg(not(unix))]
fn get_ino(_metadata: &Metadata) -> u64 {
    0
}

/// Get the raw mode bits from metadata.
#[cfg(unix)]
fn get_mode(metadata: &Metadata) -> u32 {
    metadata.mode()
}

#[cfg(not(unix))]
fn get_mode(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}

#[cfg(unix)]
fn get_uid(metadata: &Metadata) -> u32 {
    metadata.uid()
}

#[cfg(not(unix))]
fn get_uid(_metadata: &Metadata) -> u32 {
    0
}

#[cfg(unix)]
fn get_gid(metadata: &Metadata) -> u32 {
    metadata.gid()
}

#[cfg(not(unix))]
fn get_gid(_metadata: &Metadata) -> u32 {
    0
}

#[cfg(unix)]
fn get_timestamps(metadata: &Metadata) -> Timestamps {
    Timestamps::from_unix(
        (metadata.atime(), metadata.atime_nsec()),
        (metadata.mtime(), metadata.mtime_nsec()),
        (metadata.ctime(), metadata.ctime_nsec()),
    )
}

#[cfg(not(unix))]
fn get_timestamps(metadata: &Metadata) -> Timestamps {
    // No status change time outside unix; modification time stands in.
    Timestamps::from_system_times(
        metadata.accessed().ok(),
        metadata.modified().ok(),
        metadata.modified().ok(),
    )
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir(root.join("dir")).unwrap();
        fs::write(root.join("dir/file.txt"), "hello").unwrap();
        symlink(root.join("dir"), root.join("link-dir")).unwrap();
        symlink("dir/file.txt", root.join("link-file")).unwrap();
        symlink("nowhere", root.join("dangling")).unwrap();
        (temp, root)
    }

    #[test]
    fn test_kinds_match_file_system() {
        let (_temp, root) = sandbox();

        assert_eq!(inspect(root.join("dir")).unwrap().kind, NodeKind::Directory);
        assert_eq!(inspect(root.join("dir/file.txt")).unwrap().kind, NodeKind::File);
        assert_eq!(inspect(root.join("link-dir")).unwrap().kind, NodeKind::Symlink);
        assert_eq!(inspect(root.join("dangling")).unwrap().kind, NodeKind::Symlink);
    }

    #[test]
    fn test_file_metadata() {
        let (_temp, root) = sandbox();
        let record = inspect(root.join("dir/file.txt")).unwrap();
        let metadata = fs::symlink_metadata(root.join("dir/file.txt")).unwrap();

        assert_eq!(record.size, 5);
        assert_eq!(record.inode.inode, metadata.ino());
        assert_eq!(record.inode.device, metadata.dev());
        assert_eq!(record.mode, metadata.mode());
        assert_eq!(record.ownership.uid, metadata.uid());
        assert_eq!(record.timestamps.modified.timestamp(), metadata.mtime());
        assert!(record.link_target.is_none());
    }

    #[test]
    fn test_symlink_is_not_dereferenced() {
        let (_temp, root) = sandbox();
        let record = inspect(root.join("link-dir")).unwrap();

        assert_eq!(record.canonical_path, root.join("link-dir"));
        assert_eq!(record.real_path, Some(root.join("dir")));
        assert_eq!(record.link_target, Some(root.join("dir")));
    }

    #[test]
    fn test_relative_link_target_is_raw() {
        let (_temp, root) = sandbox();
        let record = inspect(root.join("link-file")).unwrap();

        assert_eq!(record.link_target, Some(PathBuf::from("dir/file.txt")));
        assert_eq!(record.real_path, Some(root.join("dir/file.txt")));
        assert_eq!(record.size, "dir/file.txt".len() as u64);
    }

    #[test]
    fn test_dangling_link_has_no_real_path() {
        let (_temp, root) = sandbox();
        let record = inspect(root.join("dangling")).unwrap();

        assert_eq!(record.canonical_path, root.join("dangling"));
        assert!(record.real_path.is_none());
        assert_eq!(record.link_target, Some(PathBuf::from("nowhere")));
    }

    #[test]
    fn test_missing_path() {
        let (_temp, root) = sandbox();
        let err = inspect(root.join("missing")).unwrap_err();
        assert!(matches!(err, InspectError::NotFound { .. }));

        let err = canonical_path(root.join("no-dir/no-file")).unwrap_err();
        assert!(matches!(err, InspectError::NotFound { .. }));
    }

    #[test]
    fn test_canonical_path_resolves_ancestors_only() {
        let (_temp, root) = sandbox();

        assert_eq!(
            canonical_path(root.join("link-dir/file.txt")).unwrap(),
            root.join("dir/file.txt")
        );
        assert_eq!(canonical_path(root.join("link-dir")).unwrap(), root.join("link-dir"));
        assert_eq!(canonical_path(root.join("dir/..")).unwrap(), root);
    }

    #[test]
    fn test_real_path_matches_canonicalize() {
        let (_temp, root) = sandbox();
        for name in ["dir", "dir/file.txt", "link-dir", "link-file"] {
            let path = root.join(name);
            assert_eq!(real_path(&path).unwrap(), fs::canonicalize(&path).unwrap());
            assert_eq!(
                inspect(&path).unwrap().real_path,
                Some(fs::canonicalize(&path).unwrap())
            );
        }
        assert!(matches!(
            real_path(root.join("dangling")),
            Err(InspectError::Resolution { .. })
        ));
    }

    #[test]
    fn test_supplied_path_is_kept_verbatim() {
        let (_temp, root) = sandbox();
        let dir = root.join("dir");
        let record = inspect_with(&dir.join(".").join("file.txt"), &mut NameCache::new()).unwrap();

        assert_eq!(record.path, dir.join(".").join("file.txt"));
        assert_eq!(record.canonical_path, root.join("dir/file.txt"));
    }
}
