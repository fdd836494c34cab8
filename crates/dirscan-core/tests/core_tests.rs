use dirscan_core::{
    DeviceBaseline, ErrorCode, InodeInfo, InspectError, NameLookup, NodeKind, NodeRecord,
    Ownership, ScanConfig, ScanIssue, ScanStats, Timestamps,
};
use std::path::PathBuf;

fn sample_record(kind: NodeKind, size: u64) -> NodeRecord {
    NodeRecord {
        path: PathBuf::from("root/item"),
        canonical_path: PathBuf::from("/abs/root/item"),
        real_path: Some(PathBuf::from("/abs/root/item")),
        kind,
        inode: InodeInfo::new(42, 7),
        size,
        timestamps: Timestamps::from_unix((1, 0), (2, 0), (3, 0)),
        mode: 0o100644,
        ownership: Ownership {
            uid: 1000,
            gid: 1000,
            owner: NameLookup::Resolved("alice".into()),
            group: NameLookup::Unknown,
        },
        link_target: None,
    }
}

#[test]
fn test_inode_info() {
    let inode1 = InodeInfo::new(12345, 67890);
    assert_eq!(inode1.inode, 12345);
    assert_eq!(inode1.device, 67890);

    let inode2 = InodeInfo::new(12345, 67890);
    assert_eq!(inode1, inode2);
}

#[test]
fn test_record_accessors() {
    let record = sample_record(NodeKind::File, 10);
    assert_eq!(record.device(), 7);
}

#[test]
fn test_record_serializes_to_json() {
    let mut record = sample_record(NodeKind::Symlink, 5);
    record.link_target = Some(PathBuf::from("../target"));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["kind"], "symlink");
    assert_eq!(json["link_target"], "../target");
    assert_eq!(json["ownership"]["owner"]["status"], "resolved");
    assert_eq!(json["ownership"]["owner"]["name"], "alice");
    assert_eq!(json["ownership"]["group"]["status"], "unknown");
    assert_eq!(json["inode"]["device"], 7);
}

#[test]
fn test_stats_count_every_kind() {
    let mut stats = ScanStats::new();
    stats.record_node(&sample_record(NodeKind::Directory, 4096), 0);
    stats.record_node(&sample_record(NodeKind::File, 10), 1);
    stats.record_node(&sample_record(NodeKind::Symlink, 3), 1);
    stats.record_node(&sample_record(NodeKind::Other, 0), 2);

    assert_eq!(stats.nodes, 4);
    assert_eq!(stats.dirs, 1);
    assert_eq!(stats.files, 1);
    assert_eq!(stats.symlinks, 1);
    assert_eq!(stats.other, 1);
    assert_eq!(stats.total_size, 4109);
    assert_eq!(stats.max_depth, 2);
}

#[test]
fn test_link_read_error_keeps_record() {
    let record = sample_record(NodeKind::Symlink, 3);
    let err = InspectError::LinkRead {
        record: Box::new(record.clone()),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };

    assert_eq!(err.code(), ErrorCode::ReadLink);
    assert_eq!(err.path(), record.path.as_path());
    let issue = ScanIssue::from(&err);
    assert!(issue.message.contains("/abs/root/item"));
}

#[test]
fn test_config_from_builder_matches_literal() {
    let built = ScanConfig::builder()
        .flatten(true)
        .same_device(true)
        .build()
        .unwrap();
    let literal = ScanConfig {
        follow_symlinks: false,
        flatten: true,
        same_device: true,
        device_baseline: DeviceBaseline::FirstRoot,
    };
    assert_eq!(built, literal);
}
