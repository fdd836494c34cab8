//! Owner and group name lookup.

use std::collections::HashMap;

use dirscan_core::{NameLookup, Ownership};

/// Caches uid/gid to name lookups for the lifetime of a scan.
///
/// Most trees are owned by a handful of accounts, so each id is looked up
/// in the system database once.
#[derive(Debug, Default)]
pub struct NameCache {
    users: HashMap<u32, NameLookup>,
    groups: HashMap<u32, NameLookup>,
}

impl NameCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve ownership for a uid/gid pair.
    pub fn ownership(&mut self, uid: u32, gid: u32) -> Ownership {
        let owner = self
            .users
            .entry(uid)
            .or_insert_with(|| lookup_user(uid))
            .clone();
        let group = self
            .groups
            .entry(gid)
            .or_insert_with(|| lookup_group(gid))
            .clone();

        Ownership {
            uid,
            gid,
            owner,
            group,
        }
    }
}

/// Look up a user name in the system database.
#[cfg(unix)]
pub fn lookup_user(uid: u32) -> NameLookup {
    match uzers::get_user_by_uid(uid) {
        Some(user) => NameLookup::Resolved(user.name().to_string_lossy().into()),
        None => NameLookup::Unknown,
    }
}

#[cfg(not(unix))]
pub fn lookup_user(_uid: u32) -> NameLookup {
    NameLookup::Unsupported
}

/// Look up a group name in the system database.
#[cfg(unix)]
pub fn lookup_group(gid: u32) -> NameLookup {
    match uzers::get_group_by_gid(gid) {
        Some(group) => NameLookup::Resolved(group.name().to_string_lossy().into()),
        None => NameLookup::Unknown,
    }
}

#[cfg(not(unix))]
pub fn lookup_group(_gid: u32) -> NameLookup {
    NameLookup::Unsupported
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_root_user_resolves() {
        // uid 0 exists on every unix system we build for.
        assert_eq!(lookup_user(0), NameLookup::Resolved("root".into()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unassigned_id_is_unknown() {
        assert_eq!(lookup_user(u32::MAX - 7), NameLookup::Unknown);
        assert_eq!(lookup_group(u32::MAX - 7), NameLookup::Unknown);
    }

    #[test]
    fn test_cache_reuses_entries() {
        let mut cache = NameCache::new();
        assert!(cache.users.is_empty());

        let first = cache.ownership(0, 0);
        let second = cache.ownership(0, 0);

        assert_eq!(first, second);
        assert_eq!(cache.users.len(), 1);
        assert_eq!(cache.groups.len(), 1);
    }
}
