//! Append-only revocation registry
//!
//! Revocation is a monotonic set of capsule ids: once an id enters, it never
//! leaves. Durability comes from an append-only JSONL log (one record per
//! line) that is replayed into memory at startup and flushed to disk before
//! `revoke` returns. Membership reads take a shared lock and stay O(1);
//! writes serialize under the exclusive lock covering both the append and
//! the in-memory insert.

use crate::error::RegistryError;
use crate::Result;
use aegis_core::identifiers::CapsuleId;
use aegis_core::time::{Clock, SystemClock};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One line of the revocation log. `revoked_at` is audit metadata; replay
/// and membership only use the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RevocationRecord {
    id: CapsuleId,
    revoked_at: u64,
}

#[derive(Debug)]
struct Inner {
    revoked: HashSet<CapsuleId>,
    log: Option<File>,
}

/// Durable set of revoked capsule ids.
#[derive(Debug)]
pub struct RevocationRegistry {
    inner: RwLock<Inner>,
}

impl RevocationRegistry {
    /// Open the registry backed by the JSONL log at `path`, replaying any
    /// existing records first. The parent directory is created if needed.
    ///
    /// A final line left torn by a crash mid-append is dropped with a
    /// warning; a malformed line anywhere else is an error, since it means
    /// the log was edited or corrupted rather than truncated.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| RegistryError::open(path, err))?;
            }
        }

        let mut revoked = HashSet::new();
        let mut torn_tail = false;
        if path.exists() {
            let data =
                fs::read_to_string(path).map_err(|err| RegistryError::open(path, err))?;
            torn_tail = !data.is_empty() && !data.ends_with('\n');
            let line_count = data.lines().count();
            for (index, line) in data.lines().enumerate() {
                match serde_json::from_str::<RevocationRecord>(line) {
                    Ok(record) => {
                        revoked.insert(record.id);
                    }
                    Err(_) if torn_tail && index + 1 == line_count => {
                        tracing::warn!(
                            path = %path.display(),
                            line = index + 1,
                            "dropping torn final revocation record"
                        );
                    }
                    Err(err) => {
                        return Err(RegistryError::replay(path, index + 1, err.to_string()));
                    }
                }
            }
        }

        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| RegistryError::open(path, err))?;
        if torn_tail {
            // terminate the torn line so the next record starts clean
            log.write_all(b"\n")
                .and_then(|()| log.sync_data())
                .map_err(RegistryError::append)?;
        }

        tracing::debug!(
            path = %path.display(),
            replayed = revoked.len(),
            "opened revocation registry"
        );
        Ok(Self {
            inner: RwLock::new(Inner {
                revoked,
                log: Some(log),
            }),
        })
    }

    /// In-memory registry with no backing log. For tests and demos only;
    /// revocations vanish on drop.
    pub fn ephemeral() -> Self {
        Self {
            inner: RwLock::new(Inner {
                revoked: HashSet::new(),
                log: None,
            }),
        }
    }

    /// Revoke a capsule id. Durable before return: the record is appended
    /// and synced while the write lock is held, then inserted into the set.
    /// Revoking an already-revoked id returns without a second append.
    pub fn revoke(&self, id: &CapsuleId) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.revoked.contains(id) {
            return Ok(());
        }

        if let Some(log) = inner.log.as_mut() {
            let record = RevocationRecord {
                id: id.clone(),
                revoked_at: SystemClock.unix_now(),
            };
            let line = serde_json::to_string(&record).map_err(|err| RegistryError::Append {
                reason: err.to_string(),
            })?;
            log.write_all(line.as_bytes())
                .and_then(|()| log.write_all(b"\n"))
                .and_then(|()| log.sync_data())
                .map_err(RegistryError::append)?;
        }

        inner.revoked.insert(id.clone());
        tracing::debug!(capsule = %id, "capsule revoked");
        Ok(())
    }

    /// Is this capsule id revoked? O(1) under a shared lock.
    pub fn is_revoked(&self, id: &CapsuleId) -> bool {
        self.inner.read().revoked.contains(id)
    }

    /// Number of revoked ids currently known.
    pub fn len(&self) -> usize {
        self.inner.read().revoked.len()
    }

    /// True if nothing has been revoked.
    pub fn is_empty(&self) -> bool {
        self.inner.read().revoked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn log_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
        dir.path().join("revocations.jsonl")
    }

    #[test]
    fn revoked_ids_are_members_and_others_are_not() {
        let registry = RevocationRegistry::ephemeral();
        let id = CapsuleId::new("c-1");

        assert!(!registry.is_revoked(&id));
        registry.revoke(&id).unwrap();
        assert!(registry.is_revoked(&id));
        assert!(!registry.is_revoked(&CapsuleId::new("c-2")));
    }

    #[test]
    fn revoke_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_path(&dir);
        let registry = RevocationRegistry::open(&path).unwrap();

        let id = CapsuleId::new("c-1");
        registry.revoke(&id).unwrap();
        registry.revoke(&id).unwrap();
        registry.revoke(&id).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        assert_eq!(data.lines().count(), 1);
        assert!(registry.is_revoked(&id));
    }

    #[test]
    fn revocations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_path(&dir);

        let registry = RevocationRegistry::open(&path).unwrap();
        registry.revoke(&CapsuleId::new("c-1")).unwrap();
        registry.revoke(&CapsuleId::new("c-2")).unwrap();
        drop(registry);

        let reopened = RevocationRegistry::open(&path).unwrap();
        assert!(reopened.is_revoked(&CapsuleId::new("c-1")));
        assert!(reopened.is_revoked(&CapsuleId::new("c-2")));
        assert!(!reopened.is_revoked(&CapsuleId::new("c-3")));
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/registry/revocations.jsonl");

        let registry = RevocationRegistry::open(&path).unwrap();
        registry.revoke(&CapsuleId::new("c-1")).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn torn_final_line_is_dropped_and_log_heals() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_path(&dir);
        fs::write(
            &path,
            "{\"id\":\"c-1\",\"revoked_at\":10}\n{\"id\":\"c-2\",\"revo",
        )
        .unwrap();

        let registry = RevocationRegistry::open(&path).unwrap();
        assert!(registry.is_revoked(&CapsuleId::new("c-1")));
        assert!(!registry.is_revoked(&CapsuleId::new("c-2")));

        // appends after the torn tail must land on their own lines
        registry.revoke(&CapsuleId::new("c-3")).unwrap();
        drop(registry);

        let reopened = RevocationRegistry::open(&path).unwrap();
        assert!(reopened.is_revoked(&CapsuleId::new("c-1")));
        assert!(reopened.is_revoked(&CapsuleId::new("c-3")));
    }

    #[test]
    fn malformed_interior_line_fails_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_path(&dir);
        fs::write(
            &path,
            "{\"id\":\"c-1\",\"revoked_at\":10}\nnot json\n{\"id\":\"c-2\",\"revoked_at\":11}\n",
        )
        .unwrap();

        assert_matches!(
            RevocationRegistry::open(&path),
            Err(RegistryError::Replay { line: 2, .. })
        );
    }

    #[test]
    fn membership_reads_run_alongside_writes() {
        let registry = RevocationRegistry::ephemeral();
        std::thread::scope(|scope| {
            for n in 0..4 {
                let registry = &registry;
                scope.spawn(move || {
                    for i in 0..50 {
                        let id = CapsuleId::new(format!("c-{n}-{i}"));
                        registry.revoke(&id).unwrap();
                        assert!(registry.is_revoked(&id));
                    }
                });
            }
        });
        assert_eq!(registry.len(), 200);
    }
}
