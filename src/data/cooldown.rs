//! Per-user command cooldowns persisted to a flat JSON file.
//!
//! The whole file is read into memory when the store is opened and
//! rewritten after every mutation. Values are unix timestamps in
//! milliseconds marking when a user may invoke a command again.
//!
//! The lock is never held across an ``. A mutation only sticks in
//! memory once the file write succeeded.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use serenity::UserId;

use crate::error::StoreError;
use crate::serenity;

/// Outcome of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cooldown {
    /// The command may run.
    Ready,
    /// The command may run after this much time.
    Wait(Duration),
}

/// Key-value store of cooldown expiry times, backed by a JSON file.
#[derive(Debug)]
pub struct CooldownStore {
    /// Location of the backing file.
    path: PathBuf,
    /// In-memory copy of the file.
    entries: Mutex<BTreeMap<String, i64>>,
}

impl CooldownStore {
    /// Reads the whole store from `path`.
    /// A missing file is an empty store, it gets created on the first write.
    /// An unreadable or malformed file is an error so cooldowns are never silently lost.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cooldown file at {}, starting empty.", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!("Loaded {} cooldown entries.", entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// The composite key for a user and command.
    pub fn key(user: UserId, command: &str) -> String {
        format!("{user}:{command}")
    }

    /// Get the stored timestamp for `key`.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.lock().get(key).copied()
    }

    /// Store `timestamp` for `key` and flush the file.
    pub fn set(&self, key: impl Into<String>, timestamp: i64) -> Result<(), StoreError> {
        let mut entries = self.lock();
        self.commit(&mut entries, key.into(), timestamp)
    }

    /// Check whether `key` is still cooling down at `now` (unix millis).
    pub fn check(&self, key: &str, now: i64) -> Cooldown {
        remaining(self.get(key), now)
    }

    /// Check `key` and, if it is ready, start a new cooldown of `duration`.
    /// The check and the write happen under one lock.
    pub fn throttle(&self, key: &str, now: i64, duration: Duration) -> Result<Cooldown, StoreError> {
        let mut entries = self.lock();

        let status = remaining(entries.get(key).copied(), now);
        if status == Cooldown::Ready {
            let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
            self.commit(&mut entries, key.to_string(), now.saturating_add(millis))?;
        }

        Ok(status)
    }

    /// A poisoned lock still holds a consistent map, mutations are undone on failure.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, i64>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `key`, flush, and restore the previous value if the flush failed.
    fn commit(
        &self,
        entries: &mut BTreeMap<String, i64>,
        key: String,
        timestamp: i64,
    ) -> Result<(), StoreError> {
        let previous = entries.insert(key.clone(), timestamp);

        if let Err(error) = self.flush(entries) {
            match previous {
                Some(previous) => entries.insert(key, previous),
                None => entries.remove(&key),
            };
            return Err(error);
        }

        Ok(())
    }

    /// Rewrite the backing file with `entries`.
    fn flush(&self, entries: &BTreeMap<String, i64>) -> Result<(), StoreError> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let content = serde_json::to_string_pretty(entries).map_err(|e| io_error(e.into()))?;
        std::fs::write(&self.path, content).map_err(io_error)
    }
}

/// Compare a stored expiry against `now`.
fn remaining(expiry: Option<i64>, now: i64) -> Cooldown {
    match expiry {
        Some(expiry) if now < expiry => {
            let millis = u64::try_from(expiry - now).unwrap_or_default();
            Cooldown::Wait(Duration::from_millis(millis))
        }
        _ => Cooldown::Ready,
    }
}

/// Current unix time in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod test {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, CooldownStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CooldownStore::open(dir.path().join("cooldowns.json")).expect("open store");
        (dir, store)
    }

    #[test]
    fn set_then_get_survives_reopen() {
        let (dir, store) = temp_store();
        store.set("42:ping", 1_700_000_000_123).unwrap();
        assert_eq!(store.get("42:ping"), Some(1_700_000_000_123));

        let reopened = CooldownStore::open(dir.path().join("cooldowns.json")).unwrap();
        assert_eq!(reopened.get("42:ping"), Some(1_700_000_000_123));
        assert_eq!(reopened.get("42:echo"), None);
    }

    #[test]
    fn rejects_until_expiry() {
        let (_dir, store) = temp_store();
        let now = 1_000_000;
        store.set("7:ping", now + 5000).unwrap();

        assert_eq!(
            store.check("7:ping", now),
            Cooldown::Wait(Duration::from_millis(5000))
        );
        assert_eq!(store.check("7:ping", now + 5000), Cooldown::Ready);
        assert_eq!(store.check("7:ping", now + 5001), Cooldown::Ready);
    }

    #[test]
    fn throttle_blocks_second_use_within_cooldown() {
        let (_dir, store) = temp_store();
        let key = CooldownStore::key(UserId::new(99), "echo");
        let cooldown = Duration::from_secs(10);
        let start = 5_000_000;

        let first = store.throttle(&key, start, cooldown).unwrap();
        assert_eq!(first, Cooldown::Ready);

        let second = store.throttle(&key, start + 3_000, cooldown).unwrap();
        assert_eq!(second, Cooldown::Wait(Duration::from_secs(7)));

        let third = store.throttle(&key, start + 10_000, cooldown).unwrap();
        assert_eq!(third, Cooldown::Ready);
        assert_eq!(store.get(&key), Some(start + 20_000));
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooldowns.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = CooldownStore::open(&path);
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let result = CooldownStore::open(dir.path().join("absent.json"));
        assert!(result.is_ok());
    }

    #[test]
    fn failed_write_leaves_no_cooldown_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = CooldownStore::open(dir.path().join("missing_dir").join("cooldowns.json")).unwrap();

        let result = store.throttle("1:ping", 1_000, Duration::from_secs(10));
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(store.check("1:ping", 2_000), Cooldown::Ready);
        assert_eq!(store.get("1:ping"), None);
    }

    #[test]
    fn failed_write_restores_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooldowns.json");
        let store = CooldownStore::open(&path).unwrap();
        store.set("1:ping", 5_000).unwrap();

        // A directory in place of the file makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.set("1:ping", 9_000).is_err());
        assert_eq!(store.get("1:ping"), Some(5_000));
    }

    #[test]
    fn key_combines_user_and_command() {
        assert_eq!(CooldownStore::key(UserId::new(12), "ping"), "12:ping");
    }
}
