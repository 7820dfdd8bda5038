//! Core mapping type and its write-through lifecycle.

use crate::error::{Error, Result};
use crate::identity::StorageIdentity;
use crate::ledger::ChangeLedger;
use crate::persist;
use crate::Mapping;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Persistent string-keyed mapping that mirrors itself to a backing file.
///
/// Every mutation re-encodes the whole mapping and rewrites the file in the
/// format named by the construction token, so the file always reflects the
/// last successful write. Use [`open`](Self::open) to derive the backing path
/// from the token, [`open_at`](Self::open_at) to place the file yourself, or
/// [`new`](Self::new) for a purely in-memory mapping.
///
/// Alongside the entries the mapping keeps a change ledger: every key written
/// here or picked up from disk is marked touched until it is read back with
/// [`get`](Self::get) or swept out by [`items`](Self::items). Poll the ledger
/// with [`item_changed`](Self::item_changed) to learn what moved since the
/// last full read.
///
/// Failed writes are logged and swallowed rather than bubbled up, so the
/// in-memory mapping stays usable on a read-only or missing directory. Call
/// [`store`](Self::store) directly when you need the error.
pub struct MirrorMap {
    entries: Mapping,
    ledger: ChangeLedger,
    identity: Option<StorageIdentity>,
}

impl MirrorMap {
    /// Create an empty in-memory mapping with no backing file.
    ///
    /// Reads, writes, and the change ledger behave exactly as in the
    /// persistent flavors; [`load`](Self::load) and the implicit
    /// write-through are no-ops.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mapping::new(),
            ledger: ChangeLedger::new(),
            identity: None,
        }
    }

    /// Open (or create) a mapping named by `token`, e.g. `"users.json"`.
    ///
    /// The token is `<name>.<format>`; the backing file lands in the current
    /// working directory as `<name>.<canonical extension>`. An unrecognized
    /// format tag falls back to YAML with a logged warning. Existing file
    /// contents are loaded immediately and every loaded key starts out
    /// marked touched.
    pub fn open(token: &str) -> Result<Self> {
        Self::open_inner(token, None)
    }

    /// Open (or create) a mapping named by `token`, backed by `path`.
    ///
    /// Same token rules as [`open`](Self::open); only the file location
    /// changes. The path is used as given, extension included.
    pub fn open_at(token: &str, path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_inner(token, Some(path.into()))
    }

    fn open_inner(token: &str, explicit_path: Option<PathBuf>) -> Result<Self> {
        let identity = StorageIdentity::resolve(token, explicit_path)?;
        log::debug!(
            "mapping {:?} backed by {} ({})",
            identity.name(),
            identity.path().display(),
            identity.format()
        );
        let mut map = Self {
            entries: Mapping::new(),
            ledger: ChangeLedger::new(),
            identity: Some(identity),
        };
        map.load();
        Ok(map)
    }

    // ---- reads ----

    /// Get the value for `key`, clearing its oldest touched mark.
    ///
    /// A successful read consumes one ledger entry for the key (the earliest
    /// one, if it was touched more than once); a miss returns
    /// [`Error::KeyNotFound`] and leaves the ledger alone.
    pub fn get(&mut self, key: &str) -> Result<Value> {
        match self.entries.get(key) {
            Some(value) => {
                log::debug!("get {key:?}");
                let value = value.clone();
                self.ledger.consume(key);
                Ok(value)
            }
            None => Err(Error::KeyNotFound(key.to_owned())),
        }
    }

    /// `true` if the key exists. Does not touch the change ledger.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all key-value pairs in insertion order, clearing the
    /// change ledger.
    ///
    /// This is the "read everything" counterpart to [`get`](Self::get): after
    /// it returns, [`item_changed`](Self::item_changed) reports a clean
    /// ledger until the next write or [`load`](Self::load).
    #[must_use]
    pub fn items(&mut self) -> Vec<(String, Value)> {
        log::debug!("sweep of {} entries", self.entries.len());
        self.ledger.clear();
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of all keys in insertion order. Does not touch the ledger.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Snapshot of all values in insertion order. Does not touch the ledger.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.entries.values().cloned().collect()
    }

    /// Whether anything was touched since the last full read, plus the
    /// touched keys in the order they were written.
    ///
    /// A key written twice appears twice until reads catch up; see
    /// [`get`](Self::get) and [`items`](Self::items) for how marks are
    /// cleared.
    #[must_use]
    pub fn item_changed(&self) -> (bool, Vec<String>) {
        (self.ledger.is_dirty(), self.ledger.keys().to_vec())
    }

    /// The resolved name, format, and path, or `None` for an in-memory
    /// mapping.
    #[must_use]
    pub fn identity(&self) -> Option<&StorageIdentity> {
        self.identity.as_ref()
    }

    /// Path to the backing file, or `None` for an in-memory mapping.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.identity.as_ref().map(StorageIdentity::path)
    }

    // ---- writes ----

    /// Insert a key-value pair, mark the key touched, and write the whole
    /// mapping through to disk.
    ///
    /// Overwriting keeps the key's original position in the insertion order.
    /// A failed write is logged and swallowed; the in-memory entry sticks.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        log::debug!("set {key:?}");
        self.ledger.record(&key);
        self.entries.insert(key, value.into());
        self.write_through();
    }

    /// Bulk-insert from an iterator. Marks every incoming key touched but
    /// only writes through once at the end, not once per entry.
    pub fn update<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let merged = self.merge(pairs);
        log::debug!("update of {merged} pairs");
        self.write_through();
    }

    // ---- persistence ----

    /// Merge the backing file's contents into the mapping.
    ///
    /// Loaded keys overwrite in-memory ones and every loaded key is marked
    /// touched, same as a write. A missing or unreadable file contributes
    /// nothing (logged, never an error), so a fresh mapping on a fresh path
    /// simply starts empty. No-op for in-memory mappings.
    pub fn load(&mut self) {
        let (path, format) = match &self.identity {
            Some(identity) => (identity.path().to_path_buf(), identity.format()),
            None => return,
        };
        let loaded = persist::read(&path, format);
        log::debug!("loaded {} entries from {}", loaded.len(), path.display());
        self.merge(loaded);
    }

    /// Encode the mapping and rewrite the backing file (atomic temp-file +
    /// rename). `Ok(())` without touching disk for in-memory mappings.
    ///
    /// This is the fallible twin of the implicit write-through: call it when
    /// you want the I/O or encoding error instead of a log line.
    pub fn store(&self) -> Result<()> {
        match &self.identity {
            Some(identity) => {
                log::debug!("store to {}", identity.path().display());
                persist::write(identity.path(), identity.format(), &self.entries)
            }
            None => Ok(()),
        }
    }

    // ---- internal ----

    fn merge<I, K, V>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut merged = 0;
        for (key, value) in pairs {
            let key = key.into();
            self.ledger.record(&key);
            self.entries.insert(key, value.into());
            merged += 1;
        }
        merged
    }

    fn write_through(&self) {
        let identity = match &self.identity {
            Some(identity) => identity,
            None => return,
        };
        if let Err(e) = self.store() {
            log::error!(
                "write-through to {} failed: {e}; keeping in-memory state, file is stale",
                identity.path().display()
            );
        }
    }
}

impl Default for MirrorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MirrorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorMap")
            .field("identity", &self.identity)
            .field("len", &self.entries.len())
            .field("dirty", &self.ledger.is_dirty())
            .finish_non_exhaustive()
    }
}
