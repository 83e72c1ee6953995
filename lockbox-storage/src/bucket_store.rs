//! Bucket store handle and transaction entry points.

use crate::error::{StorageError, StorageResult};
use crate::lock::StoreLock;
use crate::tx::{ReadTx, WriteTx};
use duckdb::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Options applied when opening a file-backed store.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    /// How long to wait for another holder to release the database file lock.
    pub open_timeout: Duration,
    /// DuckDB `memory_limit` pragma, e.g. `"64MB"`.
    pub memory_limit: String,
    /// DuckDB `threads` pragma.
    pub threads: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            open_timeout: Duration::from_secs(1),
            memory_limit: "64MB".to_string(),
            threads: 1,
        }
    }
}

/// Ordered, transactional key-value store with named buckets.
pub struct BucketStore {
    /// Never used for queries; readers clone a fresh connection from it.
    base: Mutex<Connection>,
    /// The only connection that writes.
    writer: Mutex<Connection>,
    path: Option<PathBuf>,
    /// Declared last so the connections close before the lock is released.
    _lock: Option<StoreLock>,
}

impl BucketStore {
    /// Opens or creates a store at `path`.
    ///
    /// Waits up to `options.open_timeout` for any other store holding the
    /// same file to close.
    pub fn open(path: &Path, options: &StoreOptions) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let started = Instant::now();
        let lock = StoreLock::acquire(path, options.open_timeout)?;
        let remaining = options.open_timeout.saturating_sub(started.elapsed());
        let conn = crate::open_duckdb_with_lock_timeout(
            path,
            remaining,
            &options.memory_limit,
            options.threads,
        )?;
        Self::from_connection(conn, Some(path.to_path_buf()), Some(lock))
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, None, None)
    }

    fn from_connection(
        conn: Connection,
        path: Option<PathBuf>,
        lock: Option<StoreLock>,
    ) -> StorageResult<Self> {
        let writer = conn.try_clone()?;
        Ok(Self {
            base: Mutex::new(conn),
            writer: Mutex::new(writer),
            path,
            _lock: lock,
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs `f` inside a read transaction.
    pub fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&ReadTx<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut conn = {
            let base = self.base.lock().map_err(|_| StorageError::Poisoned)?;
            base.try_clone().map_err(StorageError::from)?
        };
        let tx = ReadTx::new(conn.transaction().map_err(StorageError::from)?);
        f(&tx)
    }

    /// Runs `f` inside a read-write transaction, committing on `Ok`.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&WriteTx<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut conn = self.writer.lock().map_err(|_| StorageError::Poisoned)?;
        let tx = WriteTx::new(conn.transaction().map_err(StorageError::from)?);
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Drops a bucket and all of its records. Returns whether it existed.
    pub fn delete_bucket(&self, bucket: &str) -> StorageResult<bool> {
        self.update(|tx| tx.delete_bucket(bucket))
    }

    /// Names of all buckets, in ascending order.
    pub fn bucket_names(&self) -> StorageResult<Vec<String>> {
        self.view(|tx| tx.bucket_names())
    }
}
