//! DuckDB storage layer for lockbox.
//!
//! Exposes DuckDB as an ordered, transactional key-value store with named
//! buckets. Each bucket is a two-column table (`name`, `value`); keys are
//! plaintext identifiers and values are opaque blobs.
//!
//! # Transactions
//!
//! - [`BucketStore::view`] runs a closure inside a read transaction on a
//!   dedicated connection, so readers proceed concurrently and each sees a
//!   consistent snapshot.
//! - [`BucketStore::update`] runs a closure inside a read-write transaction.
//!   Writers serialize on a mutex. The transaction commits when the closure
//!   returns `Ok` and rolls back otherwise.
//!
//! # Ownership
//!
//! A file-backed store holds an exclusive lock on `<db>.lock` until it is
//! dropped. A second [`BucketStore::open`] on the same file, in this process
//! or another, waits up to [`StoreOptions::open_timeout`] and then fails with
//! [`StorageError::LockTimeout`].

mod bucket_store;
mod error;
mod lock;
mod tx;

pub use bucket_store::{BucketStore, StoreOptions};
pub use error::{StorageError, StorageResult};
pub use tx::{ReadTx, WriteTx, validate_bucket_name};

use std::path::Path;
use std::time::{Duration, Instant};
use tracing::warn;

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Open a DuckDB file, waiting up to `timeout` for another holder's file lock.
///
/// DuckDB refuses to open a database whose file lock is held elsewhere. The
/// open is retried on lock conflicts until the timeout elapses; any other
/// error is returned immediately.
pub fn open_duckdb_with_lock_timeout(
    path: &Path,
    timeout: Duration,
    memory_limit: &str,
    threads: u32,
) -> StorageResult<duckdb::Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let started = Instant::now();
    let conn = loop {
        match duckdb::Connection::open(path) {
            Ok(c) => break c,
            Err(e) if is_lock_conflict(&e) => {
                let waited = started.elapsed();
                if waited >= timeout {
                    return Err(StorageError::LockTimeout {
                        path: path.to_path_buf(),
                        waited,
                    });
                }
                warn!("database {} is locked, retrying: {e}", path.display());
                std::thread::sleep(LOCK_POLL_INTERVAL.min(timeout - waited));
            }
            Err(e) => return Err(e.into()),
        }
    };
    apply_resource_limits(&conn, memory_limit, threads)?;
    Ok(conn)
}

/// Whether a DuckDB open error is caused by a file lock held elsewhere.
pub fn is_lock_conflict(err: &duckdb::Error) -> bool {
    let msg = err.to_string().to_ascii_lowercase();
    msg.contains("could not set lock") || msg.contains("conflicting lock")
}

/// Apply memory and thread limits to a DuckDB connection.
fn apply_resource_limits(
    conn: &duckdb::Connection,
    memory_limit: &str,
    threads: u32,
) -> StorageResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA memory_limit='{}'; PRAGMA threads={};",
        memory_limit.replace('\'', ""),
        threads.max(1)
    ))?;
    Ok(())
}
