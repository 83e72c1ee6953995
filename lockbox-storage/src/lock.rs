//! Exclusive ownership of a database file.
//!
//! DuckDB's own file lock is per process, so a second open of the same file
//! inside one process would succeed and produce an independent instance.
//! A sidecar `<db>.lock` file held with an exclusive `flock` for the
//! lifetime of the store closes that gap, across processes and within one.

use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Held for as long as the store is open. Unlocked when dropped.
#[derive(Debug)]
pub(crate) struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Takes the exclusive lock for `db_path`, polling until `timeout`.
    pub(crate) fn acquire(db_path: &Path, timeout: Duration) -> StorageResult<Self> {
        let path = lock_path(db_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let started = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => break,
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(StorageError::LockTimeout {
                            path: db_path.to_path_buf(),
                            waited,
                        });
                    }
                    warn!("{} is held by another store, waiting", db_path.display());
                    std::thread::sleep(LOCK_POLL_INTERVAL.min(timeout - waited));
                }
                Err(e) => return Err(e.into()),
            }
        }
        debug!("locked {}", path.display());
        Ok(Self { file, path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("failed to unlock {}: {e}", self.path.display());
        }
    }
}

fn lock_path(db_path: &Path) -> PathBuf {
    let mut name = OsString::from(db_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
