//! Store configuration.

use crate::error::{StoreError, StoreResult};
use lockbox_crypto::KdfParams;
use lockbox_storage::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything needed to open a store except the credential.
///
/// The master credential is deliberately not part of this struct: it is
/// handed to [`crate::StoreHandle::open`] separately and consumed there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file. `None` opens an in-memory store.
    pub path: Option<PathBuf>,

    /// Argon2id cost parameters for deriving the session key.
    pub kdf: KdfParams,

    /// How long to wait for the database file lock, in milliseconds.
    pub open_timeout_ms: u64,

    /// DuckDB memory cap, e.g. `"64MB"`.
    pub memory_limit: String,

    /// DuckDB worker threads.
    pub threads: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            kdf: KdfParams::default(),
            open_timeout_ms: 1000,
            memory_limit: "64MB".to_string(),
            threads: 1,
        }
    }
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> StoreResult<Self> {
        serde_json::from_str(raw).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    pub(crate) fn store_options(&self) -> StoreOptions {
        StoreOptions {
            open_timeout: self.open_timeout(),
            memory_limit: self.memory_limit.clone(),
            threads: self.threads,
        }
    }
}
