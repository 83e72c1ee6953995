//! Shared helpers for lockbox-vault integration tests.

#![allow(dead_code)]

use lockbox_vault::{Credential, KdfParams, StoreConfig, StoreHandle};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber once per test binary. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lockbox_vault=debug,lockbox_storage=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// In-memory store with minimal KDF cost.
pub fn memory_store(credential: &str) -> StoreHandle {
    init_tracing();
    let config = StoreConfig::in_memory().with_kdf(KdfParams::testing());
    StoreHandle::open(&config, Credential::from(credential)).unwrap()
}

/// On-disk store at `path` with minimal KDF cost.
pub fn file_store(path: &Path, credential: &str) -> StoreHandle {
    init_tracing();
    let config = StoreConfig::at(path).with_kdf(KdfParams::testing());
    StoreHandle::open(&config, Credential::from(credential)).unwrap()
}

/// Stand-in for a gzip-compressed payload: magic, method, then data.
pub fn gzip_like(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff];
    out.extend_from_slice(data);
    out
}
