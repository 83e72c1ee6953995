//! Encrypted per-record store for lockbox.
//!
//! A [`StoreHandle`] derives a session key once from the master credential
//! and the store's salt, then seals every record individually with
//! ChaCha20-Poly1305 before it reaches the bucket store. One bucket holds
//! one object type; the record name is the cleartext key.
//!
//! Read failures fall into three classes the caller can always tell apart:
//! - [`StoreError::NotFound`]: no record under that name
//! - [`StoreError::Authentication`]: the session key does not open the blob
//! - [`StoreError::Decode`]: the blob opened but is not a valid record of
//!   the requested type
//!
//! ```no_run
//! use lockbox_vault::{Credential, File, StoreConfig, StoreHandle};
//!
//! let config = StoreConfig::at("/tmp/lockbox.db");
//! let store = StoreHandle::open(&config, Credential::from("correct horse"))?;
//! store.create(&File::new("id_ed25519", b"...".to_vec()))?;
//! let names = store.list_names::<File>()?;
//! store.close();
//! # Ok::<(), lockbox_vault::StoreError>(())
//! ```

mod config;
mod error;
mod handle;
mod records;

pub use config::StoreConfig;
pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use handle::{META_BUCKET, StoreHandle};

pub use lockbox_crypto::{Credential, KdfParams};
pub use lockbox_model::{
    Card, CardSummary, Entry, EntrySummary, File, FileSummary, NEVER_EXPIRES, Note, NoteSummary,
    Record, RecordKind, RecordView,
};
