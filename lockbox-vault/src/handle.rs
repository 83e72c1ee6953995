//! Store lifecycle: open, credential check, rekey, close.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use lockbox_crypto::{Credential, DerivedKey, KdfParams, Salt, derive_key, open, seal};
use lockbox_storage::BucketStore;
use std::fmt;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Bucket holding store-level metadata. Never holds records.
pub const META_BUCKET: &str = "lockbox_meta";

const SALT_KEY: &str = "salt";
const VERIFICATION_KEY: &str = "verification";

/// Sealed under the session key at first open; opening it later tells
/// whether the current credential is the one the store was created with.
const VERIFICATION_PLAINTEXT: &[u8] = b"lockbox-verification-token-v1";

/// An open store. Owns the session key for its whole lifetime.
///
/// The key is derived once in [`StoreHandle::open`] and zeroed when the
/// handle is closed or dropped. All record operations take `&self`, so a
/// handle can be shared between threads.
pub struct StoreHandle {
    pub(crate) store: BucketStore,
    pub(crate) key: DerivedKey,
    kdf: KdfParams,
}

impl StoreHandle {
    /// Opens the store described by `config` and derives the session key.
    ///
    /// A wrong credential is not rejected here; reads fail with
    /// [`StoreError::Authentication`] instead. Use
    /// [`StoreHandle::verify_credential`] to check up front.
    pub fn open(config: &StoreConfig, credential: Credential) -> StoreResult<Self> {
        let store = match &config.path {
            Some(path) => BucketStore::open(path, &config.store_options())?,
            None => BucketStore::open_in_memory()?,
        };
        Self::open_with_store(store, &config.kdf, credential)
    }

    /// Derives the session key for an already opened bucket store.
    pub fn open_with_store(
        store: BucketStore,
        kdf: &KdfParams,
        credential: Credential,
    ) -> StoreResult<Self> {
        let salt = load_or_create_salt(&store)?;
        let key = derive_key(&credential, &salt, kdf).map_err(StoreError::Crypto)?;
        drop(credential);

        let handle = Self {
            store,
            key,
            kdf: *kdf,
        };
        handle.ensure_verification_token()?;

        info!(
            "opened store {}",
            handle
                .store
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ":memory:".to_string())
        );
        Ok(handle)
    }

    /// Closes the store, zeroing the session key.
    pub fn close(self) {
        info!("closing store");
        drop(self);
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// The underlying bucket store, for administrative access.
    pub fn bucket_store(&self) -> &BucketStore {
        &self.store
    }

    /// Checks the session key against the token sealed at first open.
    pub fn verify_credential(&self) -> StoreResult<()> {
        let token = self
            .store
            .view(|tx| tx.get(META_BUCKET, VERIFICATION_KEY))?
            .ok_or_else(|| StoreError::not_found(META_BUCKET, VERIFICATION_KEY))?;
        let plaintext = open(&self.key, &token)
            .map_err(|e| StoreError::from_open(META_BUCKET, VERIFICATION_KEY, e))?;
        if plaintext != VERIFICATION_PLAINTEXT {
            return Err(StoreError::Authentication {
                bucket: META_BUCKET.to_string(),
                name: VERIFICATION_KEY.to_string(),
            });
        }
        Ok(())
    }

    /// Re-derives the session key from `credential` with a fresh salt and
    /// re-seals every record in every bucket.
    ///
    /// Runs in a single write transaction: if any record fails to open under
    /// the current key, nothing is changed.
    pub fn rekey(&mut self, credential: Credential) -> StoreResult<()> {
        let salt = Salt::random();
        let new_key = derive_key(&credential, &salt, &self.kdf).map_err(StoreError::Crypto)?;
        drop(credential);

        let old_key = &self.key;
        let resealed = self.store.update(|tx| -> StoreResult<usize> {
            let mut count = 0usize;
            for bucket in tx.bucket_names()? {
                if bucket == META_BUCKET {
                    continue;
                }
                for (name, blob) in tx.entries(&bucket)? {
                    let plaintext = Zeroizing::new(
                        open(old_key, &blob).map_err(|e| StoreError::from_open(&bucket, &name, e))?,
                    );
                    let sealed = seal(&new_key, &plaintext).map_err(StoreError::Crypto)?;
                    tx.put(&bucket, &name, &sealed)?;
                    count += 1;
                }
            }

            let token = seal(&new_key, VERIFICATION_PLAINTEXT).map_err(StoreError::Crypto)?;
            tx.create_bucket_if_not_exists(META_BUCKET)?;
            tx.put(META_BUCKET, SALT_KEY, salt.as_bytes())?;
            tx.put(META_BUCKET, VERIFICATION_KEY, &token)?;
            Ok(count)
        })?;

        self.key = new_key;
        info!("re-sealed {resealed} records under a new session key");
        Ok(())
    }

    /// Seals arbitrary bytes under the session key and stores them,
    /// bypassing the record codec. Used by import tooling.
    pub fn put_raw(&self, bucket: &str, name: &str, plaintext: &[u8]) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::Validation("record name must not be empty".into()));
        }
        if bucket == META_BUCKET {
            return Err(StoreError::Validation(format!("{META_BUCKET} is reserved")));
        }
        let sealed = seal(&self.key, plaintext).map_err(StoreError::Crypto)?;
        self.store.update(|tx| -> StoreResult<()> {
            tx.create_bucket_if_not_exists(bucket)?;
            tx.put(bucket, name, &sealed)?;
            Ok(())
        })?;
        debug!("stored raw {bucket}/{name}");
        Ok(())
    }

    /// Opens a stored value without decoding it.
    pub fn get_raw(&self, bucket: &str, name: &str) -> StoreResult<Zeroizing<Vec<u8>>> {
        let blob = self
            .store
            .view(|tx| tx.get(bucket, name))?
            .ok_or_else(|| StoreError::not_found(bucket, name))?;
        self.open_blob(bucket, name, &blob)
    }

    pub(crate) fn open_blob(
        &self,
        bucket: &str,
        name: &str,
        blob: &[u8],
    ) -> StoreResult<Zeroizing<Vec<u8>>> {
        open(&self.key, blob)
            .map(Zeroizing::new)
            .map_err(|e| StoreError::from_open(bucket, name, e))
    }

    fn ensure_verification_token(&self) -> StoreResult<()> {
        let token = seal(&self.key, VERIFICATION_PLAINTEXT).map_err(StoreError::Crypto)?;
        self.store.update(|tx| -> StoreResult<()> {
            if tx.get(META_BUCKET, VERIFICATION_KEY)?.is_none() {
                tx.put(META_BUCKET, VERIFICATION_KEY, &token)?;
            }
            Ok(())
        })
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("path", &self.store.path())
            .field("kdf", &self.kdf)
            .finish_non_exhaustive()
    }
}

/// Reads the store salt, creating it on first open.
fn load_or_create_salt(store: &BucketStore) -> StoreResult<Salt> {
    store.update(|tx| -> StoreResult<Salt> {
        tx.create_bucket_if_not_exists(META_BUCKET)?;
        match tx.get(META_BUCKET, SALT_KEY)? {
            Some(bytes) => Salt::from_slice(&bytes).map_err(|e| StoreError::Decode {
                bucket: META_BUCKET.to_string(),
                name: SALT_KEY.to_string(),
                reason: e.to_string(),
            }),
            None => {
                let salt = Salt::random();
                tx.put(META_BUCKET, SALT_KEY, salt.as_bytes())?;
                debug!("created store salt");
                Ok(salt)
            }
        }
    })
}
