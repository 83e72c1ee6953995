//! Generic encrypted CRUD over any [`Record`] type.

use crate::error::{StoreError, StoreResult};
use crate::handle::StoreHandle;
use chrono::{DateTime, Utc};
use lockbox_crypto::seal;
use lockbox_model::{Entry, ModelResult, Record};
use tracing::debug;
use zeroize::Zeroizing;

impl StoreHandle {
    /// Encrypts `record` and stores it under its name, overwriting any
    /// existing record with the same name.
    pub fn create<T: Record>(&self, record: &T) -> StoreResult<()> {
        let name = record.name();
        check_name(name)?;
        record.validate().map_err(StoreError::from_model)?;

        let plaintext = Zeroizing::new(record.encode().map_err(StoreError::from_model)?);
        let sealed = seal(&self.key, &plaintext).map_err(StoreError::Crypto)?;

        self.store.update(|tx| -> StoreResult<()> {
            tx.create_bucket_if_not_exists(T::BUCKET)?;
            tx.put(T::BUCKET, name, &sealed)?;
            Ok(())
        })?;
        debug!("created {}/{}", T::BUCKET, name);
        Ok(())
    }

    /// Fetches and fully decodes a record.
    pub fn get<T: Record>(&self, name: &str) -> StoreResult<T> {
        let plaintext = self.get_raw(T::BUCKET, name)?;
        debug!("read {}/{}", T::BUCKET, name);
        T::decode(&plaintext).map_err(|e| StoreError::from_decode(T::BUCKET, name, e))
    }

    /// Fetches a record's cheap view.
    ///
    /// The ciphertext is still fully authenticated; only decoding of the
    /// expensive fields is skipped.
    pub fn get_cheap<T: Record>(&self, name: &str) -> StoreResult<T::View> {
        let plaintext = self.get_raw(T::BUCKET, name)?;
        T::decode_view(&plaintext).map_err(|e| StoreError::from_decode(T::BUCKET, name, e))
    }

    /// Every record of type `T`, in name order. Fails on the first record
    /// that cannot be opened or decoded.
    pub fn list<T: Record>(&self) -> StoreResult<Vec<T>> {
        let pairs = self.store.view(|tx| tx.entries(T::BUCKET))?;
        debug!("listing {} ({} records)", T::BUCKET, pairs.len());
        self.decode_all(T::BUCKET, pairs, |bytes| T::decode(bytes))
    }

    /// Cheap views of every record of type `T`, in name order.
    pub fn list_views<T: Record>(&self) -> StoreResult<Vec<T::View>> {
        let pairs = self.store.view(|tx| tx.entries(T::BUCKET))?;
        self.decode_all(T::BUCKET, pairs, |bytes| T::decode_view(bytes))
    }

    /// Records whose name starts with `prefix`, in name order.
    pub fn list_by_prefix<T: Record>(&self, prefix: &str) -> StoreResult<Vec<T>> {
        let pairs = self
            .store
            .view(|tx| tx.entries_with_prefix(T::BUCKET, prefix))?;
        self.decode_all(T::BUCKET, pairs, |bytes| T::decode(bytes))
    }

    /// Names of every record of type `T`. Nothing is decrypted.
    pub fn list_names<T: Record>(&self) -> StoreResult<Vec<String>> {
        Ok(self.store.view(|tx| tx.keys(T::BUCKET))?)
    }

    /// Deletes a record. Removing an absent name succeeds unless
    /// `T::STRICT_REMOVE` is set.
    pub fn remove<T: Record>(&self, name: &str) -> StoreResult<()> {
        let existed = self.store.update(|tx| tx.delete(T::BUCKET, name))?;
        if !existed && T::STRICT_REMOVE {
            return Err(StoreError::not_found(T::BUCKET, name));
        }
        debug!("removed {}/{} (existed: {existed})", T::BUCKET, name);
        Ok(())
    }

    /// Deletes several records in one transaction. Returns how many existed.
    ///
    /// With `T::STRICT_REMOVE`, one absent name aborts the whole batch.
    pub fn remove_many<T: Record>(&self, names: &[&str]) -> StoreResult<usize> {
        let removed = self.store.update(|tx| -> StoreResult<usize> {
            let mut removed = 0;
            for name in names {
                if tx.delete(T::BUCKET, name)? {
                    removed += 1;
                } else if T::STRICT_REMOVE {
                    return Err(StoreError::not_found(T::BUCKET, name));
                }
            }
            Ok(removed)
        })?;
        debug!("removed {removed} of {} from {}", names.len(), T::BUCKET);
        Ok(removed)
    }

    /// Moves a record to a new name, rewriting its primary key field.
    pub fn rename<T: Record>(&self, old: &str, new: &str) -> StoreResult<()> {
        check_name(new)?;
        if old == new {
            return self.get::<T>(old).map(|_| ());
        }

        self.store.update(|tx| -> StoreResult<()> {
            let blob = tx
                .get(T::BUCKET, old)?
                .ok_or_else(|| StoreError::not_found(T::BUCKET, old))?;
            if tx.get(T::BUCKET, new)?.is_some() {
                return Err(StoreError::Validation(format!(
                    "{}/{new} already exists",
                    T::BUCKET
                )));
            }

            let plaintext = self.open_blob(T::BUCKET, old, &blob)?;
            let mut record =
                T::decode(&plaintext).map_err(|e| StoreError::from_decode(T::BUCKET, old, e))?;
            record.set_name(new.to_string());
            record.validate().map_err(StoreError::from_model)?;

            let encoded = Zeroizing::new(record.encode().map_err(StoreError::from_model)?);
            let sealed = seal(&self.key, &encoded).map_err(StoreError::Crypto)?;
            tx.delete(T::BUCKET, old)?;
            tx.put(T::BUCKET, new, &sealed)?;
            Ok(())
        })?;
        debug!("renamed {}/{old} to {new}", T::BUCKET);
        Ok(())
    }

    /// Drops every record of type `T`. Returns whether the bucket existed.
    pub fn delete_bucket<T: Record>(&self) -> StoreResult<bool> {
        let existed = self.store.delete_bucket(T::BUCKET)?;
        debug!("deleted bucket {} (existed: {existed})", T::BUCKET);
        Ok(existed)
    }

    /// Entries whose expiry is at or before `now`.
    pub fn list_expired_entries(&self, now: DateTime<Utc>) -> StoreResult<Vec<Entry>> {
        let mut entries = self.list::<Entry>()?;
        entries.retain(|e| e.is_expired(now));
        Ok(entries)
    }

    fn decode_all<V>(
        &self,
        bucket: &str,
        pairs: Vec<(String, Vec<u8>)>,
        decode: impl Fn(&[u8]) -> ModelResult<V>,
    ) -> StoreResult<Vec<V>> {
        pairs
            .into_iter()
            .map(|(name, blob)| {
                let plaintext = self.open_blob(bucket, &name, &blob)?;
                decode(&plaintext).map_err(|e| StoreError::from_decode(bucket, &name, e))
            })
            .collect()
    }
}

fn check_name(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::Validation("record name must not be empty".into()));
    }
    Ok(())
}
