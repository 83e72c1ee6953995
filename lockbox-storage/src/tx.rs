//! Read and read-write transactions over buckets.

use crate::error::{StorageError, StorageResult};
use duckdb::{Connection, Transaction, params};

const TABLE_PREFIX: &str = "bucket_";
const MAX_BUCKET_NAME: usize = 64;

/// Check that a bucket name is usable as part of a SQL identifier.
pub fn validate_bucket_name(bucket: &str) -> StorageResult<()> {
    let valid = !bucket.is_empty()
        && bucket.len() <= MAX_BUCKET_NAME
        && bucket
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidBucketName(bucket.to_string()))
    }
}

fn table_name(bucket: &str) -> StorageResult<String> {
    validate_bucket_name(bucket)?;
    Ok(format!("{TABLE_PREFIX}{bucket}"))
}

/// A read-only transaction. Dropping it rolls back.
pub struct ReadTx<'conn> {
    tx: Transaction<'conn>,
}

/// A read-write transaction. Committed by [`crate::BucketStore::update`].
pub struct WriteTx<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> ReadTx<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self { tx }
    }

    pub fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        bucket_exists(&self.tx, bucket)
    }

    /// Value stored under `key`, or `None` when the key or the bucket is absent.
    pub fn get(&self, bucket: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        get(&self.tx, bucket, key)
    }

    /// All keys of a bucket in ascending order. Empty when the bucket is absent.
    pub fn keys(&self, bucket: &str) -> StorageResult<Vec<String>> {
        keys(&self.tx, bucket)
    }

    /// All `(key, value)` pairs of a bucket in ascending key order.
    pub fn entries(&self, bucket: &str) -> StorageResult<Vec<(String, Vec<u8>)>> {
        entries(&self.tx, bucket, None)
    }

    /// Pairs whose key starts with `prefix`, in ascending key order.
    pub fn entries_with_prefix(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> StorageResult<Vec<(String, Vec<u8>)>> {
        entries(&self.tx, bucket, Some(prefix))
    }

    pub fn bucket_names(&self) -> StorageResult<Vec<String>> {
        bucket_names(&self.tx)
    }
}

impl<'conn> WriteTx<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self { tx }
    }

    pub(crate) fn commit(self) -> StorageResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        bucket_exists(&self.tx, bucket)
    }

    pub fn get(&self, bucket: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        get(&self.tx, bucket, key)
    }

    pub fn keys(&self, bucket: &str) -> StorageResult<Vec<String>> {
        keys(&self.tx, bucket)
    }

    pub fn entries(&self, bucket: &str) -> StorageResult<Vec<(String, Vec<u8>)>> {
        entries(&self.tx, bucket, None)
    }

    pub fn entries_with_prefix(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> StorageResult<Vec<(String, Vec<u8>)>> {
        entries(&self.tx, bucket, Some(prefix))
    }

    pub fn bucket_names(&self) -> StorageResult<Vec<String>> {
        bucket_names(&self.tx)
    }

    pub fn create_bucket_if_not_exists(&self, bucket: &str) -> StorageResult<()> {
        let table = table_name(bucket)?;
        self.tx.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                name VARCHAR PRIMARY KEY,
                value BLOB NOT NULL
            );"
        ))?;
        Ok(())
    }

    /// Upsert `key -> value`. The bucket must exist.
    pub fn put(&self, bucket: &str, key: &str, value: &[u8]) -> StorageResult<()> {
        let table = table_name(bucket)?;
        self.tx.execute(
            &format!("INSERT OR REPLACE INTO {table} (name, value) VALUES (?, ?)"),
            params![key, value.to_vec()],
        )?;
        Ok(())
    }

    /// Delete `key`. Returns whether a row existed.
    pub fn delete(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        if !bucket_exists(&self.tx, bucket)? {
            return Ok(false);
        }
        let table = table_name(bucket)?;
        let affected = self
            .tx
            .execute(&format!("DELETE FROM {table} WHERE name = ?"), params![key])?;
        Ok(affected > 0)
    }

    /// Drop a bucket and everything in it. Returns whether it existed.
    pub fn delete_bucket(&self, bucket: &str) -> StorageResult<bool> {
        if !bucket_exists(&self.tx, bucket)? {
            return Ok(false);
        }
        let table = table_name(bucket)?;
        self.tx.execute_batch(&format!("DROP TABLE {table};"))?;
        Ok(true)
    }
}

fn bucket_exists(conn: &Connection, bucket: &str) -> StorageResult<bool> {
    let table = table_name(bucket)?;
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'main' AND table_name = ?",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn get(conn: &Connection, bucket: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
    if !bucket_exists(conn, bucket)? {
        return Ok(None);
    }
    let table = table_name(bucket)?;
    let result = conn.query_row(
        &format!("SELECT value FROM {table} WHERE name = ?"),
        params![key],
        |row| row.get::<_, Vec<u8>>(0),
    );
    match result {
        Ok(value) => Ok(Some(value)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn keys(conn: &Connection, bucket: &str) -> StorageResult<Vec<String>> {
    if !bucket_exists(conn, bucket)? {
        return Ok(Vec::new());
    }
    let table = table_name(bucket)?;
    let mut stmt = conn.prepare(&format!("SELECT name FROM {table} ORDER BY name"))?;
    let keys = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(keys)
}

fn entries(
    conn: &Connection,
    bucket: &str,
    prefix: Option<&str>,
) -> StorageResult<Vec<(String, Vec<u8>)>> {
    if !bucket_exists(conn, bucket)? {
        return Ok(Vec::new());
    }
    let table = table_name(bucket)?;

    let pairs = match prefix {
        Some(prefix) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT name, value FROM {table} WHERE starts_with(name, ?) ORDER BY name"
            ))?;
            let rows = stmt
                .query_map(params![prefix], pair_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        None => {
            let mut stmt =
                conn.prepare(&format!("SELECT name, value FROM {table} ORDER BY name"))?;
            let rows = stmt
                .query_map([], pair_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
    };
    Ok(pairs)
}

fn pair_from_row(row: &duckdb::Row<'_>) -> duckdb::Result<(String, Vec<u8>)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn bucket_names(conn: &Connection) -> StorageResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = 'main' ORDER BY table_name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tables
        .into_iter()
        .filter_map(|t| t.strip_prefix(TABLE_PREFIX).map(str::to_string))
        .collect())
}
