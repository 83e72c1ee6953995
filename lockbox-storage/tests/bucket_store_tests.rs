use lockbox_storage::{BucketStore, StorageError, StorageResult, StoreOptions};
use pretty_assertions::assert_eq;

fn seeded_store() -> BucketStore {
    let store = BucketStore::open_in_memory().unwrap();
    store
        .update(|tx| -> StorageResult<()> {
            tx.create_bucket_if_not_exists("fruit")?;
            tx.put("fruit", "banana", b"yellow")?;
            tx.put("fruit", "apple", b"red")?;
            tx.put("fruit", "apricot", b"orange")?;
            Ok(())
        })
        .unwrap();
    store
}

// ── Point operations ─────────────────────────────────────────────

#[test]
fn put_and_get() {
    let store = seeded_store();
    let value = store.view(|tx| tx.get("fruit", "apple")).unwrap();
    assert_eq!(value.as_deref(), Some(&b"red"[..]));
}

#[test]
fn get_missing_key_is_none() {
    let store = seeded_store();
    assert!(store.view(|tx| tx.get("fruit", "kiwi")).unwrap().is_none());
}

#[test]
fn get_from_missing_bucket_is_none() {
    let store = BucketStore::open_in_memory().unwrap();
    assert!(store.view(|tx| tx.get("nothing", "apple")).unwrap().is_none());
}

#[test]
fn put_overwrites() {
    let store = seeded_store();
    store.update(|tx| tx.put("fruit", "apple", b"green")).unwrap();

    let value = store.view(|tx| tx.get("fruit", "apple")).unwrap();
    assert_eq!(value.as_deref(), Some(&b"green"[..]));
    assert_eq!(store.view(|tx| tx.keys("fruit")).unwrap().len(), 3);
}

#[test]
fn delete_reports_existence() {
    let store = seeded_store();
    assert!(store.update(|tx| tx.delete("fruit", "apple")).unwrap());
    assert!(!store.update(|tx| tx.delete("fruit", "apple")).unwrap());
    assert!(!store.update(|tx| tx.delete("nothing", "apple")).unwrap());
}

// ── Ordered iteration ────────────────────────────────────────────

#[test]
fn keys_are_sorted() {
    let store = seeded_store();
    let keys = store.view(|tx| tx.keys("fruit")).unwrap();
    assert_eq!(keys, vec!["apple", "apricot", "banana"]);
}

#[test]
fn entries_are_sorted_pairs() {
    let store = seeded_store();
    let entries = store.view(|tx| tx.entries("fruit")).unwrap();
    assert_eq!(
        entries,
        vec![
            ("apple".to_string(), b"red".to_vec()),
            ("apricot".to_string(), b"orange".to_vec()),
            ("banana".to_string(), b"yellow".to_vec()),
        ]
    );
}

#[test]
fn prefix_scan() {
    let store = seeded_store();
    let entries = store
        .view(|tx| tx.entries_with_prefix("fruit", "ap"))
        .unwrap();
    let keys: Vec<_> = entries.into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["apple", "apricot"]);
}

#[test]
fn missing_bucket_iterates_empty() {
    let store = BucketStore::open_in_memory().unwrap();
    assert!(store.view(|tx| tx.keys("nothing")).unwrap().is_empty());
    assert!(store.view(|tx| tx.entries("nothing")).unwrap().is_empty());
}

// ── Buckets ──────────────────────────────────────────────────────

#[test]
fn delete_bucket_drops_everything() {
    let store = seeded_store();
    assert!(store.delete_bucket("fruit").unwrap());
    assert!(!store.view(|tx| tx.bucket_exists("fruit")).unwrap());
    assert!(store.view(|tx| tx.keys("fruit")).unwrap().is_empty());
    assert!(!store.delete_bucket("fruit").unwrap());
}

#[test]
fn bucket_names_lists_only_buckets() {
    let store = seeded_store();
    store
        .update(|tx| tx.create_bucket_if_not_exists("veg"))
        .unwrap();
    assert_eq!(store.bucket_names().unwrap(), vec!["fruit", "veg"]);
}

#[test]
fn invalid_bucket_name_is_rejected() {
    let store = BucketStore::open_in_memory().unwrap();
    let result = store.update(|tx| tx.create_bucket_if_not_exists("x; DROP TABLE y"));
    assert!(matches!(result, Err(StorageError::InvalidBucketName(_))));
}

// ── Transactions ─────────────────────────────────────────────────

#[derive(Debug)]
enum TestError {
    Storage(StorageError),
    Abort,
}

impl From<StorageError> for TestError {
    fn from(e: StorageError) -> Self {
        TestError::Storage(e)
    }
}

#[test]
fn failed_update_rolls_back() {
    let store = seeded_store();
    let result = store.update(|tx| -> Result<(), TestError> {
        tx.put("fruit", "cherry", b"dark red")?;
        tx.delete("fruit", "apple")?;
        Err(TestError::Abort)
    });
    assert!(matches!(result, Err(TestError::Abort)));

    let keys = store.view(|tx| tx.keys("fruit")).unwrap();
    assert_eq!(keys, vec!["apple", "apricot", "banana"]);
}

#[test]
fn failed_update_rolls_back_bucket_creation() {
    let store = BucketStore::open_in_memory().unwrap();
    let result = store.update(|tx| -> Result<(), TestError> {
        tx.create_bucket_if_not_exists("fresh")?;
        Err(TestError::Abort)
    });
    assert!(result.is_err());
    assert!(!store.view(|tx| tx.bucket_exists("fresh")).unwrap());
}

#[test]
fn readers_see_committed_writes() {
    let store = seeded_store();
    store.update(|tx| tx.put("fruit", "cherry", b"dark red")).unwrap();
    assert_eq!(store.view(|tx| tx.keys("fruit")).unwrap().len(), 4);
}

#[test]
fn concurrent_readers() {
    let store = std::sync::Arc::new(seeded_store());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || store.view(|tx| tx.keys("fruit")).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().len(), 3);
    }
}

// ── Files ────────────────────────────────────────────────────────

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("lockbox.db");

    {
        let store = BucketStore::open(&path, &StoreOptions::default()).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        store
            .update(|tx| -> StorageResult<()> {
                tx.create_bucket_if_not_exists("fruit")?;
                tx.put("fruit", "apple", b"red")
            })
            .unwrap();
    }

    let store = BucketStore::open(&path, &StoreOptions::default()).unwrap();
    let value = store.view(|tx| tx.get("fruit", "apple")).unwrap();
    assert_eq!(value.as_deref(), Some(&b"red"[..]));
}

#[test]
fn in_memory_store_has_no_path() {
    let store = BucketStore::open_in_memory().unwrap();
    assert!(store.path().is_none());
}

// ── Open lock ────────────────────────────────────────────────────

#[test]
fn second_open_of_same_file_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lockbox.db");
    let options = StoreOptions {
        open_timeout: std::time::Duration::from_millis(200),
        ..StoreOptions::default()
    };

    let first = BucketStore::open(&path, &options).unwrap();
    let started = std::time::Instant::now();
    let err = match BucketStore::open(&path, &options) {
        Ok(_) => panic!("second open of a held store succeeded"),
        Err(e) => e,
    };
    match err {
        StorageError::LockTimeout { path: locked, waited } => {
            assert_eq!(locked, path);
            assert!(waited >= options.open_timeout);
        }
        other => panic!("expected LockTimeout, got {other}"),
    }
    assert!(started.elapsed() < std::time::Duration::from_secs(5));

    drop(first);
    let reopened = BucketStore::open(&path, &options).unwrap();
    assert_eq!(reopened.path(), Some(path.as_path()));
}

#[test]
fn waiting_open_succeeds_once_holder_closes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lockbox.db");
    let options = StoreOptions {
        open_timeout: std::time::Duration::from_secs(5),
        ..StoreOptions::default()
    };

    let first = BucketStore::open(&path, &options).unwrap();
    first
        .update(|tx| -> StorageResult<()> {
            tx.create_bucket_if_not_exists("fruit")?;
            tx.put("fruit", "apple", b"red")
        })
        .unwrap();

    let releaser = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(100));
        drop(first);
    });

    let second = BucketStore::open(&path, &options).unwrap();
    releaser.join().unwrap();
    let value = second.view(|tx| tx.get("fruit", "apple")).unwrap();
    assert_eq!(value.as_deref(), Some(&b"red"[..]));
}
