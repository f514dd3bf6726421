//! Persisted recordings list
//!
//! The whole list lives as one JSON array under a single key and is read
//! and rewritten in full on every mutation.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::recording::RecordingEntry;

use super::ports::{KeyValueStore, StorageError};

/// Storage key holding the recordings list
pub const RECORDINGS_KEY: &str = "recordings";

/// Read-modify-write access to the persisted recordings list.
///
/// Cloning shares the underlying store and write lock, so a recording
/// session and a library built from clones never interleave their updates.
pub struct RecordingsStore<S: KeyValueStore> {
    store: Arc<S>,
    write_lock: Arc<Mutex<()>>,
}

impl<S: KeyValueStore> Clone for RecordingsStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<S: KeyValueStore> RecordingsStore<S> {
    /// Wrap a key-value store
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Wrap an already shared key-value store
    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Access the underlying key-value store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Load the full list in stored order.
    ///
    /// A missing or unparseable value is an empty list.
    pub async fn load(&self) -> Result<Vec<RecordingEntry>, StorageError> {
        let Some(raw) = self.store.get_item(RECORDINGS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<RecordingEntry>>>(&raw) {
            Ok(entries) => Ok(entries.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(key = RECORDINGS_KEY, error = %e, "stored recordings are unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Find an entry by name
    pub async fn find(&self, name: &str) -> Result<Option<RecordingEntry>, StorageError> {
        Ok(self.load().await?.into_iter().find(|e| e.name == name))
    }

    /// Replace the full list
    pub async fn save(&self, entries: &[RecordingEntry]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.write(entries).await
    }

    /// Append one entry, returning the updated list
    pub async fn append(&self, entry: RecordingEntry) -> Result<Vec<RecordingEntry>, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.push(entry);
        self.write(&entries).await?;
        Ok(entries)
    }

    /// Remove every entry named `name`, returning the updated list and
    /// whether anything was removed. Order of the rest is preserved.
    pub async fn remove(&self, name: &str) -> Result<(Vec<RecordingEntry>, bool), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|e| e.name != name);
        let removed = entries.len() != before;
        if removed {
            self.write(&entries).await?;
        }
        Ok((entries, removed))
    }

    async fn write(&self, entries: &[RecordingEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries).map_err(|e| StorageError::SerializeFailed {
            key: RECORDINGS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set_item(RECORDINGS_KEY, &json).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    /// In-memory key-value store shared by the application tests
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        items: StdMutex<HashMap<String, String>>,
        pub(crate) fail_writes: std::sync::atomic::AtomicBool,
    }

    impl MemoryStore {
        pub(crate) fn with_raw(key: &str, value: &str) -> Self {
            let store = Self::default();
            store
                .items
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }

        pub(crate) fn raw(&self, key: &str) -> Option<String> {
            self.items.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.items.lock().unwrap().get(key).cloned())
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(StorageError::WriteFailed {
                    key: key.to_string(),
                    message: "disk full".to_string(),
                });
            }
            self.items
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.items.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn names(entries: &[RecordingEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn missing_key_is_empty() {
        let store = RecordingsStore::new(MemoryStore::default());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_is_empty() {
        let store = RecordingsStore::new(MemoryStore::with_raw(RECORDINGS_KEY, "{not json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn incompatible_shape_is_empty() {
        let store = RecordingsStore::new(MemoryStore::with_raw(
            RECORDINGS_KEY,
            r#"{"uri":"a","name":"b"}"#,
        ));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_null_is_empty() {
        let store = RecordingsStore::new(MemoryStore::with_raw(RECORDINGS_KEY, "null"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let store = RecordingsStore::new(MemoryStore::default());
        store.append(RecordingEntry::new("u1", "a")).await.unwrap();
        store.append(RecordingEntry::new("u2", "b")).await.unwrap();
        let entries = store.append(RecordingEntry::new("u3", "c")).await.unwrap();

        assert_eq!(names(&entries), vec!["a", "b", "c"]);
        assert_eq!(names(&store.load().await.unwrap()), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn append_writes_json_array_of_uri_and_name() {
        let store = RecordingsStore::new(MemoryStore::default());
        store.append(RecordingEntry::new("u1", "a")).await.unwrap();

        assert_eq!(
            store.inner().raw(RECORDINGS_KEY).unwrap(),
            r#"[{"uri":"u1","name":"a"}]"#
        );
    }

    #[tokio::test]
    async fn append_over_corrupt_value_starts_fresh() {
        let store = RecordingsStore::new(MemoryStore::with_raw(RECORDINGS_KEY, "garbage"));
        let entries = store.append(RecordingEntry::new("u1", "a")).await.unwrap();
        assert_eq!(names(&entries), vec!["a"]);
    }

    #[tokio::test]
    async fn remove_middle_entry_keeps_order() {
        let store = RecordingsStore::new(MemoryStore::default());
        store
            .save(&[
                RecordingEntry::new("u1", "a"),
                RecordingEntry::new("u2", "b"),
                RecordingEntry::new("u3", "c"),
            ])
            .await
            .unwrap();

        let (entries, removed) = store.remove("b").await.unwrap();
        assert!(removed);
        assert_eq!(names(&entries), vec!["a", "c"]);
        assert_eq!(names(&store.load().await.unwrap()), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn remove_unknown_name_changes_nothing() {
        let store = RecordingsStore::new(MemoryStore::default());
        store.append(RecordingEntry::new("u1", "a")).await.unwrap();

        let (entries, removed) = store.remove("zzz").await.unwrap();
        assert!(!removed);
        assert_eq!(names(&entries), vec!["a"]);
    }

    #[tokio::test]
    async fn find_by_name() {
        let store = RecordingsStore::new(MemoryStore::default());
        store.append(RecordingEntry::new("u1", "a")).await.unwrap();

        assert_eq!(store.find("a").await.unwrap().unwrap().uri, "u1");
        assert!(store.find("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_the_same_list() {
        let store = RecordingsStore::new(MemoryStore::default());
        let other = store.clone();
        store.append(RecordingEntry::new("u1", "a")).await.unwrap();
        other.append(RecordingEntry::new("u2", "b")).await.unwrap();

        assert_eq!(names(&store.load().await.unwrap()), vec!["a", "b"]);
    }
}
