//! Shared helpers for db integration tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use pageforge_db::store::{ChangeNotice, Document, Query, Record};
use pageforge_db::{MemoryStore, RecordStore, StoreError};
use tokio::sync::broadcast;

/// A [`MemoryStore`] wrapper whose updates fail for chosen record ids.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent update of `id` fail.
    pub fn fail_updates_for(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait::async_trait]
impl RecordStore for FlakyStore {
    async fn query(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        self.inner.query(query).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn create(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        self.inner.create(collection, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(StoreError::Unavailable(format!("injected failure for {id}")));
        }
        self.inner.update(collection, id, fields).await
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        self.inner.upsert(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(collection, id).await
    }

    fn changes(&self) -> broadcast::Receiver<ChangeNotice> {
        self.inner.changes()
    }
}
