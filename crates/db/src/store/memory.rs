//! In-process record store.
//!
//! Keeps every collection in a `HashMap` behind a `tokio::sync::RwLock`.
//! Used for local development (no `DATABASE_URL`) and by the test suites.
//! Data does not survive a restart.

use std::collections::HashMap;

use chrono::Utc;
use pageforge_core::types::RecordId;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{
    ChangeFeed, ChangeKind, ChangeNotice, Document, Query, Record, RecordStore, StoreError,
    RESERVED_FIELDS,
};

type Collection = HashMap<RecordId, Record>;

/// A [`RecordStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held in `collection`.
    pub async fn record_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

fn merge(target: &mut Document, fields: Document) {
    for (key, value) in fields {
        if !RESERVED_FIELDS.contains(&key.as_str()) {
            target.insert(key, value);
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn query(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        let collections = self.collections.read().await;
        let mut records: Vec<Record> = collections
            .get(&query.collection)
            .map(|c| c.values().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        drop(collections);

        query.sort(&mut records);
        Ok(records)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned())
    }

    async fn create(&self, collection: &str, fields: Document) -> Result<RecordId, StoreError> {
        let id = Uuid::now_v7().to_string();
        let now = Utc::now();

        let mut payload = Document::new();
        merge(&mut payload, fields);

        let record = Record {
            id: id.clone(),
            fields: payload,
            created_at: now,
            updated_at: now,
        };

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);

        self.feed.publish(collection, &id, ChangeKind::Created);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let record = collections
                .get_mut(collection)
                .and_then(|c| c.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;

            merge(&mut record.fields, fields);
            record.updated_at = Utc::now();
        }

        self.feed.publish(collection, id, ChangeKind::Updated);
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let kind = {
            let mut collections = self.collections.write().await;
            let now = Utc::now();
            let records = collections.entry(collection.to_string()).or_default();

            match records.get_mut(id) {
                Some(record) => {
                    merge(&mut record.fields, fields);
                    record.updated_at = now;
                    ChangeKind::Updated
                }
                None => {
                    let mut payload = Document::new();
                    merge(&mut payload, fields);
                    records.insert(
                        id.to_string(),
                        Record {
                            id: id.to_string(),
                            fields: payload,
                            created_at: now,
                            updated_at: now,
                        },
                    );
                    ChangeKind::Created
                }
            }
        };

        self.feed.publish(collection, id, kind);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some();

        if removed {
            self.feed.publish(collection, id, ChangeKind::Deleted);
        }
        Ok(removed)
    }

    fn changes(&self) -> broadcast::Receiver<ChangeNotice> {
        self.feed.subscribe()
    }
}
