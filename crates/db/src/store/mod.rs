//! Record store abstraction.
//!
//! Content lives in collections of schemaless records (JSON objects keyed by
//! a store-assigned id). The [`RecordStore`] trait is the only surface the
//! repositories and invariant maintainers use:
//!
//! - equality-filtered, single-field-ordered queries
//! - point reads, creates, partial updates and deletes
//! - a change feed ([`RecordStore::changes`]) that snapshot subscriptions
//!   are built on (see [`subscription`])
//!
//! Writes are independent: the trait offers no multi-record atomicity, so
//! any invariant spanning several records is maintained by issuing several
//! writes and awaiting them together.

pub mod memory;
pub mod postgres;
pub mod subscription;

use std::cmp::Ordering;

use pageforge_core::types::{RecordId, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::broadcast;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use subscription::{subscribe, Subscription};

/// The field payload of a record.
pub type Document = Map<String, Value>;

/// Field names the store assigns itself; stripped from client payloads.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors surfaced by record store adapters and the layers built on them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: RecordId },

    /// The PostgreSQL adapter failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record could not be converted to or from its typed model.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Some writes of a concurrently dispatched batch failed. Writes that
    /// succeeded stay applied.
    #[error("{failed} of {total} batched writes failed: {source}")]
    Batch {
        failed: usize,
        total: usize,
        #[source]
        source: Box<StoreError>,
    },

    /// The store could not serve the request (adapter-specific cause).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stored record: id, field payload and server-assigned timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub fields: Document,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record {
    /// Field value by name, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Deserialize the record into a typed model.
    ///
    /// The id and timestamps are merged into the payload under `id`,
    /// `created_at` and `updated_at`.
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut object = self.fields;
        object.insert("id".into(), Value::String(self.id));
        object.insert("created_at".into(), serde_json::to_value(self.created_at)?);
        object.insert("updated_at".into(), serde_json::to_value(self.updated_at)?);
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

/// Serialize a DTO into a record payload, dropping store-assigned fields.
///
/// `None` fields are expected to be skipped by the DTO's serde attributes so
/// that partial updates only carry what the caller provided.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            for reserved in RESERVED_FIELDS {
                map.remove(reserved);
            }
            Ok(map)
        }
        other => Err(StoreError::Serialization(serde::de::Error::custom(
            format!("expected a JSON object payload, got {other}"),
        ))),
    }
}

/// Build a single-field payload.
pub fn single_field(name: &str, value: impl Into<Value>) -> Document {
    let mut doc = Document::new();
    doc.insert(name.to_string(), value.into());
    doc
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Equality predicate on a single top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn matches(&self, record: &Record) -> bool {
        record.field(&self.field) == Some(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Single-field ordering. Ties are broken by record id so results are
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A collection query: all filters must match (logical AND).
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    /// Match every record of `collection`.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
        }
    }

    /// Add an equality predicate.
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Order ascending by `field`.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: Direction::Asc,
        });
        self
    }

    /// Order descending by `field`.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: Direction::Desc,
        });
        self
    }

    /// Whether `record` satisfies every filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Sort `records` according to this query's ordering (by id when none).
    pub fn sort(&self, records: &mut [Record]) {
        match &self.order_by {
            Some(order) => records.sort_by(|a, b| {
                let primary = compare_values(a.field(&order.field), b.field(&order.field));
                let primary = match order.direction {
                    Direction::Asc => primary,
                    Direction::Desc => primary.reverse(),
                };
                primary.then_with(|| a.id.cmp(&b.id))
            }),
            None => records.sort_by(|a, b| a.id.cmp(&b.id)),
        }
    }
}

/// Total order over optional JSON values used for sorting.
///
/// Missing < null < bool < number < string < array/object; values of the
/// same type compare naturally, containers compare by their JSON text.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) | Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x @ (Value::Array(_) | Value::Object(_))), Some(y @ (Value::Array(_) | Value::Object(_)))) => {
            x.to_string().cmp(&y.to_string())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

// ---------------------------------------------------------------------------
// Change feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Notice that a record in `collection` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub collection: String,
    pub id: RecordId,
    pub kind: ChangeKind,
}

/// Default buffer capacity for change feed channels.
pub const CHANGE_FEED_CAPACITY: usize = 1024;

/// Fan-out change feed shared by the store adapters.
///
/// Wraps a [`broadcast::Sender`]; publishing with no subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeNotice>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, collection: &str, id: &str, kind: ChangeKind) {
        // A send error only means there are no receivers.
        let _ = self.sender.send(ChangeNotice {
            collection: collection.to_string(),
            id: id.to_string(),
            kind,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotice> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(CHANGE_FEED_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A document-style record store.
///
/// Every method is a suspension point and may fail independently; callers
/// that dispatch several writes together must be prepared for some to
/// succeed and others to fail.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Records matching `query`, in the query's order.
    async fn query(&self, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// A single record, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError>;

    /// Insert a record and return its new id. Both timestamps are stamped.
    async fn create(&self, collection: &str, fields: Document) -> Result<RecordId, StoreError>;

    /// Merge `fields` into an existing record and stamp `updated_at`.
    ///
    /// Fails with [`StoreError::NotFound`] if the record does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Document)
        -> Result<(), StoreError>;

    /// Merge `fields` into the record with a caller-chosen id, creating it
    /// when absent.
    async fn upsert(&self, collection: &str, id: &str, fields: Document)
        -> Result<(), StoreError>;

    /// Delete a record. Returns `true` if a record was removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Subscribe to change notices for every collection.
    fn changes(&self) -> broadcast::Receiver<ChangeNotice>;

    /// Cheap liveness check.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, fields: Value) -> Record {
        let now = chrono::Utc::now();
        Record {
            id: id.to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn filters_are_conjunctive() {
        let q = Query::collection("pages")
            .filter_eq("active", true)
            .filter_eq("accessible", true);
        assert!(q.matches(&record("a", json!({"active": true, "accessible": true}))));
        assert!(!q.matches(&record("b", json!({"active": true, "accessible": false}))));
        assert!(!q.matches(&record("c", json!({"active": true}))));
    }

    #[test]
    fn sort_by_number_then_id() {
        let q = Query::collection("pages").order_by("order");
        let mut records = vec![
            record("c", json!({"order": 2})),
            record("b", json!({"order": 1})),
            record("a", json!({"order": 2})),
            record("d", json!({})),
        ];
        q.sort(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["d", "b", "a", "c"]);
    }

    #[test]
    fn sort_descending() {
        let q = Query::collection("pages").order_by_desc("order");
        let mut records = vec![
            record("a", json!({"order": 0})),
            record("b", json!({"order": 5})),
        ];
        q.sort(&mut records);
        assert_eq!(records[0].id, "b");
    }

    #[test]
    fn to_document_strips_reserved_fields() {
        let doc = to_document(&json!({"id": "x", "name": "n", "created_at": 1})).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc["name"], "n");
    }

    #[test]
    fn to_document_rejects_non_objects() {
        assert!(to_document(&json!([1, 2])).is_err());
    }

    #[test]
    fn into_model_merges_id_and_timestamps() {
        #[derive(serde::Deserialize)]
        struct Named {
            id: String,
            name: String,
            created_at: Timestamp,
        }

        let rec = record("abc", json!({"name": "home"}));
        let created = rec.created_at;
        let model: Named = rec.into_model().unwrap();
        assert_eq!(model.id, "abc");
        assert_eq!(model.name, "home");
        assert_eq!(model.created_at, created);
    }
}
