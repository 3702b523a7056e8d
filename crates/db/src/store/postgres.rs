//! PostgreSQL-backed record store.
//!
//! All collections share the `records` table; a record's fields live in a
//! JSONB column and are merged with `||` on update. Change notices are
//! published in-process after each successful write, so subscriptions only
//! observe writes made through this process.

use pageforge_core::types::{RecordId, Timestamp};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{
    ChangeFeed, ChangeKind, ChangeNotice, Direction, Document, Query, Record, RecordStore,
    StoreError, RESERVED_FIELDS,
};

/// Column list for `records` queries.
const COLUMNS: &str = "id, fields, created_at, updated_at";

#[derive(FromRow)]
struct RecordRow {
    id: String,
    fields: Json<Document>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Record {
            id: row.id,
            fields: row.fields.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn without_reserved(mut fields: Document) -> Document {
    for reserved in RESERVED_FIELDS {
        fields.remove(reserved);
    }
    fields
}

/// A [`RecordStore`] persisting to PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    feed: ChangeFeed,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::default(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Build the `SELECT` statement for `query`.
///
/// Bind order: `$1` collection, then `(field, value)` pairs per filter, then
/// the order-by field name.
fn select_sql(query: &Query) -> String {
    let mut sql = format!("SELECT {COLUMNS} FROM records WHERE collection = $1");
    let mut param = 2;

    for _ in &query.filters {
        sql.push_str(&format!(" AND fields -> ${} = ${}", param, param + 1));
        param += 2;
    }

    match &query.order_by {
        Some(order) => {
            let direction = match order.direction {
                Direction::Asc => "ASC NULLS FIRST",
                Direction::Desc => "DESC NULLS LAST",
            };
            sql.push_str(&format!(" ORDER BY fields -> ${param} {direction}, id ASC"));
        }
        None => sql.push_str(" ORDER BY id ASC"),
    }

    sql
}

#[async_trait::async_trait]
impl RecordStore for PgStore {
    async fn query(&self, query: &Query) -> Result<Vec<Record>, StoreError> {
        let sql = select_sql(query);
        let mut q = sqlx::query_as::<_, RecordRow>(&sql).bind(&query.collection);
        for filter in &query.filters {
            q = q.bind(&filter.field).bind(Json(&filter.value));
        }
        if let Some(order) = &query.order_by {
            q = q.bind(&order.field);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Record::from).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM records WHERE collection = $1 AND id = $2");
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Record::from))
    }

    async fn create(&self, collection: &str, fields: Document) -> Result<RecordId, StoreError> {
        let id = Uuid::now_v7().to_string();
        sqlx::query("INSERT INTO records (collection, id, fields) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(without_reserved(fields)))
            .execute(&self.pool)
            .await?;

        self.feed.publish(collection, &id, ChangeKind::Created);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE records SET fields = fields || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(without_reserved(fields)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
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
        // `xmax = 0` only holds for freshly inserted tuples.
        let (inserted,): (bool,) = sqlx::query_as(
            "INSERT INTO records (collection, id, fields) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE \
                 SET fields = records.fields || EXCLUDED.fields, updated_at = now() \
             RETURNING (xmax = 0)",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(without_reserved(fields)))
        .fetch_one(&self.pool)
        .await?;

        let kind = if inserted {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
        };
        self.feed.publish(collection, id, kind);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            self.feed.publish(collection, id, ChangeKind::Deleted);
        }
        Ok(removed)
    }

    fn changes(&self) -> broadcast::Receiver<ChangeNotice> {
        self.feed.subscribe()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
