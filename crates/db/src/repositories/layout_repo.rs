//! Repository for the `layouts` collection.
//!
//! Layouts are always addressed through their owning page: a layout id that
//! exists but belongs to another page is treated as missing.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use pageforge_core::types::RecordId;
use serde_json::Value;

use crate::invariants::ordering::{apply_order, ORDER_FIELD};
use crate::invariants::settle;
use crate::models::layout::{CreateLayout, Layout, UpdateLayout, LAYOUTS};
use crate::store::{subscribe, to_document, Query, RecordStore, StoreError, Subscription};

/// Provides data access for layouts.
pub struct LayoutRepo;

impl LayoutRepo {
    /// Layouts of `page_id` in display order.
    pub fn for_page(page_id: &str) -> Query {
        Query::collection(LAYOUTS)
            .filter_eq("page_id", page_id)
            .order_by(ORDER_FIELD)
    }

    /// List every layout of a page in display order.
    pub async fn list_for_page(
        store: &dyn RecordStore,
        page_id: &str,
    ) -> Result<Vec<Layout>, StoreError> {
        Self::fetch_all(store, &Self::for_page(page_id)).await
    }

    /// List the active layouts of a page in display order.
    pub async fn list_active_for_page(
        store: &dyn RecordStore,
        page_id: &str,
    ) -> Result<Vec<Layout>, StoreError> {
        let query = Query::collection(LAYOUTS)
            .filter_eq("page_id", page_id)
            .filter_eq("active", true)
            .order_by(ORDER_FIELD);
        Self::fetch_all(store, &query).await
    }

    /// Find a layout by id within its owning page.
    pub async fn find_by_id(
        store: &dyn RecordStore,
        page_id: &str,
        id: &str,
    ) -> Result<Option<Layout>, StoreError> {
        let Some(record) = store.get(LAYOUTS, id).await? else {
            return Ok(None);
        };
        let layout: Layout = record.into_model()?;
        Ok((layout.page_id == page_id).then_some(layout))
    }

    /// Create a layout under `page_id`.
    pub async fn create(
        store: &dyn RecordStore,
        page_id: &str,
        dto: &CreateLayout,
    ) -> Result<Layout, StoreError> {
        let mut doc = to_document(dto)?;
        doc.insert("page_id".into(), Value::String(page_id.to_string()));
        let id = store.create(LAYOUTS, doc).await?;

        Self::find_by_id(store, page_id, &id)
            .await?
            .ok_or(StoreError::NotFound {
                collection: LAYOUTS.to_string(),
                id,
            })
    }

    /// Partially update a layout. Returns `None` if it does not exist under
    /// `page_id`.
    pub async fn update(
        store: &dyn RecordStore,
        page_id: &str,
        id: &str,
        dto: &UpdateLayout,
    ) -> Result<Option<Layout>, StoreError> {
        if Self::find_by_id(store, page_id, id).await?.is_none() {
            return Ok(None);
        }

        match store.update(LAYOUTS, id, to_document(dto)?).await {
            Ok(()) => Self::find_by_id(store, page_id, id).await,
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a layout. Returns `true` if it existed under `page_id`.
    pub async fn delete(
        store: &dyn RecordStore,
        page_id: &str,
        id: &str,
    ) -> Result<bool, StoreError> {
        if Self::find_by_id(store, page_id, id).await?.is_none() {
            return Ok(false);
        }
        store.delete(LAYOUTS, id).await
    }

    /// Delete every layout of a page. Returns how many were removed.
    pub async fn delete_for_page(
        store: &dyn RecordStore,
        page_id: &str,
    ) -> Result<usize, StoreError> {
        let records = store.query(&Self::for_page(page_id)).await?;

        let deletes = records.iter().map(|r| store.delete(LAYOUTS, &r.id));
        let results = join_all(deletes).await;
        let removed = results.iter().filter(|r| matches!(r, Ok(true))).count();
        settle(results.into_iter().map(|r| r.map(|_| ())).collect())?;

        tracing::debug!(page_id, removed, "Deleted page layouts");
        Ok(removed)
    }

    /// Persist a new display order for a page's layouts.
    ///
    /// `ids` must list every layout of `page_id` exactly once, so orders end
    /// up contiguous from 0. Returns `false` without writing anything
    /// otherwise.
    pub async fn reorder(
        store: &dyn RecordStore,
        page_id: &str,
        ids: &[RecordId],
    ) -> Result<bool, StoreError> {
        let members: HashSet<RecordId> = store
            .query(&Self::for_page(page_id))
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let requested: HashSet<&RecordId> = ids.iter().collect();
        let is_permutation = ids.len() == members.len()
            && requested.len() == ids.len()
            && requested.iter().all(|id| members.contains(*id));
        if !is_permutation {
            return Ok(false);
        }

        apply_order(store, LAYOUTS, ids).await?;
        Ok(true)
    }

    /// Snapshot subscription over a page's layouts in display order.
    pub fn subscribe(store: Arc<dyn RecordStore>, page_id: &str) -> Subscription<Layout> {
        subscribe(store, Self::for_page(page_id))
    }

    async fn fetch_all(store: &dyn RecordStore, query: &Query) -> Result<Vec<Layout>, StoreError> {
        store
            .query(query)
            .await?
            .into_iter()
            .map(|record| record.into_model())
            .collect()
    }
}
