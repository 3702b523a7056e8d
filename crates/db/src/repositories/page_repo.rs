//! Repository for the `pages` collection.
//!
//! Page writes carry two derived concerns: the slug is (re)derived from the
//! name and resolved against other pages' slugs, and flagging a page as
//! home first clears the flag from every current holder.

use std::sync::Arc;

use pageforge_core::slug::{derive_slug, unique_slug};
use pageforge_core::types::RecordId;
use serde_json::Value;

use crate::invariants::exclusivity::promote_to_sole_home;
use crate::invariants::ordering::{apply_order, ORDER_FIELD};
use crate::models::page::{CreatePage, Page, UpdatePage, PAGES};
use crate::store::{subscribe, to_document, Query, RecordStore, StoreError, Subscription};

/// Provides data access for pages.
pub struct PageRepo;

impl PageRepo {
    /// All pages in display order.
    pub fn ordered() -> Query {
        Query::collection(PAGES).order_by(ORDER_FIELD)
    }

    /// List every page in display order.
    pub async fn list(store: &dyn RecordStore) -> Result<Vec<Page>, StoreError> {
        Self::fetch_all(store, &Self::ordered()).await
    }

    /// Pages shown in the public navigation: active, accessible and not the
    /// home page, in display order.
    pub async fn list_navigation(store: &dyn RecordStore) -> Result<Vec<Page>, StoreError> {
        let query = Query::collection(PAGES)
            .filter_eq("active", true)
            .filter_eq("accessible", true)
            .filter_eq("is_home", false)
            .order_by(ORDER_FIELD);
        Self::fetch_all(store, &query).await
    }

    /// Find a page by id.
    pub async fn find_by_id(store: &dyn RecordStore, id: &str) -> Result<Option<Page>, StoreError> {
        store
            .get(PAGES, id)
            .await?
            .map(|record| record.into_model())
            .transpose()
    }

    /// Find the page served under `slug`, regardless of visibility.
    ///
    /// Should several pages share the slug, the first in display order wins.
    pub async fn find_by_slug(
        store: &dyn RecordStore,
        slug: &str,
    ) -> Result<Option<Page>, StoreError> {
        let query = Query::collection(PAGES)
            .filter_eq("slug", slug)
            .order_by(ORDER_FIELD);
        Ok(Self::fetch_all(store, &query).await?.into_iter().next())
    }

    /// Find the active home page, if any.
    pub async fn find_home(store: &dyn RecordStore) -> Result<Option<Page>, StoreError> {
        let query = Query::collection(PAGES)
            .filter_eq("is_home", true)
            .filter_eq("active", true)
            .order_by(ORDER_FIELD);
        Ok(Self::fetch_all(store, &query).await?.into_iter().next())
    }

    /// Slugs used by every page except `excluding`.
    pub async fn slugs_in_use(
        store: &dyn RecordStore,
        excluding: Option<&str>,
    ) -> Result<Vec<String>, StoreError> {
        let records = store.query(&Query::collection(PAGES)).await?;
        Ok(records
            .into_iter()
            .filter(|r| Some(r.id.as_str()) != excluding)
            .filter_map(|r| match r.fields.get("slug") {
                Some(Value::String(slug)) => Some(slug.clone()),
                _ => None,
            })
            .collect())
    }

    /// Create a page.
    ///
    /// Derives a unique slug from the name. When the page is created as the
    /// home page, every existing home page is demoted first.
    pub async fn create(store: &dyn RecordStore, dto: &CreatePage) -> Result<Page, StoreError> {
        let taken = Self::slugs_in_use(store, None).await?;
        let slug = unique_slug(&derive_slug(&dto.name), &taken);

        if dto.is_home {
            promote_to_sole_home(store, None).await?;
        }

        let mut doc = to_document(dto)?;
        doc.insert("slug".into(), Value::String(slug));
        let id = store.create(PAGES, doc).await?;

        Self::find_by_id(store, &id)
            .await?
            .ok_or(StoreError::NotFound {
                collection: PAGES.to_string(),
                id,
            })
    }

    /// Partially update a page. Returns `None` if it does not exist.
    ///
    /// A new name regenerates the slug (old links stop resolving). Setting
    /// `is_home = true` demotes every other home page first.
    pub async fn update(
        store: &dyn RecordStore,
        id: &str,
        dto: &UpdatePage,
    ) -> Result<Option<Page>, StoreError> {
        if Self::find_by_id(store, id).await?.is_none() {
            return Ok(None);
        }

        let mut doc = to_document(dto)?;
        if let Some(name) = &dto.name {
            let taken = Self::slugs_in_use(store, Some(id)).await?;
            let slug = unique_slug(&derive_slug(name), &taken);
            doc.insert("slug".into(), Value::String(slug));
        }

        if dto.is_home == Some(true) {
            promote_to_sole_home(store, Some(id)).await?;
        }

        match store.update(PAGES, id, doc).await {
            Ok(()) => Self::find_by_id(store, id).await,
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a page record. Returns `true` if it existed.
    ///
    /// Does not touch the page's layouts; see
    /// [`LayoutRepo::delete_for_page`](super::LayoutRepo::delete_for_page).
    pub async fn delete(store: &dyn RecordStore, id: &str) -> Result<bool, StoreError> {
        store.delete(PAGES, id).await
    }

    /// Persist a new display order: the page at position `i` gets `order = i`.
    pub async fn reorder(store: &dyn RecordStore, ids: &[RecordId]) -> Result<(), StoreError> {
        apply_order(store, PAGES, ids).await
    }

    /// Snapshot subscription over every page in display order.
    pub fn subscribe(store: Arc<dyn RecordStore>) -> Subscription<Page> {
        subscribe(store, Self::ordered())
    }

    async fn fetch_all(store: &dyn RecordStore, query: &Query) -> Result<Vec<Page>, StoreError> {
        store
            .query(query)
            .await?
            .into_iter()
            .map(|record| record.into_model())
            .collect()
    }
}
