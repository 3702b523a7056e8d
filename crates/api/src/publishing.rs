//! Page and layout write path.
//!
//! [`PagePublisher`] wraps the repositories with the two concerns every
//! content write carries: home promotions are serialized in-process, and
//! every successful write is followed by a fire-and-forget invalidation of
//! the public paths it affects.

use std::collections::BTreeSet;

use pageforge_core::error::CoreError;
use pageforge_core::revalidation::{default_paths, PageRoute};
use pageforge_core::types::RecordId;
use pageforge_db::models::layout::{CreateLayout, Layout, UpdateLayout};
use pageforge_db::models::page::{CreatePage, Page, UpdatePage};
use pageforge_db::repositories::{LayoutRepo, PageRepo};
use pageforge_db::RecordStore;
use pageforge_events::CacheInvalidationNotifier;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};

/// Applies page and layout writes and notifies caches afterwards.
pub struct PagePublisher {
    notifier: CacheInvalidationNotifier,
    /// Held across clear-previous-homes and the candidate's own write.
    home_lock: Mutex<()>,
}

impl PagePublisher {
    pub fn new(notifier: CacheInvalidationNotifier) -> Self {
        Self {
            notifier,
            home_lock: Mutex::new(()),
        }
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    pub async fn create_page(&self, store: &dyn RecordStore, dto: &CreatePage) -> AppResult<Page> {
        let page = if dto.is_home {
            let _guard = self.home_lock.lock().await;
            PageRepo::create(store, dto).await?
        } else {
            PageRepo::create(store, dto).await?
        };

        tracing::info!(page_id = %page.id, slug = %page.slug, is_home = page.is_home, "Page created");
        self.notify_route(None, Some(&page.route()));
        Ok(page)
    }

    /// Returns `None` if the page does not exist.
    pub async fn update_page(
        &self,
        store: &dyn RecordStore,
        id: &str,
        dto: &UpdatePage,
    ) -> AppResult<Option<Page>> {
        let Some(before) = PageRepo::find_by_id(store, id).await? else {
            return Ok(None);
        };

        let after = if dto.is_home == Some(true) {
            let _guard = self.home_lock.lock().await;
            PageRepo::update(store, id, dto).await?
        } else {
            PageRepo::update(store, id, dto).await?
        };

        if let Some(page) = &after {
            tracing::info!(page_id = %page.id, slug = %page.slug, "Page updated");
            self.notify_route(Some(&before.route()), Some(&page.route()));
        }
        Ok(after)
    }

    /// Delete a page and every layout it owns. Returns `false` if the page
    /// does not exist.
    pub async fn delete_page(&self, store: &dyn RecordStore, id: &str) -> AppResult<bool> {
        let Some(before) = PageRepo::find_by_id(store, id).await? else {
            return Ok(false);
        };

        let layouts_removed = LayoutRepo::delete_for_page(store, id).await?;
        let deleted = PageRepo::delete(store, id).await?;

        if deleted {
            tracing::info!(page_id = %id, layouts_removed, "Page deleted");
            self.notify_route(Some(&before.route()), None);
        }
        Ok(deleted)
    }

    /// Persist a new global page order.
    ///
    /// Navigation order shows on every public page, so the whole site is
    /// invalidated.
    pub async fn reorder_pages(&self, store: &dyn RecordStore, ids: &[RecordId]) -> AppResult<()> {
        PageRepo::reorder(store, ids).await?;
        tracing::info!(count = ids.len(), "Pages reordered");
        self.notify(default_paths());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Layouts
    // -----------------------------------------------------------------------

    pub async fn create_layout(
        &self,
        store: &dyn RecordStore,
        page_id: &str,
        dto: &CreateLayout,
    ) -> AppResult<Layout> {
        let route = owning_route(store, page_id).await?;
        let layout = LayoutRepo::create(store, page_id, dto).await?;

        tracing::info!(page_id, layout_id = %layout.id, kind = %layout.kind, "Layout created");
        self.notify_page(&route);
        Ok(layout)
    }

    /// Returns `None` if the layout does not exist under `page_id`.
    pub async fn update_layout(
        &self,
        store: &dyn RecordStore,
        page_id: &str,
        id: &str,
        dto: &UpdateLayout,
    ) -> AppResult<Option<Layout>> {
        let route = owning_route(store, page_id).await?;
        let layout = LayoutRepo::update(store, page_id, id, dto).await?;

        if layout.is_some() {
            tracing::info!(page_id, layout_id = %id, "Layout updated");
            self.notify_page(&route);
        }
        Ok(layout)
    }

    /// Returns `false` if the layout does not exist under `page_id`.
    pub async fn delete_layout(
        &self,
        store: &dyn RecordStore,
        page_id: &str,
        id: &str,
    ) -> AppResult<bool> {
        let route = owning_route(store, page_id).await?;
        let deleted = LayoutRepo::delete(store, page_id, id).await?;

        if deleted {
            tracing::info!(page_id, layout_id = %id, "Layout deleted");
            self.notify_page(&route);
        }
        Ok(deleted)
    }

    /// Persist a new layout order for one page.
    ///
    /// `ids` must list every layout of `page_id` exactly once; otherwise
    /// nothing is written and a validation error is returned.
    pub async fn reorder_layouts(
        &self,
        store: &dyn RecordStore,
        page_id: &str,
        ids: &[RecordId],
    ) -> AppResult<()> {
        let route = owning_route(store, page_id).await?;

        if !LayoutRepo::reorder(store, page_id, ids).await? {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Reorder must list every layout of page {page_id} exactly once"
            ))));
        }

        tracing::info!(page_id, count = ids.len(), "Layouts reordered");
        self.notify_page(&route);
        Ok(())
    }

    fn notify_page(&self, route: &PageRoute) {
        self.notify_route(Some(route), Some(route));
    }

    // Detached: delivery outcome is only logged.
    fn notify_route(&self, before: Option<&PageRoute>, after: Option<&PageRoute>) {
        drop(self.notifier.notify_route_change(before, after));
    }

    fn notify(&self, paths: BTreeSet<String>) {
        drop(self.notifier.notify(paths));
    }
}

async fn owning_route(store: &dyn RecordStore, page_id: &str) -> AppResult<PageRoute> {
    PageRepo::find_by_id(store, page_id)
        .await?
        .map(|page| page.route())
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", page_id)))
}
