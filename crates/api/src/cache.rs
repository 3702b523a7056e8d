//! In-process render cache for public site reads.
//!
//! Anonymous responses for `/` and `/page/{slug}` are cached by request
//! path. Entries are dropped by path through [`RenderCache::invalidate`],
//! either directly from `POST /api/revalidate` or via [`LocalCacheSink`]
//! when the publishing service notifies after a write.
//!
//! A reader takes [`RenderCache::generation`] before querying the store and
//! hands it back to [`RenderCache::insert`]. Every invalidation bumps the
//! generation, so a body rendered from data read before an invalidation is
//! never stored after it.

use std::collections::HashMap;
use std::sync::Arc;

use pageforge_core::revalidation::{PAGE_PATH_PREFIX, PAGE_TEMPLATE_PATH};
use pageforge_events::{InvalidationSink, NotifyError};
use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Entries {
    bodies: HashMap<String, Value>,
    generation: u64,
}

/// Cached public responses keyed by path.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: RwLock<Entries>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<Value> {
        self.entries.read().await.bodies.get(path).cloned()
    }

    /// Current invalidation generation. Read it before loading the data a
    /// body is rendered from.
    pub async fn generation(&self) -> u64 {
        self.entries.read().await.generation
    }

    /// Store `body` for `path` unless an invalidation ran after `generation`
    /// was read. Returns whether the body was stored.
    pub async fn insert(&self, path: impl Into<String>, body: Value, generation: u64) -> bool {
        let mut entries = self.entries.write().await;
        if entries.generation != generation {
            return false;
        }
        entries.bodies.insert(path.into(), body);
        true
    }

    /// Drop the entry for `path`.
    ///
    /// The page template path `/page/[slug]` drops every cached page.
    /// Returns how many entries were removed.
    pub async fn invalidate(&self, path: &str) -> usize {
        let mut entries = self.entries.write().await;
        entries.generation += 1;

        let bodies = &mut entries.bodies;
        if path == PAGE_TEMPLATE_PATH {
            let before = bodies.len();
            bodies.retain(|key, _| !key.starts_with(PAGE_PATH_PREFIX));
            before - bodies.len()
        } else {
            usize::from(bodies.remove(path).is_some())
        }
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.bodies.len()
    }
}

/// Invalidation sink that evicts this process's [`RenderCache`].
pub struct LocalCacheSink {
    cache: Arc<RenderCache>,
}

impl LocalCacheSink {
    pub fn new(cache: Arc<RenderCache>) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl InvalidationSink for LocalCacheSink {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn invalidate(&self, path: &str) -> Result<(), NotifyError> {
        self.cache.invalidate(path).await;
        Ok(())
    }
}
