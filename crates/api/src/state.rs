use std::sync::Arc;

use pageforge_db::RecordStore;
use pageforge_events::{CacheInvalidationNotifier, HttpInvalidationSink, NotifyError};

use crate::cache::{LocalCacheSink, RenderCache};
use crate::config::ServerConfig;
use crate::publishing::PagePublisher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (every field is behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Record store holding pages, layouts and settings.
    pub store: Arc<dyn RecordStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Write path for pages and layouts (invariants + invalidation).
    pub publisher: Arc<PagePublisher>,
    /// Cached anonymous public responses.
    pub render_cache: Arc<RenderCache>,
}

impl AppState {
    /// Wire the render cache and invalidation sinks around `store`.
    ///
    /// The local cache is always invalidated; a remote site is added when
    /// `SITE_URL` is configured.
    pub fn new(store: Arc<dyn RecordStore>, config: ServerConfig) -> Result<Self, NotifyError> {
        let render_cache = Arc::new(RenderCache::new());
        let mut notifier = CacheInvalidationNotifier::new()
            .with_sink(Arc::new(LocalCacheSink::new(Arc::clone(&render_cache))));

        if let Some(site_url) = &config.site_url {
            let sink = HttpInvalidationSink::new(site_url, config.revalidate_secret.clone())?;
            tracing::info!(endpoint = sink.endpoint(), "Remote revalidation enabled");
            notifier = notifier.with_sink(Arc::new(sink));
        }

        Ok(Self {
            store,
            config: Arc::new(config),
            publisher: Arc::new(PagePublisher::new(notifier)),
            render_cache,
        })
    }
}
