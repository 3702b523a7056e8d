//! Fire-and-forget invalidation fan-out.
//!
//! [`CacheInvalidationNotifier::notify`] spawns one task that sends every
//! path to every sink, one request per path per sink. The writer that
//! triggered the notification never waits on it and never sees its errors.

use std::collections::BTreeSet;
use std::sync::Arc;

use pageforge_core::revalidation::{affected_paths, PageRoute};
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for a single invalidation delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Revalidation endpoint returned HTTP {0}")]
    HttpStatus(u16),

    /// The sink could not accept the request.
    #[error("Invalidation sink unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// A destination that can drop cached renders of a path.
#[async_trait::async_trait]
pub trait InvalidationSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Invalidate one public path (e.g. `/` or `/page/about`).
    async fn invalidate(&self, path: &str) -> Result<(), NotifyError>;
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Dispatches path invalidations to every registered sink.
#[derive(Clone, Default)]
pub struct CacheInvalidationNotifier {
    sinks: Vec<Arc<dyn InvalidationSink>>,
}

impl CacheInvalidationNotifier {
    /// A notifier with no sinks; `notify` is then a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional sink.
    pub fn with_sink(mut self, sink: Arc<dyn InvalidationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Invalidate `paths` in the background.
    ///
    /// Each failure is logged at `warn` and dropped; nothing is retried.
    /// The returned handle only exists so tests can wait for delivery.
    pub fn notify(&self, paths: BTreeSet<String>) -> JoinHandle<()> {
        let sinks = self.sinks.clone();
        tokio::spawn(async move {
            for path in &paths {
                for sink in &sinks {
                    match sink.invalidate(path).await {
                        Ok(()) => {
                            tracing::debug!(sink = sink.name(), path = %path, "Path invalidated");
                        }
                        Err(e) => {
                            tracing::warn!(
                                sink = sink.name(),
                                path = %path,
                                error = %e,
                                "Cache invalidation failed",
                            );
                        }
                    }
                }
            }
        })
    }

    /// Invalidate the paths affected by a page moving from `before` to
    /// `after` (either side `None` for a create or delete).
    pub fn notify_route_change(
        &self,
        before: Option<&PageRoute>,
        after: Option<&PageRoute>,
    ) -> JoinHandle<()> {
        self.notify(affected_paths(before, after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl InvalidationSink for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn invalidate(&self, path: &str) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push(path.to_string());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait::async_trait]
    impl InvalidationSink for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn invalidate(&self, _path: &str) -> Result<(), NotifyError> {
            Err(NotifyError::HttpStatus(500))
        }
    }

    fn paths(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn sends_one_request_per_path() {
        let recording = Arc::new(Recording::default());
        let notifier = CacheInvalidationNotifier::new().with_sink(recording.clone());

        notifier.notify(paths(&["/page/a", "/"])).await.unwrap();

        assert_eq!(*recording.seen.lock().unwrap(), ["/", "/page/a"]);
    }

    #[tokio::test]
    async fn a_failing_sink_does_not_stop_the_others() {
        let recording = Arc::new(Recording::default());
        let notifier = CacheInvalidationNotifier::new()
            .with_sink(Arc::new(Failing))
            .with_sink(recording.clone());

        notifier.notify(paths(&["/page/a", "/page/b"])).await.unwrap();

        assert_eq!(recording.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn without_sinks_notify_is_a_no_op() {
        let notifier = CacheInvalidationNotifier::new();
        notifier.notify(paths(&["/"])).await.unwrap();
    }

    #[tokio::test]
    async fn route_change_covers_old_and_new_paths() {
        let recording = Arc::new(Recording::default());
        let notifier = CacheInvalidationNotifier::new().with_sink(recording.clone());

        let before = PageRoute::new("old", true);
        let after = PageRoute::new("new", false);
        notifier
            .notify_route_change(Some(&before), Some(&after))
            .await
            .unwrap();

        assert_eq!(
            *recording.seen.lock().unwrap(),
            ["/", "/page/new", "/page/old"]
        );
    }

    #[test]
    fn notify_error_display_http_status() {
        let err = NotifyError::HttpStatus(502);
        assert_eq!(err.to_string(), "Revalidation endpoint returned HTTP 502");
    }
}
