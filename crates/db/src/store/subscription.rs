//! Realtime snapshot subscriptions.
//!
//! [`subscribe`] turns a [`Query`] into a long-lived stream of full result
//! snapshots: one immediately, then one after every change notice for the
//! query's collection. The stream ends when the subscriber drops (or calls
//! [`Subscription::unsubscribe`]) or when the store's change feed closes.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{Query, RecordStore, StoreError};

/// Buffered snapshots per subscriber before the producer waits.
const SNAPSHOT_BUFFER: usize = 16;

/// Handle to a running snapshot subscription.
///
/// Dropping the handle cancels the background task.
pub struct Subscription<T> {
    rx: mpsc::Receiver<Vec<T>>,
    cancel: CancellationToken,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Subscription<T> {
    /// Wait for the next snapshot. `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<Vec<T>> {
        self.rx.recv().await
    }

    /// Stop receiving snapshots.
    pub fn unsubscribe(self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn snapshot<T: DeserializeOwned>(
    store: &dyn RecordStore,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    store
        .query(query)
        .await?
        .into_iter()
        .map(|record| record.into_model())
        .collect()
}

/// Start a snapshot subscription for `query`.
///
/// The change feed is attached before the initial query runs, so no write
/// that lands after this call returns can be missed.
pub fn subscribe<T>(store: Arc<dyn RecordStore>, query: Query) -> Subscription<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let mut changes = store.changes();

    tokio::spawn(async move {
        loop {
            match snapshot::<T>(store.as_ref(), &query).await {
                Ok(items) => {
                    tokio::select! {
                        () = token.cancelled() => return,
                        sent = tx.send(items) => {
                            if sent.is_err() {
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        collection = %query.collection,
                        error = %e,
                        "Subscription snapshot failed",
                    );
                }
            }

            // Wait for the next change that touches this collection.
            loop {
                tokio::select! {
                    () = token.cancelled() => return,
                    notice = changes.recv() => match notice {
                        Ok(notice) if notice.collection == query.collection => break,
                        Ok(_) => continue,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Subscription lagged, resyncing");
                            break;
                        }
                        Err(RecvError::Closed) => return,
                    },
                }
            }
        }
    });

    Subscription {
        rx,
        cancel,
        _marker: PhantomData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{single_field, MemoryStore};
    use std::time::Duration;

    #[derive(Debug, serde::Deserialize)]
    struct Item {
        id: String,
        n: i64,
    }

    #[tokio::test]
    async fn emits_initial_snapshot_then_on_change() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let first = store.create("items", single_field("n", 1)).await.unwrap();

        let mut sub = subscribe::<Item>(Arc::clone(&store), Query::collection("items").order_by("n"));

        let initial = sub.next().await.unwrap();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].id, first);

        store.create("items", single_field("n", 0)).await.unwrap();
        let next = sub.next().await.unwrap();
        assert_eq!(next.iter().map(|i| i.n).collect::<Vec<_>>(), [0, 1]);
    }

    #[tokio::test]
    async fn ignores_other_collections() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let mut sub = subscribe::<Item>(Arc::clone(&store), Query::collection("items"));
        assert!(sub.next().await.unwrap().is_empty());

        store.create("other", single_field("n", 1)).await.unwrap();
        let waited = tokio::time::timeout(Duration::from_millis(100), sub.next()).await;
        assert!(waited.is_err(), "no snapshot expected for unrelated writes");
    }

    #[tokio::test]
    async fn unsubscribe_stops_the_task() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let mut sub = subscribe::<Item>(Arc::clone(&store), Query::collection("items"));
        sub.next().await.unwrap();
        let token = sub.cancel.clone();

        sub.unsubscribe();
        assert!(token.is_cancelled());
    }
}
