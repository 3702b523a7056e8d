//! Ordering maintainer.
//!
//! Persists a client-supplied sequence by writing each record's position
//! into its `order` field. Used for the global page list and for the
//! layouts of a single page; a batch must never mix layouts of different
//! pages.

use futures::future::join_all;
use pageforge_core::types::RecordId;

use super::settle;
use crate::store::{single_field, RecordStore, StoreError};

/// Field holding a record's display position.
pub const ORDER_FIELD: &str = "order";

/// Set `order = i` on the record at position `i` of `ids`.
///
/// All updates are dispatched together and awaited together; the store may
/// apply them in any relative order. On success an ascending read by
/// `order` returns the records in exactly the order of `ids`. On partial
/// failure the successful updates stay applied and the sequence is
/// inconsistent until the next successful reorder.
pub async fn apply_order(
    store: &dyn RecordStore,
    collection: &str,
    ids: &[RecordId],
) -> Result<(), StoreError> {
    let writes = ids.iter().enumerate().map(|(position, id)| {
        store.update(collection, id, single_field(ORDER_FIELD, position as i64))
    });
    let results = join_all(writes).await;

    settle(results)?;
    tracing::debug!(collection, count = ids.len(), "Applied order");
    Ok(())
}
