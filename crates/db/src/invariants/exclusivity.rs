//! Home-page exclusivity maintainer.
//!
//! At most one page may carry `is_home = true`. Promoting a page clears the
//! flag from every current holder first; the caller then writes the flag on
//! the candidate as part of its own create/update.
//!
//! The clear and the caller's set are separate writes. Two unsynchronized
//! promotions can interleave so that both candidates end up flagged, and a
//! failed candidate write after successful clears leaves no home page at
//! all. Callers that promote concurrently must serialize the whole
//! clear-then-set sequence.

use futures::future::join_all;

use super::settle;
use crate::models::page::PAGES;
use crate::store::{single_field, Query, RecordStore, StoreError};

/// Field marking the home page.
pub const HOME_FIELD: &str = "is_home";

/// Clear the home flag from every page currently holding it.
///
/// `candidate` is the page about to become home (`None` when it has not
/// been created yet). It is cleared like any other holder; the caller's
/// subsequent write sets it again. Returns how many pages were cleared.
///
/// If any clear fails the promotion fails with [`StoreError::Batch`];
/// pages already cleared stay cleared.
pub async fn promote_to_sole_home(
    store: &dyn RecordStore,
    candidate: Option<&str>,
) -> Result<usize, StoreError> {
    let holders = store
        .query(&Query::collection(PAGES).filter_eq(HOME_FIELD, true))
        .await?;

    let clears = holders
        .iter()
        .map(|page| store.update(PAGES, &page.id, single_field(HOME_FIELD, false)));
    let results = join_all(clears).await;
    settle(results)?;

    tracing::debug!(
        candidate = candidate.unwrap_or("<new>"),
        cleared = holders.len(),
        "Cleared previous home pages",
    );
    Ok(holders.len())
}
