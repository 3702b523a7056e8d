//! Multi-record invariant maintenance.
//!
//! The record store has no cross-record transactions, so invariants that
//! span several records are kept by dispatching one write per record
//! concurrently and awaiting the whole set:
//!
//! - [`ordering`] -- rewrite `order` fields to match a list's positions.
//! - [`exclusivity`] -- clear the home flag from every current holder.
//!
//! Neither rolls back: when some writes of a batch fail, the ones that
//! succeeded stay applied and the batch reports [`StoreError::Batch`].

pub mod exclusivity;
pub mod ordering;

use crate::store::StoreError;

/// Collapse the results of a concurrently dispatched batch.
///
/// Every result has already been awaited. Returns the first failure wrapped
/// in [`StoreError::Batch`] if any write failed.
pub(crate) fn settle(results: Vec<Result<(), StoreError>>) -> Result<(), StoreError> {
    let total = results.len();
    let mut failed = 0;
    let mut first = None;

    for result in results {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Batched write failed");
            failed += 1;
            first.get_or_insert(e);
        }
    }

    match first {
        None => Ok(()),
        Some(source) => Err(StoreError::Batch {
            failed,
            total,
            source: Box::new(source),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn not_found(id: &str) -> StoreError {
        StoreError::NotFound {
            collection: "pages".into(),
            id: id.into(),
        }
    }

    #[test]
    fn all_ok_settles_ok() {
        assert!(settle(vec![Ok(()), Ok(())]).is_ok());
        assert!(settle(Vec::new()).is_ok());
    }

    #[test]
    fn failures_are_counted_and_first_kept() {
        let result = settle(vec![Ok(()), Err(not_found("a")), Err(not_found("b"))]);
        assert_matches!(
            result,
            Err(StoreError::Batch { failed: 2, total: 3, source })
                if matches!(*source, StoreError::NotFound { ref id, .. } if id == "a")
        );
    }
}
