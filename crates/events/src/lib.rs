//! Pageforge cache invalidation.
//!
//! After content changes, the public paths that render it must be
//! invalidated. This crate provides:
//!
//! - [`CacheInvalidationNotifier`] -- fans a set of paths out to every
//!   registered sink in a background task. Failures are logged, never
//!   returned to the writer.
//! - [`InvalidationSink`] -- the seam a delivery channel implements.
//! - [`delivery`] -- the HTTP sink posting to a remote `/api/revalidate`.

pub mod delivery;
pub mod notifier;

pub use delivery::http::HttpInvalidationSink;
pub use notifier::{CacheInvalidationNotifier, InvalidationSink, NotifyError};
