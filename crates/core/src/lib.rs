//! Pageforge domain primitives.
//!
//! Pure, storage-agnostic building blocks shared by the record store,
//! notifier and API crates: id/timestamp aliases, the domain error type,
//! slug derivation, layout block kinds and public path computation.

pub mod error;
pub mod layout_kind;
pub mod revalidation;
pub mod slug;
pub mod types;
