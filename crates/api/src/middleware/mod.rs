//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Optional variant for public routes whose
//!   response depends on whether the caller is signed in.

pub mod auth;
