//! Pageforge API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! publishing service, render cache) so integration tests and the binary
//! entrypoint share the same wiring.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod publishing;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
