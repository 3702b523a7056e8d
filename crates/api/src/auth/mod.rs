//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Tokens are minted by whoever holds `JWT_SECRET` (the admin login service);
//! this server only validates them.

pub mod jwt;
