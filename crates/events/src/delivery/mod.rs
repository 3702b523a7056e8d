//! External delivery channels for invalidation requests.

pub mod http;
