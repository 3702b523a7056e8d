//! Shared response envelope types for API handlers.
//!
//! Admin API responses use a `{ "data": ... }` envelope. Public site reads
//! and the revalidation endpoint return bare JSON.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: pages }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
