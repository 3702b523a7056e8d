pub mod export;
pub mod layouts;
pub mod pages;
pub mod public;
pub mod revalidate;
pub mod settings;
pub mod watch;

use pageforge_core::types::RecordId;
use serde::Deserialize;

/// Request body for the reorder endpoints: ids in their new display order.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<RecordId>,
}
