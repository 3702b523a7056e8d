//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Deserialize` + `Serialize` entity struct matching the stored record
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! DTOs also implement `Serialize` (skipping `None`) because they are
//! written to the store as record payloads.

pub mod layout;
pub mod page;
pub mod settings;

pub(crate) fn default_true() -> bool {
    true
}
