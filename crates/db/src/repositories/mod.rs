//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&dyn RecordStore` as the first argument.

pub mod layout_repo;
pub mod page_repo;
pub mod settings_repo;

pub use layout_repo::LayoutRepo;
pub use page_repo::PageRepo;
pub use settings_repo::SettingsRepo;
