//! Page models and DTOs.
//!
//! A page is the top-level publishable unit: served publicly at
//! `/page/{slug}` (or at `/` when it is the home page) and composed of
//! ordered layout blocks.

use pageforge_core::revalidation::PageRoute;
use pageforge_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Collection name for pages.
pub const PAGES: &str = "pages";

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A record from the `pages` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub accessible: bool,
    #[serde(default)]
    pub show_title: bool,
    #[serde(default)]
    pub show_description: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Routing-relevant state, for revalidation path computation.
    pub fn route(&self) -> PageRoute {
        PageRoute::new(self.slug.clone(), self.is_home)
    }

    /// Whether anonymous visitors may see this page.
    pub fn is_public(&self) -> bool {
        self.active && self.accessible
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a page. The slug is derived from `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePage {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub accessible: bool,
    #[serde(default = "default_true")]
    pub show_title: bool,
    #[serde(default = "default_true")]
    pub show_description: bool,
}

impl CreatePage {
    /// A page named `name` with every other field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            featured_image: String::new(),
            order: 0,
            is_home: false,
            active: true,
            accessible: true,
            show_title: true,
            show_description: true,
        }
    }
}

/// DTO for partially updating a page. Only provided fields change; a new
/// `name` also regenerates the slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_home: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_description: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::to_document;

    #[test]
    fn create_dto_defaults() {
        let dto: CreatePage = serde_json::from_str(r#"{"name": "About"}"#).unwrap();
        assert!(dto.active && dto.accessible && dto.show_title && dto.show_description);
        assert!(!dto.is_home);
        assert_eq!(dto.order, 0);
    }

    #[test]
    fn update_document_only_carries_provided_fields() {
        let dto = UpdatePage {
            is_home: Some(true),
            ..Default::default()
        };
        let doc = to_document(&dto).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc["is_home"], serde_json::Value::Bool(true));
    }
}
