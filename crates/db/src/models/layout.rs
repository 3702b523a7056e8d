//! Layout models and DTOs.
//!
//! A layout is one content block of a page. Layouts are owned by exactly
//! one page (`page_id`), are only ever listed within that page, and are
//! sequenced by their `order` field.

use pageforge_core::layout_kind::LayoutKind;
use pageforge_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Collection name for layouts.
pub const LAYOUTS: &str = "layouts";

/// A record from the `layouts` collection.
///
/// `text` is rendered as trusted markup by the site; callers sanitize it
/// before it is stored. Margins are in `rem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: RecordId,
    pub page_id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub margin_top: f64,
    #[serde(default)]
    pub margin_bottom: f64,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a layout. The owning page comes from the request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLayout {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub margin_top: f64,
    #[serde(default)]
    pub margin_bottom: f64,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

impl CreateLayout {
    /// A layout of `kind` named `name` with every other field at its default.
    pub fn new(name: impl Into<String>, kind: LayoutKind) -> Self {
        Self {
            name: name.into(),
            kind,
            text: String::new(),
            image: String::new(),
            order: 0,
            margin_top: 0.0,
            margin_bottom: 0.0,
            active: true,
            extras: None,
        }
    }
}

/// DTO for partially updating a layout. A layout cannot move between pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LayoutKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}
