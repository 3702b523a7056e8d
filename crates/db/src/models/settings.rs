//! Site settings model and DTO.
//!
//! Settings is a singleton record with a fixed id. It is created with
//! defaults the first time it is read and is never deleted.

use pageforge_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Collection name for settings.
pub const SETTINGS: &str = "settings";

/// The fixed id of the singleton settings record.
pub const SETTINGS_ID: &str = "site-settings";

pub const DEFAULT_SITE_TITLE: &str = "Modern CMS";
pub const DEFAULT_SITE_DESCRIPTION: &str = "A modern content management system";
pub const DEFAULT_CONTACT_EMAIL: &str = "admin@example.com";

/// The site-wide settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub id: RecordId,
    pub site_title: String,
    pub site_description: String,
    pub contact_email: String,
    pub auto_generate_meta_descriptions: bool,
    pub include_site_name_in_titles: bool,
    pub generate_xml_sitemap: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for partially updating the settings record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_generate_meta_descriptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_site_name_in_titles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_xml_sitemap: Option<bool>,
}

impl UpdateSettings {
    /// Every field set to its default value.
    pub fn defaults() -> Self {
        Self {
            site_title: Some(DEFAULT_SITE_TITLE.to_string()),
            site_description: Some(DEFAULT_SITE_DESCRIPTION.to_string()),
            contact_email: Some(DEFAULT_CONTACT_EMAIL.to_string()),
            auto_generate_meta_descriptions: Some(true),
            include_site_name_in_titles: Some(true),
            generate_xml_sitemap: Some(true),
        }
    }
}
