//! Layout block kinds.
//!
//! The closed set of block types a page can be composed of. Serialized in
//! kebab-case (`"text-image"`, `"large-image"`, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Rich text next to an image.
    TextImage,
    /// A single full-width image.
    LargeImage,
    Carousel,
    Featured,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::TextImage,
        LayoutKind::LargeImage,
        LayoutKind::Carousel,
        LayoutKind::Featured,
    ];

    /// The wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::TextImage => "text-image",
            LayoutKind::LargeImage => "large-image",
            LayoutKind::Carousel => "carousel",
            LayoutKind::Featured => "featured",
        }
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kebab_case() {
        for kind in LayoutKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let parsed: Result<LayoutKind, _> = serde_json::from_str("\"video\"");
        assert!(parsed.is_err());
    }
}
