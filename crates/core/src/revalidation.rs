//! Public path computation for cache revalidation.
//!
//! A page write can change what the public site serves at the root path
//! (when the page is or was the home page) and at the page's own path.
//! These helpers compute which paths must be invalidated; delivering the
//! invalidation is the notifier's job.

use std::collections::BTreeSet;

/// The site root, served by the home page.
pub const ROOT_PATH: &str = "/";

/// Prefix of every public page path.
pub const PAGE_PATH_PREFIX: &str = "/page/";

/// Template path covering every public page at once.
pub const PAGE_TEMPLATE_PATH: &str = "/page/[slug]";

/// The public path a page with `slug` is served under.
pub fn page_path(slug: &str) -> String {
    format!("{PAGE_PATH_PREFIX}{slug}")
}

/// The routing-relevant state of a page at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pub slug: String,
    pub is_home: bool,
}

impl PageRoute {
    pub fn new(slug: impl Into<String>, is_home: bool) -> Self {
        Self {
            slug: slug.into(),
            is_home,
        }
    }
}

/// Paths affected by a page transitioning from `before` to `after`.
///
/// `before` is `None` for a create, `after` is `None` for a delete. The
/// page's own path is always included (both slugs on a rename); the root is
/// included when the page was home before or is home after.
pub fn affected_paths(before: Option<&PageRoute>, after: Option<&PageRoute>) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();

    for route in before.into_iter().chain(after) {
        paths.insert(page_path(&route.slug));
        if route.is_home {
            paths.insert(ROOT_PATH.to_string());
        }
    }

    paths
}

/// The default invalidation set used when no specific path is requested:
/// the root and every page.
pub fn default_paths() -> BTreeSet<String> {
    [ROOT_PATH.to_string(), PAGE_TEMPLATE_PATH.to_string()]
        .into_iter()
        .collect()
}
