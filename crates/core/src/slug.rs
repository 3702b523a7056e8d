//! Page slug derivation and collision resolution.
//!
//! A slug is the URL-safe identifier a page is served under
//! (`/page/{slug}`). It is always derived from the page name and is
//! regenerated whenever the name changes, which breaks previously shared
//! links to the old slug.

/// Fallback used when a name derives to an empty slug.
pub const FALLBACK_SLUG: &str = "page";

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, transliterates non-ASCII characters to their closest ASCII
/// spelling, replaces every run of non-alphanumeric characters with a single
/// hyphen and trims leading/trailing hyphens. Pure and total: any input,
/// including the empty string, yields a (possibly empty) slug.
///
/// # Examples
///
/// ```
/// use pageforge_core::slug::derive_slug;
///
/// assert_eq!(derive_slug("Über Página 1!"), "uber-pagina-1");
/// assert_eq!(derive_slug("  About   us  "), "about-us");
/// ```
pub fn derive_slug(name: &str) -> String {
    ::slug::slugify(name)
}

/// Resolve a derived slug against slugs already used by other pages.
///
/// Returns `base` when it is free, otherwise the first of `base-2`,
/// `base-3`, ... that is. An empty `base` is replaced by [`FALLBACK_SLUG`].
pub fn unique_slug<S: AsRef<str>>(base: &str, taken: &[S]) -> String {
    let base = if base.is_empty() { FALLBACK_SLUG } else { base };
    let is_taken = |candidate: &str| taken.iter().any(|t| t.as_ref() == candidate);

    if !is_taken(base) {
        return base.to_string();
    }

    let mut suffix = 2u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_and_hyphenates() {
        assert_eq!(derive_slug("Über Página 1!"), "uber-pagina-1");
    }

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(derive_slug("--Hello,   World!!--"), "hello-world");
        assert_eq!(derive_slug("a_b.c/d"), "a-b-c-d");
    }

    #[test]
    fn accented_latin() {
        assert_eq!(derive_slug("Ação Promoção"), "acao-promocao");
        assert_eq!(derive_slug("Crème Brûlée"), "creme-brulee");
    }

    #[test]
    fn empty_and_symbol_only_names() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("!!!"), "");
    }

    #[test]
    fn is_idempotent() {
        for name in [
            "Über Página 1!",
            "  spaced   out  ",
            "already-a-slug",
            "MiXeD CaSe 42",
            "Ação & Reação",
            "",
        ] {
            let once = derive_slug(name);
            assert_eq!(derive_slug(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn output_is_lowercase_ascii_hyphen_delimited() {
        let slug = derive_slug("Ñandú Élan -- Vital ÆØÅ");
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        assert!(!slug.contains("--"));
    }

    #[test]
    fn unique_slug_free_base() {
        let taken: Vec<String> = vec!["contact".into()];
        assert_eq!(unique_slug("about", &taken), "about");
    }

    #[test]
    fn unique_slug_appends_first_free_suffix() {
        let taken = ["about", "about-2", "about-4"];
        assert_eq!(unique_slug("about", &taken), "about-3");
    }

    #[test]
    fn unique_slug_empty_base_falls_back() {
        let none: [&str; 0] = [];
        assert_eq!(unique_slug("", &none), "page");
        assert_eq!(unique_slug("", &["page"]), "page-2");
    }
}
