//! Reference resolution.

use serde::{Deserialize, Serialize};

use crate::{ImageRef, ReferenceKind, classify};

/// API base used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Shown wherever an image reference is missing.
pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://via.placeholder.com/300x300?text=No+Image";

const API_SUFFIX: &str = "/api";

// ---------------------------------------------------------------------------
// ResolverConfig
// ---------------------------------------------------------------------------

/// Settings for a [`Resolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// The API base URL, usually the same one the auth gateway uses.
    /// A trailing `/api` is stripped to get the origin files are served from.
    pub base_url: String,

    /// Returned for missing references.
    pub placeholder_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Turns image references into renderable URLs.
///
/// The origin (base URL minus its `/api` suffix) is computed once, at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    origin: String,
    placeholder: String,
}

impl Resolver {
    /// Creates a resolver from its config.
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            origin: strip_api_suffix(&config.base_url).to_string(),
            placeholder: config.placeholder_url.clone(),
        }
    }

    /// The origin relative references are joined to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The URL returned for missing references.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Resolves one reference.
    ///
    /// | kind            | result                         |
    /// |-----------------|--------------------------------|
    /// | missing         | placeholder                    |
    /// | `data:`         | unchanged                      |
    /// | `http(s)://`    | unchanged                      |
    /// | `/path`         | `origin + "/path"`             |
    /// | `path`          | `origin + "/" + "path"`        |
    pub fn resolve(&self, reference: Option<&str>) -> String {
        match classify(reference) {
            ReferenceKind::Missing => self.placeholder.clone(),
            ReferenceKind::InlineData(data) => data.to_string(),
            ReferenceKind::Absolute(url) => url.to_string(),
            ReferenceKind::RootRelative(path) => format!("{}{path}", self.origin),
            ReferenceKind::Relative(path) => format!("{}/{path}", self.origin),
        }
    }

    /// Resolves the cover image of a list: the first entry flagged primary,
    /// else the first entry, else the placeholder.
    ///
    /// A selected entry without a URL resolves to the placeholder; the
    /// search doesn't move on to the next entry.
    pub fn resolve_primary(&self, images: &[ImageRef]) -> String {
        let selected = images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| images.first());
        self.resolve(selected.and_then(|image| image.url.as_deref()))
    }

    /// Resolves every entry, in order. For galleries.
    pub fn resolve_all(&self, images: &[ImageRef]) -> Vec<String> {
        images
            .iter()
            .map(|image| self.resolve(image.url.as_deref()))
            .collect()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

/// Resolves one reference against `base_url`, with the default placeholder.
pub fn resolve(reference: Option<&str>, base_url: &str) -> String {
    resolver_for(base_url).resolve(reference)
}

/// Resolves the cover image of a list against `base_url`, with the default
/// placeholder.
pub fn resolve_primary(images: &[ImageRef], base_url: &str) -> String {
    resolver_for(base_url).resolve_primary(images)
}

fn resolver_for(base_url: &str) -> Resolver {
    Resolver::new(&ResolverConfig {
        base_url: base_url.to_string(),
        ..ResolverConfig::default()
    })
}

/// Removes trailing slashes and a trailing `/api` segment:
/// `http://localhost:5000/api/` → `http://localhost:5000`.
pub fn strip_api_suffix(base_url: &str) -> &str {
    let base = base_url.trim().trim_end_matches('/');
    let split = base.len().saturating_sub(API_SUFFIX.len());
    match base.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(API_SUFFIX) => {
            base[..split].trim_end_matches('/')
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:5000/api";

    fn resolver() -> Resolver {
        Resolver::new(&ResolverConfig {
            base_url: BASE.into(),
            placeholder_url: "https://img/none.png".into(),
        })
    }

    // =====================================================================
    // strip_api_suffix()
    // =====================================================================

    #[test]
    fn test_strip_api_suffix_variants() {
        assert_eq!(strip_api_suffix(BASE), "http://localhost:5000");
        assert_eq!(
            strip_api_suffix("http://localhost:5000/api/"),
            "http://localhost:5000"
        );
        assert_eq!(
            strip_api_suffix("http://localhost:5000/API"),
            "http://localhost:5000"
        );
        assert_eq!(
            strip_api_suffix("http://localhost:5000"),
            "http://localhost:5000"
        );
        assert_eq!(
            strip_api_suffix("http://localhost:5000/"),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_strip_api_suffix_only_whole_segment() {
        // "/rapi" ends in "api" but isn't an /api segment.
        assert_eq!(strip_api_suffix("http://h/rapi"), "http://h/rapi");
        assert_eq!(strip_api_suffix("http://h/api/v1"), "http://h/api/v1");
    }

    #[test]
    fn test_strip_api_suffix_short_and_empty_input() {
        assert_eq!(strip_api_suffix(""), "");
        assert_eq!(strip_api_suffix("/api"), "");
        assert_eq!(strip_api_suffix("pi"), "pi");
    }

    // =====================================================================
    // Resolver::resolve()
    // =====================================================================

    #[test]
    fn test_resolve_missing_returns_placeholder() {
        assert_eq!(resolver().resolve(None), "https://img/none.png");
        assert_eq!(resolver().resolve(Some("   ")), "https://img/none.png");
    }

    #[test]
    fn test_resolve_inline_and_absolute_unchanged() {
        let r = resolver();
        assert_eq!(
            r.resolve(Some("data:image/png;base64,AAAA")),
            "data:image/png;base64,AAAA"
        );
        assert_eq!(
            r.resolve(Some("https://cdn.x/a.png")),
            "https://cdn.x/a.png"
        );
    }

    #[test]
    fn test_resolve_relative_forms_join_origin() {
        let r = resolver();
        assert_eq!(
            r.resolve(Some("/uploads/a.png")),
            "http://localhost:5000/uploads/a.png"
        );
        assert_eq!(r.resolve(Some("a.png")), "http://localhost:5000/a.png");
        assert_eq!(
            r.resolve(Some("uploads/b.jpg")),
            "http://localhost:5000/uploads/b.jpg"
        );
    }

    #[test]
    fn test_resolve_default_resolver_uses_defaults() {
        let r = Resolver::default();
        assert_eq!(r.origin(), "http://localhost:5000");
        assert_eq!(r.placeholder(), DEFAULT_PLACEHOLDER_URL);
    }

    // =====================================================================
    // Resolver::resolve_primary() / resolve_all()
    // =====================================================================

    #[test]
    fn test_resolve_primary_prefers_flagged_entry() {
        let images = [ImageRef::new("a.png"), ImageRef::primary("b.png")];
        assert_eq!(
            resolver().resolve_primary(&images),
            "http://localhost:5000/b.png"
        );
    }

    #[test]
    fn test_resolve_primary_first_flagged_wins() {
        let images = [
            ImageRef::new("a.png"),
            ImageRef::primary("b.png"),
            ImageRef::primary("c.png"),
        ];
        assert_eq!(
            resolver().resolve_primary(&images),
            "http://localhost:5000/b.png"
        );
    }

    #[test]
    fn test_resolve_primary_falls_back_to_first() {
        let images = [ImageRef::new("/uploads/a.png"), ImageRef::new("b.png")];
        assert_eq!(
            resolver().resolve_primary(&images),
            "http://localhost:5000/uploads/a.png"
        );
    }

    #[test]
    fn test_resolve_primary_empty_list_returns_placeholder() {
        assert_eq!(resolver().resolve_primary(&[]), "https://img/none.png");
    }

    #[test]
    fn test_resolve_primary_selected_entry_without_url_is_placeholder() {
        let images = [
            ImageRef {
                url: None,
                is_primary: true,
            },
            ImageRef::new("b.png"),
        ];
        assert_eq!(resolver().resolve_primary(&images), "https://img/none.png");
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let images = [
            ImageRef::new("a.png"),
            ImageRef::default(),
            ImageRef::new("https://cdn.x/c.png"),
        ];
        assert_eq!(
            resolver().resolve_all(&images),
            vec![
                "http://localhost:5000/a.png".to_string(),
                "https://img/none.png".to_string(),
                "https://cdn.x/c.png".to_string(),
            ]
        );
    }
}
