use serde::{Deserialize, Serialize};

/// One entry of a product's image list, as stored in catalog data.
///
/// ```json
/// { "url": "/uploads/a.png", "isPrimary": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Unresolved reference. May be missing in older records.
    #[serde(default)]
    pub url: Option<String>,

    /// Whether this is the product's cover image.
    #[serde(default)]
    pub is_primary: bool,
}

impl ImageRef {
    /// A non-primary entry.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            is_primary: false,
        }
    }

    /// A primary entry.
    pub fn primary(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            is_primary: true,
        }
    }
}
