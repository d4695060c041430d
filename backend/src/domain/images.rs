//! Decorative food photography.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Alt text used when a provider supplies none.
pub const DEFAULT_IMAGE_ALT: &str = "Restaurant image";

/// Stock photo service an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageProvider {
    Unsplash,
    Pixabay,
}

impl fmt::Display for ImageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unsplash => "unsplash",
            Self::Pixabay => "pixabay",
        })
    }
}

/// One image suitable for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub url: String,
    pub alt: String,
    pub photographer: Option<String>,
    pub provider: ImageProvider,
}

/// Alt text from a comma-separated tag list: the first three tags, or
/// [`DEFAULT_IMAGE_ALT`] when there are none.
///
/// # Examples
/// ```
/// use eatopia::domain::alt_from_tags;
///
/// assert_eq!(alt_from_tags("food, pasta, dinner, table"), "food, pasta, dinner");
/// assert_eq!(alt_from_tags(""), "Restaurant image");
/// ```
pub fn alt_from_tags(tags: &str) -> String {
    let picked: Vec<_> = tags
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .take(3)
        .collect();
    if picked.is_empty() {
        DEFAULT_IMAGE_ALT.to_owned()
    } else {
        picked.join(", ")
    }
}

/// Search terms must be non-blank.
pub fn normalise_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
