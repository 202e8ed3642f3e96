//! Blog feed domain types.

use serde::{Deserialize, Serialize};

/// Maximum blog title length in characters.
pub const BLOG_TITLE_MAX_LEN: usize = 200;

/// Ordering/selection applied to the home feed.
///
/// Unknown values fall back to [`FeedFilter::Latest`], matching the lenient
/// `?filter=` handling of the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFilter {
    /// Newest first.
    #[default]
    Latest,
    /// Most commented first, ties broken by newest.
    Popular,
    /// Only blogs written by accepted friends, newest first.
    Following,
}

impl<'de> Deserialize<'de> for FeedFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "popular" => Self::Popular,
            "following" => Self::Following,
            _ => Self::Latest,
        })
    }
}
