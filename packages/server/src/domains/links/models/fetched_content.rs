use serde::Serialize;

use crate::common::text::truncate_chars;

/// Cap on scraped text carried into synthesis.
pub const MAX_FETCHED_CHARS: usize = 3000;

/// Best-effort content scraped from a URL.
///
/// Always well-formed. When scraping failed, `error` is set and `raw_text`
/// falls back to the URL itself so synthesis still has something to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchedContent {
    pub raw_text: String,
    pub title: String,
    pub thumbnail_url: String,
    pub author: String,
    pub error: Option<String>,
}

impl FetchedContent {
    pub fn new(
        raw_text: &str,
        title: impl Into<String>,
        thumbnail_url: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            raw_text: truncate_chars(raw_text, MAX_FETCHED_CHARS).to_string(),
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
            author: author.into(),
            error: None,
        }
    }

    /// Result for a URL we could not read.
    pub fn degraded(url: &str, error: impl Into<String>) -> Self {
        Self {
            raw_text: truncate_chars(url, MAX_FETCHED_CHARS).to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
