use serde::Serialize;

use super::Category;
use crate::common::text::truncate_chars;

pub const MAX_TITLE_CHARS: usize = 80;
pub const MAX_TAGS: usize = 7;

/// Metadata produced by the synthesizer for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AIResult {
    pub title: String,
    pub summary: String,
    pub category: Category,
    pub tags: Vec<String>,
}

impl AIResult {
    /// Build a result, clamping title length and tag count and lowercasing tags.
    pub fn new(
        title: impl AsRef<str>,
        summary: impl Into<String>,
        category: Category,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        let tags = tags
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .take(MAX_TAGS)
            .collect();

        Self {
            title: truncate_chars(title.as_ref().trim(), MAX_TITLE_CHARS).to_string(),
            summary: summary.into(),
            category,
            tags,
        }
    }

    /// Returned when every provider failed or none is configured.
    pub fn fallback() -> Self {
        Self {
            title: "Saved Content".to_string(),
            summary: "AI synthesis unavailable. Content saved.".to_string(),
            category: Category::Other,
            tags: vec!["unprocessed".to_string()],
        }
    }
}
