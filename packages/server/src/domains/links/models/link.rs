use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{AIResult, Category, FetchedContent, LinkSource};
use crate::common::LinkId;

/// Sender recorded for links submitted through the HTTP API.
pub const WEB_MANUAL_SENDER: &str = "web_manual";

/// Link - a saved URL plus whatever we learned about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub raw_url: String,
    pub source: LinkSource,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub category: Option<Category>,
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub author: Option<String>,
    pub sender_phone: Option<String>,
    pub processed: bool,
    pub processing_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Placeholder row written before enrichment starts.
    pub fn placeholder(raw_url: impl Into<String>, source: LinkSource, sender: Option<String>) -> Self {
        Self {
            id: LinkId::new(),
            raw_url: raw_url.into(),
            source,
            title: None,
            summary: None,
            category: None,
            tags: Vec::new(),
            thumbnail_url: None,
            author: None,
            sender_phone: sender,
            processed: false,
            processing_error: None,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place. Unset fields are left alone.
    pub fn apply(&mut self, update: &LinkUpdate) {
        if let Some(title) = &update.title {
            self.title = Some(title.clone());
        }
        if let Some(summary) = &update.summary {
            self.summary = Some(summary.clone());
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
        if let Some(thumbnail_url) = &update.thumbnail_url {
            self.thumbnail_url = Some(thumbnail_url.clone());
        }
        if let Some(author) = &update.author {
            self.author = Some(author.clone());
        }
        if let Some(processed) = update.processed {
            self.processed = processed;
        }
        if let Some(processing_error) = &update.processing_error {
            self.processing_error = processing_error.clone();
        }
    }
}

/// Partial update applied by the pipeline's finalize and reset writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub thumbnail_url: Option<String>,
    pub author: Option<String>,
    pub processed: Option<bool>,
    /// `Some(None)` clears the marker, `None` leaves it untouched.
    pub processing_error: Option<Option<String>>,
}

impl LinkUpdate {
    /// Enrichment write. Marks the link processed and clears any earlier failure.
    pub fn finalize(ai: &AIResult, content: &FetchedContent) -> Self {
        Self {
            title: Some(ai.title.clone()),
            summary: Some(ai.summary.clone()),
            category: Some(ai.category),
            tags: Some(ai.tags.clone()),
            thumbnail_url: non_empty(&content.thumbnail_url),
            author: non_empty(&content.author),
            processed: Some(true),
            processing_error: Some(None),
        }
    }

    /// Reset write after a failed run.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            processed: Some(false),
            processing_error: Some(Some(reason.into())),
            ..Default::default()
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

/// Row shape of the `links` table. Enum columns are stored as text.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: LinkId,
    raw_url: String,
    source: String,
    title: Option<String>,
    summary: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    thumbnail_url: Option<String>,
    author: Option<String>,
    sender_phone: Option<String>,
    processed: bool,
    processing_error: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for Link {
    type Error = anyhow::Error;

    fn try_from(row: LinkRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            raw_url: row.raw_url,
            source: row.source.parse()?,
            title: row.title,
            summary: row.summary,
            // Rows written outside this service may hold anything here.
            category: row.category.as_deref().map(Category::coerce),
            tags: row.tags,
            thumbnail_url: row.thumbnail_url,
            author: row.author,
            sender_phone: row.sender_phone,
            processed: row.processed,
            processing_error: row.processing_error,
            created_at: row.created_at,
        })
    }
}

fn from_rows(rows: Vec<LinkRow>) -> Result<Vec<Link>> {
    rows.into_iter().map(Link::try_from).collect()
}

impl Link {
    /// Insert a new link
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (
                id, raw_url, source, title, summary, category, tags,
                thumbnail_url, author, sender_phone, processed, processing_error, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.raw_url)
        .bind(self.source.as_str())
        .bind(&self.title)
        .bind(&self.summary)
        .bind(self.category.map(|c| c.as_str()))
        .bind(&self.tags)
        .bind(&self.thumbnail_url)
        .bind(&self.author)
        .bind(&self.sender_phone)
        .bind(self.processed)
        .bind(&self.processing_error)
        .bind(self.created_at)
        .fetch_one(pool)
        .await
        .context("Failed to insert link")?;

        row.try_into()
    }

    /// Find link by ID
    pub async fn find_by_id(id: LinkId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, LinkRow>("SELECT * FROM links WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.map(Link::try_from).transpose()
    }

    /// Apply a partial update and return the new row
    pub async fn update(id: LinkId, update: &LinkUpdate, pool: &PgPool) -> Result<Self> {
        let (touch_error, processing_error) = match &update.processing_error {
            Some(value) => (true, value.clone()),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE links SET
                title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                category = COALESCE($4, category),
                tags = COALESCE($5, tags),
                thumbnail_url = COALESCE($6, thumbnail_url),
                author = COALESCE($7, author),
                processed = COALESCE($8, processed),
                processing_error = CASE WHEN $9 THEN $10 ELSE processing_error END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.summary)
        .bind(update.category.map(|c| c.as_str()))
        .bind(&update.tags)
        .bind(&update.thumbnail_url)
        .bind(&update.author)
        .bind(update.processed)
        .bind(touch_error)
        .bind(processing_error)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("Link not found: {}", id))?;

        row.try_into()
    }

    /// Delete a link. Returns false when nothing matched.
    pub async fn delete(id: LinkId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest first, optionally restricted to one category
    pub async fn find_recent(
        limit: i64,
        offset: i64,
        category: Option<Category>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT * FROM links
            WHERE ($3::text IS NULL OR category = $3)
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .bind(category.map(|c| c.as_str()))
        .fetch_all(pool)
        .await?;

        from_rows(rows)
    }

    /// Processed links saved before `cutoff`
    pub async fn find_processed_before(cutoff: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT * FROM links
            WHERE created_at < $1 AND processed = true
            ORDER BY created_at DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await?;

        from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ai() -> AIResult {
        AIResult::new(
            "Rust async patterns",
            "A walkthrough of tokio.",
            Category::Coding,
            vec!["rust".to_string(), "async".to_string()],
        )
    }

    #[test]
    fn placeholder_is_unprocessed_and_bare() {
        let link = Link::placeholder("https://example.com", LinkSource::Web, Some("+1555".into()));
        assert!(!link.processed);
        assert!(link.title.is_none());
        assert!(link.tags.is_empty());
        assert!(link.processing_error.is_none());
        assert_eq!(link.sender_phone.as_deref(), Some("+1555"));
    }

    #[test]
    fn finalize_sets_enrichment_and_clears_error() {
        let mut link = Link::placeholder("https://example.com", LinkSource::Web, None);
        link.processing_error = Some("earlier failure".into());

        let content = FetchedContent::new("body", "Page", "https://img/x.png", "");
        link.apply(&LinkUpdate::finalize(&sample_ai(), &content));

        assert!(link.processed);
        assert_eq!(link.title.as_deref(), Some("Rust async patterns"));
        assert_eq!(link.category, Some(Category::Coding));
        assert_eq!(link.tags, vec!["rust", "async"]);
        assert_eq!(link.thumbnail_url.as_deref(), Some("https://img/x.png"));
        assert!(link.author.is_none());
        assert!(link.processing_error.is_none());
    }

    #[test]
    fn failed_marks_error_without_enrichment() {
        let mut link = Link::placeholder("https://example.com", LinkSource::Web, None);
        link.apply(&LinkUpdate::failed("db down"));

        assert!(!link.processed);
        assert!(link.title.is_none());
        assert_eq!(link.processing_error.as_deref(), Some("db down"));
    }

    #[test]
    fn serializes_enums_as_strings() {
        let mut link = Link::placeholder("https://x.com/a/status/1", LinkSource::Twitter, None);
        link.category = Some(Category::News);
        let json = serde_json::to_value(&link).unwrap();

        assert_eq!(json["source"], "twitter");
        assert_eq!(json["category"], "News");
        assert_eq!(json["processed"], false);
    }
}
