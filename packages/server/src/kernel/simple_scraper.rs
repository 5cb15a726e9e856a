//! Simple web scraper - local HTTP + HTML parsing
//!
//! This implementation:
//! - Uses reqwest for HTTP requests
//! - Uses scraper crate for HTML parsing
//! - Uses htmd for HTML to Markdown conversion of the article region
//! - Falls back to a plain `<title>` / `<p>` scan when no article region exists
//!
//! Limitations:
//! - No JavaScript rendering (use for static HTML sites only)

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use super::{BaseWebScraper, ScrapeResult};
use crate::common::text::collapse_whitespace;

pub const WEB_USER_AGENT: &str = "Mozilla/5.0 (Social Saver Bot)";
const WEB_TIMEOUT: Duration = Duration::from_secs(20);

/// Simple web scraper using reqwest + scraper + htmd
pub struct SimpleScraper {
    client: reqwest::Client,
}

impl SimpleScraper {
    pub fn new() -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(WEB_TIMEOUT)
            .user_agent(WEB_USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch raw HTML from a URL
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

#[async_trait]
impl BaseWebScraper for SimpleScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapeResult> {
        let html = self.fetch_html(url).await?;

        // `Html` is not Send, so all parsing happens after the last await.
        let result = match extract_article(&html) {
            Ok(article) => article,
            Err(e) => {
                debug!(url, error = %e, "Article extraction failed, using tag scan");
                extract_basic(&html)
            }
        };

        Ok(ScrapeResult {
            url: url.to_string(),
            ..result
        })
    }
}

// =============================================================================
// Extraction tiers
// =============================================================================

/// Tier 1: locate the main content region and convert it to text, plus
/// OpenGraph / meta tags for title, image and author.
pub fn extract_article(html: &str) -> Result<ScrapeResult> {
    let document = Html::parse_document(html);

    let region = extract_main_content(&document).context("No article region found")?;
    let text = collapse_whitespace(&html_to_markdown(&region));
    if text.is_empty() {
        anyhow::bail!("Article region has no text");
    }

    Ok(ScrapeResult {
        url: String::new(),
        text,
        title: meta_content(&document, "meta[property='og:title']")
            .or_else(|| extract_title(&document)),
        image: meta_content(&document, "meta[property='og:image']")
            .or_else(|| meta_content(&document, "meta[name='twitter:image']")),
        author: meta_content(&document, "meta[name='author']")
            .or_else(|| meta_content(&document, "meta[property='article:author']")),
    })
}

/// Tier 2: `<title>`, every `<p>`, and `og:image`.
pub fn extract_basic(html: &str) -> ScrapeResult {
    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = Selector::parse("p")
        .map(|selector| {
            document
                .select(&selector)
                .map(|p| collapse_whitespace(&p.text().collect::<String>()))
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    ScrapeResult {
        url: String::new(),
        text: paragraphs.join(" "),
        title: extract_title(&document),
        image: meta_content(&document, "meta[property='og:image']"),
        author: None,
    }
}

/// Extract title from HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;
    document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Main content HTML, if the page marks one.
fn extract_main_content(document: &Html) -> Option<String> {
    let main_selectors = [
        "article",
        "main",
        "[role='main']",
        "#content",
        "#main",
        ".post-content",
        ".entry-content",
        ".article-body",
    ];

    main_selectors.iter().find_map(|selector_str| {
        let selector = Selector::parse(selector_str).ok()?;
        document.select(&selector).next().map(|el| el.html())
    })
}

/// Convert HTML to Markdown
fn html_to_markdown(html: &str) -> String {
    htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript", "nav", "footer", "iframe"])
        .build()
        .convert(html)
        .unwrap_or_else(|_| {
            // Fallback: strip tags and return plain text
            let document = Html::parse_fragment(html);
            document.root_element().text().collect::<String>()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"
        <html>
          <head>
            <title>Fallback Title</title>
            <meta property="og:title" content="Understanding Lifetimes">
            <meta property="og:image" content="https://cdn.example.com/cover.png">
            <meta name="author" content="Ferris">
          </head>
          <body>
            <nav>Home | Blog</nav>
            <article>
              <h1>Understanding Lifetimes</h1>
              <p>Lifetimes describe how long references stay valid.</p>
              <script>track()</script>
            </article>
          </body>
        </html>
    "#;

    const PLAIN_PAGE: &str = r#"
        <html>
          <head>
            <title>Recipe</title>
            <meta property="og:image" content="https://cdn.example.com/soup.jpg">
          </head>
          <body>
            <div><p>Boil water.</p><p>Add   noodles.</p></div>
          </body>
        </html>
    "#;

    #[test]
    fn test_article_extraction_prefers_open_graph() {
        let result = extract_article(ARTICLE_PAGE).unwrap();

        assert_eq!(result.title.as_deref(), Some("Understanding Lifetimes"));
        assert_eq!(result.image.as_deref(), Some("https://cdn.example.com/cover.png"));
        assert_eq!(result.author.as_deref(), Some("Ferris"));
        assert!(result.text.contains("references stay valid"));
        assert!(!result.text.contains("track()"));
        assert!(!result.text.contains("Home | Blog"));
    }

    #[test]
    fn test_article_extraction_fails_without_region() {
        assert!(extract_article(PLAIN_PAGE).is_err());
    }

    #[test]
    fn test_basic_extraction_scans_paragraphs() {
        let result = extract_basic(PLAIN_PAGE);

        assert_eq!(result.title.as_deref(), Some("Recipe"));
        assert_eq!(result.text, "Boil water. Add noodles.");
        assert_eq!(result.image.as_deref(), Some("https://cdn.example.com/soup.jpg"));
        assert!(result.author.is_none());
    }

    #[test]
    fn test_basic_extraction_on_empty_page() {
        let result = extract_basic("<html></html>");
        assert!(result.text.is_empty());
        assert!(result.title.is_none());
    }
}
