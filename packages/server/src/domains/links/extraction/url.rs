//! URL extraction, classification and normalization.
//!
//! Pure functions over strings. None of them fail: text without URLs simply
//! yields nothing, and an unrecognised URL is classified `Web` or `Unknown`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::links::models::LinkSource;

lazy_static! {
    static ref GENERIC_URL: Regex =
        Regex::new(r#"(?i)https?://[^\s<>"'{}|\\^`\[\]]+"#).expect("valid generic url regex");
    static ref INSTAGRAM_URL: Regex = Regex::new(
        r"(?i)https?://(?:www\.)?instagram\.com(?:/[A-Za-z0-9_.]+)?/(?:reel|p|tv)/[A-Za-z0-9_-]+/?|https?://instagr\.am/[A-Za-z0-9_-]+/?"
    )
    .expect("valid instagram regex");
    static ref TWITTER_URL: Regex = Regex::new(
        r"(?i)https?://(?:www\.)?(?:twitter|x)\.com/\w+/status/\d+|https?://t\.co/[A-Za-z0-9]+"
    )
    .expect("valid twitter regex");
}

/// Characters dropped from the end of a URL found in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', '!', '?', ')'];

/// A URL pulled out of free text, with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUrl {
    pub url: String,
    pub source: LinkSource,
}

/// Find every URL in `text`, in order of first appearance, without duplicates.
pub fn extract_urls(text: &str) -> Vec<ExtractedUrl> {
    let mut seen = std::collections::HashSet::new();

    GENERIC_URL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .filter(|url| is_whole_url(url) && seen.insert(*url))
        .map(|url| ExtractedUrl {
            url: url.to_string(),
            source: classify(url),
        })
        .collect()
}

/// Social patterns win over the generic one: Instagram, then Twitter, then web.
pub fn classify(url: &str) -> LinkSource {
    if INSTAGRAM_URL.is_match(url) {
        LinkSource::Instagram
    } else if TWITTER_URL.is_match(url) {
        LinkSource::Twitter
    } else if GENERIC_URL.is_match(url) {
        LinkSource::Web
    } else {
        LinkSource::Unknown
    }
}

/// True only when a URL starts at the very first character.
pub fn is_valid_url(url: &str) -> bool {
    GENERIC_URL.find(url).is_some_and(|m| m.start() == 0)
}

// Trimming punctuation can leave a bare scheme such as `https://`.
fn is_whole_url(url: &str) -> bool {
    GENERIC_URL
        .find(url)
        .is_some_and(|m| m.start() == 0 && m.end() == url.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrailingSlash {
    Keep,
    None,
    ExactlyOne,
}

#[derive(Debug, Clone, Copy)]
struct NormalizeRule {
    strip_query: bool,
    trailing_slash: TrailingSlash,
}

fn rule_for(source: LinkSource) -> NormalizeRule {
    match source {
        LinkSource::Instagram => NormalizeRule {
            strip_query: true,
            trailing_slash: TrailingSlash::ExactlyOne,
        },
        LinkSource::Twitter => NormalizeRule {
            strip_query: true,
            trailing_slash: TrailingSlash::None,
        },
        LinkSource::Web | LinkSource::Unknown => NormalizeRule {
            strip_query: false,
            trailing_slash: TrailingSlash::Keep,
        },
    }
}

/// Canonical form of a URL for storage. Idempotent.
pub fn normalize(url: &str, source: LinkSource) -> String {
    let rule = rule_for(source);
    let mut url = url.trim();

    if rule.strip_query {
        url = url.split('?').next().unwrap_or(url);
    }

    match rule.trailing_slash {
        TrailingSlash::Keep => url.to_string(),
        TrailingSlash::None => url.trim_end_matches('/').to_string(),
        TrailingSlash::ExactlyOne => format!("{}/", url.trim_end_matches('/')),
    }
}
