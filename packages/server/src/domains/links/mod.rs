//! Links domain - saving URLs and enriching them with scraped content and AI metadata

pub mod activities;
pub mod export;
pub mod extraction;
pub mod models;

pub use models::{AIResult, Category, FetchedContent, Link, LinkEvent, LinkSource, LinkUpdate};
