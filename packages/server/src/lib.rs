// Social Saver - API Core
//
// Collects links sent over WhatsApp or pasted into the dashboard, enriches
// them with scraped content and AI-generated metadata, and pushes updates to
// live dashboards.
//
// Domain logic lives in domains/*, infrastructure behind traits in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
