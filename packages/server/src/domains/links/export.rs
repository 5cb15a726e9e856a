//! Markdown knowledge-base export.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::models::Link;

pub const EXPORT_LIMIT: i64 = 500;
pub const EXPORT_FILENAME: &str = "social_saver_export.md";

const UNCATEGORIZED: &str = "Uncategorized";

/// Render links as a Markdown document, one section per category in
/// alphabetical order. Link order within a section is preserved.
pub fn render_markdown(links: &[Link]) -> String {
    let mut by_category: BTreeMap<&str, Vec<&Link>> = BTreeMap::new();
    for link in links {
        let category = link.category.map(|c| c.as_str()).unwrap_or(UNCATEGORIZED);
        by_category.entry(category).or_default().push(link);
    }

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# 🔖 Social Saver — My Knowledge Base\n");
    let _ = writeln!(out, "> Exported {} links\n", links.len());
    let _ = writeln!(out, "---");

    for (category, items) in by_category {
        let _ = writeln!(out, "\n## 📂 {}\n", category);
        for link in items {
            let title = link.title.as_deref().unwrap_or(&link.raw_url);
            let _ = writeln!(out, "### [{}]({})\n", title, link.raw_url);

            if let Some(summary) = link.summary.as_deref().filter(|s| !s.is_empty()) {
                let _ = writeln!(out, "{}\n", summary);
            }
            if !link.tags.is_empty() {
                let tags: Vec<String> = link.tags.iter().map(|t| format!("`#{}`", t)).collect();
                let _ = writeln!(out, "{}\n", tags.join(" "));
            }
        }
    }

    out
}
