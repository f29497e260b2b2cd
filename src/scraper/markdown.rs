//! Article to Markdown conversion and file naming.

use super::source::Article;
use crate::error::{Result, ScribeError};
use regex::Regex;
use std::sync::OnceLock;

fn separator_regex() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"))
}

/// Derive a filesystem-safe slug from a title.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into one hyphen
/// and strips hyphens from both ends. Falls back to `untitled` when nothing is left.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = separator_regex().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// Render an article as a Markdown document with a title heading and source URL.
pub fn article_markdown(article: &Article) -> Result<String> {
    let body = htmd::convert(article.body()).map_err(|e| {
        ScribeError::Scraper(format!(
            "Failed to convert '{}' to Markdown: {}",
            article.title(),
            e
        ))
    })?;

    Ok(format!(
        "# {}\n\nURL: {}\n\n{}",
        article.title(),
        article.html_url(),
        body
    ))
}
