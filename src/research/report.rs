//! Summary report formatting and output.

use super::search::SearchResult;
use crate::error::Result;
use std::path::Path;
use tracing::info;

const FENCE_OPEN: &str = "```markdown";
const FENCE_CLOSE: &str = "```";

/// Remove a leading "```markdown" and its trailing "```" from a model reply.
///
/// Everything between the markers is kept as is. The closing marker is only removed
/// when the opening one was present, so a report that merely ends with a code block
/// keeps it.
pub fn strip_markdown_fence(report: &str) -> String {
    match report.strip_prefix(FENCE_OPEN) {
        Some(rest) => rest.strip_suffix(FENCE_CLOSE).unwrap_or(rest).to_string(),
        None => report.to_string(),
    }
}

/// Render search results as the summary agent's input.
pub fn format_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No search results were found.".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. [{}] {}\n   {}",
                i + 1,
                r.search_term,
                r.url,
                r.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the report, replacing any previous one.
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, report)?;
    info!("Wrote summary report to {:?}", path);
    Ok(())
}
