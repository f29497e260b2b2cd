//! Scrape command - download help-center articles as Markdown.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::scraper::{HttpPageSource, Scraper};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Run the scrape command.
pub async fn run_scrape(
    url: Option<String>,
    output: Option<String>,
    limit: Option<usize>,
    settings: Settings,
) -> Result<()> {
    preflight::check(preflight::Operation::Scrape, &settings)?;

    let base_url = url.unwrap_or_else(|| settings.scraper.base_url.clone());
    let output_dir: PathBuf = output
        .map(|o| Settings::expand_path(&o))
        .unwrap_or_else(|| settings.scraper_output_dir());
    let limit = limit.unwrap_or(settings.scraper.limit);

    let source = HttpPageSource::new(Duration::from_secs(settings.scraper.timeout_secs))?;
    let scraper = Scraper::new(Arc::new(source), &base_url, &output_dir);

    let spinner = Output::spinner(&format!("Fetching up to {} articles...", limit));
    let result = scraper.run(limit).await;
    spinner.finish_and_clear();
    let summary = result?;

    Output::success(&format!(
        "Saved {} of {} articles to {}",
        summary.saved,
        summary.fetched,
        output_dir.display()
    ));
    if summary.skipped_drafts > 0 {
        Output::kv("Drafts skipped", &summary.skipped_drafts.to_string());
    }
    if summary.skipped_empty > 0 {
        Output::kv("Empty skipped", &summary.skipped_empty.to_string());
    }

    Ok(())
}
