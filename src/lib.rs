//! Scribe - research reports and help-center scraping
//!
//! Two small tools that share one configuration and CLI:
//!
//! - An interactive research assistant. A planner agent refines a research plan with
//!   the user (and can save, list and delete plans in SQLite), a search agent turns the
//!   accepted plan into web search terms, and a summary agent writes the results up as
//!   a Markdown report.
//! - A help-center scraper that pages through a JSON articles API and writes each
//!   published article as a Markdown file.
//!
//! # Architecture
//!
//! - `agent` - tool-calling agent loop over a chat model
//! - `plans` - research plan storage and the planner's tools
//! - `research` - web search, the research session and report output
//! - `scraper` - article pagination and HTML to Markdown conversion
//! - `config` - settings and prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe::config::Settings;
//! use scribe::scraper::{HttpPageSource, Scraper};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let source = HttpPageSource::new(Duration::from_secs(30))?;
//!     let scraper = Scraper::new(
//!         Arc::new(source),
//!         &settings.scraper.base_url,
//!         &settings.scraper_output_dir(),
//!     );
//!
//!     let summary = scraper.run(settings.scraper.limit).await?;
//!     println!("Saved {} articles", summary.saved);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod plans;
pub mod research;
pub mod scraper;

pub use error::{Result, ScribeError};
