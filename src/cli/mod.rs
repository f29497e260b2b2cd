//! CLI module for Scribe.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Scribe - research reports and help-center scraping
///
/// Plan research with an LLM, search the web and write a Markdown report,
/// or download a help center's articles as Markdown files.
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan research interactively, search the web and write a summary report
    Research {
        /// LLM model to use for all agents
        #[arg(short, long)]
        model: Option<String>,

        /// Where to write the report (default: summary_report.md)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Download help-center articles and save them as Markdown
    Scrape {
        /// First page of the articles API
        #[arg(long)]
        url: Option<String>,

        /// Directory to write Markdown files to
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum number of articles to fetch
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Manage saved research plans
    Plans {
        #[command(subcommand)]
        action: PlansAction,
    },

    /// Check API keys, directories and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlansAction {
    /// List saved research plans
    List,

    /// Delete a research plan
    Delete {
        /// Plan id
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
