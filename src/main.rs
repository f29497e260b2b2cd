//! Scribe CLI entry point.

use anyhow::Result;
use clap::Parser;
use scribe::cli::{commands, Cli, Commands};
use scribe::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up OPENAI_API_KEY / BRAVE_API_KEY from a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scribe={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Research { model, output } => {
            commands::run_research(model.clone(), output.clone(), settings).await?;
        }

        Commands::Scrape { url, output, limit } => {
            commands::run_scrape(url.clone(), output.clone(), *limit, settings).await?;
        }

        Commands::Plans { action } => {
            commands::run_plans(action, &settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}
