//! Research command - interactive planning, web search and report writing.

use crate::agent::OpenAIChat;
use crate::cli::{preflight, Output};
use crate::config::{Prompts, Settings};
use crate::plans::PlanStore;
use crate::research::{BraveSearch, ResearchSession, SessionOutcome};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Run the research command.
pub async fn run_research(
    model: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    preflight::check(preflight::Operation::Research, &settings)?;

    let model = model.unwrap_or_else(|| settings.agents.model.clone());
    let report_path = output
        .map(|o| Settings::expand_path(&o))
        .unwrap_or_else(|| settings.report_path());

    let api_key = settings
        .search
        .resolve_api_key()
        .ok_or_else(|| anyhow::anyhow!("No search API key configured"))?;
    let search = BraveSearch::new(
        &settings.search.endpoint,
        &api_key,
        settings.search.count,
        Duration::from_secs(settings.search.timeout_secs),
    )?;

    let store = PlanStore::open(&settings.sqlite_path())?;
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let session = ResearchSession::new(
        Arc::new(OpenAIChat::new(&model)?),
        Arc::new(search),
        Arc::new(store),
        prompts,
        report_path.clone(),
    )
    .with_max_iterations(settings.agents.max_tool_iterations);

    Output::header("Scribe Research");
    println!();
    Output::kv("Model", &model);
    Output::kv("Report", &report_path.display().to_string());
    println!();

    let outcome = session
        .run(&mut std::io::stdin().lock(), &mut std::io::stdout())
        .await?;

    match outcome {
        SessionOutcome::Exited => Output::info("Goodbye!"),
        SessionOutcome::Completed {
            report_path,
            search_terms,
            result_count,
        } => {
            Output::success(&format!("Report written to {}", report_path.display()));
            Output::kv("Search terms", &search_terms.join(", "));
            Output::kv("Results", &result_count.to_string());
        }
    }

    Ok(())
}
