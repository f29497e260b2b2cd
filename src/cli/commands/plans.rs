//! Plans command - inspect and prune saved research plans.

use crate::cli::{Output, PlansAction};
use crate::config::Settings;
use crate::error::ScribeError;
use crate::plans::PlanStore;
use anyhow::Result;

/// Run the plans command.
pub fn run_plans(action: &PlansAction, settings: &Settings) -> Result<()> {
    let store = PlanStore::open(&settings.sqlite_path())?;

    match action {
        PlansAction::List => {
            let plans = store.get_research_plans()?;
            if plans.is_empty() {
                Output::info("No research plans saved yet.");
                return Ok(());
            }

            Output::header(&format!("Research plans ({})", plans.len()));
            for plan in &plans {
                Output::plan_info(
                    plan.id,
                    &plan.short_summary,
                    &plan.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    &plan.details,
                );
            }
        }

        PlansAction::Delete { id } => match store.delete_research_plan(*id) {
            Ok(()) => Output::success(&format!("Deleted research plan #{}", id)),
            Err(ScribeError::PlanNotFound(id)) => {
                Output::warning(&format!("No research plan with id {}", id));
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}
