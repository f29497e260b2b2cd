//! Agent tools exposing the research plan store.

use super::PlanStore;
use crate::agent::{parse_arguments, ParamType, Tool, ToolRegistry, ToolSpec};
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Build a registry with the save, list and delete plan tools.
pub fn plan_tools(store: Arc<PlanStore>) -> Result<ToolRegistry> {
    ToolRegistry::new()
        .with(Arc::new(SavePlanTool(store.clone())))?
        .with(Arc::new(ListPlansTool(store.clone())))?
        .with(Arc::new(DeletePlanTool(store)))
}

struct SavePlanTool(Arc<PlanStore>);

#[derive(Deserialize)]
struct SavePlanArgs {
    short_summary: String,
    details: String,
}

#[async_trait]
impl Tool for SavePlanTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "save_research_plan",
            "Save the current research plan so it can be revisited in later sessions.",
        )
        .param(
            "short_summary",
            ParamType::String,
            "A one-line summary of the research plan",
        )
        .param(
            "details",
            ParamType::String,
            "The full research plan, including questions and sub-topics",
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: SavePlanArgs = parse_arguments(arguments)?;
        let plan = self.0.add_research_plan(&args.short_summary, &args.details)?;
        Ok(serde_json::to_string(&plan)?)
    }
}

struct ListPlansTool(Arc<PlanStore>);

#[async_trait]
impl Tool for ListPlansTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "get_research_plans",
            "List all saved research plans with their ids, summaries and details.",
        )
    }

    async fn execute(&self, _arguments: &str) -> Result<String> {
        let plans = self.0.get_research_plans()?;
        Ok(serde_json::to_string(&plans)?)
    }
}

struct DeletePlanTool(Arc<PlanStore>);

#[derive(Deserialize)]
struct DeletePlanArgs {
    id: i64,
}

#[async_trait]
impl Tool for DeletePlanTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("delete_research_plan", "Delete a saved research plan by id.").param(
            "id",
            ParamType::Integer,
            "Id of the research plan to delete",
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: DeletePlanArgs = parse_arguments(arguments)?;
        self.0.delete_research_plan(args.id)?;
        Ok(json!({ "deleted": args.id }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (Arc<PlanStore>, ToolRegistry) {
        let store = Arc::new(PlanStore::in_memory().unwrap());
        let tools = plan_tools(store.clone()).unwrap();
        (store, tools)
    }

    #[test]
    fn test_plan_tool_names() {
        let (_, tools) = registry();
        assert_eq!(tools.len(), 3);
        for name in ["save_research_plan", "get_research_plans", "delete_research_plan"] {
            assert!(tools.contains(name));
        }
    }

    #[tokio::test]
    async fn test_save_then_list_through_dispatch() {
        let (store, tools) = registry();

        let saved = tools
            .dispatch(
                "save_research_plan",
                r#"{"short_summary": "EV charging", "details": "Map public chargers"}"#,
            )
            .await;
        let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved["short_summary"], "EV charging");
        assert!(saved["id"].as_i64().is_some());

        let listed = tools.dispatch("get_research_plans", "{}").await;
        let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(store.get_research_plans().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_plan_reports_error_text() {
        let (_, tools) = registry();
        let output = tools.dispatch("delete_research_plan", r#"{"id": 7}"#).await;
        assert_eq!(
            output,
            "Error executing tool delete_research_plan: Research plan not found: 7"
        );
    }

    #[tokio::test]
    async fn test_delete_existing_plan() {
        let (store, tools) = registry();
        let plan = store.add_research_plan("Old", "Stale plan").unwrap();

        let output = tools
            .dispatch("delete_research_plan", &format!(r#"{{"id": {}}}"#, plan.id))
            .await;
        assert_eq!(output, format!(r#"{{"deleted":{}}}"#, plan.id));
        assert!(store.get_research_plans().unwrap().is_empty());
    }
}
