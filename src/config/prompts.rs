//! Prompt templates for the research agents.
//!
//! Prompts can be customized by placing an `agents.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub agents: AgentPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// System prompts for the three research agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub planner: String,
    pub search: String,
    pub summary: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            planner: r#"You are a research planning assistant. Work with the user to turn a rough topic into a concrete research plan.

Today's date is {{date}}.

You can manage saved research plans:
- Use 'save_research_plan' when the user asks you to store the current plan
- Use 'get_research_plans' to look at plans saved in earlier sessions
- Use 'delete_research_plan' to remove a plan the user no longer needs

Each reply should contain the full, current version of the plan: the research question, the key sub-topics to cover, and what kind of sources would answer them.
The user will type 'accept' when the plan is final."#
                .to_string(),

            search: r#"You turn a research plan into web search queries.

Today's date is {{date}}.

Return between 3 and 6 short, specific search terms that together cover the plan.
Pick a freshness filter for the results:
- "pd" for the past day
- "pw" for the past week
- "pm" for the past month
- "py" for the past year"#
                .to_string(),

            summary: r#"You write research reports in Markdown.

Today's date is {{date}}.

You will receive a research plan and a list of web search results (term, URL, description).
Write a structured report that answers the plan using only the results provided.
Cite sources inline with Markdown links to their URLs.
Finish with a short "Sources" section listing every URL you used."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts with an optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let agents_path = custom_path.join("agents.toml");
            if agents_path.exists() {
                let content = std::fs::read_to_string(&agents_path)?;
                prompts.agents = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.agents.planner.contains("save_research_plan"));
        assert!(!prompts.agents.search.is_empty());
        assert!(!prompts.agents.summary.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_variables_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("date".to_string(), "never".to_string());
        custom.insert("team".to_string(), "docs".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("date".to_string(), "2024-05-01".to_string());

        let rendered = prompts.render_with_custom("{{team}} on {{date}}", &vars);
        assert_eq!(rendered, "docs on 2024-05-01");
    }

    #[test]
    fn test_custom_dir_overrides_agent_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("agents.toml"),
            "planner = \"plan things\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.agents.planner, "plan things");
        assert_eq!(prompts.agents.search, AgentPrompts::default().search);
    }
}
