//! Research session driver: plan, search, summarize, write.

use super::report::{format_search_results, strip_markdown_fence, write_report};
use super::search::{SearchConfig, SearchResult, WebSearch};
use crate::agent::{Agent, ChatModel};
use crate::config::Prompts;
use crate::error::Result;
use crate::plans::{plan_tools, PlanStore};
use console::style;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The user typed `exit` (or closed the input) during planning.
    Exited,
    /// The report was written.
    Completed {
        report_path: PathBuf,
        search_terms: Vec<String>,
        result_count: usize,
    },
}

/// A line typed at the planning prompt.
#[derive(Debug, PartialEq)]
enum PlanInput<'a> {
    Exit,
    Accept,
    Empty,
    Message(&'a str),
}

fn parse_plan_input(line: &str) -> PlanInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        PlanInput::Empty
    } else if line.eq_ignore_ascii_case("exit") {
        PlanInput::Exit
    } else if line.eq_ignore_ascii_case("accept") {
        PlanInput::Accept
    } else {
        PlanInput::Message(line)
    }
}

/// Runs the planner, search and summary agents in sequence.
pub struct ResearchSession {
    model: Arc<dyn ChatModel>,
    search: Arc<dyn WebSearch>,
    store: Arc<PlanStore>,
    prompts: Prompts,
    report_path: PathBuf,
    max_iterations: Option<usize>,
}

impl ResearchSession {
    pub fn new(
        model: Arc<dyn ChatModel>,
        search: Arc<dyn WebSearch>,
        store: Arc<PlanStore>,
        prompts: Prompts,
        report_path: PathBuf,
    ) -> Self {
        Self {
            model,
            search,
            store,
            prompts,
            report_path,
            max_iterations: None,
        }
    }

    /// Cap completion requests per agent turn.
    pub fn with_max_iterations(mut self, max: Option<usize>) -> Self {
        self.max_iterations = max;
        self
    }

    fn render(&self, template: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert(
            "date".to_string(),
            chrono::Local::now().format("%Y-%m-%d").to_string(),
        );
        self.prompts.render_with_custom(template, &vars)
    }

    fn agent(&self, name: &str, template: &str) -> Agent {
        Agent::new(name, &self.render(template), self.model.clone())
            .with_max_iterations(self.max_iterations)
    }

    /// Run the whole pipeline against the given console.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionOutcome> {
        let Some(plan) = self.plan(input, output).await? else {
            return Ok(SessionOutcome::Exited);
        };

        writeln!(output, "\n{}", style("Deriving search terms...").dim())?;
        let config = self.derive_search_config(&plan).await?;
        writeln!(
            output,
            "{} {} (freshness: {})",
            style("Searching:").bold(),
            config.search_terms.join(", "),
            config.freshness
        )?;

        let results = self.gather_results(&config).await?;
        writeln!(
            output,
            "{}",
            style(format!("Found {} results, writing report...", results.len())).dim()
        )?;

        let report = self.summarize(&plan, &results).await?;
        write_report(&self.report_path, &report)?;

        Ok(SessionOutcome::Completed {
            report_path: self.report_path.clone(),
            search_terms: config.search_terms,
            result_count: results.len(),
        })
    }

    /// Interactive planning. Returns the accepted plan, or `None` if the user exits.
    pub async fn plan<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Option<String>> {
        let mut planner = self
            .agent("planner", &self.prompts.agents.planner)
            .with_tools(plan_tools(self.store.clone())?);

        writeln!(
            output,
            "{}",
            style("Describe what you want to research. Type 'accept' to use the plan, or 'exit' to quit.").dim()
        )?;

        loop {
            write!(output, "{} ", style("You:").green().bold())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                info!("Input closed during planning");
                return Ok(None);
            }

            match parse_plan_input(&line) {
                PlanInput::Empty => continue,
                PlanInput::Exit => return Ok(None),
                PlanInput::Accept => match planner.last_reply() {
                    Some(plan) => {
                        info!("Research plan accepted");
                        return Ok(Some(plan.to_string()));
                    }
                    None => {
                        writeln!(
                            output,
                            "{}",
                            style("There is no plan yet. Describe your research topic first.")
                                .yellow()
                        )?;
                    }
                },
                PlanInput::Message(text) => {
                    let reply = planner.send(text).await?;
                    writeln!(output, "\n{} {}\n", style("Planner:").cyan().bold(), reply)?;
                }
            }
        }
    }

    /// Ask the search agent for search terms and a freshness filter.
    #[instrument(skip_all)]
    pub async fn derive_search_config(&self, plan: &str) -> Result<SearchConfig> {
        let mut agent = self.agent("search", &self.prompts.agents.search);
        let config: SearchConfig = agent
            .send_structured(
                &format!("Research plan:\n{}", plan),
                &SearchConfig::output_schema(),
            )
            .await?;

        info!(
            "Derived {} search terms (freshness {})",
            config.search_terms.len(),
            config.freshness
        );
        Ok(config)
    }

    /// Run one search per term, in order.
    pub async fn gather_results(&self, config: &SearchConfig) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        for term in &config.search_terms {
            results.extend(self.search.search(term, &config.freshness).await?);
        }
        Ok(results)
    }

    /// Ask the summary agent for a Markdown report.
    #[instrument(skip_all)]
    pub async fn summarize(&self, plan: &str, results: &[SearchResult]) -> Result<String> {
        let mut agent = self.agent("summary", &self.prompts.agents.summary);
        let reply = agent
            .send(&format!(
                "Research plan:\n{}\n\nSearch results:\n{}",
                plan,
                format_search_results(results)
            ))
            .await?;

        Ok(strip_markdown_fence(&reply))
    }
}
