//! Multi-agent research pipeline.
//!
//! A planner agent works out a research plan with the user, a search agent turns the
//! accepted plan into web search terms, and a summary agent writes the Markdown report.

mod report;
mod search;
mod session;

pub use report::{format_search_results, strip_markdown_fence, write_report};
pub use search::{
    parse_search_response, BraveSearch, Freshness, SearchConfig, SearchResult, WebSearch,
};
pub use session::{ResearchSession, SessionOutcome};
