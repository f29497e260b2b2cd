//! Configuration module for Scribe.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, Prompts};
pub use settings::{
    AgentSettings, DatabaseSettings, GeneralSettings, PromptSettings, ReportSettings,
    ScraperSettings, SearchSettings, Settings,
};
