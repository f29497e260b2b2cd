//! Pre-flight checks before network-bound commands.
//!
//! Validates that required credentials are available before starting an
//! interactive session that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, ScribeError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Research needs an OpenAI key and a search API key.
    Research,
    /// Scraping uses a public endpoint.
    Scrape,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Research => {
            check_openai_key()?;
            check_search_key(settings)?;
        }
        Operation::Scrape => {}
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(ScribeError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(ScribeError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if the search API key is configured.
fn check_search_key(settings: &Settings) -> Result<()> {
    settings.search.resolve_api_key().map(|_| ()).ok_or_else(|| {
        ScribeError::Config(
            "No search API key. Set BRAVE_API_KEY or search.api_key in the config file."
                .to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_scrape_no_requirements() {
        assert!(check(Operation::Scrape, &Settings::default()).is_ok());
    }

    #[test]
    fn test_search_key_from_config() {
        let mut settings = Settings::default();
        settings.search.api_key = Some("brave-key".to_string());
        assert!(check_search_key(&settings).is_ok());
    }
}
