//! Help-center API types and page fetching.

use crate::error::{Result, ScribeError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// A help-center article as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    /// HTML body.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub draft: Option<bool>,
}

impl Article {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// Empty when the API omits the URL, so the Markdown gets a bare `URL:` line.
    pub fn html_url(&self) -> &str {
        self.html_url.as_deref().unwrap_or_default()
    }

    pub fn is_draft(&self) -> bool {
        self.draft.unwrap_or(false)
    }
}

/// One page of the cursor-paginated article listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticlePage {
    #[serde(default)]
    pub articles: Vec<Article>,
    /// URL of the next page; absent or null on the last page.
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Source of article pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<ArticlePage>;
}

/// Fetches pages over HTTP.
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> Result<ArticlePage> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScribeError::Scraper(format!(
                "Failed to fetch articles: {}",
                status
            )));
        }

        let page: ArticlePage = response.json().await?;
        debug!("Fetched {} articles from {}", page.articles.len(), url);
        Ok(page)
    }
}
