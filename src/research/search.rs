//! Search configuration and the web search client.

use crate::agent::OutputSchema;
use crate::error::{Result, ScribeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Recency filter passed to the search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Freshness {
    PastDay,
    PastWeek,
    PastMonth,
    PastYear,
    /// Any other code, forwarded verbatim (e.g. a date range).
    Custom(String),
}

impl Freshness {
    pub fn as_str(&self) -> &str {
        match self {
            Freshness::PastDay => "pd",
            Freshness::PastWeek => "pw",
            Freshness::PastMonth => "pm",
            Freshness::PastYear => "py",
            Freshness::Custom(code) => code,
        }
    }
}

impl From<String> for Freshness {
    fn from(code: String) -> Self {
        match code.as_str() {
            "pd" => Freshness::PastDay,
            "pw" => Freshness::PastWeek,
            "pm" => Freshness::PastMonth,
            "py" => Freshness::PastYear,
            _ => Freshness::Custom(code),
        }
    }
}

impl From<Freshness> for String {
    fn from(freshness: Freshness) -> Self {
        freshness.as_str().to_string()
    }
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Search terms and recency filter derived from a research plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub search_terms: Vec<String>,
    pub freshness: Freshness,
}

impl SearchConfig {
    /// Structured output schema the search agent must answer with.
    pub fn output_schema() -> OutputSchema {
        OutputSchema::new(
            "search_config",
            json!({
                "type": "object",
                "properties": {
                    "search_terms": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Web search queries that cover the research plan"
                    },
                    "freshness": {
                        "type": "string",
                        "description": "Recency filter: pd (day), pw (week), pm (month) or py (year)"
                    }
                },
                "required": ["search_terms", "freshness"],
                "additionalProperties": false
            }),
        )
    }
}

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub search_term: String,
    pub url: String,
    pub description: String,
}

/// Web search backend.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, term: &str, freshness: &Freshness) -> Result<Vec<SearchResult>>;
}

/// Brave Search API client.
pub struct BraveSearch {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    count: u32,
}

impl BraveSearch {
    pub fn new(endpoint: &str, api_key: &str, count: u32, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ScribeError::Config(format!("Invalid search endpoint {}: {}", endpoint, e)))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            count,
        })
    }
}

#[async_trait]
impl WebSearch for BraveSearch {
    #[instrument(skip(self))]
    async fn search(&self, term: &str, freshness: &Freshness) -> Result<Vec<SearchResult>> {
        let count = self.count.to_string();

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("q", term),
                ("freshness", freshness.as_str()),
                ("count", count.as_str()),
            ])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await?;

        // An error reply (e.g. 429) carries no `web`/`news` sections: no results.
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Search for '{}' failed with status {}: {}", term, status, body);
            return Ok(Vec::new());
        }

        let body: Value = response.json().await.map_err(|e| {
            ScribeError::Search(format!("Invalid search response for '{}': {}", term, e))
        })?;
        let results = parse_search_response(term, &body);
        info!("Search '{}' returned {} results", term, results.len());
        Ok(results)
    }
}

/// Collect results from the `web` and `news` sections of a search response.
///
/// A missing section contributes nothing.
pub fn parse_search_response(term: &str, body: &Value) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for section in ["web", "news"] {
        let Some(items) = body[section]["results"].as_array() else {
            debug!("No {} results for '{}'", section, term);
            continue;
        };

        for item in items {
            let Some(url) = item["url"].as_str() else {
                warn!("Skipping {} result without a url for '{}'", section, term);
                continue;
            };
            results.push(SearchResult {
                search_term: term.to_string(),
                url: url.to_string(),
                description: item["description"].as_str().unwrap_or_default().to_string(),
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_codes() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"search_terms": ["a", "b"], "freshness": "pw"}"#).unwrap();
        assert_eq!(config.freshness, Freshness::PastWeek);
        assert_eq!(config.search_terms, vec!["a", "b"]);

        let custom = Freshness::from("2024-01-01to2024-02-01".to_string());
        assert_eq!(
            custom,
            Freshness::Custom("2024-01-01to2024-02-01".to_string())
        );
        assert_eq!(custom.as_str(), "2024-01-01to2024-02-01");
        assert_eq!(serde_json::to_string(&Freshness::PastYear).unwrap(), "\"py\"");
    }

    #[test]
    fn test_output_schema_is_strict() {
        let schema = SearchConfig::output_schema();
        assert_eq!(schema.name, "search_config");
        assert_eq!(schema.schema["additionalProperties"], false);
        assert_eq!(
            schema.schema["required"],
            json!(["search_terms", "freshness"])
        );
    }

    #[test]
    fn test_parse_web_and_news_results() {
        let body = json!({
            "web": { "results": [
                { "url": "https://a.example", "description": "First" },
                { "url": "https://b.example" }
            ]},
            "news": { "results": [
                { "url": "https://news.example", "description": "Breaking" }
            ]}
        });

        let results = parse_search_response("solar", &body);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].search_term, "solar");
        assert_eq!(results[0].description, "First");
        assert_eq!(results[1].description, "");
        assert_eq!(results[2].url, "https://news.example");
    }

    #[test]
    fn test_parse_missing_sections() {
        assert!(parse_search_response("x", &json!({ "type": "search" })).is_empty());

        let news_only = json!({ "news": { "results": [ { "url": "https://n.example" } ] } });
        assert_eq!(parse_search_response("x", &news_only).len(), 1);
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(BraveSearch::new("not a url", "key", 5, Duration::from_secs(5)).is_err());
    }

    /// Serve one canned HTTP response on a local port and return the endpoint URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/res/v1/web/search", addr)
    }

    #[tokio::test]
    async fn test_rate_limited_search_yields_no_results() {
        let endpoint = serve_once(
            "429 Too Many Requests",
            r#"{"type":"ErrorResponse","error":{"code":"RATE_LIMITED","status":429}}"#,
        )
        .await;
        let search = BraveSearch::new(&endpoint, "key", 5, Duration::from_secs(5)).unwrap();

        let results = search.search("solar", &Freshness::PastWeek).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_successful_search_is_parsed() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"web":{"results":[{"url":"https://a.example","description":"Solar"}]}}"#,
        )
        .await;
        let search = BraveSearch::new(&endpoint, "key", 5, Duration::from_secs(5)).unwrap();

        let results = search.search("solar", &Freshness::PastWeek).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://a.example");
    }
}
