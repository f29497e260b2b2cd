//! Help-center scraper.
//!
//! Walks a cursor-paginated articles endpoint and writes each published article to
//! `<output_dir>/<slug>.md`. Pages are fetched one after another; a failed page ends
//! pagination and whatever was collected so far is still written.

mod markdown;
mod source;

pub use markdown::{article_markdown, slugify};
pub use source::{Article, ArticlePage, HttpPageSource, PageSource};

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Counts from a scraper run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeSummary {
    pub fetched: usize,
    pub saved: usize,
    pub skipped_drafts: usize,
    pub skipped_empty: usize,
}

/// Downloads articles and converts them to Markdown files.
pub struct Scraper {
    source: Arc<dyn PageSource>,
    base_url: String,
    output_dir: PathBuf,
}

impl Scraper {
    pub fn new(source: Arc<dyn PageSource>, base_url: &str, output_dir: &Path) -> Self {
        Self {
            source,
            base_url: base_url.to_string(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Collect up to `limit` articles, following `next_page` cursors.
    #[instrument(skip(self))]
    pub async fn fetch_articles(&self, limit: usize) -> Vec<Article> {
        let mut articles = Vec::new();
        let mut next = Some(self.base_url.clone());

        while let Some(url) = next.take() {
            if articles.len() >= limit {
                break;
            }

            info!("Fetching {}", url);
            match self.source.fetch_page(&url).await {
                Ok(page) => {
                    articles.extend(page.articles);
                    next = page.next_page.filter(|u| !u.is_empty());
                }
                Err(e) => {
                    warn!("{}", e);
                    break;
                }
            }
        }

        articles.truncate(limit);
        articles
    }

    /// Write one article. Returns `None` when the body is empty.
    pub fn save_article(&self, article: &Article) -> Result<Option<PathBuf>> {
        if article.body().is_empty() {
            debug!("Skipping '{}': empty body", article.title());
            return Ok(None);
        }

        let content = article_markdown(article)?;
        let path = self
            .output_dir
            .join(format!("{}.md", slugify(article.title())));

        std::fs::write(&path, content)?;
        info!("Saved: {:?}", path);
        Ok(Some(path))
    }

    /// Fetch, convert and write up to `limit` articles.
    pub async fn run(&self, limit: usize) -> Result<ScrapeSummary> {
        std::fs::create_dir_all(&self.output_dir)?;

        let articles = self.fetch_articles(limit).await;
        info!("Found {} articles", articles.len());

        let mut summary = ScrapeSummary {
            fetched: articles.len(),
            ..Default::default()
        };

        for article in &articles {
            if article.is_draft() {
                summary.skipped_drafts += 1;
                continue;
            }

            match self.save_article(article)? {
                Some(_) => summary.saved += 1,
                None => summary.skipped_empty += 1,
            }
        }

        info!("Successfully processed {} articles", summary.saved);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScribeError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves pages from a map of URL to page and records requested URLs.
    struct FakePages {
        pages: HashMap<String, ArticlePage>,
        requested: Mutex<Vec<String>>,
    }

    impl FakePages {
        fn new(pages: Vec<(&str, ArticlePage)>) -> Arc<Self> {
            Arc::new(Self {
                pages: pages
                    .into_iter()
                    .map(|(url, page)| (url.to_string(), page))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for FakePages {
        async fn fetch_page(&self, url: &str) -> Result<ArticlePage> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScribeError::Scraper("Failed to fetch articles: 404".to_string()))
        }
    }

    fn article(title: &str, body: &str) -> Article {
        Article {
            title: Some(title.to_string()),
            body: Some(body.to_string()),
            html_url: Some(format!("https://help.example/{}", slugify(title))),
            draft: Some(false),
        }
    }

    fn page(titles: &[&str], next: Option<&str>) -> ArticlePage {
        ArticlePage {
            articles: titles.iter().map(|t| article(t, "<p>body</p>")).collect(),
            next_page: next.map(|n| n.to_string()),
        }
    }

    #[tokio::test]
    async fn test_pagination_stops_at_limit() {
        let source = FakePages::new(vec![
            ("p1", page(&["a", "b", "c"], Some("p2"))),
            ("p2", page(&["d", "e", "f"], Some("p3"))),
            ("p3", page(&["g"], None)),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let scraper = Scraper::new(source.clone(), "p1", dir.path());

        let articles = scraper.fetch_articles(4).await;
        assert_eq!(articles.len(), 4);
        assert_eq!(articles[3].title(), "d");
        assert_eq!(source.requested(), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_pagination_stops_without_cursor() {
        let source = FakePages::new(vec![
            ("p1", page(&["a"], Some("p2"))),
            ("p2", page(&["b"], None)),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let scraper = Scraper::new(source.clone(), "p1", dir.path());

        let articles = scraper.fetch_articles(50).await;
        assert_eq!(articles.len(), 2);
        assert_eq!(source.requested(), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_collected_articles() {
        let source = FakePages::new(vec![("p1", page(&["a", "b"], Some("missing")))]);
        let dir = tempfile::tempdir().unwrap();
        let scraper = Scraper::new(source.clone(), "p1", dir.path());

        let articles = scraper.fetch_articles(10).await;
        assert_eq!(articles.len(), 2);
        assert_eq!(source.requested(), vec!["p1", "missing"]);
    }

    #[tokio::test]
    async fn test_zero_limit_fetches_nothing() {
        let source = FakePages::new(vec![("p1", page(&["a"], None))]);
        let dir = tempfile::tempdir().unwrap();
        let scraper = Scraper::new(source.clone(), "p1", dir.path());

        assert!(scraper.fetch_articles(0).await.is_empty());
        assert!(source.requested().is_empty());
    }

    #[tokio::test]
    async fn test_run_skips_drafts_and_empty_bodies() {
        let mut draft = article("Draft Notes", "<p>secret</p>");
        draft.draft = Some(true);

        let source = FakePages::new(vec![(
            "p1",
            ArticlePage {
                articles: vec![
                    article("Getting Started!", "<h1>Hi</h1><p>Welcome</p>"),
                    draft,
                    article("Empty One", ""),
                ],
                next_page: None,
            },
        )]);

        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("data");
        let scraper = Scraper::new(source, "p1", &output_dir);

        let summary = scraper.run(50).await.unwrap();
        assert_eq!(
            summary,
            ScrapeSummary {
                fetched: 3,
                saved: 1,
                skipped_drafts: 1,
                skipped_empty: 1,
            }
        );

        let written = std::fs::read_to_string(output_dir.join("getting-started.md")).unwrap();
        assert!(written.starts_with(
            "# Getting Started!\n\nURL: https://help.example/getting-started\n\n"
        ));
        assert!(written.contains("Welcome"));
        assert!(!output_dir.join("draft-notes.md").exists());
        assert!(!output_dir.join("empty-one.md").exists());
    }

    #[tokio::test]
    async fn test_rerun_overwrites_same_slug() {
        let dir = tempfile::tempdir().unwrap();
        let scraper = Scraper::new(FakePages::new(vec![]), "p1", dir.path());

        scraper.save_article(&article("Same Title", "<p>old</p>")).unwrap();
        let path = scraper
            .save_article(&article("Same  Title", "<p>new</p>"))
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.path().join("same-title.md"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("new"));
        assert!(!content.contains("old"));
    }
}
