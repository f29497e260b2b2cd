//! Doctor command - verify credentials, paths and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Ok,
    Warning,
    Error,
}

/// Outcome of a single diagnostic.
#[derive(Debug)]
struct Check {
    name: &'static str,
    level: Level,
    message: String,
    hint: Option<&'static str>,
}

impl Check {
    fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            level: Level::Ok,
            message: message.into(),
            hint: None,
        }
    }

    fn warning(name: &'static str, message: impl Into<String>, hint: &'static str) -> Self {
        Self {
            name,
            level: Level::Warning,
            message: message.into(),
            hint: Some(hint),
        }
    }

    fn error(name: &'static str, message: impl Into<String>, hint: &'static str) -> Self {
        Self {
            name,
            level: Level::Error,
            message: message.into(),
            hint: Some(hint),
        }
    }

    fn print(&self) {
        let icon = match self.level {
            Level::Ok => style("✓").green(),
            Level::Warning => style("!").yellow(),
            Level::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(self.name).bold(), self.message);
        if let Some(hint) = self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Scribe Doctor");
    println!();

    let sections: Vec<(&str, Vec<Check>)> = vec![
        (
            "API Keys",
            vec![
                check_openai_key(std::env::var("OPENAI_API_KEY").ok()),
                check_search_key(settings.search.resolve_api_key()),
            ],
        ),
        (
            "Endpoints",
            vec![
                check_url("Search endpoint", &settings.search.endpoint),
                check_url("Articles endpoint", &settings.scraper.base_url),
            ],
        ),
        ("Paths", check_paths(settings)),
        ("Configuration", vec![check_config_file(&Settings::default_config_path())]),
    ];

    let mut errors = 0;
    let mut warnings = 0;
    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
            match check.level {
                Level::Error => errors += 1,
                Level::Warning => warnings += 1,
                Level::Ok => {}
            }
        }
        println!();
    }

    if errors > 0 {
        Output::error(&format!("{} error(s) found.", errors));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

/// Show only the ends of a secret.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_openai_key(key: Option<String>) -> Check {
    const HINT: &str = "Set with: export OPENAI_API_KEY='sk-...' (or add it to .env)";
    match key {
        Some(key) if key.starts_with("sk-") => {
            Check::ok("OPENAI_API_KEY", format!("configured ({})", mask(&key)))
        }
        Some(key) if key.is_empty() => Check::error("OPENAI_API_KEY", "empty", HINT),
        Some(_) => Check::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-...",
        ),
        None => Check::error("OPENAI_API_KEY", "not set (needed by research)", HINT),
    }
}

fn check_search_key(key: Option<String>) -> Check {
    match key {
        Some(key) => Check::ok("Search API key", format!("configured ({})", mask(&key))),
        None => Check::warning(
            "Search API key",
            "not set (needed by research)",
            "Set BRAVE_API_KEY or search.api_key in the config file",
        ),
    }
}

fn check_url(name: &'static str, value: &str) -> Check {
    match url::Url::parse(value) {
        Ok(url) if url.scheme() == "https" || url.scheme() == "http" => Check::ok(name, value),
        Ok(_) => Check::error(name, format!("{} (not http)", value), "Use an http(s) URL"),
        Err(e) => Check::error(name, format!("{} ({})", value, e), "Fix the URL in the config file"),
    }
}

fn check_paths(settings: &Settings) -> Vec<Check> {
    let mut results = Vec::new();

    let data_dir = settings.data_dir();
    if data_dir.exists() {
        results.push(Check::ok("Data directory", data_dir.display().to_string()));
    } else {
        results.push(Check::warning(
            "Data directory",
            format!("{} (will be created)", data_dir.display()),
            "Directory will be created on first use",
        ));
    }

    let db_path = settings.sqlite_path();
    match std::fs::metadata(&db_path) {
        Ok(meta) => results.push(Check::ok(
            "Plan database",
            format!("{} ({})", db_path.display(), format_size(meta.len())),
        )),
        Err(_) => results.push(Check::warning(
            "Plan database",
            format!("{} (not created yet)", db_path.display()),
            "Database will be created on first research run",
        )),
    }

    let output_dir = settings.scraper_output_dir();
    let articles = std::fs::read_dir(&output_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
                .count()
        })
        .ok();
    results.push(match articles {
        Some(count) => Check::ok(
            "Article directory",
            format!("{} ({} articles)", output_dir.display(), count),
        ),
        None => Check::ok(
            "Article directory",
            format!("{} (created by scrape)", output_dir.display()),
        ),
    });

    results
}

fn check_config_file(path: &Path) -> Check {
    if !path.exists() {
        return Check::warning(
            "Config file",
            "using defaults",
            "Write one with: scribe config show > <config path>",
        );
    }

    match Settings::load_from(Some(&path.to_path_buf())) {
        Ok(_) => Check::ok("Config file", path.display().to_string()),
        Err(e) => Check::error(
            "Config file",
            format!("{} ({})", path.display(), e),
            "Fix or remove the config file",
        ),
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
