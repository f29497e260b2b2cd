//! SQLite-backed research plan store.

use super::ResearchPlan;
use crate::error::{Result, ScribeError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS research_plans (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        short_summary TEXT NOT NULL,
        details TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

/// Persistent store for research plans.
pub struct PlanStore {
    conn: Mutex<Connection>,
}

impl PlanStore {
    /// Open (or create) the database at `path` and initialize its schema.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_db()?;

        info!("Opened research plan store at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.init_db()?;
        Ok(store)
    }

    /// Create the schema if it does not exist yet.
    pub fn init_db(&self) -> Result<()> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ScribeError::PlanStore(format!("Failed to acquire lock: {}", e)))
    }

    fn row_to_plan(row: &Row<'_>) -> rusqlite::Result<ResearchPlan> {
        let created_at: String = row.get(3)?;
        Ok(ResearchPlan {
            id: row.get(0)?,
            short_summary: row.get(1)?,
            details: row.get(2)?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    /// Store a new plan and return it with its generated id.
    #[instrument(skip(self, details))]
    pub fn add_research_plan(&self, short_summary: &str, details: &str) -> Result<ResearchPlan> {
        let conn = self.lock()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO research_plans (short_summary, details, created_at) VALUES (?1, ?2, ?3)",
            params![short_summary, details, created_at.to_rfc3339()],
        )?;

        let plan = ResearchPlan {
            id: conn.last_insert_rowid(),
            short_summary: short_summary.to_string(),
            details: details.to_string(),
            created_at,
        };

        info!("Saved research plan {}", plan.id);
        Ok(plan)
    }

    /// All stored plans, oldest first.
    #[instrument(skip(self))]
    pub fn get_research_plans(&self) -> Result<Vec<ResearchPlan>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, short_summary, details, created_at FROM research_plans ORDER BY id",
        )?;

        let plans = stmt
            .query_map([], Self::row_to_plan)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Loaded {} research plans", plans.len());
        Ok(plans)
    }

    /// Delete a plan by id.
    #[instrument(skip(self))]
    pub fn delete_research_plan(&self, id: i64) -> Result<()> {
        let deleted = self
            .lock()?
            .execute("DELETE FROM research_plans WHERE id = ?1", params![id])?;

        if deleted == 0 {
            return Err(ScribeError::PlanNotFound(id));
        }

        info!("Deleted research plan {}", id);
        Ok(())
    }
}
