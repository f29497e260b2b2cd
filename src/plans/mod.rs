//! Research plan persistence.
//!
//! Plans are stored in SQLite and exposed to the planning agent as tools.

mod sqlite;
mod tools;

pub use sqlite::PlanStore;
pub use tools::plan_tools;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved research plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPlan {
    /// Generated identifier.
    pub id: i64,
    /// One-line summary.
    pub short_summary: String,
    /// Full plan text.
    pub details: String,
    /// When the plan was saved.
    pub created_at: DateTime<Utc>,
}
