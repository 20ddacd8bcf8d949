//! TimeEntry domain type
//!
//! One block of worked time logged against a task.

use chrono::{DateTime, Utc};
use planstore::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Fresh time-ordered entry ID
    pub fn new_id() -> String {
        format!("time_{}", uuid::Uuid::now_v7().simple())
    }
}

impl Record for TimeEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "time_entries"
    }
}
