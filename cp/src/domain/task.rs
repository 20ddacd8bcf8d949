//! Task domain type
//!
//! A Task is a unit of work on the construction site. Generated tasks come out
//! of the planning pipeline; stored tasks are edited by the user and accumulate
//! worked hours through the time log.

use chrono::{DateTime, Duration, Utc};
use planstore::Record;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::priority::Priority;

/// Task status in the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Planned, no work logged yet
    #[default]
    NotStarted,
    /// Work under way
    InProgress,
    /// Done
    Completed,
    /// Paused by the site manager
    OnHold,
    /// Dropped from the plan
    Cancelled,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::OnHold => write!(f, "on_hold"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "on_hold" => Ok(Self::OnHold),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A material needed by a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// A unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique opaque identifier (e.g., "task_1767225600000_0k3x9q2mzp")
    pub id: String,

    pub title: String,

    pub description: String,

    pub start_date: DateTime<Utc>,

    /// Never earlier than `start_date`
    pub end_date: DateTime<Utc>,

    pub status: TaskStatus,

    pub priority: Priority,

    /// Names of the people assigned, in display order
    pub assigned_to: Vec<String>,

    pub location: String,

    pub estimated_hours: f64,

    /// Hours logged so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,

    pub materials: Vec<Material>,

    /// IDs of tasks that should complete before this one starts (advisory)
    pub dependencies: Vec<String>,

    pub category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Update the status
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Add worked hours to `actual_hours`
    pub fn add_actual_hours(&mut self, hours: f64, now: DateTime<Utc>) {
        self.actual_hours = Some(self.actual_hours.unwrap_or(0.0) + hours);
        self.updated_at = now;
    }

    /// Check if the task is done
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Check if the task is past its end date without being completed
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.end_date < now
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "tasks"
    }
}

/// Convert an hour count into a [`Duration`], rejecting negative, NaN and
/// out-of-range values
pub fn hours_to_duration(hours: f64) -> Option<Duration> {
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }
    let millis = (hours * 3_600_000.0).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}
