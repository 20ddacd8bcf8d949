//! Time logging - manual entries and start/stop timers
//!
//! Both paths produce a [`TimeEntry`] and return the task with its
//! `actual_hours` increased by the entry's hours. Nothing is persisted here;
//! callers store the entry and the updated task together.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use planstore::Record;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Task, TimeEntry, hours_to_duration};

#[derive(Debug, Error)]
pub enum TimeLogError {
    #[error("Invalid hours: {0} (must be a positive number)")]
    InvalidHours(f64),

    #[error("No timer running for task {0}")]
    TimerNotStarted(String),

    #[error("Timer already running for task {0}")]
    TimerAlreadyStarted(String),
}

/// Log `hours` of work that ended at `now`
pub fn log_manual_hours(
    task: &Task,
    hours: f64,
    description: Option<&str>,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(TimeEntry, Task), TimeLogError> {
    if hours <= 0.0 {
        return Err(TimeLogError::InvalidHours(hours));
    }
    let span = hours_to_duration(hours).ok_or(TimeLogError::InvalidHours(hours))?;
    let start_time = now.checked_sub_signed(span).ok_or(TimeLogError::InvalidHours(hours))?;

    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Saisie manuelle pour: {}", task.title));

    let entry = TimeEntry {
        id: TimeEntry::new_id(),
        task_id: task.id.clone(),
        user_id: user_id.to_string(),
        start_time,
        end_time: Some(now),
        hours,
        description: Some(description),
        location: Some(task.location.clone()),
        created_at: now,
    };

    let mut updated = task.clone();
    updated.add_actual_hours(hours, now);

    info!(task_id = %task.id, hours, "Logged manual hours");
    Ok((entry, updated))
}

/// A running timer, persisted between CLI invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
}

impl Record for ActiveTimer {
    fn id(&self) -> &str {
        &self.task_id
    }

    fn collection_name() -> &'static str {
        "active_timers"
    }
}

/// Running timers keyed by task id
#[derive(Debug, Clone, Default)]
pub struct ActiveTimers {
    started: HashMap<String, DateTime<Utc>>,
}

impl ActiveTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing `task_id`
    pub fn start(&mut self, task_id: &str, now: DateTime<Utc>) -> Result<(), TimeLogError> {
        if self.started.contains_key(task_id) {
            return Err(TimeLogError::TimerAlreadyStarted(task_id.to_string()));
        }
        self.started.insert(task_id.to_string(), now);
        debug!(task_id, "timer started");
        Ok(())
    }

    /// Stop the timer for `task` and log the elapsed time
    ///
    /// Elapsed time is counted in whole minutes and rounded to 2 decimal hours.
    pub fn stop(&mut self, task: &Task, user_id: &str, now: DateTime<Utc>) -> Result<(TimeEntry, Task), TimeLogError> {
        let started_at = self
            .started
            .remove(&task.id)
            .ok_or_else(|| TimeLogError::TimerNotStarted(task.id.clone()))?;

        let minutes = (now - started_at).num_minutes().max(0);
        let hours = (minutes as f64 / 60.0 * 100.0).round() / 100.0;

        let entry = TimeEntry {
            id: TimeEntry::new_id(),
            task_id: task.id.clone(),
            user_id: user_id.to_string(),
            start_time: started_at,
            end_time: Some(now),
            hours,
            description: Some(format!("Travail sur: {}", task.title)),
            location: Some(task.location.clone()),
            created_at: now,
        };

        let mut updated = task.clone();
        updated.add_actual_hours(hours, now);

        info!(task_id = %task.id, hours, "Timer stopped");
        Ok((entry, updated))
    }

    /// Elapsed time of a running timer as `"{h}h {m}m"`
    pub fn elapsed_label(&self, task_id: &str, now: DateTime<Utc>) -> Option<String> {
        let minutes = (now - *self.started.get(task_id)?).num_minutes().max(0);
        Some(format!("{}h {}m", minutes / 60, minutes % 60))
    }

    pub fn to_records(&self) -> Vec<ActiveTimer> {
        let mut records: Vec<_> = self
            .started
            .iter()
            .map(|(task_id, started_at)| ActiveTimer {
                task_id: task_id.clone(),
                started_at: *started_at,
            })
            .collect();
        records.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        records
    }
}

impl FromIterator<ActiveTimer> for ActiveTimers {
    fn from_iter<I: IntoIterator<Item = ActiveTimer>>(iter: I) -> Self {
        Self {
            started: iter.into_iter().map(|t| (t.task_id, t.started_at)).collect(),
        }
    }
}

/// Total hours logged against one task
pub fn hours_for_task(entries: &[TimeEntry], task_id: &str) -> f64 {
    entries.iter().filter(|e| e.task_id == task_id).map(|e| e.hours).sum()
}

/// Entries that started on the same UTC calendar day as `now`
pub fn entries_on_day(entries: &[TimeEntry], now: DateTime<Utc>) -> Vec<&TimeEntry> {
    let today = now.date_naive();
    entries
        .iter()
        .filter(|e| e.start_time.date_naive() == today)
        .collect()
}

/// Which entries and timers a [`TimeReport`] covers
#[derive(Debug, Clone, Default)]
pub struct TimeFilter {
    /// Only entries that started today
    pub today: bool,
    pub task_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTimer {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
    pub elapsed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHours {
    pub task_id: String,
    pub hours: f64,
}

/// Logged time and running timers, as shown by the time-tracking view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeReport {
    pub running: Vec<RunningTimer>,
    /// Selected entries, oldest first
    pub entries: Vec<TimeEntry>,
    /// Hours per task over the selected entries, in order of first entry
    pub totals: Vec<TaskHours>,
    pub total_hours: f64,
}

impl TimeReport {
    pub fn build(entries: &[TimeEntry], timers: &ActiveTimers, filter: &TimeFilter, now: DateTime<Utc>) -> Self {
        let wanted = |task_id: &str| filter.task_id.as_deref().is_none_or(|t| t == task_id);

        let scoped: Vec<&TimeEntry> = if filter.today {
            entries_on_day(entries, now)
        } else {
            entries.iter().collect()
        };
        let mut selected: Vec<TimeEntry> = scoped
            .into_iter()
            .filter(|e| wanted(e.task_id.as_str()))
            .cloned()
            .collect();
        selected.sort_by_key(|e| e.start_time);

        let mut task_ids: Vec<&str> = Vec::new();
        for entry in &selected {
            if !task_ids.contains(&entry.task_id.as_str()) {
                task_ids.push(entry.task_id.as_str());
            }
        }
        let totals = task_ids
            .into_iter()
            .map(|task_id| TaskHours {
                task_id: task_id.to_string(),
                hours: hours_for_task(&selected, task_id),
            })
            .collect();

        let running = timers
            .to_records()
            .into_iter()
            .filter(|t| wanted(t.task_id.as_str()))
            .filter_map(|t| {
                let elapsed = timers.elapsed_label(&t.task_id, now)?;
                Some(RunningTimer {
                    task_id: t.task_id,
                    started_at: t.started_at,
                    elapsed,
                })
            })
            .collect();

        let total_hours = selected.iter().map(|e| e.hours).sum();
        debug!(entries = selected.len(), total_hours, "time report built");

        Self {
            running,
            entries: selected,
            totals,
            total_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample_task;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap()
    }

    #[test]
    fn test_manual_hours() {
        let task = sample_task("task_1");
        let (entry, updated) = log_manual_hours(&task, 2.5, None, "current_user", now()).unwrap();

        assert_eq!(entry.task_id, "task_1");
        assert_eq!(entry.hours, 2.5);
        assert_eq!(entry.end_time, Some(now()));
        assert_eq!(entry.start_time, now() - Duration::minutes(150));
        assert_eq!(
            entry.description.as_deref(),
            Some("Saisie manuelle pour: Excavation du terrain")
        );
        assert_eq!(entry.location.as_deref(), Some("Zone A"));
        assert!(entry.id.starts_with("time_"));

        assert_eq!(updated.actual_hours, Some(2.5));
        assert_eq!(updated.updated_at, now());
    }

    #[test]
    fn test_manual_hours_accumulate() {
        let mut task = sample_task("task_1");
        task.actual_hours = Some(4.0);
        let (_, updated) = log_manual_hours(&task, 1.5, Some("  Terrassement  "), "u", now()).unwrap();
        assert_eq!(updated.actual_hours, Some(5.5));

        let (entry, _) = log_manual_hours(&task, 1.0, Some("Terrassement"), "u", now()).unwrap();
        assert_eq!(entry.description.as_deref(), Some("Terrassement"));
    }

    #[test]
    fn test_manual_hours_rejects_invalid() {
        let task = sample_task("task_1");
        for hours in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                log_manual_hours(&task, hours, None, "u", now()),
                Err(TimeLogError::InvalidHours(_))
            ));
        }
    }

    #[test]
    fn test_timer_round_trip() {
        let task = sample_task("task_1");
        let mut timers = ActiveTimers::new();
        let started = now() - Duration::minutes(50) - Duration::seconds(30);

        timers.start(&task.id, started).unwrap();
        assert_eq!(timers.elapsed_label(&task.id, now()).as_deref(), Some("0h 50m"));

        let (entry, updated) = timers.stop(&task, "current_user", now()).unwrap();
        // 50 whole minutes = 0.8333.. → 0.83
        assert_eq!(entry.hours, 0.83);
        assert_eq!(entry.start_time, started);
        assert_eq!(entry.description.as_deref(), Some("Travail sur: Excavation du terrain"));
        assert_eq!(updated.actual_hours, Some(0.83));
        assert!(timers.elapsed_label(&task.id, now()).is_none());
    }

    #[test]
    fn test_stop_without_start() {
        let task = sample_task("task_1");
        let mut timers = ActiveTimers::new();
        assert!(matches!(
            timers.stop(&task, "u", now()),
            Err(TimeLogError::TimerNotStarted(id)) if id == "task_1"
        ));
    }

    #[test]
    fn test_double_start() {
        let mut timers = ActiveTimers::new();
        timers.start("task_1", now()).unwrap();
        assert!(timers.start("task_1", now()).is_err());
    }

    #[test]
    fn test_timers_from_records() {
        let earlier = now() - Duration::hours(3);
        let timers: ActiveTimers = vec![
            ActiveTimer {
                task_id: "b".to_string(),
                started_at: now(),
            },
            ActiveTimer {
                task_id: "a".to_string(),
                started_at: earlier,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(timers.elapsed_label("a", now()).as_deref(), Some("3h 0m"));
        let records = timers.to_records();
        assert_eq!(records[0].task_id, "a");
        assert_eq!(records[1].task_id, "b");
    }

    #[test]
    fn test_hours_for_task_and_day() {
        let task = sample_task("task_1");
        let other = sample_task("task_2");
        let (a, _) = log_manual_hours(&task, 2.0, None, "u", now()).unwrap();
        let (b, _) = log_manual_hours(&task, 1.0, None, "u", now() - Duration::days(1)).unwrap();
        let (c, _) = log_manual_hours(&other, 4.0, None, "u", now()).unwrap();
        let entries = vec![a, b, c];

        assert_eq!(hours_for_task(&entries, "task_1"), 3.0);
        assert_eq!(entries_on_day(&entries, now()).len(), 2);
    }

    #[test]
    fn test_time_report_today_and_task() {
        let task = sample_task("task_1");
        let other = sample_task("task_2");
        let (a, _) = log_manual_hours(&task, 2.0, None, "u", now()).unwrap();
        let (b, _) = log_manual_hours(&task, 1.0, None, "u", now() - Duration::days(1)).unwrap();
        let (c, _) = log_manual_hours(&other, 4.0, None, "u", now() - Duration::hours(1)).unwrap();
        let entries = vec![a, b, c];

        let mut timers = ActiveTimers::new();
        timers.start("task_2", now() - Duration::minutes(95)).unwrap();

        let all = TimeReport::build(&entries, &timers, &TimeFilter::default(), now());
        assert_eq!(all.entries.len(), 3);
        assert_eq!(all.entries[0].hours, 1.0);
        assert_eq!(all.total_hours, 7.0);
        assert_eq!(all.totals[0], TaskHours { task_id: "task_1".to_string(), hours: 3.0 });
        assert_eq!(all.totals[1].hours, 4.0);
        assert_eq!(all.running.len(), 1);
        assert_eq!(all.running[0].elapsed, "1h 35m");

        let today = TimeFilter {
            today: true,
            task_id: Some("task_1".to_string()),
        };
        let report = TimeReport::build(&entries, &timers, &today, now());
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.total_hours, 2.0);
        assert_eq!(report.totals.len(), 1);
        assert!(report.running.is_empty());
    }
}
