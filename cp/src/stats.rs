//! Dashboard statistics over tasks and time entries

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::{Task, TaskStatus, TimeEntry};

/// Upcoming tasks shown at most
const UPCOMING_LIMIT: usize = 5;

/// Days ahead counted as upcoming
const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub overdue_tasks: usize,
    pub total_estimated_hours: f64,
    pub total_actual_hours: f64,
    /// Estimated over actual, in percent
    pub efficiency: f64,
    /// Ids of open tasks starting on today's UTC date
    pub today_tasks: Vec<String>,
    /// Ids of open tasks starting within the next week, soonest first
    pub upcoming_tasks: Vec<String>,
}

impl ProjectStats {
    pub fn compute(tasks: &[Task], entries: &[TimeEntry], now: DateTime<Utc>) -> Self {
        let total_estimated_hours: f64 = tasks.iter().map(|t| t.estimated_hours).sum();
        let total_actual_hours: f64 = entries.iter().map(|e| e.hours).sum();

        let efficiency = if total_estimated_hours > 0.0 {
            total_estimated_hours / total_actual_hours.max(1.0) * 100.0
        } else {
            100.0
        };

        let today = now.date_naive();
        let today_tasks = tasks
            .iter()
            .filter(|t| !t.is_completed() && t.start_date.date_naive() == today)
            .map(|t| t.id.clone())
            .collect();

        let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
        let mut upcoming: Vec<&Task> = tasks
            .iter()
            .filter(|t| !t.is_completed() && t.start_date > now && t.start_date <= horizon)
            .collect();
        upcoming.sort_by_key(|t| t.start_date);

        Self {
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.is_completed()).count(),
            in_progress_tasks: tasks.iter().filter(|t| t.status == TaskStatus::InProgress).count(),
            overdue_tasks: tasks.iter().filter(|t| t.is_overdue(now)).count(),
            total_estimated_hours,
            total_actual_hours,
            efficiency,
            today_tasks,
            upcoming_tasks: upcoming.into_iter().take(UPCOMING_LIMIT).map(|t| t.id.clone()).collect(),
        }
    }

    /// Completed share in percent; 0 for an empty project
    pub fn completion_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.completed_tasks as f64 / self.total_tasks as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample_task;
    use crate::timelog::log_manual_hours;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn task_at(id: &str, start: DateTime<Utc>, hours: f64, status: TaskStatus) -> Task {
        let mut t = sample_task(id);
        t.start_date = start;
        t.end_date = start + Duration::hours(hours as i64);
        t.estimated_hours = hours;
        t.status = status;
        t
    }

    #[test]
    fn test_empty_project() {
        let stats = ProjectStats::compute(&[], &[], now());
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.efficiency, 100.0);
        assert_eq!(stats.completion_rate(), 0.0);
        assert!(stats.today_tasks.is_empty());
    }

    #[test]
    fn test_counts_and_hours() {
        let tasks = vec![
            task_at("done", now() - Duration::days(3), 8.0, TaskStatus::Completed),
            task_at("late", now() - Duration::days(2), 8.0, TaskStatus::InProgress),
            task_at("today", now() - Duration::hours(2), 8.0, TaskStatus::NotStarted),
            task_at("soon", now() + Duration::days(2), 16.0, TaskStatus::NotStarted),
        ];
        let (entry, _) = log_manual_hours(&tasks[0], 10.0, None, "u", now()).unwrap();

        let stats = ProjectStats::compute(&tasks, &[entry], now());
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.in_progress_tasks, 1);
        assert_eq!(stats.overdue_tasks, 1);
        assert_eq!(stats.total_estimated_hours, 40.0);
        assert_eq!(stats.total_actual_hours, 10.0);
        assert_eq!(stats.efficiency, 400.0);
        assert_eq!(stats.today_tasks, vec!["today".to_string()]);
        assert_eq!(stats.upcoming_tasks, vec!["soon".to_string()]);
        assert_eq!(stats.completion_rate(), 25.0);
    }

    #[test]
    fn test_efficiency_uses_at_least_one_hour() {
        let tasks = vec![task_at("a", now(), 4.0, TaskStatus::NotStarted)];
        let stats = ProjectStats::compute(&tasks, &[], now());
        assert_eq!(stats.efficiency, 400.0);
    }

    #[test]
    fn test_upcoming_window_and_limit() {
        let mut tasks: Vec<Task> = (1..=6)
            .rev()
            .map(|d| task_at(&format!("d{}", d), now() + Duration::days(d), 1.0, TaskStatus::NotStarted))
            .collect();
        tasks.push(task_at("d8", now() + Duration::days(8), 1.0, TaskStatus::NotStarted));
        tasks.push(task_at("closed", now() + Duration::hours(1), 1.0, TaskStatus::Completed));
        tasks.push(task_at("edge", now() + Duration::days(7), 1.0, TaskStatus::NotStarted));

        let stats = ProjectStats::compute(&tasks, &[], now());
        assert_eq!(stats.upcoming_tasks, vec!["d1", "d2", "d3", "d4", "d5"]);

        let few = ProjectStats::compute(&tasks[6..], &[], now());
        assert_eq!(few.upcoming_tasks, vec!["edge"]);
    }

    #[test]
    fn test_today_is_the_utc_date() {
        let just_after_midnight = Utc.with_ymd_and_hms(2026, 3, 2, 0, 30, 0).unwrap();
        let tasks = vec![
            task_at("yesterday", just_after_midnight - Duration::hours(1), 2.0, TaskStatus::NotStarted),
            task_at("midnight", just_after_midnight - Duration::minutes(30), 2.0, TaskStatus::NotStarted),
        ];

        let stats = ProjectStats::compute(&tasks, &[], just_after_midnight);
        assert_eq!(stats.today_tasks, vec!["midnight".to_string()]);
    }
}
