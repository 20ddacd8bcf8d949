//! Sequencer - orders tasks and lays them out on a timeline
//!
//! The default strategy sorts by (fewest dependencies, highest priority). It
//! favours unblocked urgent work but does not guarantee that a dependency is
//! scheduled before its dependents. The `topological` strategy does.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::PipelineError;
use crate::domain::{Task, hours_to_duration};

/// Ordering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceStrategy {
    /// Stable sort by dependency count, then priority rank descending
    #[default]
    DependencyCount,
    /// Dependency-respecting order, ties broken by the dependency-count order
    Topological,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOptions {
    /// Gap left after each task
    pub buffer_hours: f64,
    pub strategy: SequenceStrategy,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            buffer_hours: 1.0,
            strategy: SequenceStrategy::DependencyCount,
        }
    }
}

pub struct Sequencer<'a> {
    options: &'a SequenceOptions,
}

impl<'a> Sequencer<'a> {
    pub fn new(options: &'a SequenceOptions) -> Self {
        Self { options }
    }

    /// Reorder `tasks` and re-time them back to back from `start`
    ///
    /// Only `start_date` and `end_date` change. The duration budget is soft:
    /// overflowing it is logged, not rejected.
    pub fn sequence(
        &self,
        mut tasks: Vec<Task>,
        duration_budget_days: u32,
        start: DateTime<Utc>,
    ) -> Result<Vec<Task>, PipelineError> {
        sort_by_dependency_count(&mut tasks);

        if self.options.strategy == SequenceStrategy::Topological {
            tasks = topological_order(tasks)?;
        }

        let buffer = hours_to_duration(self.options.buffer_hours).ok_or_else(|| PipelineError::InvalidHours {
            key: "sequencing-buffer".to_string(),
            hours: self.options.buffer_hours,
        })?;

        let mut cursor = start;
        for task in &mut tasks {
            let effort = hours_to_duration(task.estimated_hours).ok_or_else(|| PipelineError::InvalidHours {
                key: task.id.clone(),
                hours: task.estimated_hours,
            })?;
            let end = cursor
                .checked_add_signed(effort)
                .ok_or_else(|| PipelineError::TimelineOverflow(task.title.clone()))?;
            task.start_date = cursor;
            task.end_date = end;
            cursor = end
                .checked_add_signed(buffer)
                .ok_or_else(|| PipelineError::TimelineOverflow(task.title.clone()))?;
        }

        if let Some(overrun) = budget_overrun(&tasks, start, duration_budget_days) {
            warn!(
                budget_days = duration_budget_days,
                overrun_hours = overrun.num_hours(),
                "Planning exceeds the requested duration"
            );
        }

        debug!(count = tasks.len(), strategy = ?self.options.strategy, "sequence: done");
        Ok(tasks)
    }
}

/// Stable sort: fewer dependencies first, then higher priority first
pub fn sort_by_dependency_count(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.dependencies
            .len()
            .cmp(&b.dependencies.len())
            .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
    });
}

/// How far the last task ends past `start + budget_days`, if at all
pub fn budget_overrun(tasks: &[Task], start: DateTime<Utc>, budget_days: u32) -> Option<Duration> {
    let deadline = start.checked_add_signed(Duration::days(i64::from(budget_days)))?;
    let last_end = tasks.iter().map(|t| t.end_date).max()?;
    (last_end > deadline).then(|| last_end - deadline)
}

/// Dependency-respecting order; dependencies outside the set are ignored
pub fn topological_order(tasks: Vec<Task>) -> Result<Vec<Task>, PipelineError> {
    let index_map: HashMap<&str, usize> = tasks.iter().enumerate().map(|(i, t)| (t.id.as_str(), i)).collect();

    let mut visited = HashSet::new();
    let mut in_progress = HashSet::new();
    let mut path = Vec::new();
    let mut order = Vec::with_capacity(tasks.len());

    for idx in 0..tasks.len() {
        topo_dfs(idx, &tasks, &index_map, &mut visited, &mut in_progress, &mut path, &mut order)?;
    }

    let mut slots: Vec<Option<Task>> = tasks.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|idx| slots[idx].take()).collect())
}

/// DFS helper for topological order (pushes indices, dependencies first)
fn topo_dfs(
    idx: usize,
    tasks: &[Task],
    index_map: &HashMap<&str, usize>,
    visited: &mut HashSet<usize>,
    in_progress: &mut HashSet<usize>,
    path: &mut Vec<String>,
    order: &mut Vec<usize>,
) -> Result<(), PipelineError> {
    if visited.contains(&idx) {
        return Ok(());
    }
    if !in_progress.insert(idx) {
        path.push(tasks[idx].id.clone());
        return Err(PipelineError::DependencyCycle(std::mem::take(path)));
    }
    path.push(tasks[idx].id.clone());

    for dep_id in &tasks[idx].dependencies {
        if let Some(&dep_idx) = index_map.get(dep_id.as_str()) {
            topo_dfs(dep_idx, tasks, index_map, visited, in_progress, path, order)?;
        }
    }

    path.pop();
    in_progress.remove(&idx);
    visited.insert(idx);
    order.push(idx);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, sample_task};
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    fn task(id: &str, hours: f64, priority: Priority, deps: &[&str]) -> Task {
        let mut t = sample_task(id);
        t.title = format!("Tâche {}", id);
        t.estimated_hours = hours;
        t.priority = priority;
        t.dependencies = deps.iter().map(|d| d.to_string()).collect();
        t
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_sort_key() {
        let options = SequenceOptions::default();
        let tasks = vec![
            task("a", 4.0, Priority::Low, &[]),
            task("b", 4.0, Priority::Urgent, &["a"]),
            task("c", 4.0, Priority::High, &[]),
            task("d", 4.0, Priority::Medium, &["a", "c"]),
            task("e", 4.0, Priority::High, &[]),
        ];
        let out = Sequencer::new(&options).sequence(tasks, 30, start()).unwrap();
        // Equal keys keep their input order (c before e)
        assert_eq!(ids(&out), vec!["c", "e", "a", "b", "d"]);
    }

    #[test]
    fn test_timestamps_back_to_back_with_buffer() {
        let options = SequenceOptions::default();
        let tasks = vec![task("a", 16.0, Priority::High, &[]), task("b", 2.5, Priority::High, &["a"])];
        let out = Sequencer::new(&options).sequence(tasks, 30, start()).unwrap();

        assert_eq!(out[0].start_date, start());
        assert_eq!(out[0].end_date, start() + Duration::hours(16));
        assert_eq!(out[1].start_date, start() + Duration::hours(17));
        assert_eq!(out[1].end_date, start() + Duration::hours(17) + Duration::minutes(150));
    }

    #[test]
    fn test_only_timestamps_change() {
        let options = SequenceOptions::default();
        let input = vec![task("a", 3.0, Priority::Low, &[]), task("b", 5.0, Priority::Urgent, &["a"])];
        let out = Sequencer::new(&options).sequence(input.clone(), 30, start()).unwrap();

        for task in &out {
            let before = input.iter().find(|t| t.id == task.id).unwrap();
            assert_eq!(task.dependencies, before.dependencies);
            assert_eq!(task.priority, before.priority);
            assert_eq!(task.title, before.title);
            assert_eq!(task.updated_at, before.updated_at);
        }
    }

    #[test]
    fn test_heuristic_can_schedule_dependent_first() {
        // "late" depends on "root" but has fewer dependencies than "root"'s own
        let options = SequenceOptions::default();
        let tasks = vec![
            task("x", 1.0, Priority::Medium, &[]),
            task("y", 1.0, Priority::Medium, &[]),
            task("root", 1.0, Priority::Medium, &["x", "y"]),
            task("late", 1.0, Priority::Medium, &["root"]),
        ];
        let out = Sequencer::new(&options).sequence(tasks, 30, start()).unwrap();
        assert_eq!(ids(&out), vec!["x", "y", "late", "root"]);
    }

    #[test]
    fn test_topological_strategy_respects_dependencies() {
        let options = SequenceOptions {
            strategy: SequenceStrategy::Topological,
            ..Default::default()
        };
        let tasks = vec![
            task("x", 1.0, Priority::Medium, &[]),
            task("y", 1.0, Priority::Medium, &[]),
            task("root", 1.0, Priority::Medium, &["x", "y"]),
            task("late", 1.0, Priority::Medium, &["root"]),
        ];
        let out = Sequencer::new(&options).sequence(tasks, 30, start()).unwrap();
        assert_eq!(ids(&out), vec!["x", "y", "root", "late"]);
    }

    #[test]
    fn test_topological_detects_cycle() {
        let tasks = vec![
            task("a", 1.0, Priority::Medium, &["b"]),
            task("b", 1.0, Priority::Medium, &["a"]),
        ];
        let err = topological_order(tasks).unwrap_err();
        assert!(matches!(err, PipelineError::DependencyCycle(path) if path.len() == 3));
    }

    #[test]
    fn test_budget_overrun() {
        let options = SequenceOptions::default();
        let tasks = vec![task("a", 30.0, Priority::Medium, &[])];
        let out = Sequencer::new(&options).sequence(tasks, 1, start()).unwrap();
        assert_eq!(budget_overrun(&out, start(), 1), Some(Duration::hours(6)));
        assert_eq!(budget_overrun(&out, start(), 2), None);
        assert_eq!(budget_overrun(&[], start(), 1), None);
    }

    #[test]
    fn test_negative_hours_rejected() {
        let options = SequenceOptions::default();
        let tasks = vec![task("a", -1.0, Priority::Medium, &[])];
        let result = Sequencer::new(&options).sequence(tasks, 1, start());
        assert!(matches!(result, Err(PipelineError::InvalidHours { .. })));
    }
}
