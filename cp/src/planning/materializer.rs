//! Task materializer - expands catalog templates into concrete tasks
//!
//! Tasks are produced category by category, template by template. Each one is
//! placed on a first-pass timeline (the sequencer re-times them afterwards)
//! and its predecessors are resolved against the tasks already produced in
//! the same run only, so a task can never depend on itself or on a later one.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Catalog, TaskTemplate};
use super::error::PipelineError;
use crate::domain::{AiPrompt, Category, Material, Priority, Task, TaskStatus, generate_id, hours_to_duration};

/// How template predecessors are matched to generated tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyMode {
    /// Match by stable template key
    #[default]
    TemplateKey,
    /// Match when the predecessor's title is a case-insensitive substring of
    /// an earlier task's title (first match wins)
    TitleMatch,
}

/// Title keyword rules for priority; the first matching rule wins
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityRules {
    rules: Vec<(Vec<String>, Priority)>,
    /// Priority given to titles matching a prompt keyword
    keyword_priority: Priority,
    fallback: Priority,
}

impl PriorityRules {
    pub fn builtin() -> Self {
        let rule = |keywords: &[&str], priority| (keywords.iter().map(|k| k.to_string()).collect(), priority);
        Self {
            rules: vec![
                rule(&["fondation", "structure"], Priority::High),
                rule(&["inspection", "sécurité"], Priority::Urgent),
                rule(&["finition", "peinture"], Priority::Low),
            ],
            keyword_priority: Priority::High,
            fallback: Priority::Medium,
        }
    }

    /// Priority for a task title given the prompt's priority keywords
    pub fn priority_for<'k>(&self, title: &str, prompt_keywords: impl IntoIterator<Item = &'k str>) -> Priority {
        let title = title.to_lowercase();

        if prompt_keywords
            .into_iter()
            .any(|keyword| title.contains(&keyword.to_lowercase()))
        {
            return self.keyword_priority;
        }

        self.rules
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k.as_str())))
            .map(|(_, priority)| *priority)
            .unwrap_or(self.fallback)
    }
}

impl Default for PriorityRules {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Knobs for materialization
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializeOptions {
    /// Gap left after each task on the first-pass timeline
    pub placement_buffer_hours: f64,
    /// Location given to every generated task
    pub location: String,
    pub dependency_mode: DependencyMode,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            placement_buffer_hours: 2.0,
            location: "Chantier principal".to_string(),
            dependency_mode: DependencyMode::TemplateKey,
        }
    }
}

/// Expands templates into tasks
pub struct Materializer<'a> {
    catalog: &'a Catalog,
    priorities: &'a PriorityRules,
    options: &'a MaterializeOptions,
}

impl<'a> Materializer<'a> {
    pub fn new(catalog: &'a Catalog, priorities: &'a PriorityRules, options: &'a MaterializeOptions) -> Self {
        Self {
            catalog,
            priorities,
            options,
        }
    }

    /// Build tasks for `categories` (in order), starting the timeline at `start`
    pub fn materialize(
        &self,
        categories: &[Category],
        prompt: &AiPrompt,
        start: DateTime<Utc>,
    ) -> Result<Vec<Task>, PipelineError> {
        let buffer = hours_to_duration(self.options.placement_buffer_hours).ok_or_else(|| {
            PipelineError::InvalidHours {
                key: "placement-buffer".to_string(),
                hours: self.options.placement_buffer_hours,
            }
        })?;

        let mut tasks: Vec<Task> = Vec::new();
        let mut placed: HashMap<&str, usize> = HashMap::new();
        let mut cursor = start;

        for &category in categories {
            for template in self.catalog.templates_for(category) {
                let effort = hours_to_duration(template.hours).ok_or_else(|| PipelineError::InvalidHours {
                    key: template.key.clone(),
                    hours: template.hours,
                })?;
                let end = add(cursor, effort, &template.title)?;

                let dependencies = self.resolve_dependencies(template, &tasks, &placed);
                let task = Task {
                    id: generate_id("task"),
                    title: template.title.clone(),
                    description: format!("Tâche générée automatiquement pour: {}", template.title),
                    start_date: cursor,
                    end_date: end,
                    status: TaskStatus::NotStarted,
                    priority: self.priorities.priority_for(&template.title, prompt.priority_keywords()),
                    assigned_to: Vec::new(),
                    location: self.options.location.clone(),
                    estimated_hours: template.hours,
                    actual_hours: None,
                    materials: self.materials_for(&template.title),
                    dependencies,
                    category,
                    notes: Some("Tâche générée par IA".to_string()),
                    created_at: start,
                    updated_at: start,
                };

                placed.insert(template.key.as_str(), tasks.len());
                tasks.push(task);
                cursor = add(end, buffer, &template.title)?;
            }
        }

        debug!(count = tasks.len(), "materialize: done");
        Ok(tasks)
    }

    fn resolve_dependencies(&self, template: &TaskTemplate, earlier: &[Task], placed: &HashMap<&str, usize>) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();

        for predecessor in &template.predecessors {
            let found = match self.options.dependency_mode {
                DependencyMode::TemplateKey => placed.get(predecessor.as_str()).map(|&idx| &earlier[idx]),
                DependencyMode::TitleMatch => self.catalog.template(predecessor).and_then(|pred| {
                    let needle = pred.title.to_lowercase();
                    earlier.iter().find(|task| task.title.to_lowercase().contains(&needle))
                }),
            };

            match found {
                Some(task) if !resolved.contains(&task.id) => resolved.push(task.id.clone()),
                Some(_) => {}
                None => debug!(
                    template = %template.key,
                    predecessor = %predecessor,
                    "resolve_dependencies: predecessor not generated in this run, dropping"
                ),
            }
        }

        resolved
    }

    fn materials_for(&self, title: &str) -> Vec<Material> {
        self.catalog
            .materials_for(title)
            .iter()
            .map(|spec| Material {
                id: generate_id("mat"),
                name: spec.name.clone(),
                quantity: spec.quantity,
                unit: spec.unit.clone(),
                cost: spec.cost,
            })
            .collect()
    }
}

fn add(at: DateTime<Utc>, by: Duration, title: &str) -> Result<DateTime<Utc>, PipelineError> {
    at.checked_add_signed(by)
        .ok_or_else(|| PipelineError::TimelineOverflow(title.to_string()))
}
