//! Planning service - the async entry points

use std::sync::Arc;
use std::time::Duration;

use eyre::{Context, Result};
use tracing::{debug, error, info};

use super::analyzer::{AnalysisThresholds, Suggestion, analyze};
use super::catalog::Catalog;
use super::classifier::ClassifierRules;
use super::error::{PipelineError, PlanningError};
use super::materializer::{MaterializeOptions, Materializer, PriorityRules};
use super::sequencer::{SequenceOptions, Sequencer};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::domain::{AiPrompt, Task};

/// Generates and analyzes plannings
///
/// Holds no per-call state; one instance can serve concurrent callers.
pub struct PlanningService {
    catalog: Arc<Catalog>,
    classifier: ClassifierRules,
    priorities: PriorityRules,
    materialize: MaterializeOptions,
    sequence: SequenceOptions,
    thresholds: AnalysisThresholds,
    generation_delay: Duration,
    analysis_delay: Duration,
    clock: Arc<dyn Clock>,
}

impl PlanningService {
    pub fn new(config: &Config, catalog: Catalog, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            classifier: ClassifierRules::builtin(),
            priorities: PriorityRules::builtin(),
            materialize: config.planning.materialize_options(),
            sequence: config.planning.sequence_options(),
            thresholds: config.analysis.clone(),
            generation_delay: Duration::from_millis(config.planning.generation_delay_ms),
            analysis_delay: Duration::from_millis(config.planning.analysis_delay_ms),
            clock,
        }
    }

    /// Build from config, loading the catalog file when one is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = match &config.planning.catalog_path {
            Some(path) => Catalog::load(path).context(format!("Failed to load catalog from {}", path))?,
            None => Catalog::builtin(),
        };
        Ok(Self::new(config, catalog, Arc::new(SystemClock)))
    }

    /// Generate a complete, sequenced task list for a prompt
    ///
    /// Either every task is returned or an error is; the internal cause of a
    /// pipeline failure is logged and not surfaced.
    pub async fn generate_planning(&self, prompt: &AiPrompt) -> Result<Vec<Task>, PlanningError> {
        if prompt.project_description.trim().is_empty() {
            return Err(PlanningError::Validation("project description is empty".to_string()));
        }

        if !self.generation_delay.is_zero() {
            tokio::time::sleep(self.generation_delay).await;
        }

        let now = self.clock.now();
        info!(
            duration_days = prompt.duration_days,
            team_size = prompt.team_size,
            "Generating planning"
        );

        match self.run_pipeline(prompt, now) {
            Ok(tasks) => {
                info!(count = tasks.len(), "Planning generated");
                Ok(tasks)
            }
            Err(e) => {
                error!(error = %e, "Planning generation failed");
                Err(PlanningError::Generation)
            }
        }
    }

    /// Suggestion messages for a task set; never empty
    pub async fn analyze_planning(&self, tasks: &[Task]) -> Vec<String> {
        self.analyze(tasks).await.iter().map(ToString::to_string).collect()
    }

    /// Typed variant of [`Self::analyze_planning`]
    pub async fn analyze(&self, tasks: &[Task]) -> Vec<Suggestion> {
        if !self.analysis_delay.is_zero() {
            tokio::time::sleep(self.analysis_delay).await;
        }

        let suggestions = analyze(tasks, &self.thresholds);
        debug!(tasks = tasks.len(), suggestions = ?suggestions, "analyze: done");
        suggestions
    }

    fn run_pipeline(&self, prompt: &AiPrompt, now: chrono::DateTime<chrono::Utc>) -> Result<Vec<Task>, PipelineError> {
        let categories = self.classifier.classify(&prompt.project_description);
        let tasks = Materializer::new(&self.catalog, &self.priorities, &self.materialize).materialize(
            &categories,
            prompt,
            now,
        )?;
        Sequencer::new(&self.sequence).sequence(tasks, prompt.duration_days, now)
    }
}
