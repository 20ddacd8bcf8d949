//! Chantier - construction site planning engine
//!
//! Chantier turns a short project description ("Construction d'une maison",
//! 30 days, a team of 5) into a sequenced list of construction tasks, and
//! produces qualitative diagnostics about any task list.
//!
//! # Core Concepts
//!
//! - **Deterministic generation**: keyword rules and a template catalog, no model calls
//! - **Template keys**: catalog predecessors are resolved to generated task ids
//! - **Injectable time**: every computation takes "now" from a [`Clock`]
//! - **Stateless core**: tasks are handed back by value; persistence lives in `planstore`
//!
//! # Modules
//!
//! - [`domain`] - Task, TimeEntry, AiPrompt and their enums
//! - [`planning`] - classifier, catalog, materializer, sequencer, analyzer, service
//! - [`timelog`] - manual time entries and start/stop timers
//! - [`stats`] - dashboard statistics
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod clock;
pub mod config;
pub mod demo;
pub mod domain;
pub mod planning;
pub mod stats;
pub mod timelog;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, PlanningConfig, StorageConfig};
pub use domain::{AiPrompt, Category, Material, Priority, Record, Store, Task, TaskStatus, TimeEntry, generate_id};
pub use planning::{
    AnalysisThresholds, Catalog, CatalogError, ClassifierRules, DependencyMode, PipelineError, PlanningError,
    PlanningService, SequenceStrategy, Suggestion, TaskTemplate,
};
pub use stats::ProjectStats;
pub use timelog::{ActiveTimer, ActiveTimers, TimeFilter, TimeLogError, TimeReport, log_manual_hours};
