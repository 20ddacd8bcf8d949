//! Planning module - rule-based planning generation and analysis
//!
//! # Architecture
//!
//! ```text
//! AiPrompt → ClassifierRules → [Category] → Materializer → [Task] → Sequencer → [Task]
//!                                                ↑                                  ↓
//!                                             Catalog                           Analyzer
//! ```
//!
//! The classifier picks work categories from the project description. The
//! materializer expands each category's catalog templates into tasks and
//! resolves template predecessors to task ids. The sequencer orders the
//! result and lays it out on a timeline starting at "now". The analyzer runs
//! independently on any task set. [`PlanningService`] wires the stages
//! together behind the two async entry points.

mod analyzer;
mod catalog;
mod classifier;
mod error;
mod materializer;
mod sequencer;
mod service;

pub use analyzer::{AnalysisThresholds, Suggestion, analyze};
pub use catalog::{Catalog, MaterialRule, MaterialSpec, TaskTemplate};
pub use classifier::{ClassifierRule, ClassifierRules};
pub use error::{CatalogError, PipelineError, PlanningError};
pub use materializer::{DependencyMode, MaterializeOptions, Materializer, PriorityRules};
pub use sequencer::{SequenceOptions, SequenceStrategy, Sequencer, budget_overrun, sort_by_dependency_count, topological_order};
pub use service::PlanningService;
