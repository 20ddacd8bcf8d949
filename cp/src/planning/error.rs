//! Planning error types

use thiserror::Error;

/// Errors surfaced to callers of the planning service
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Erreur lors de la génération du planning")]
    Generation,
}

/// Internal failures of the generation pipeline
///
/// These are logged and collapsed into [`PlanningError::Generation`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Template '{key}' has invalid effort: {hours}h")]
    InvalidHours { key: String, hours: f64 },

    #[error("Timeline overflow while placing '{0}'")]
    TimelineOverflow(String),

    #[error("Circular dependency detected: {0:?}")]
    DependencyCycle(Vec<String>),
}

/// Errors while building or loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate template key: {0}")]
    DuplicateKey(String),

    #[error("Template '{key}' refers to unknown predecessor '{predecessor}'")]
    UnknownPredecessor { key: String, predecessor: String },

    #[error("Template '{key}' has invalid effort: {hours}h")]
    InvalidHours { key: String, hours: f64 },

    #[error("Template '{0}' lists itself as a predecessor")]
    SelfDependency(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PlanningError {
    /// Check if the request itself was rejected (as opposed to a pipeline failure)
    pub fn is_validation(&self) -> bool {
        matches!(self, PlanningError::Validation(_))
    }
}
