//! Planning analyzer - qualitative diagnostics over a task set

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::Task;

/// One diagnostic about a planning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    /// Too large a share of High/Urgent tasks
    CriticalPathOverload,
    /// Total estimated effort above the workload ceiling
    WorkloadTooHigh,
    /// Some tasks wait on many others
    DependencyComplexity,
    /// Few distinct categories present
    IncompleteCoverage,
    /// Nothing to report
    Balanced,
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalPathOverload => {
                write!(f, "⚠️ Trop de tâches critiques détectées. Considérez redistributer les priorités.")
            }
            Self::WorkloadTooHigh => write!(
                f,
                "📊 La charge de travail semble élevée. Envisagez d'ajouter des ressources ou d'étaler le planning."
            ),
            Self::DependencyComplexity => write!(
                f,
                "🔗 Certaines tâches ont beaucoup de dépendances. Vérifiez si elles peuvent être simplifiées."
            ),
            Self::IncompleteCoverage => write!(
                f,
                "🏗️ Le projet semble incomplet. Avez-vous considéré toutes les phases de construction ?"
            ),
            Self::Balanced => write!(f, "✅ Votre planning semble bien équilibré !"),
        }
    }
}

/// Thresholds for the analyzer checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// Critical share above which the critical path is overloaded
    #[serde(rename = "critical-ratio")]
    pub critical_ratio: f64,

    /// Total estimated hours above which the workload is too high
    #[serde(rename = "max-total-hours")]
    pub max_total_hours: f64,

    /// Dependency count above which a task is too entangled
    #[serde(rename = "max-dependencies")]
    pub max_dependencies: usize,

    /// Distinct categories needed for a complete project
    #[serde(rename = "min-categories")]
    pub min_categories: usize,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            critical_ratio: 0.6,
            max_total_hours: 400.0,
            max_dependencies: 3,
            min_categories: 3,
        }
    }
}

/// Run every check; returns `[Balanced]` when none fires
pub fn analyze(tasks: &[Task], thresholds: &AnalysisThresholds) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    let critical = tasks.iter().filter(|t| t.priority.is_critical()).count();
    if critical as f64 > tasks.len() as f64 * thresholds.critical_ratio {
        suggestions.push(Suggestion::CriticalPathOverload);
    }

    let total_hours: f64 = tasks.iter().map(|t| t.estimated_hours).sum();
    if total_hours > thresholds.max_total_hours {
        suggestions.push(Suggestion::WorkloadTooHigh);
    }

    if tasks.iter().any(|t| t.dependencies.len() > thresholds.max_dependencies) {
        suggestions.push(Suggestion::DependencyComplexity);
    }

    // An empty planning says nothing about coverage
    let categories: HashSet<_> = tasks.iter().map(|t| t.category).collect();
    if !tasks.is_empty() && categories.len() < thresholds.min_categories {
        suggestions.push(Suggestion::IncompleteCoverage);
    }

    if suggestions.is_empty() {
        suggestions.push(Suggestion::Balanced);
    }

    suggestions
}
