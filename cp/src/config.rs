//! Chantier configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::planning::{AnalysisThresholds, DependencyMode, MaterializeOptions, SequenceOptions, SequenceStrategy};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation pipeline settings
    pub planning: PlanningConfig,

    /// Analyzer thresholds
    pub analysis: AnalysisThresholds,

    /// Storage configuration
    pub storage: StorageConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        let planning = &self.planning;
        for (name, hours) in [
            ("placement-buffer-hours", planning.placement_buffer_hours),
            ("sequence-buffer-hours", planning.sequence_buffer_hours),
        ] {
            if !hours.is_finite() || hours < 0.0 {
                return Err(eyre::eyre!("planning.{} must be a non-negative number, got {}", name, hours));
            }
        }

        let analysis = &self.analysis;
        if !(0.0..=1.0).contains(&analysis.critical_ratio) {
            return Err(eyre::eyre!(
                "analysis.critical-ratio must be between 0 and 1, got {}",
                analysis.critical_ratio
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local: .chantier.yml
        let local_config = PathBuf::from(".chantier.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User: ~/.config/chantier/chantier.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("chantier").join("chantier.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Generation pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Simulated latency before generating, in milliseconds
    #[serde(rename = "generation-delay-ms")]
    pub generation_delay_ms: u64,

    /// Simulated latency before analyzing, in milliseconds
    #[serde(rename = "analysis-delay-ms")]
    pub analysis_delay_ms: u64,

    /// Gap between tasks on the first-pass timeline
    #[serde(rename = "placement-buffer-hours")]
    pub placement_buffer_hours: f64,

    /// Gap between tasks on the final timeline
    #[serde(rename = "sequence-buffer-hours")]
    pub sequence_buffer_hours: f64,

    /// Location stamped on generated tasks
    pub location: String,

    #[serde(rename = "dependency-mode")]
    pub dependency_mode: DependencyMode,

    #[serde(rename = "sequence-strategy")]
    pub sequence_strategy: SequenceStrategy,

    /// Optional YAML catalog replacing the built-in templates
    #[serde(rename = "catalog-path")]
    pub catalog_path: Option<String>,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        let materialize = MaterializeOptions::default();
        let sequence = SequenceOptions::default();
        Self {
            generation_delay_ms: 0,
            analysis_delay_ms: 0,
            placement_buffer_hours: materialize.placement_buffer_hours,
            sequence_buffer_hours: sequence.buffer_hours,
            location: materialize.location,
            dependency_mode: materialize.dependency_mode,
            sequence_strategy: sequence.strategy,
            catalog_path: None,
        }
    }
}

impl PlanningConfig {
    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions {
            placement_buffer_hours: self.placement_buffer_hours,
            location: self.location.clone(),
            dependency_mode: self.dependency_mode,
        }
    }

    pub fn sequence_options(&self) -> SequenceOptions {
        SequenceOptions {
            buffer_hours: self.sequence_buffer_hours,
            strategy: self.sequence_strategy,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the JSON collections
    #[serde(rename = "store-dir")]
    pub store_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // ~/.local/share/chantier on Linux
        let store_dir = dirs::data_dir()
            .map(|d| d.join("chantier"))
            .unwrap_or_else(|| PathBuf::from(".chantier"))
            .to_string_lossy()
            .into_owned();

        Self { store_dir }
    }
}
