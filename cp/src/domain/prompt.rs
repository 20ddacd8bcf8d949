//! Planning request

use serde::{Deserialize, Serialize};

/// What the user asks the planner for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiPrompt {
    /// Free-text project description (drives category selection)
    pub project_description: String,

    /// Requested duration in days (soft budget for the sequencer)
    #[serde(rename = "duration")]
    pub duration_days: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    pub team_size: u32,

    /// Keywords that promote matching task titles to High priority
    #[serde(default)]
    pub priorities: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
}

impl AiPrompt {
    pub fn new(project_description: impl Into<String>, duration_days: u32, team_size: u32) -> Self {
        Self {
            project_description: project_description.into(),
            duration_days,
            team_size,
            ..Default::default()
        }
    }

    pub fn with_priorities<I, S>(mut self, priorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priorities = priorities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Priority keywords as given, minus blank ones
    pub fn priority_keywords(&self) -> impl Iterator<Item = &str> {
        self.priorities
            .iter()
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_keywords_skip_blanks() {
        let prompt = AiPrompt::new("Maison", 30, 5).with_priorities(["toiture", "  ", "", " murs "]);
        let keywords: Vec<&str> = prompt.priority_keywords().collect();
        assert_eq!(keywords, vec!["toiture", " murs "]);
    }

    #[test]
    fn test_deserialize_camel_case_shape() {
        let json = r#"{
            "projectDescription": "Construction d'une maison",
            "duration": 30,
            "teamSize": 5,
            "priorities": []
        }"#;
        let prompt: AiPrompt = serde_json::from_str(json).unwrap();
        assert_eq!(prompt.duration_days, 30);
        assert_eq!(prompt.team_size, 5);
        assert!(prompt.budget.is_none());
        assert!(prompt.constraints.is_none());
    }
}
