//! Work categories of a construction project

use serde::{Deserialize, Serialize};

/// Trade/phase a Task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Foundation,
    Structure,
    Electrical,
    Plumbing,
    Finishing,
    Inspection,
    Other,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 7] = [
        Self::Foundation,
        Self::Structure,
        Self::Electrical,
        Self::Plumbing,
        Self::Finishing,
        Self::Inspection,
        Self::Other,
    ];

    /// The six phases of a full building project (no `Other`)
    pub const FULL_BUILD: [Category; 6] = [
        Self::Foundation,
        Self::Structure,
        Self::Electrical,
        Self::Plumbing,
        Self::Finishing,
        Self::Inspection,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Foundation => write!(f, "foundation"),
            Self::Structure => write!(f, "structure"),
            Self::Electrical => write!(f, "electrical"),
            Self::Plumbing => write!(f, "plumbing"),
            Self::Finishing => write!(f, "finishing"),
            Self::Inspection => write!(f, "inspection"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.to_string() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
