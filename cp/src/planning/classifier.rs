//! Category classifier - maps a project description to work categories

use tracing::debug;

use crate::domain::Category;

/// One keyword rule: any keyword present selects `categories`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierRule {
    pub keywords: Vec<String>,
    pub categories: Vec<Category>,
}

/// Ordered keyword rules; the first matching rule wins
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierRules {
    rules: Vec<ClassifierRule>,
    fallback: Vec<Category>,
}

impl ClassifierRules {
    pub fn new(rules: Vec<ClassifierRule>, fallback: Vec<Category>) -> Self {
        Self { rules, fallback }
    }

    /// French construction vocabulary
    pub fn builtin() -> Self {
        Self::new(
            vec![
                rule(&["maison", "construction", "bâtiment"], &Category::FULL_BUILD),
                rule(&["électrique", "électricité"], &[Category::Electrical]),
                rule(&["plomberie", "sanitaire"], &[Category::Plumbing]),
                rule(&["finition", "peinture"], &[Category::Finishing]),
            ],
            Category::ALL.to_vec(),
        )
    }

    /// Categories for a description; never empty when the fallback isn't
    pub fn classify(&self, description: &str) -> Vec<Category> {
        let desc = description.to_lowercase();

        for rule in &self.rules {
            if let Some(keyword) = rule.keywords.iter().find(|k| desc.contains(k.as_str())) {
                debug!(keyword = %keyword, categories = ?rule.categories, "classify: rule matched");
                return rule.categories.clone();
            }
        }

        debug!("classify: no rule matched, using fallback");
        self.fallback.clone()
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::builtin()
    }
}

fn rule(keywords: &[&str], categories: &[Category]) -> ClassifierRule {
    ClassifierRule {
        keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        categories: categories.to_vec(),
    }
}
