//! Task catalog - templates and default materials per category
//!
//! The catalog is immutable once built. The built-in one mirrors the usual
//! sequence of a house build; a replacement can be loaded from YAML:
//!
//! ```yaml
//! templates:
//!   foundation:
//!     - key: foundation.excavation
//!       title: Excavation du terrain
//!       hours: 16
//!     - key: foundation.pouring
//!       title: Coulage des fondations
//!       hours: 24
//!       predecessors: [foundation.excavation]
//! materials:
//!   - keyword: fondation
//!     materials:
//!       - { name: Béton, quantity: 10, unit: m³ }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::CatalogError;
use crate::domain::Category;

/// Blueprint for a generated task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    /// Stable identifier, referenced by other templates' `predecessors`
    pub key: String,
    pub title: String,
    pub hours: f64,
    /// Keys of templates that must come first
    #[serde(default)]
    pub predecessors: Vec<String>,
}

/// A material attached to generated tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// Materials for any task whose title contains `keyword`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRule {
    pub keyword: String,
    pub materials: Vec<MaterialSpec>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    templates: BTreeMap<Category, Vec<TaskTemplate>>,
    #[serde(default)]
    materials: Vec<MaterialRule>,
}

/// Immutable template library
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: BTreeMap<Category, Vec<TaskTemplate>>,
    materials: Vec<MaterialRule>,
    by_key: HashMap<String, (Category, usize)>,
}

impl Catalog {
    /// Build a catalog, checking keys, predecessors and effort
    pub fn new(
        templates: BTreeMap<Category, Vec<TaskTemplate>>,
        materials: Vec<MaterialRule>,
    ) -> Result<Self, CatalogError> {
        let mut by_key = HashMap::new();
        for (category, list) in &templates {
            for (idx, template) in list.iter().enumerate() {
                if !template.hours.is_finite() || template.hours < 0.0 {
                    return Err(CatalogError::InvalidHours {
                        key: template.key.clone(),
                        hours: template.hours,
                    });
                }
                if by_key.insert(template.key.clone(), (*category, idx)).is_some() {
                    return Err(CatalogError::DuplicateKey(template.key.clone()));
                }
            }
        }

        for template in templates.values().flatten() {
            for predecessor in &template.predecessors {
                if predecessor == &template.key {
                    return Err(CatalogError::SelfDependency(template.key.clone()));
                }
                if !by_key.contains_key(predecessor) {
                    return Err(CatalogError::UnknownPredecessor {
                        key: template.key.clone(),
                        predecessor: predecessor.clone(),
                    });
                }
            }
        }

        Ok(Self {
            templates,
            materials,
            by_key,
        })
    }

    /// Parse a catalog from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.templates, file.materials)
    }

    /// Load a catalog from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(&path)?;
        let catalog = Self::from_yaml_str(&content)?;
        info!(
            path = %path.as_ref().display(),
            templates = catalog.len(),
            "Loaded task catalog"
        );
        Ok(catalog)
    }

    /// Built-in construction catalog
    pub fn builtin() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(
            Category::Foundation,
            vec![
                template("foundation.excavation", "Excavation du terrain", 16.0, &[]),
                template(
                    "foundation.pouring",
                    "Coulage des fondations",
                    24.0,
                    &["foundation.excavation"],
                ),
                template("foundation.curing", "Séchage des fondations", 48.0, &["foundation.pouring"]),
            ],
        );
        templates.insert(
            Category::Structure,
            vec![
                template("structure.framing", "Montage de la charpente", 32.0, &["foundation.curing"]),
                template(
                    "structure.load_walls",
                    "Installation des murs porteurs",
                    24.0,
                    &["structure.framing"],
                ),
                template("structure.roofing", "Installation de la toiture", 20.0, &["structure.framing"]),
            ],
        );
        templates.insert(
            Category::Electrical,
            vec![
                template(
                    "electrical.panel",
                    "Installation du tableau électrique",
                    8.0,
                    &["structure.load_walls"],
                ),
                template("electrical.cabling", "Passage des câbles", 16.0, &["electrical.panel"]),
                template(
                    "electrical.outlets",
                    "Installation des prises et interrupteurs",
                    12.0,
                    &["electrical.cabling"],
                ),
            ],
        );
        templates.insert(
            Category::Plumbing,
            vec![
                template(
                    "plumbing.mains",
                    "Installation des canalisations principales",
                    12.0,
                    &["structure.load_walls"],
                ),
                template("plumbing.fixtures", "Installation des sanitaires", 16.0, &["plumbing.mains"]),
                template("plumbing.leak_tests", "Tests d'étanchéité", 4.0, &["plumbing.fixtures"]),
            ],
        );
        templates.insert(
            Category::Finishing,
            vec![
                template(
                    "finishing.flooring",
                    "Pose du revêtement de sol",
                    20.0,
                    &["electrical.outlets", "plumbing.leak_tests"],
                ),
                template("finishing.painting", "Peinture des murs", 24.0, &["electrical.outlets"]),
                template(
                    "finishing.doors_windows",
                    "Installation des portes et fenêtres",
                    16.0,
                    &["finishing.painting"],
                ),
            ],
        );
        templates.insert(
            Category::Inspection,
            vec![
                template("inspection.final", "Inspection finale", 4.0, &["finishing.doors_windows"]),
                template("inspection.handover", "Livraison du chantier", 2.0, &["inspection.final"]),
            ],
        );
        templates.insert(
            Category::Other,
            vec![template("other.custom", "Tâche personnalisée", 8.0, &[])],
        );

        let materials = vec![
            MaterialRule {
                keyword: "fondation".to_string(),
                materials: vec![material("Béton", 10.0, "m³"), material("Armatures", 500.0, "kg")],
            },
            MaterialRule {
                keyword: "électrique".to_string(),
                materials: vec![
                    material("Câbles électriques", 100.0, "m"),
                    material("Prises électriques", 20.0, "pièces"),
                ],
            },
            MaterialRule {
                keyword: "peinture".to_string(),
                materials: vec![material("Peinture", 50.0, "L"), material("Pinceaux", 10.0, "pièces")],
            },
        ];

        // The built-in data satisfies every check in `new`
        Self::new(templates, materials).unwrap_or_else(|e| unreachable!("built-in catalog is invalid: {e}"))
    }

    /// Templates of a category, in declaration order
    pub fn templates_for(&self, category: Category) -> &[TaskTemplate] {
        self.templates.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a template by key
    pub fn template(&self, key: &str) -> Option<&TaskTemplate> {
        let (category, idx) = self.by_key.get(key)?;
        self.templates.get(category).and_then(|list| list.get(*idx))
    }

    /// Default materials for a task title (first matching keyword wins)
    pub fn materials_for(&self, title: &str) -> &[MaterialSpec] {
        let title = title.to_lowercase();
        self.materials
            .iter()
            .find(|rule| title.contains(&rule.keyword.to_lowercase()))
            .map(|rule| rule.materials.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of templates
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn template(key: &str, title: &str, hours: f64, predecessors: &[&str]) -> TaskTemplate {
    TaskTemplate {
        key: key.to_string(),
        title: title.to_string(),
        hours,
        predecessors: predecessors.iter().map(|p| p.to_string()).collect(),
    }
}

fn material(name: &str, quantity: f64, unit: &str) -> MaterialSpec {
    MaterialSpec {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        cost: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_counts() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 18);
        assert_eq!(catalog.templates_for(Category::Foundation).len(), 3);
        assert_eq!(catalog.templates_for(Category::Inspection).len(), 2);
        assert_eq!(catalog.templates_for(Category::Other).len(), 1);
    }

    #[test]
    fn test_builtin_declaration_order() {
        let catalog = Catalog::builtin();
        let titles: Vec<&str> = catalog
            .templates_for(Category::Finishing)
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Pose du revêtement de sol",
                "Peinture des murs",
                "Installation des portes et fenêtres"
            ]
        );
    }

    #[test]
    fn test_template_lookup() {
        let catalog = Catalog::builtin();
        let handover = catalog.template("inspection.handover").unwrap();
        assert_eq!(handover.title, "Livraison du chantier");
        assert_eq!(handover.predecessors, vec!["inspection.final"]);
        assert!(catalog.template("roofing.tiles").is_none());
    }

    #[test]
    fn test_materials_for() {
        let catalog = Catalog::builtin();
        let names: Vec<&str> = catalog
            .materials_for("Coulage des fondations")
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Béton", "Armatures"]);

        assert_eq!(catalog.materials_for("Installation du tableau électrique").len(), 2);
        assert_eq!(catalog.materials_for("Peinture des murs")[0].unit, "L");
        assert!(catalog.materials_for("Passage des câbles").is_empty());
    }

    #[test]
    fn test_rejects_unknown_predecessor() {
        let mut templates = BTreeMap::new();
        templates.insert(Category::Other, vec![template("a", "A", 1.0, &["missing"])]);
        let err = Catalog::new(templates, Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPredecessor { .. }));
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let mut templates = BTreeMap::new();
        templates.insert(Category::Other, vec![template("a", "A", 1.0, &[])]);
        templates.insert(Category::Plumbing, vec![template("a", "B", 1.0, &[])]);
        let err = Catalog::new(templates, Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(k) if k == "a"));
    }

    #[test]
    fn test_rejects_self_dependency_and_bad_hours() {
        let mut templates = BTreeMap::new();
        templates.insert(Category::Other, vec![template("a", "A", 1.0, &["a"])]);
        assert!(matches!(
            Catalog::new(templates, Vec::new()),
            Err(CatalogError::SelfDependency(_))
        ));

        let mut templates = BTreeMap::new();
        templates.insert(Category::Other, vec![template("a", "A", f64::NAN, &[])]);
        assert!(matches!(
            Catalog::new(templates, Vec::new()),
            Err(CatalogError::InvalidHours { .. })
        ));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
templates:
  plumbing:
    - key: plumbing.mains
      title: Raccordement au réseau
      hours: 6
    - key: plumbing.boiler
      title: Pose du chauffe-eau
      hours: 3.5
      predecessors: [plumbing.mains]
materials:
  - keyword: chauffe-eau
    materials:
      - { name: Chauffe-eau 200L, quantity: 1, unit: unité, cost: 650 }
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.templates_for(Category::Foundation).is_empty());
        let boiler = catalog.template("plumbing.boiler").unwrap();
        assert_eq!(boiler.hours, 3.5);
        assert_eq!(catalog.materials_for("Pose du chauffe-eau")[0].cost, Some(650.0));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_category() {
        let yaml = "templates:\n  roofing:\n    - { key: r, title: R, hours: 1 }\n";
        assert!(matches!(Catalog::from_yaml_str(yaml), Err(CatalogError::Yaml(_))));
    }
}
