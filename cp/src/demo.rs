//! Demonstration data: a small house build in progress
//!
//! Ids are fixed so loading the set twice replaces it instead of duplicating.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Category, Material, Priority, Task, TaskStatus, TimeEntry};

struct DemoTask {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    start_days: i64,
    end_days: i64,
    status: TaskStatus,
    priority: Priority,
    assigned_to: &'static [&'static str],
    location: &'static str,
    estimated_hours: f64,
    actual_hours: Option<f64>,
    materials: &'static [(&'static str, f64, &'static str)],
    dependencies: &'static [&'static str],
    category: Category,
    notes: &'static str,
    updated_days: i64,
}

const TASKS: [DemoTask; 5] = [
    DemoTask {
        id: "demo_1",
        title: "Excavation du terrain",
        description: "Préparation du terrain et excavation pour les fondations",
        start_days: -2,
        end_days: -1,
        status: TaskStatus::Completed,
        priority: Priority::High,
        assigned_to: &["Jean Dupont", "Pierre Martin"],
        location: "Zone A - Fondations",
        estimated_hours: 16.0,
        actual_hours: Some(14.0),
        materials: &[("Pelle mécanique", 1.0, "unité"), ("Camions", 3.0, "unités")],
        dependencies: &[],
        category: Category::Foundation,
        notes: "Terrain plus facile à excaver que prévu",
        updated_days: -1,
    },
    DemoTask {
        id: "demo_2",
        title: "Coulage des fondations",
        description: "Mise en place du béton pour les fondations",
        start_days: 0,
        end_days: 1,
        status: TaskStatus::InProgress,
        priority: Priority::Urgent,
        assigned_to: &["Marie Dubois", "Paul Leroy"],
        location: "Zone A - Fondations",
        estimated_hours: 24.0,
        actual_hours: Some(8.0),
        materials: &[("Béton", 15.0, "m³"), ("Armatures", 800.0, "kg")],
        dependencies: &["demo_1"],
        category: Category::Foundation,
        notes: "Attention aux conditions météo",
        updated_days: 0,
    },
    DemoTask {
        id: "demo_3",
        title: "Montage de la charpente",
        description: "Installation de la structure bois principale",
        start_days: 3,
        end_days: 6,
        status: TaskStatus::NotStarted,
        priority: Priority::High,
        assigned_to: &["Antoine Bernard", "Sophie Moreau"],
        location: "Zone B - Structure",
        estimated_hours: 32.0,
        actual_hours: None,
        materials: &[("Poutres bois", 20.0, "unités"), ("Connecteurs", 100.0, "pièces")],
        dependencies: &["demo_2"],
        category: Category::Structure,
        notes: "Prévoir grue pour le levage",
        updated_days: -3,
    },
    DemoTask {
        id: "demo_4",
        title: "Installation électrique",
        description: "Mise en place du réseau électrique principal",
        start_days: 7,
        end_days: 9,
        status: TaskStatus::NotStarted,
        priority: Priority::Medium,
        assigned_to: &["Électricien certifié"],
        location: "Ensemble du bâtiment",
        estimated_hours: 20.0,
        actual_hours: None,
        materials: &[("Câbles électriques", 200.0, "m"), ("Tableau électrique", 1.0, "unité")],
        dependencies: &["demo_3"],
        category: Category::Electrical,
        notes: "Vérifier conformité aux normes",
        updated_days: -2,
    },
    DemoTask {
        id: "demo_5",
        title: "Inspection finale",
        description: "Contrôle qualité et conformité avant livraison",
        start_days: 15,
        end_days: 15,
        status: TaskStatus::NotStarted,
        priority: Priority::Urgent,
        assigned_to: &["Inspecteur agréé"],
        location: "Ensemble du projet",
        estimated_hours: 4.0,
        actual_hours: None,
        materials: &[],
        dependencies: &["demo_4"],
        category: Category::Inspection,
        notes: "Préparer tous les documents",
        updated_days: -1,
    },
];

/// The five demo tasks, dated relative to `now`
pub fn demo_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let mut material_seq = 0;
    TASKS
        .iter()
        .map(|d| Task {
            id: d.id.to_string(),
            title: d.title.to_string(),
            description: d.description.to_string(),
            start_date: now + Duration::days(d.start_days),
            end_date: now + Duration::days(d.end_days),
            status: d.status,
            priority: d.priority,
            assigned_to: d.assigned_to.iter().map(|s| s.to_string()).collect(),
            location: d.location.to_string(),
            estimated_hours: d.estimated_hours,
            actual_hours: d.actual_hours,
            materials: d
                .materials
                .iter()
                .map(|&(name, quantity, unit)| {
                    material_seq += 1;
                    Material {
                        id: format!("mat_{}", material_seq),
                        name: name.to_string(),
                        quantity,
                        unit: unit.to_string(),
                        cost: None,
                    }
                })
                .collect(),
            dependencies: d.dependencies.iter().map(|s| s.to_string()).collect(),
            category: d.category,
            notes: Some(d.notes.to_string()),
            created_at: now - Duration::days(5),
            updated_at: now + Duration::days(d.updated_days),
        })
        .collect()
}

/// The four demo time entries, dated relative to `now`
pub fn demo_time_entries(now: DateTime<Utc>) -> Vec<TimeEntry> {
    // (id, task, user, start offset h, end offset h, hours, description, created offset days)
    let rows: [(&str, &str, &str, i64, i64, f64, &str, i64); 4] = [
        ("time_1", "demo_1", "jean_dupont", -74, -66, 8.0, "Excavation première phase", -2),
        ("time_2", "demo_1", "pierre_martin", -38, -32, 6.0, "Finition excavation", -1),
        ("time_3", "demo_2", "marie_dubois", -4, 0, 4.0, "Préparation coulage béton", 0),
        ("time_4", "demo_2", "paul_leroy", -4, 0, 4.0, "Mise en place armatures", 0),
    ];

    rows.iter()
        .map(|&(id, task_id, user_id, start_h, end_h, hours, description, created_days)| TimeEntry {
            id: id.to_string(),
            task_id: task_id.to_string(),
            user_id: user_id.to_string(),
            start_time: now + Duration::hours(start_h),
            end_time: Some(now + Duration::hours(end_h)),
            hours,
            description: Some(description.to_string()),
            location: Some("Zone A".to_string()),
            created_at: now + Duration::days(created_days),
        })
        .collect()
}
