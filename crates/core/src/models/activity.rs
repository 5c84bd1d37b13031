//! Transversal activities: non-technical recurring work tracked at project
//! and sprint level.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::deletion::DeletionState;
use crate::types::{EntityId, Timestamp};

/// Activities cloned onto every new project, as `(name, description)`.
pub const DEFAULT_PROJECT_ACTIVITIES: &[(&str, &str)] = &[
    ("Ceremonies", "SCRUM Meetings"),
    ("Project meetings", "Other Meetings"),
    ("Estimations", "Analysis, Questions/answers, Cost of production"),
    (
        "Deliveries",
        "Preparation and test before sprint delivery and/or deployment",
    ),
    (
        "Maintenance",
        "Environment maintenance, configuration management",
    ),
    (
        "Team management",
        "Team organisation and project management / TL",
    ),
    ("Capitalisation", "Global project capitalisation"),
    ("Internal trainings", "Team skills ramp-up"),
    (
        "Agency meetings",
        "Meeting with HR, Business, medical appointment",
    ),
    ("Lost Time", "Example: dysfunctional accesses"),
];

/// Project-level activity definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTransversalActivity {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cloned from [`DEFAULT_PROJECT_ACTIVITIES`].
    #[serde(default)]
    pub default: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub deletion: DeletionState,
}

impl ProjectTransversalActivity {
    pub fn new(
        project_id: EntityId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            project_id,
            name: name.into(),
            description: description.into(),
            default: false,
            created_at: chrono::Utc::now(),
            deletion: DeletionState::Active,
        }
    }

    /// Fresh copies of the default activity set for `project_id`.
    pub fn defaults_for(project_id: &EntityId) -> Vec<Self> {
        DEFAULT_PROJECT_ACTIVITIES
            .iter()
            .map(|(name, description)| Self {
                default: true,
                ..Self::new(project_id.clone(), *name, *description)
            })
            .collect()
    }
}

/// Time booked on a transversal activity during one sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintTransversalActivity {
    pub id: EntityId,
    pub sprint_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time_spent: f64,
    pub created_at: Timestamp,
    #[serde(default)]
    pub deletion: DeletionState,
}

impl SprintTransversalActivity {
    pub fn new(sprint_id: EntityId, name: impl Into<String>, time_spent: f64) -> Self {
        Self {
            id: EntityId::generate(),
            sprint_id,
            name: name.into(),
            description: String::new(),
            time_spent,
            created_at: chrono::Utc::now(),
            deletion: DeletionState::Active,
        }
    }
}

/// DTO for booking time on a sprint activity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSprintActivity {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "time_spent must not be negative"))]
    #[serde(default)]
    pub time_spent: f64,
}
