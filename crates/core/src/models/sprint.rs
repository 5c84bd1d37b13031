//! Sprint entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::deletion::DeletionState;
use crate::status::SprintStatus;
use crate::types::{EntityId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub status: SprintStatus,
    pub start_date: Timestamp,
    pub due_date: Timestamp,
    /// Team capacity in days.
    #[serde(default)]
    pub capacity: f64,
    #[serde(default)]
    pub tasks: Vec<EntityId>,
    #[serde(default)]
    pub transversal_activities: Vec<EntityId>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub deletion: DeletionState,
}

impl Sprint {
    pub fn new(
        project_id: EntityId,
        name: impl Into<String>,
        start_date: Timestamp,
        due_date: Timestamp,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            project_id,
            name: name.into(),
            status: SprintStatus::default(),
            start_date,
            due_date,
            capacity: 0.0,
            tasks: Vec::new(),
            transversal_activities: Vec::new(),
            created_at: chrono::Utc::now(),
            deletion: DeletionState::Active,
        }
    }
}

/// DTO for creating a new sprint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSprint {
    pub project_id: EntityId,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub status: Option<SprintStatus>,
    pub start_date: Timestamp,
    pub due_date: Timestamp,
    #[validate(range(min = 0.0, message = "capacity must not be negative"))]
    #[serde(default)]
    pub capacity: f64,
}

impl CreateSprint {
    pub fn into_sprint(self) -> Sprint {
        let mut sprint = Sprint::new(self.project_id, self.name, self.start_date, self.due_date);
        sprint.status = self.status.unwrap_or_default();
        sprint.capacity = self.capacity;
        sprint
    }
}
