//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::deletion::DeletionState;
use crate::status::{ProjectStatus, TaskStatus, TaskType};
use crate::types::{EntityId, Timestamp};

/// A project inside a service center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub center_id: Option<EntityId>,
    /// Story points per technical-load day. Always > 0.
    pub workload_ratio: f64,
    /// Task statuses allowed on this project.
    #[serde(default)]
    pub task_statuses: Vec<TaskStatus>,
    /// Task types allowed on this project.
    #[serde(default)]
    pub task_types: Vec<TaskType>,
    #[serde(default)]
    pub transversal_activities: Vec<EntityId>,
    #[serde(default)]
    pub sprints: Vec<EntityId>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub deletion: DeletionState,
}

impl Project {
    /// A new in-progress project allowing every task status and type.
    pub fn new(name: impl Into<String>, center_id: Option<EntityId>, workload_ratio: f64) -> Self {
        Self {
            id: EntityId::generate(),
            name: name.into(),
            status: ProjectStatus::InProgress,
            center_id,
            workload_ratio,
            task_statuses: TaskStatus::ALL.to_vec(),
            task_types: TaskType::ALL.to_vec(),
            transversal_activities: Vec::new(),
            sprints: Vec::new(),
            created_at: chrono::Utc::now(),
            deletion: DeletionState::Active,
        }
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub center_id: Option<EntityId>,
    #[validate(range(exclusive_min = 0.0, message = "workload_ratio must be greater than 0"))]
    pub workload_ratio: f64,
    /// Defaults to `In progress` if omitted.
    pub status: Option<ProjectStatus>,
    /// Defaults to the full status catalog if omitted.
    pub task_statuses: Option<Vec<TaskStatus>>,
    /// Defaults to the full type catalog if omitted.
    pub task_types: Option<Vec<TaskType>>,
}

impl CreateProject {
    pub fn into_project(self) -> Project {
        let mut project = Project::new(self.name, self.center_id, self.workload_ratio);
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(statuses) = self.task_statuses {
            project.task_statuses = statuses;
        }
        if let Some(types) = self.task_types {
            project.task_types = types;
        }
        project
    }
}

/// DTO for updating an existing project. All fields but `id` are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProjectUpdate {
    pub id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub center_id: Option<EntityId>,
    #[validate(range(exclusive_min = 0.0, message = "workload_ratio must be greater than 0"))]
    pub workload_ratio: Option<f64>,
    pub task_statuses: Option<Vec<TaskStatus>>,
    pub task_types: Option<Vec<TaskType>>,
}
