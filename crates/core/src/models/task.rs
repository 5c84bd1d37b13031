//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::deletion::DeletionState;
use crate::status::{DeliveryStatus, Rft, TaskStatus, TaskType};
use crate::types::{EntityId, Timestamp};

/// A backlog item scheduled in a sprint.
///
/// `technical_load`, `progress` and `delta` are derived from the story points,
/// the time fields and the owning project's workload ratio. They are kept in
/// sync by [`RecalculationCoordinator`](crate::recalculation::RecalculationCoordinator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub sprint_id: EntityId,
    /// Denormalized from the owning sprint.
    pub project_id: EntityId,
    pub key: String,
    pub summary: String,
    #[serde(default)]
    pub story_points: f64,
    #[serde(default)]
    pub wu: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default)]
    pub delivery_version: String,
    /// Name of the sprint the task was delivered in. Filled on completion.
    #[serde(default)]
    pub delivery_sprint_name: Option<String>,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub rft: Rft,
    #[serde(default)]
    pub technical_load: f64,
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default)]
    pub time_remaining: Option<f64>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub assignees: Vec<EntityId>,
    #[serde(default)]
    pub ticket_link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub deletion: DeletionState,
}

impl Task {
    pub fn new(
        sprint_id: EntityId,
        project_id: EntityId,
        key: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            sprint_id,
            project_id,
            key: key.into(),
            summary: summary.into(),
            story_points: 0.0,
            wu: String::new(),
            comment: String::new(),
            delivery_status: DeliveryStatus::default(),
            delivery_version: String::new(),
            delivery_sprint_name: None,
            task_type: TaskType::default(),
            status: TaskStatus::default(),
            rft: Rft::default(),
            technical_load: 0.0,
            time_spent: 0.0,
            time_remaining: None,
            progress: None,
            delta: None,
            assignees: Vec::new(),
            ticket_link: None,
            description: None,
            created_at: chrono::Utc::now(),
            deletion: DeletionState::Active,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TaskStatus::Cancelled
    }

    /// Done and delivered in the sprint called `sprint_name`.
    pub fn delivered_in(&self, sprint_name: &str) -> bool {
        self.status == TaskStatus::Done && self.delivery_sprint_name.as_deref() == Some(sprint_name)
    }
}

/// DTO for creating a task. The project is taken from the sprint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTask {
    pub sprint_id: EntityId,
    #[serde(default)]
    pub key: String,
    #[validate(length(min = 1, message = "summary must not be empty"))]
    pub summary: String,
    #[validate(range(min = 0.0, message = "story_points must not be negative"))]
    #[serde(default)]
    pub story_points: f64,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub assignees: Vec<EntityId>,
}

/// DTO for updating an existing task. All fields but `id` are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    pub id: String,
    #[validate(length(min = 1, message = "key must not be empty"))]
    pub key: Option<String>,
    #[validate(length(min = 1, message = "summary must not be empty"))]
    pub summary: Option<String>,
    #[validate(range(min = 0.0, message = "story_points must not be negative"))]
    pub story_points: Option<f64>,
    pub wu: Option<String>,
    pub comment: Option<String>,
    pub delivery_status: Option<DeliveryStatus>,
    pub delivery_version: Option<String>,
    pub delivery_sprint_name: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub rft: Option<Rft>,
    #[validate(range(min = 0.0, message = "time_spent must not be negative"))]
    pub time_spent: Option<f64>,
    #[validate(range(min = 0.0, message = "time_remaining must not be negative"))]
    pub time_remaining: Option<f64>,
    pub assignees: Option<Vec<EntityId>>,
    pub ticket_link: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::new(EntityId::generate(), EntityId::generate(), "K-1", "Do it")
    }

    #[test]
    fn delivered_in_requires_done_and_matching_sprint() {
        let mut t = task();
        t.delivery_sprint_name = Some("Sprint 1".into());
        assert!(!t.delivered_in("Sprint 1"));

        t.status = TaskStatus::Done;
        assert!(t.delivered_in("Sprint 1"));
        assert!(!t.delivered_in("Sprint 2"));
    }

    #[test]
    fn type_field_uses_wire_name() {
        let json = serde_json::to_value(task()).unwrap();
        assert_eq!(json["type"], "TASK");
        assert_eq!(json["status"], "TODO");
        assert_eq!(json["rft"], "");
    }

    #[test]
    fn update_rejects_negative_time() {
        let update = TaskUpdate {
            id: "x".into(),
            time_remaining: Some(-1.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
