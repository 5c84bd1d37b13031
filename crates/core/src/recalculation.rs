//! Keeps task derived fields consistent with the owning project.
//!
//! Every write path that can change a task's technical load goes through
//! [`RecalculationCoordinator`]: task creation, task update, and project
//! updates that change the workload ratio. Unlike cascade deletion, every
//! failure here is returned to the caller. Tasks are written one at a time
//! with no cross-task atomicity.

use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;
use crate::metrics::{apply_task_metrics, round_to, task_metrics, technical_load};
use crate::models::{
    NewTask, ParentRef, Project, ProjectUpdate, Sprint, Task, TaskUpdate,
};
use crate::status::{TaskStatus, TaskType};
use crate::store::{Filter, Store, StoreExt};
use crate::types::EntityId;

/// Tolerance when comparing stored amounts.
const EPSILON: f64 = 1e-6;

/// Outcome of a ratio-driven pass over a project's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecalculationReport {
    pub tasks_seen: usize,
    pub tasks_updated: usize,
    /// Tasks whose untouched `time_remaining` followed the new load.
    pub time_remaining_reset: usize,
}

/// Result of [`RecalculationCoordinator::update_project`].
#[derive(Debug, Clone, Serialize)]
pub struct ProjectUpdateOutcome {
    pub project: Project,
    /// Present only when the workload ratio changed.
    pub recalculation: Option<RecalculationReport>,
}

pub struct RecalculationCoordinator<S: ?Sized> {
    store: Arc<S>,
}

impl<S: Store + ?Sized> RecalculationCoordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // -- Ratio change --

    /// Recompute every live task of `project` after its ratio moved from
    /// `previous_ratio` to `project.workload_ratio`.
    ///
    /// A task whose `time_remaining` still equals its stored technical load
    /// is treated as never edited and follows the new load. The stored load
    /// is compared rather than one derived from `previous_ratio`, so tasks
    /// left behind by an interrupted pass still catch up.
    pub async fn recalculate_project(
        &self,
        project: &Project,
        previous_ratio: f64,
    ) -> Result<RecalculationReport, CoreError> {
        let tasks: Vec<Task> = self
            .store
            .find_records(&Filter::child_of(ParentRef::Project(project.id.clone())))
            .await?;

        let mut report = RecalculationReport {
            tasks_seen: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            let mut updated = task.clone();
            if task
                .time_remaining
                .is_some_and(|remaining| approx_eq(remaining, task.technical_load))
            {
                updated.time_remaining =
                    Some(initial_time_remaining(task.story_points, project.workload_ratio));
                report.time_remaining_reset += 1;
            }
            let metrics = task_metrics(&updated, project.workload_ratio);
            apply_task_metrics(&mut updated, &metrics);

            if updated != task {
                self.store.save_record(updated).await?;
                report.tasks_updated += 1;
            }
        }

        tracing::info!(
            project_id = %project.id,
            previous_ratio,
            ratio = project.workload_ratio,
            tasks_seen = report.tasks_seen,
            tasks_updated = report.tasks_updated,
            time_remaining_reset = report.time_remaining_reset,
            "Project tasks recalculated"
        );
        Ok(report)
    }

    /// Apply `update` to a project. The task pass runs only when the
    /// workload ratio actually changed.
    pub async fn update_project(
        &self,
        update: ProjectUpdate,
    ) -> Result<ProjectUpdateOutcome, CoreError> {
        update.validate()?;
        let mut project: Project = self.load(&update.id, "Project").await?;
        let previous_ratio = project.workload_ratio;

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        if let Some(center_id) = update.center_id {
            project.center_id = Some(center_id);
        }
        if let Some(statuses) = update.task_statuses {
            project.task_statuses = statuses;
        }
        if let Some(types) = update.task_types {
            project.task_types = types;
        }
        if let Some(ratio) = update.workload_ratio {
            project.workload_ratio = ratio;
        }

        let project = self.store.save_record(project).await?;
        let recalculation = if approx_eq(project.workload_ratio, previous_ratio) {
            None
        } else {
            Some(self.recalculate_project(&project, previous_ratio).await?)
        };

        Ok(ProjectUpdateOutcome {
            project,
            recalculation,
        })
    }

    // -- Task writes --

    /// Create a task in a live sprint, with derived fields computed from the
    /// owning project's ratio and `time_remaining` set to the technical load.
    pub async fn create_task(&self, input: NewTask) -> Result<Task, CoreError> {
        input.validate()?;
        let mut sprint: Sprint = self
            .store
            .find_record(&Filter::by_id(input.sprint_id.clone()))
            .await?
            .ok_or_else(|| CoreError::not_found("Sprint", &input.sprint_id))?;
        let project = self.project_of(&sprint.project_id).await?;

        let status = input.status.unwrap_or_default();
        let task_type = input.task_type.unwrap_or_default();
        check_allowed(&project, status, task_type)?;

        let mut task = Task::new(
            sprint.id.clone(),
            project.id.clone(),
            input.key,
            input.summary,
        );
        task.story_points = input.story_points;
        task.status = status;
        task.task_type = task_type;
        task.assignees = input.assignees;
        task.time_remaining = Some(initial_time_remaining(
            task.story_points,
            project.workload_ratio,
        ));
        if task.status == TaskStatus::Done {
            task.delivery_sprint_name = Some(sprint.name.clone());
        }
        let metrics = task_metrics(&task, project.workload_ratio);
        apply_task_metrics(&mut task, &metrics);

        let task = self.store.save_record(task).await?;
        sprint.tasks.push(task.id.clone());
        self.store.save_record(sprint).await?;

        tracing::debug!(task_id = %task.id, project_id = %project.id, "Task created");
        Ok(task)
    }

    /// Apply `update` to a task and recompute its derived fields.
    ///
    /// `time_remaining` is re-initialized from the new load when the story
    /// points changed and it still held the old load, or when it was unset.
    /// A task reaching `DONE` without a delivery sprint is stamped with its
    /// own sprint's name.
    pub async fn update_task(&self, update: TaskUpdate) -> Result<Task, CoreError> {
        update.validate()?;
        let mut task: Task = self.load(&update.id, "Task").await?;
        let project = self.project_of(&task.project_id).await?;
        let ratio = project.workload_ratio;

        let previous_story_points = task.story_points;
        let previous_load = task.technical_load;
        let previous_remaining = task.time_remaining;

        if let Some(key) = update.key {
            task.key = key;
        }
        if let Some(summary) = update.summary {
            task.summary = summary;
        }
        if let Some(story_points) = update.story_points {
            task.story_points = story_points;
        }
        if let Some(wu) = update.wu {
            task.wu = wu;
        }
        if let Some(comment) = update.comment {
            task.comment = comment;
        }
        if let Some(delivery_status) = update.delivery_status {
            task.delivery_status = delivery_status;
        }
        if let Some(delivery_version) = update.delivery_version {
            task.delivery_version = delivery_version;
        }
        if let Some(name) = update.delivery_sprint_name {
            task.delivery_sprint_name = Some(name).filter(|n| !n.is_empty());
        }
        if let Some(task_type) = update.task_type {
            task.task_type = task_type;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(rft) = update.rft {
            task.rft = rft;
        }
        if let Some(time_spent) = update.time_spent {
            task.time_spent = time_spent;
        }
        if let Some(assignees) = update.assignees {
            task.assignees = assignees;
        }
        if let Some(ticket_link) = update.ticket_link {
            task.ticket_link = Some(ticket_link);
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        check_allowed(&project, task.status, task.task_type)?;

        let new_remaining = initial_time_remaining(task.story_points, ratio);
        match update.time_remaining {
            Some(remaining) => task.time_remaining = Some(remaining),
            None => {
                let story_points_changed = !approx_eq(task.story_points, previous_story_points);
                let untouched = previous_remaining
                    .is_some_and(|remaining| approx_eq(remaining, previous_load));
                if story_points_changed && untouched {
                    task.time_remaining = Some(new_remaining);
                }
            }
        }
        if task.time_remaining.is_none() {
            task.time_remaining = Some(new_remaining);
        }

        if task.status == TaskStatus::Done && task.delivery_sprint_name.is_none() {
            let sprint: Option<Sprint> = self
                .store
                .find_record(&Filter::by_id(task.sprint_id.clone()))
                .await?;
            task.delivery_sprint_name = sprint.map(|s| s.name);
        }

        let metrics = task_metrics(&task, ratio);
        apply_task_metrics(&mut task, &metrics);
        Ok(self.store.save_record(task).await?)
    }

    // -- Helpers --

    async fn load<R: crate::models::Record>(
        &self,
        raw_id: &str,
        entity: &'static str,
    ) -> Result<R, CoreError> {
        self.store
            .find_active_by_raw_id::<R>(raw_id)
            .await?
            .ok_or_else(|| CoreError::not_found(entity, raw_id))
    }

    async fn project_of(&self, id: &EntityId) -> Result<Project, CoreError> {
        self.store
            .find_record(&Filter::by_id(id.clone()))
            .await?
            .ok_or_else(|| CoreError::not_found("Project", id))
    }
}

/// `time_remaining` of a task nobody has re-estimated: its technical load as
/// stored, at one decimal.
fn initial_time_remaining(story_points: f64, ratio: f64) -> f64 {
    round_to(technical_load(story_points, ratio), 1)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn check_allowed(project: &Project, status: TaskStatus, task_type: TaskType) -> Result<(), CoreError> {
    if !project.task_statuses.is_empty() && !project.task_statuses.contains(&status) {
        return Err(CoreError::Validation(format!(
            "Task status '{status}' is not enabled on project '{}'",
            project.name
        )));
    }
    if !project.task_types.is_empty() && !project.task_types.contains(&task_type) {
        return Err(CoreError::Validation(format!(
            "Task type '{task_type}' is not enabled on project '{}'",
            project.name
        )));
    }
    Ok(())
}
