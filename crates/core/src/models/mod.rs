//! Entity model for the delivery hierarchy.
//!
//! ```text
//! ServiceCenter
//!   └── Project ──── ProjectTransversalActivity
//!         └── Sprint ── SprintTransversalActivity
//!               └── Task
//! ```
//!
//! Each submodule holds one collection's document struct. [`Entity`] is the
//! closed sum the [`Store`](crate::store::Store) contract moves around, and
//! [`Record`] is the typed view of a single collection.

pub mod activity;
pub mod project;
pub mod service_center;
pub mod sprint;
pub mod task;

use serde::{Deserialize, Serialize};

use crate::deletion::DeletionState;
use crate::types::{EntityId, Timestamp};

pub use activity::{
    CreateSprintActivity, ProjectTransversalActivity, SprintTransversalActivity,
    DEFAULT_PROJECT_ACTIVITIES,
};
pub use project::{CreateProject, Project, ProjectUpdate};
pub use service_center::{CreateServiceCenter, ServiceCenter};
pub use sprint::{CreateSprint, Sprint};
pub use task::{NewTask, Task, TaskUpdate};

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// One document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ServiceCenter,
    Project,
    ProjectActivity,
    Sprint,
    SprintActivity,
    Task,
}

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::ServiceCenter,
        EntityKind::Project,
        EntityKind::ProjectActivity,
        EntityKind::Sprint,
        EntityKind::SprintActivity,
        EntityKind::Task,
    ];

    /// Collection (and table) name.
    pub fn collection(self) -> &'static str {
        match self {
            Self::ServiceCenter => "service_centers",
            Self::Project => "projects",
            Self::ProjectActivity => "project_transversal_activities",
            Self::Sprint => "sprints",
            Self::SprintActivity => "sprint_transversal_activities",
            Self::Task => "tasks",
        }
    }

    /// Collections whose records are removed when a record of this kind is
    /// deleted. Tasks are reached through their sprint, not their project.
    pub fn child_kinds(self) -> &'static [EntityKind] {
        match self {
            Self::ServiceCenter => &[Self::Project],
            Self::Project => &[Self::Sprint, Self::ProjectActivity],
            Self::Sprint => &[Self::Task, Self::SprintActivity],
            Self::ProjectActivity | Self::SprintActivity | Self::Task => &[],
        }
    }

    /// Resolve an audit root type name (`service_center`, `project`, `sprint`).
    pub fn from_root_name(name: &str) -> Option<Self> {
        match name {
            "service_center" | "service-center" => Some(Self::ServiceCenter),
            "project" => Some(Self::Project),
            "sprint" => Some(Self::Sprint),
            _ => None,
        }
    }
}

/// Authoritative link from a child record to one of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    ServiceCenter(EntityId),
    Project(EntityId),
    Sprint(EntityId),
}

impl ParentRef {
    /// The reference a child of `kind`/`id` carries, if `kind` can be a parent.
    pub fn of(kind: EntityKind, id: EntityId) -> Option<Self> {
        match kind {
            EntityKind::ServiceCenter => Some(Self::ServiceCenter(id)),
            EntityKind::Project => Some(Self::Project(id)),
            EntityKind::Sprint => Some(Self::Sprint(id)),
            _ => None,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            Self::ServiceCenter(id) | Self::Project(id) | Self::Sprint(id) => id,
        }
    }

    /// Name of the column holding this link in child tables.
    pub fn column(&self) -> &'static str {
        match self {
            Self::ServiceCenter(_) => "service_center_id",
            Self::Project(_) => "project_id",
            Self::Sprint(_) => "sprint_id",
        }
    }
}

// ---------------------------------------------------------------------------
// Entity sum type
// ---------------------------------------------------------------------------

/// A document from any collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    ServiceCenter(ServiceCenter),
    Project(Project),
    ProjectActivity(ProjectTransversalActivity),
    Sprint(Sprint),
    SprintActivity(SprintTransversalActivity),
    Task(Task),
}

macro_rules! each_entity {
    ($self:expr, $bind:ident => $body:expr) => {
        match $self {
            Entity::ServiceCenter($bind) => $body,
            Entity::Project($bind) => $body,
            Entity::ProjectActivity($bind) => $body,
            Entity::Sprint($bind) => $body,
            Entity::SprintActivity($bind) => $body,
            Entity::Task($bind) => $body,
        }
    };
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::ServiceCenter(_) => EntityKind::ServiceCenter,
            Self::Project(_) => EntityKind::Project,
            Self::ProjectActivity(_) => EntityKind::ProjectActivity,
            Self::Sprint(_) => EntityKind::Sprint,
            Self::SprintActivity(_) => EntityKind::SprintActivity,
            Self::Task(_) => EntityKind::Task,
        }
    }

    pub fn id(&self) -> &EntityId {
        each_entity!(self, e => e.id())
    }

    pub fn created_at(&self) -> Timestamp {
        each_entity!(self, e => e.created_at())
    }

    pub fn deletion(&self) -> DeletionState {
        each_entity!(self, e => e.deletion())
    }

    pub fn set_deletion(&mut self, state: DeletionState) {
        each_entity!(self, e => e.set_deletion(state))
    }

    pub fn parents(&self) -> Vec<ParentRef> {
        each_entity!(self, e => e.parents())
    }

    pub fn status_code(&self) -> Option<&'static str> {
        each_entity!(self, e => e.status_code())
    }

    /// Whether this record is linked to `parent`.
    pub fn belongs_to(&self, parent: &ParentRef) -> bool {
        self.parents().iter().any(|p| p == parent)
    }

    /// Serialize the inner document.
    pub fn to_document(&self) -> Result<serde_json::Value, serde_json::Error> {
        each_entity!(self, e => serde_json::to_value(e))
    }

    /// Rebuild an entity of `kind` from its stored document.
    pub fn from_document(
        kind: EntityKind,
        doc: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            EntityKind::ServiceCenter => Self::ServiceCenter(serde_json::from_value(doc)?),
            EntityKind::Project => Self::Project(serde_json::from_value(doc)?),
            EntityKind::ProjectActivity => Self::ProjectActivity(serde_json::from_value(doc)?),
            EntityKind::Sprint => Self::Sprint(serde_json::from_value(doc)?),
            EntityKind::SprintActivity => Self::SprintActivity(serde_json::from_value(doc)?),
            EntityKind::Task => Self::Task(serde_json::from_value(doc)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Typed records
// ---------------------------------------------------------------------------

/// Typed view over one collection.
pub trait Record: Clone + Send + Sync + Sized + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &EntityId;
    fn created_at(&self) -> Timestamp;
    fn deletion(&self) -> DeletionState;
    fn set_deletion(&mut self, state: DeletionState);
    /// Every ancestor link stored on the record.
    fn parents(&self) -> Vec<ParentRef>;
    fn status_code(&self) -> Option<&'static str>;

    fn into_entity(self) -> Entity;
    fn from_entity(entity: Entity) -> Option<Self>;
}

macro_rules! impl_record {
    ($ty:ty, $variant:ident, |$s:ident| parents: $parents:expr, status: $status:expr) => {
        impl Record for $ty {
            const KIND: EntityKind = EntityKind::$variant;

            fn id(&self) -> &EntityId {
                &self.id
            }

            fn created_at(&self) -> Timestamp {
                self.created_at
            }

            fn deletion(&self) -> DeletionState {
                self.deletion
            }

            fn set_deletion(&mut self, state: DeletionState) {
                self.deletion = state;
            }

            #[allow(unused_variables)]
            fn parents(&self) -> Vec<ParentRef> {
                let $s = self;
                $parents
            }

            #[allow(unused_variables)]
            fn status_code(&self) -> Option<&'static str> {
                let $s = self;
                $status
            }

            fn into_entity(self) -> Entity {
                Entity::$variant(self)
            }

            fn from_entity(entity: Entity) -> Option<Self> {
                match entity {
                    Entity::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_record!(ServiceCenter, ServiceCenter, |s| parents: Vec::new(), status: Some(s.status.code()));
impl_record!(
    Project,
    Project,
    |s| parents: s.center_id.clone().map(ParentRef::ServiceCenter).into_iter().collect(),
    status: Some(s.status.code())
);
impl_record!(
    ProjectTransversalActivity,
    ProjectActivity,
    |s| parents: vec![ParentRef::Project(s.project_id.clone())],
    status: None
);
impl_record!(
    Sprint,
    Sprint,
    |s| parents: vec![ParentRef::Project(s.project_id.clone())],
    status: Some(s.status.code())
);
impl_record!(
    SprintTransversalActivity,
    SprintActivity,
    |s| parents: vec![ParentRef::Sprint(s.sprint_id.clone())],
    status: None
);
impl_record!(
    Task,
    Task,
    |s| parents: vec![
        ParentRef::Sprint(s.sprint_id.clone()),
        ParentRef::Project(s.project_id.clone()),
    ],
    status: Some(s.status.code())
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_kinds_follow_the_hierarchy() {
        assert_eq!(
            EntityKind::ServiceCenter.child_kinds(),
            &[EntityKind::Project]
        );
        assert_eq!(
            EntityKind::Project.child_kinds(),
            &[EntityKind::Sprint, EntityKind::ProjectActivity]
        );
        assert_eq!(
            EntityKind::Sprint.child_kinds(),
            &[EntityKind::Task, EntityKind::SprintActivity]
        );
        assert!(EntityKind::Task.child_kinds().is_empty());
    }

    #[test]
    fn root_names() {
        assert_eq!(
            EntityKind::from_root_name("project"),
            Some(EntityKind::Project)
        );
        assert_eq!(
            EntityKind::from_root_name("service_center"),
            Some(EntityKind::ServiceCenter)
        );
        assert_eq!(EntityKind::from_root_name("task"), None);
        assert_eq!(EntityKind::from_root_name("invalid_type"), None);
    }

    #[test]
    fn task_belongs_to_sprint_and_project() {
        let project_id = EntityId::generate();
        let sprint_id = EntityId::generate();
        let task = Task::new(sprint_id.clone(), project_id.clone(), "KEY-1", "Summary");
        let entity = task.into_entity();
        assert!(entity.belongs_to(&ParentRef::Sprint(sprint_id)));
        assert!(entity.belongs_to(&ParentRef::Project(project_id)));
        assert!(!entity.belongs_to(&ParentRef::Project(EntityId::generate())));
    }

    #[test]
    fn document_round_trip_preserves_kind() {
        let project = Project::new("Apollo", None, 2.0);
        let entity = project.clone().into_entity();
        let doc = entity.to_document().unwrap();
        let back = Entity::from_document(EntityKind::Project, doc).unwrap();
        assert_eq!(Project::from_entity(back), Some(project));
    }
}
