//! Abstract document store.
//!
//! The engines in this crate only ever talk to a [`Store`]. Concrete backends
//! live elsewhere (`sprintboard-db` for PostgreSQL) except for
//! [`MemoryStore`], which backs unit and integration tests.

pub mod memory;

use async_trait::async_trait;

use crate::deletion::DeletionFilter;
use crate::models::{Entity, EntityKind, ParentRef, Record};
use crate::types::EntityId;

pub use memory::MemoryStore;

/// Errors raised by a [`Store`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Document (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Expected a {expected:?} document, got {actual:?}")]
    KindMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },

    #[error("Write rejected for {kind:?} {id}")]
    WriteRejected { kind: EntityKind, id: EntityId },
}

// ---------------------------------------------------------------------------
// Query predicates
// ---------------------------------------------------------------------------

/// Query predicate shared by every collection.
///
/// `parents` is `None` when unconstrained. `Some(vec![])` matches nothing,
/// so "children of no parents" never degrades into "every record".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub id: Option<EntityId>,
    pub parents: Option<Vec<ParentRef>>,
    pub deletion: DeletionFilter,
    pub status: Option<String>,
}

impl Filter {
    /// Live records only.
    pub fn active() -> Self {
        Self::default()
    }

    pub fn by_id(id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn child_of(parent: ParentRef) -> Self {
        Self::child_of_any(vec![parent])
    }

    /// Records linked to at least one of `parents`.
    pub fn child_of_any(parents: Vec<ParentRef>) -> Self {
        Self {
            parents: Some(parents),
            ..Self::default()
        }
    }

    pub fn with_deletion(mut self, deletion: DeletionFilter) -> Self {
        self.deletion = deletion;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Evaluate the filter against an in-memory entity.
    pub fn matches(&self, entity: &Entity) -> bool {
        if let Some(id) = &self.id {
            if entity.id() != id {
                return false;
            }
        }
        if let Some(parents) = &self.parents {
            if !parents.iter().any(|p| entity.belongs_to(p)) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if entity.status_code() != Some(status.as_str()) {
                return false;
            }
        }
        self.deletion.matches(entity.deletion())
    }
}

/// Offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Page {
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: None,
        }
    }

    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip,
            limit: Some(limit),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::all()
    }
}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// Document collection access.
///
/// Each call is individually reliable; nothing spans calls. `save` is an
/// upsert keyed on the entity id and returns the document as stored.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find(
        &self,
        kind: EntityKind,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<Entity>, StoreError>;

    async fn find_one(&self, kind: EntityKind, filter: &Filter)
        -> Result<Option<Entity>, StoreError>;

    async fn save(&self, entity: Entity) -> Result<Entity, StoreError>;

    async fn save_all(&self, entities: Vec<Entity>) -> Result<(), StoreError>;

    async fn count(&self, kind: EntityKind, filter: &Filter) -> Result<u64, StoreError>;
}

/// Typed helpers over [`Store`] for a single [`Record`] type.
#[async_trait]
pub trait StoreExt: Store {
    async fn find_records<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        self.find(R::KIND, filter, Page::all())
            .await?
            .into_iter()
            .map(expect_kind::<R>)
            .collect()
    }

    async fn find_record<R: Record>(&self, filter: &Filter) -> Result<Option<R>, StoreError> {
        self.find_one(R::KIND, filter)
            .await?
            .map(expect_kind::<R>)
            .transpose()
    }

    /// Look up a live record by raw id. Malformed ids resolve to `None`.
    async fn find_active_by_raw_id<R: Record>(&self, raw_id: &str) -> Result<Option<R>, StoreError> {
        match EntityId::parse(raw_id) {
            Some(id) => self.find_record::<R>(&Filter::by_id(id)).await,
            None => Ok(None),
        }
    }

    async fn save_record<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let saved = self.save(record.into_entity()).await?;
        expect_kind::<R>(saved)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

fn expect_kind<R: Record>(entity: Entity) -> Result<R, StoreError> {
    let actual = entity.kind();
    R::from_entity(entity).ok_or(StoreError::KindMismatch {
        expected: R::KIND,
        actual,
    })
}
