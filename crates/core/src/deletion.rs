//! Soft-delete state shared by every collection.
//!
//! A record is either live, deleted on request, or deleted because an
//! ancestor was deleted. The two storage flags (`is_deleted`,
//! `is_cascade_deleted`) are projections of this single value, so a
//! cascade-deleted record that is not deleted cannot be represented.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionState {
    #[default]
    Active,
    /// Deleted by a request targeting this record.
    Deleted,
    /// Deleted because an ancestor was deleted.
    CascadeDeleted,
}

impl DeletionState {
    /// State applied by a delete, direct or cascaded.
    pub fn for_delete(is_cascade: bool) -> Self {
        if is_cascade {
            Self::CascadeDeleted
        } else {
            Self::Deleted
        }
    }

    /// Rebuild the state from the two storage flags.
    ///
    /// `is_cascade_deleted` without `is_deleted` is not a valid combination
    /// and is read back as [`DeletionState::CascadeDeleted`].
    pub fn from_flags(is_deleted: bool, is_cascade_deleted: bool) -> Self {
        match (is_deleted, is_cascade_deleted) {
            (_, true) => Self::CascadeDeleted,
            (true, false) => Self::Deleted,
            (false, false) => Self::Active,
        }
    }

    pub fn is_deleted(self) -> bool {
        !matches!(self, Self::Active)
    }

    pub fn is_cascade_deleted(self) -> bool {
        matches!(self, Self::CascadeDeleted)
    }
}

/// Which deletion states a query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionFilter {
    /// Live records only. The default for every query.
    #[default]
    Active,
    /// Any deleted record, direct or cascaded.
    Deleted,
    /// Cascade victims only.
    CascadeDeleted,
    Any,
}

impl DeletionFilter {
    pub fn matches(self, state: DeletionState) -> bool {
        match self {
            Self::Active => state == DeletionState::Active,
            Self::Deleted => state.is_deleted(),
            Self::CascadeDeleted => state.is_cascade_deleted(),
            Self::Any => true,
        }
    }
}
