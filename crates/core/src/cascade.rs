//! Hierarchical soft delete.
//!
//! Deleting a node first deletes its live children, depth first and one at a
//! time, then marks the node itself. Children are tagged
//! [`DeletionState::CascadeDeleted`]; the requested node is tagged
//! [`DeletionState::Deleted`] unless it is itself being cascaded.
//!
//! A child that cannot be deleted is logged and skipped. Only the requested
//! node's own outcome is reported, as a plain `bool`: `false` means the node
//! was absent (or its id malformed) or its own write failed.
//!
//! The walk is [`delete_subtree`], generic over a [`CascadeTree`]. The
//! store-backed tree derives children from [`EntityKind::child_kinds`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

use crate::deletion::{DeletionFilter, DeletionState};
use crate::error::CoreError;
use crate::models::{Entity, EntityKind, ParentRef};
use crate::store::{Filter, Page, Store, StoreError};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Tree walk
// ---------------------------------------------------------------------------

/// A node of the deletion tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl Node {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// How to read, list and write the nodes of a deletion tree.
#[async_trait]
pub trait CascadeTree: Send + Sync {
    /// Load a live node. `None` when absent or already deleted.
    async fn load(&self, node: &Node) -> Result<Option<Entity>, StoreError>;

    /// Live children of a node, across every child collection.
    async fn children(&self, node: &Node) -> Result<Vec<Node>, StoreError>;

    /// Write back a node.
    async fn persist(&self, entity: Entity) -> Result<(), StoreError>;
}

/// Soft-delete `node` and everything below it.
///
/// Returns whether `node` itself was marked and persisted. Child outcomes
/// never affect the result.
pub fn delete_subtree<'a, T>(tree: &'a T, node: Node, is_cascade: bool) -> BoxFuture<'a, bool>
where
    T: CascadeTree + ?Sized,
{
    async move {
        let mut entity = match tree.load(&node).await {
            Ok(Some(entity)) => entity,
            Ok(None) => {
                tracing::debug!(kind = ?node.kind, id = %node.id, "Nothing to delete");
                return false;
            }
            Err(e) => {
                tracing::warn!(kind = ?node.kind, id = %node.id, error = %e, "Failed to load node for deletion");
                return false;
            }
        };

        match tree.children(&node).await {
            Ok(children) => {
                for child in children {
                    if !delete_subtree(tree, child.clone(), true).await {
                        tracing::warn!(
                            kind = ?child.kind,
                            id = %child.id,
                            parent = %node.id,
                            "Cascade child was not deleted"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!(kind = ?node.kind, id = %node.id, error = %e, "Failed to list children");
            }
        }

        entity.set_deletion(DeletionState::for_delete(is_cascade));
        match tree.persist(entity).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(kind = ?node.kind, id = %node.id, error = %e, "Failed to persist deletion");
                false
            }
        }
    }
    .boxed()
}

/// [`CascadeTree`] over a [`Store`].
pub struct StoreTree<'a, S: ?Sized>(pub &'a S);

#[async_trait]
impl<'a, S: Store + ?Sized> CascadeTree for StoreTree<'a, S> {
    async fn load(&self, node: &Node) -> Result<Option<Entity>, StoreError> {
        self.0
            .find_one(node.kind, &Filter::by_id(node.id.clone()))
            .await
    }

    async fn children(&self, node: &Node) -> Result<Vec<Node>, StoreError> {
        let Some(parent) = ParentRef::of(node.kind, node.id.clone()) else {
            return Ok(Vec::new());
        };
        let filter = Filter::child_of(parent);
        let mut children = Vec::new();
        for &kind in node.kind.child_kinds() {
            let found = self.0.find(kind, &filter, Page::all()).await?;
            children.extend(found.iter().map(|e| Node::new(kind, e.id().clone())));
        }
        Ok(children)
    }

    async fn persist(&self, entity: Entity) -> Result<(), StoreError> {
        self.0.save(entity).await.map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Cascade victims below a root, keyed by collection name.
pub type CascadeAudit = BTreeMap<&'static str, Vec<EntityId>>;

/// Entry points for deleting each kind of hierarchy node.
pub struct CascadeDeletionEngine<S: ?Sized> {
    store: Arc<S>,
}

impl<S: Store + ?Sized> CascadeDeletionEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn delete(&self, kind: EntityKind, raw_id: &str, is_cascade: bool) -> bool {
        let Some(id) = EntityId::parse(raw_id) else {
            tracing::debug!(kind = ?kind, id = raw_id, "Malformed id, nothing deleted");
            return false;
        };
        let deleted = delete_subtree(
            &StoreTree(self.store.as_ref()),
            Node::new(kind, id.clone()),
            is_cascade,
        )
        .await;
        tracing::info!(kind = ?kind, id = %id, is_cascade, deleted, "Delete finished");
        deleted
    }

    pub async fn delete_task(&self, id: &str, is_cascade: bool) -> bool {
        self.delete(EntityKind::Task, id, is_cascade).await
    }

    /// Delete a sprint-level or, failing that, a project-level activity.
    pub async fn delete_transversal_activity(&self, id: &str, is_cascade: bool) -> bool {
        if self
            .delete(EntityKind::SprintActivity, id, is_cascade)
            .await
        {
            return true;
        }
        self.delete(EntityKind::ProjectActivity, id, is_cascade)
            .await
    }

    /// Delete a sprint with its tasks and activities.
    pub async fn delete_sprint_with_cascade(&self, id: &str, is_cascade: bool) -> bool {
        self.delete(EntityKind::Sprint, id, is_cascade).await
    }

    /// Delete a project with its sprints (and their contents) and activities.
    pub async fn delete_project_with_cascade(&self, id: &str, is_cascade: bool) -> bool {
        self.delete(EntityKind::Project, id, is_cascade).await
    }

    /// Delete a service center and its whole subtree. Centers are roots, so
    /// this is always a direct delete.
    pub async fn delete_service_center_with_cascade(&self, id: &str) -> bool {
        self.delete(EntityKind::ServiceCenter, id, false).await
    }

    /// List cascade victims below a root of type `root_type`
    /// (`service_center`, `project` or `sprint`).
    ///
    /// Walks down one level at a time through cascade-deleted records only,
    /// so the contents of a directly deleted intermediate node stay
    /// attributed to that node. Every descendant collection is present in
    /// the result. An unknown type yields an empty map and a malformed id
    /// yields empty lists.
    pub async fn cascade_deleted_elements(
        &self,
        root_type: &str,
        id: &str,
    ) -> Result<CascadeAudit, CoreError> {
        let Some(root_kind) = EntityKind::from_root_name(root_type) else {
            tracing::debug!(root_type, "Unknown cascade audit root type");
            return Ok(CascadeAudit::new());
        };

        let mut audit: CascadeAudit = descendant_kinds(root_kind)
            .into_iter()
            .map(|kind| (kind.collection(), Vec::new()))
            .collect();

        let Some(root_id) = EntityId::parse(id) else {
            return Ok(audit);
        };

        let mut frontier = vec![Node::new(root_kind, root_id)];
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &parent_kind in EntityKind::ALL {
                let parents: Vec<ParentRef> = frontier
                    .iter()
                    .filter(|n| n.kind == parent_kind)
                    .filter_map(|n| ParentRef::of(n.kind, n.id.clone()))
                    .collect();
                if parents.is_empty() {
                    continue;
                }
                let filter =
                    Filter::child_of_any(parents).with_deletion(DeletionFilter::CascadeDeleted);
                for &kind in parent_kind.child_kinds() {
                    let victims = self.store.find(kind, &filter, Page::all()).await?;
                    let ids = audit.entry(kind.collection()).or_default();
                    for victim in victims {
                        ids.push(victim.id().clone());
                        next.push(Node::new(kind, victim.id().clone()));
                    }
                }
            }
            frontier = next;
        }

        Ok(audit)
    }
}

/// Every collection reachable below `kind`, nearest levels first.
fn descendant_kinds(kind: EntityKind) -> Vec<EntityKind> {
    let mut out = Vec::new();
    let mut level = vec![kind];
    while !level.is_empty() {
        let next: Vec<EntityKind> = level
            .iter()
            .flat_map(|k| k.child_kinds().iter().copied())
            .collect();
        out.extend(next.iter().copied());
        level = next;
    }
    out
}
