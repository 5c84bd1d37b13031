//! In-process [`Store`] backed by ordered maps.
//!
//! Records are returned in insertion order. Two test hooks exist: rejecting
//! writes for chosen ids, and reading back the order of persisted ids.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{Filter, Page, Store, StoreError};
use crate::models::{Entity, EntityKind};
use crate::types::EntityId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<EntityKind, IndexMap<EntityId, Entity>>>,
    rejected: RwLock<HashSet<EntityId>>,
    save_log: RwLock<Vec<EntityId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `save` of `id` fail with [`StoreError::WriteRejected`].
    pub async fn fail_saves_for(&self, id: &EntityId) {
        self.rejected.write().await.insert(id.clone());
    }

    /// Ids of successfully saved records, oldest first.
    pub async fn save_log(&self) -> Vec<EntityId> {
        self.save_log.read().await.clone()
    }

    /// Fetch a record regardless of its deletion state.
    pub async fn get(&self, kind: EntityKind, id: &EntityId) -> Option<Entity> {
        self.collections
            .read()
            .await
            .get(&kind)
            .and_then(|c| c.get(id))
            .cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find(
        &self,
        kind: EntityKind,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<Entity>, StoreError> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(&kind) else {
            return Ok(Vec::new());
        };
        let matching = collection
            .values()
            .filter(|e| filter.matches(e))
            .skip(page.skip as usize);
        Ok(match page.limit {
            Some(limit) => matching.take(limit as usize).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }

    async fn find_one(
        &self,
        kind: EntityKind,
        filter: &Filter,
    ) -> Result<Option<Entity>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .and_then(|c| c.values().find(|e| filter.matches(e)))
            .cloned())
    }

    async fn save(&self, entity: Entity) -> Result<Entity, StoreError> {
        let kind = entity.kind();
        let id = entity.id().clone();
        if self.rejected.read().await.contains(&id) {
            return Err(StoreError::WriteRejected { kind, id });
        }
        self.collections
            .write()
            .await
            .entry(kind)
            .or_default()
            .insert(id.clone(), entity.clone());
        self.save_log.write().await.push(id);
        Ok(entity)
    }

    async fn save_all(&self, entities: Vec<Entity>) -> Result<(), StoreError> {
        for entity in entities {
            self.save(entity).await?;
        }
        Ok(())
    }

    async fn count(&self, kind: EntityKind, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .map(|c| c.values().filter(|e| filter.matches(e)).count() as u64)
            .unwrap_or(0))
    }
}
