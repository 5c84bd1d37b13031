//! [`Store`] implementation over JSONB document tables.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use sprintboard_core::deletion::{DeletionFilter, DeletionState};
use sprintboard_core::models::{Entity, EntityKind};
use sprintboard_core::store::{Filter, Page, Store, StoreError};
use sprintboard_core::types::Timestamp;

use crate::DbPool;

/// Columns read back for every document query.
const COLUMNS: &str = "doc, is_deleted, is_cascade_deleted";

/// Parent link columns present on each table.
fn parent_columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::ServiceCenter => &[],
        EntityKind::Project => &["service_center_id"],
        EntityKind::ProjectActivity | EntityKind::Sprint => &["project_id"],
        EntityKind::SprintActivity => &["sprint_id"],
        EntityKind::Task => &["sprint_id", "project_id"],
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    doc: serde_json::Value,
    is_deleted: bool,
    is_cascade_deleted: bool,
}

impl DocumentRow {
    fn into_entity(self, kind: EntityKind) -> Result<Entity, StoreError> {
        let mut entity = Entity::from_document(kind, self.doc)?;
        entity.set_deletion(DeletionState::from_flags(
            self.is_deleted,
            self.is_cascade_deleted,
        ));
        Ok(entity)
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// Append the `WHERE` clause for `filter` on the `kind` table.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, kind: EntityKind, filter: &Filter) {
    qb.push(" WHERE TRUE");

    if let Some(id) = &filter.id {
        qb.push(" AND id = ").push_bind(id.as_str().to_owned());
    }

    if let Some(parents) = &filter.parents {
        qb.push(" AND (");
        if parents.is_empty() {
            qb.push("FALSE");
        }
        let columns = parent_columns(kind);
        for (i, parent) in parents.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            if columns.contains(&parent.column()) {
                qb.push(parent.column())
                    .push(" = ")
                    .push_bind(parent.id().as_str().to_owned());
            } else {
                qb.push("FALSE");
            }
        }
        qb.push(")");
    }

    if let Some(status) = &filter.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }

    match filter.deletion {
        DeletionFilter::Active => {
            qb.push(" AND NOT is_deleted");
        }
        DeletionFilter::Deleted => {
            qb.push(" AND is_deleted");
        }
        DeletionFilter::CascadeDeleted => {
            qb.push(" AND is_cascade_deleted");
        }
        DeletionFilter::Any => {}
    }
}

/// `INSERT ... ON CONFLICT (id) DO UPDATE` for the `kind` table.
///
/// Bind order: `id`, parent columns, `status`, `is_deleted`,
/// `is_cascade_deleted`, `created_at`, `doc`.
fn upsert_sql(kind: EntityKind) -> String {
    let mut columns = vec!["id"];
    columns.extend_from_slice(parent_columns(kind));
    columns.extend_from_slice(&[
        "status",
        "is_deleted",
        "is_cascade_deleted",
        "created_at",
        "doc",
    ]);
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    let updates: Vec<String> = columns[1..]
        .iter()
        .filter(|c| **c != "created_at")
        .map(|c| format!("{c} = EXCLUDED.{c}"))
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT (id) DO UPDATE SET {}",
        kind.collection(),
        columns.join(", "),
        placeholders.join(", "),
        updates.join(", ")
    )
}

/// Document store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn upsert<'e, E>(executor: E, entity: &Entity) -> Result<(), StoreError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let kind = entity.kind();
        let sql = upsert_sql(kind);
        let parents = entity.parents();
        let deletion = entity.deletion();
        let created_at: Timestamp = entity.created_at();
        let doc = entity.to_document()?;

        let mut query = sqlx::query(&sql).bind(entity.id().as_str());
        for column in parent_columns(kind) {
            let value = parents
                .iter()
                .find(|p| p.column() == *column)
                .map(|p| p.id().as_str().to_owned());
            query = query.bind(value);
        }
        query
            .bind(entity.status_code())
            .bind(deletion.is_deleted())
            .bind(deletion.is_cascade_deleted())
            .bind(created_at)
            .bind(doc)
            .execute(executor)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find(
        &self,
        kind: EntityKind,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<Entity>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM {}",
            kind.collection()
        ));
        push_filter(&mut qb, kind, filter);
        qb.push(" ORDER BY created_at, id");
        if let Some(limit) = page.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }
        if page.skip > 0 {
            qb.push(" OFFSET ").push_bind(page.skip as i64);
        }

        let rows: Vec<DocumentRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.into_iter().map(|r| r.into_entity(kind)).collect()
    }

    async fn find_one(
        &self,
        kind: EntityKind,
        filter: &Filter,
    ) -> Result<Option<Entity>, StoreError> {
        Ok(self
            .find(kind, filter, Page::new(0, 1))
            .await?
            .into_iter()
            .next())
    }

    async fn save(&self, entity: Entity) -> Result<Entity, StoreError> {
        Self::upsert(&self.pool, &entity).await?;
        tracing::debug!(kind = ?entity.kind(), id = %entity.id(), "Document saved");
        Ok(entity)
    }

    async fn save_all(&self, entities: Vec<Entity>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        for entity in &entities {
            Self::upsert(&mut *tx, entity).await?;
        }
        tx.commit().await.map_err(backend)?;
        tracing::debug!(count = entities.len(), "Documents saved");
        Ok(())
    }

    async fn count(&self, kind: EntityKind, filter: &Filter) -> Result<u64, StoreError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", kind.collection()));
        push_filter(&mut qb, kind, filter);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use sprintboard_core::models::ParentRef;
    use sprintboard_core::types::EntityId;

    use super::*;

    fn rendered(kind: EntityKind, filter: &Filter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM {}", kind.collection()));
        push_filter(&mut qb, kind, filter);
        qb.sql().to_string()
    }

    #[test]
    fn default_filter_hides_deleted_rows() {
        assert_eq!(
            rendered(EntityKind::Project, &Filter::active()),
            "SELECT doc, is_deleted, is_cascade_deleted FROM projects WHERE TRUE AND NOT is_deleted"
        );
    }

    #[test]
    fn audit_filter_renders_parent_disjunction() {
        let filter = Filter::child_of_any(vec![
            ParentRef::Sprint(EntityId::generate()),
            ParentRef::Project(EntityId::generate()),
        ])
        .with_deletion(DeletionFilter::CascadeDeleted);
        assert_eq!(
            rendered(EntityKind::Task, &filter),
            "SELECT doc, is_deleted, is_cascade_deleted FROM tasks WHERE TRUE \
             AND (sprint_id = $1 OR project_id = $2) AND is_cascade_deleted"
        );
    }

    #[test]
    fn parents_without_a_column_never_match() {
        let filter = Filter::child_of(ParentRef::ServiceCenter(EntityId::generate()))
            .with_deletion(DeletionFilter::Any);
        assert_eq!(
            rendered(EntityKind::Sprint, &filter),
            "SELECT doc, is_deleted, is_cascade_deleted FROM sprints WHERE TRUE AND (FALSE)"
        );
        assert!(rendered(EntityKind::Sprint, &Filter::child_of_any(Vec::new())).contains("(FALSE)"));
    }

    #[test]
    fn id_and_status_are_bound() {
        let filter = Filter::by_id(EntityId::generate()).with_status("DONE");
        assert_eq!(
            rendered(EntityKind::Task, &filter),
            "SELECT doc, is_deleted, is_cascade_deleted FROM tasks WHERE TRUE \
             AND id = $1 AND status = $2 AND NOT is_deleted"
        );
    }

    #[test]
    fn upsert_keeps_created_at() {
        assert_eq!(
            upsert_sql(EntityKind::Task),
            "INSERT INTO tasks (id, sprint_id, project_id, status, is_deleted, \
             is_cascade_deleted, created_at, doc) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET sprint_id = EXCLUDED.sprint_id, \
             project_id = EXCLUDED.project_id, status = EXCLUDED.status, \
             is_deleted = EXCLUDED.is_deleted, is_cascade_deleted = EXCLUDED.is_cascade_deleted, \
             doc = EXCLUDED.doc"
        );
        assert!(upsert_sql(EntityKind::ServiceCenter).starts_with(
            "INSERT INTO service_centers (id, status, is_deleted, is_cascade_deleted, created_at, doc)"
        ));
    }
}
