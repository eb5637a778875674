//! Project Positioning Operations
//!
//! A project list container is one of the owner's list, the owner's
//! favourites or a guest's shared list. Each has its own position column.

use async_trait::async_trait;
use board_dnd::{
    append_new, reconcile_order, renumber, ContainerId, EntityId, Position, RenderOrder, UserId,
    View,
};
use rusqlite::{params, Connection};

use super::super::renumber::{commit_batch, ensure_members, order_clause, query_ids};
use super::project_repo::view_column;
use crate::domain::{DomainError, DomainResult};

/// Trait for project positioning operations
#[async_trait]
pub trait ProjectPositioningOperations {
    /// Ids of the container's members in render order
    async fn member_ids(&self, container: ContainerId) -> DomainResult<Vec<EntityId>>;

    /// Position for a project appended to the container
    async fn next_position(&self, container: ContainerId) -> DomainResult<Position>;

    /// Renumbers the container from a submitted order, returns the stored order
    async fn apply_order(
        &self,
        container: ContainerId,
        ordered_ids: &[EntityId],
    ) -> DomainResult<Vec<EntityId>>;

    /// Renumbers the container from its stored order (closes gaps)
    async fn reindex(&self, container: ContainerId) -> DomainResult<()>;
}

/// Position column and membership filter of a project container
fn scope(container: ContainerId) -> DomainResult<(&'static str, &'static str, UserId)> {
    match container {
        ContainerId::OwnedProjects(user) => Ok(("position", "user_id = ?1", user)),
        ContainerId::Favourites(user) => Ok((
            view_column(View::Favourites),
            "user_id = ?1 AND favourite = 1",
            user,
        )),
        ContainerId::Shared(user) => Ok((
            view_column(View::Shared),
            "guest_id = ?1 AND shared = 1",
            user,
        )),
        ContainerId::Section(_) => Err(DomainError::InvalidInput(format!(
            "{} does not hold projects",
            container
        ))),
    }
}

pub(super) fn member_ids(
    conn: &Connection,
    container: ContainerId,
    order: RenderOrder,
) -> DomainResult<Vec<EntityId>> {
    let (column, filter, user) = scope(container)?;
    let sql = format!(
        "SELECT id FROM projects WHERE {} {}",
        filter,
        order_clause(column, order)
    );
    query_ids(conn, &sql, &[&user])
}

/// Writes every member's position from its index in `ordered_ids`
fn renumber_container(
    conn: &mut Connection,
    container: ContainerId,
    ordered_ids: &[EntityId],
    order: RenderOrder,
) -> DomainResult<()> {
    let (column, _, _) = scope(container)?;
    let sql = format!("UPDATE projects SET {} = ?1 WHERE id = ?2", column);
    let writes = renumber(ordered_ids, order);

    commit_batch(conn, &[container], |tx| {
        let mut stmt = tx.prepare(&sql)?;
        for write in &writes {
            stmt.execute(params![write.position, write.id])?;
        }
        Ok(())
    })
}

pub(super) fn reindex_container(
    conn: &mut Connection,
    container: ContainerId,
    order: RenderOrder,
) -> DomainResult<()> {
    let ids = member_ids(conn, container, order)?;
    renumber_container(conn, container, &ids, order)
}

pub(super) fn apply_container_order(
    conn: &mut Connection,
    container: ContainerId,
    submitted: &[EntityId],
    order: RenderOrder,
) -> DomainResult<Vec<EntityId>> {
    let stored = member_ids(conn, container, order)?;
    ensure_members(submitted, &stored, container)?;

    let ordered = reconcile_order(submitted, &stored);
    renumber_container(conn, container, &ordered, order)?;
    Ok(ordered)
}

#[async_trait]
impl ProjectPositioningOperations for super::project_repo::ProjectRepository {
    async fn member_ids(&self, container: ContainerId) -> DomainResult<Vec<EntityId>> {
        let conn = self.conn.lock().await;
        member_ids(&conn, container, self.order)
    }

    async fn next_position(&self, container: ContainerId) -> DomainResult<Position> {
        let conn = self.conn.lock().await;
        Ok(append_new(&member_ids(&conn, container, self.order)?))
    }

    async fn apply_order(
        &self,
        container: ContainerId,
        ordered_ids: &[EntityId],
    ) -> DomainResult<Vec<EntityId>> {
        let mut conn = self.conn.lock().await;
        apply_container_order(&mut conn, container, ordered_ids, self.order)
    }

    async fn reindex(&self, container: ContainerId) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        reindex_container(&mut conn, container, self.order)
    }
}
