//! Task Positioning Operations
//!
//! Reordering inside a section, moving between sections of a project and
//! gap closing after deletes.

use async_trait::async_trait;
use board_dnd::{
    append_new, position_writes, reconcile_order, renumber, ContainerId, EntityId, MoveSubmission,
    Position, RenderOrder,
};
use rusqlite::{params, Connection};
use tracing::info;

use super::super::renumber::{commit_batch, ensure_members, order_clause, query_ids};
use crate::domain::{DomainError, DomainResult};

/// Trait for task positioning operations
#[async_trait]
pub trait TaskPositioningOperations {
    /// Ids of the section's tasks in render order
    async fn member_ids(&self, section_id: EntityId) -> DomainResult<Vec<EntityId>>;

    /// Position for a task appended to the section
    async fn next_position(&self, section_id: EntityId) -> DomainResult<Position>;

    /// Renumbers a section from a submitted order, returns the stored order
    async fn apply_order(
        &self,
        section_id: EntityId,
        ordered_ids: &[EntityId],
    ) -> DomainResult<Vec<EntityId>>;

    /// Moves a task between two sections and renumbers both
    ///
    /// Returns the stored (source, destination) orders.
    async fn move_across(
        &self,
        submission: &MoveSubmission,
    ) -> DomainResult<(Vec<EntityId>, Vec<EntityId>)>;

    /// Renumbers a section from its stored order (closes gaps)
    async fn reindex_section(&self, section_id: EntityId) -> DomainResult<()>;
}

fn section_id_of(container: ContainerId) -> DomainResult<EntityId> {
    match container {
        ContainerId::Section(id) => Ok(id),
        other => Err(DomainError::InvalidInput(format!(
            "{} does not hold tasks",
            other
        ))),
    }
}

pub(super) fn section_member_ids(
    conn: &Connection,
    section_id: EntityId,
    order: RenderOrder,
) -> DomainResult<Vec<EntityId>> {
    let sql = format!(
        "SELECT id FROM tasks WHERE section_id = ?1 {}",
        order_clause("position", order)
    );
    query_ids(conn, &sql, &[&section_id])
}

/// Stored `(id, position)` pairs of a section
fn section_positions(
    conn: &Connection,
    section_id: EntityId,
) -> DomainResult<Vec<(EntityId, Position)>> {
    let mut stmt = conn.prepare("SELECT id, position FROM tasks WHERE section_id = ?1")?;
    let pairs = stmt
        .query_map(params![section_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(pairs)
}

fn ensure_section(conn: &Connection, section_id: EntityId) -> DomainResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sections WHERE id = ?1)",
        params![section_id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(DomainError::NotFound(format!("Section {} not found", section_id)))
    }
}

fn project_of(conn: &Connection, section_id: EntityId) -> DomainResult<EntityId> {
    Ok(conn.query_row(
        "SELECT project_id FROM sections WHERE id = ?1",
        params![section_id],
        |row| row.get(0),
    )?)
}

/// Writes `ordered_ids` into `section_id`, touching only rows that change
fn write_section(
    conn: &mut Connection,
    section_id: EntityId,
    ordered_ids: &[EntityId],
    order: RenderOrder,
) -> DomainResult<()> {
    let before = section_positions(conn, section_id)?;
    let writes = position_writes(&before, ordered_ids, order);
    if writes.is_empty() {
        return Ok(());
    }

    let now = chrono::Utc::now().timestamp_millis();
    commit_batch(conn, &[ContainerId::Section(section_id)], |tx| {
        let mut stmt =
            tx.prepare("UPDATE tasks SET position = ?1, updated_at = ?2 WHERE id = ?3")?;
        for write in &writes {
            stmt.execute(params![write.position, now, write.id])?;
        }
        Ok(())
    })
}

pub(super) fn reindex_section(
    conn: &mut Connection,
    container: ContainerId,
    order: RenderOrder,
) -> DomainResult<()> {
    let section_id = section_id_of(container)?;
    let ids = section_member_ids(conn, section_id, order)?;
    write_section(conn, section_id, &ids, order)
}

fn apply_section_order(
    conn: &mut Connection,
    section_id: EntityId,
    submitted: &[EntityId],
    order: RenderOrder,
) -> DomainResult<Vec<EntityId>> {
    ensure_section(conn, section_id)?;
    let stored = section_member_ids(conn, section_id, order)?;
    ensure_members(submitted, &stored, ContainerId::Section(section_id))?;

    let ordered = reconcile_order(submitted, &stored);
    write_section(conn, section_id, &ordered, order)?;
    Ok(ordered)
}

/// Final (source, destination) orders of a cross-section move
///
/// Submitted lists win; stored members the client did not mention keep
/// their stored relative order at the end of their current section.
fn plan_cross_move(
    moved: EntityId,
    submitted_source: &[EntityId],
    submitted_destination: &[EntityId],
    stored_source: &[EntityId],
    stored_destination: &[EntityId],
) -> DomainResult<(Vec<EntityId>, Vec<EntityId>)> {
    let kept_in_destination: Vec<EntityId> = stored_destination
        .iter()
        .filter(|id| !submitted_source.contains(id))
        .copied()
        .collect();
    let destination = reconcile_order(submitted_destination, &kept_in_destination);

    if !destination.contains(&moved) {
        return Err(DomainError::InvalidInput(format!(
            "moved task {} is missing from the destination order",
            moved
        )));
    }

    let source_submitted: Vec<EntityId> = submitted_source
        .iter()
        .filter(|id| !destination.contains(id))
        .copied()
        .collect();
    let source_stored: Vec<EntityId> = stored_source
        .iter()
        .filter(|id| !destination.contains(id))
        .copied()
        .collect();
    let source = reconcile_order(&source_submitted, &source_stored);

    Ok((source, destination))
}

fn move_task_across(
    conn: &mut Connection,
    submission: &MoveSubmission,
    order: RenderOrder,
) -> DomainResult<(Vec<EntityId>, Vec<EntityId>)> {
    let source_id = section_id_of(submission.source_container_id)?;
    let destination_id = section_id_of(submission.destination_container_id)?;
    if source_id == destination_id {
        let ordered =
            apply_section_order(conn, destination_id, &submission.destination_ordered_ids, order)?;
        return Ok((ordered.clone(), ordered));
    }

    ensure_section(conn, source_id)?;
    ensure_section(conn, destination_id)?;
    if project_of(conn, source_id)? != project_of(conn, destination_id)? {
        return Err(DomainError::InvalidInput(format!(
            "sections {} and {} belong to different projects",
            source_id, destination_id
        )));
    }

    let stored_source = section_member_ids(conn, source_id, order)?;
    let stored_destination = section_member_ids(conn, destination_id, order)?;
    let allowed: Vec<EntityId> = stored_source
        .iter()
        .chain(stored_destination.iter())
        .copied()
        .collect();
    let container = submission.destination_container_id;
    ensure_members(&submission.source_ordered_ids, &allowed, container)?;
    ensure_members(&submission.destination_ordered_ids, &allowed, container)?;

    let (source, destination) = plan_cross_move(
        submission.moved_entity_id,
        &submission.source_ordered_ids,
        &submission.destination_ordered_ids,
        &stored_source,
        &stored_destination,
    )?;

    // Membership changes force a full rewrite of both sections.
    let source_writes = renumber(&source, order);
    let destination_writes = renumber(&destination, order);
    let now = chrono::Utc::now().timestamp_millis();

    commit_batch(
        conn,
        &[
            submission.source_container_id,
            submission.destination_container_id,
        ],
        |tx| {
            let mut stmt = tx.prepare(
                "UPDATE tasks SET section_id = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
            )?;
            for write in &source_writes {
                stmt.execute(params![source_id, write.position, now, write.id])?;
            }
            for write in &destination_writes {
                stmt.execute(params![destination_id, write.position, now, write.id])?;
            }
            Ok(())
        },
    )?;

    info!(
        task = submission.moved_entity_id,
        from = source_id,
        to = destination_id,
        "task moved across sections"
    );
    Ok((source, destination))
}

#[async_trait]
impl TaskPositioningOperations for super::task_repo::TaskRepository {
    async fn member_ids(&self, section_id: EntityId) -> DomainResult<Vec<EntityId>> {
        let conn = self.conn.lock().await;
        section_member_ids(&conn, section_id, self.order)
    }

    async fn next_position(&self, section_id: EntityId) -> DomainResult<Position> {
        let conn = self.conn.lock().await;
        Ok(append_new(&section_member_ids(&conn, section_id, self.order)?))
    }

    async fn apply_order(
        &self,
        section_id: EntityId,
        ordered_ids: &[EntityId],
    ) -> DomainResult<Vec<EntityId>> {
        let mut conn = self.conn.lock().await;
        apply_section_order(&mut conn, section_id, ordered_ids, self.order)
    }

    async fn move_across(
        &self,
        submission: &MoveSubmission,
    ) -> DomainResult<(Vec<EntityId>, Vec<EntityId>)> {
        let mut conn = self.conn.lock().await;
        move_task_across(&mut conn, submission, self.order)
    }

    async fn reindex_section(&self, section_id: EntityId) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        reindex_section(&mut conn, ContainerId::Section(section_id), self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_cross_move_basic() {
        // T1 from [T1, T2] to the top of [T3]
        let (source, destination) = plan_cross_move(1, &[2], &[1, 3], &[1, 2], &[3]).unwrap();
        assert_eq!(source, vec![2]);
        assert_eq!(destination, vec![1, 3]);
    }

    #[test]
    fn test_plan_cross_move_keeps_unmentioned_members() {
        // task 4 was added to the destination after the client loaded it
        let (source, destination) =
            plan_cross_move(1, &[2], &[1, 3], &[1, 2], &[4, 3]).unwrap();
        assert_eq!(source, vec![2]);
        assert_eq!(destination, vec![1, 3, 4]);
    }

    #[test]
    fn test_plan_cross_move_requires_moved_task() {
        assert!(matches!(
            plan_cross_move(1, &[2], &[3], &[1, 2], &[3]),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_plan_cross_move_resubmission_is_stable() {
        // Same submission after it was already applied
        let (source, destination) = plan_cross_move(1, &[2], &[1, 3], &[2], &[1, 3]).unwrap();
        assert_eq!(source, vec![2]);
        assert_eq!(destination, vec![1, 3]);
    }
}
