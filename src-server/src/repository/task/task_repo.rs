//! Task Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Task CRUD operations.
//! Position management is in task_positioning.

use async_trait::async_trait;
use board_dnd::{append_new, ContainerId, EntityId, RenderOrder};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::super::renumber::order_clause;
use super::super::traits::Repository;
use super::task_positioning::{reindex_section, section_member_ids};
use crate::domain::{DomainError, DomainResult, Task};

const TASK_COLUMNS: &str = "id, section_id, title, content, position";

/// SQLite implementation of Task repository
pub struct TaskRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
    pub(super) order: RenderOrder,
}

impl TaskRepository {
    pub fn new(conn: Arc<Mutex<Connection>>, order: RenderOrder) -> Self {
        Self { conn, order }
    }

    /// Tasks of a section in render order
    pub async fn list_by_section(&self, section_id: EntityId) -> DomainResult<Vec<Task>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM tasks WHERE section_id = ?1 {}",
            TASK_COLUMNS,
            order_clause("position", self.order)
        );
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![section_id], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }
}

pub(super) fn find_task(conn: &Connection, id: EntityId) -> DomainResult<Option<Task>> {
    let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_task).optional()?)
}

fn require_task(conn: &Connection, id: EntityId) -> DomainResult<Task> {
    find_task(conn, id)?.ok_or_else(|| DomainError::NotFound(format!("Task {} not found", id)))
}

#[async_trait]
impl Repository<Task> for TaskRepository {
    async fn create(&self, entity: &Task) -> DomainResult<Task> {
        let conn = self.conn.lock().await;

        let section_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sections WHERE id = ?1)",
            params![entity.section_id],
            |row| row.get(0),
        )?;
        if !section_exists {
            return Err(DomainError::NotFound(format!(
                "Section {} not found",
                entity.section_id
            )));
        }

        let position = append_new(&section_member_ids(&conn, entity.section_id, self.order)?);
        conn.execute(
            "INSERT INTO tasks (section_id, title, content, position, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entity.section_id,
                entity.title,
                entity.content,
                position,
                chrono::Utc::now().timestamp_millis()
            ],
        )?;
        let id = EntityId::try_from(conn.last_insert_rowid())
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        info!(task = id, section = entity.section_id, position, "task created");
        require_task(&conn, id)
    }

    async fn find_by_id(&self, id: EntityId) -> DomainResult<Option<Task>> {
        let conn = self.conn.lock().await;
        find_task(&conn, id)
    }

    async fn update(&self, entity: &Task) -> DomainResult<Task> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE tasks SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                entity.title,
                entity.content,
                chrono::Utc::now().timestamp_millis(),
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Task {} not found", entity.id)));
        }
        require_task(&conn, entity.id)
    }

    async fn delete(&self, id: EntityId) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let task = require_task(&conn, id)?;

        conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        reindex_section(&mut conn, ContainerId::Section(task.section_id), self.order)?;

        info!(task = id, section = task.section_id, "task deleted");
        Ok(())
    }
}

/// Convert a database row to Task
fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        section_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        position: row.get(4)?,
    })
}
