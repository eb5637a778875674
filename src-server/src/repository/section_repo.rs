//! Section Repository
//!
//! Sections are append-only: no position column, creation order is the id order.

use async_trait::async_trait;
use board_dnd::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::traits::Repository;
use crate::domain::{DomainError, DomainResult, Section};

/// SQLite implementation of Section repository
pub struct SectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SectionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Sections of a project in creation order
    pub async fn list_by_project(&self, project_id: EntityId) -> DomainResult<Vec<Section>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, project_id, title FROM sections WHERE project_id = ?1 ORDER BY id ASC",
        )?;
        let sections = stmt
            .query_map(params![project_id], row_to_section)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sections)
    }
}

fn find_section(conn: &Connection, id: EntityId) -> DomainResult<Option<Section>> {
    Ok(conn
        .query_row(
            "SELECT id, project_id, title FROM sections WHERE id = ?1",
            params![id],
            row_to_section,
        )
        .optional()?)
}

#[async_trait]
impl Repository<Section> for SectionRepository {
    async fn create(&self, entity: &Section) -> DomainResult<Section> {
        let conn = self.conn.lock().await;

        let project_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)",
            params![entity.project_id],
            |row| row.get(0),
        )?;
        if !project_exists {
            return Err(DomainError::NotFound(format!(
                "Project {} not found",
                entity.project_id
            )));
        }

        conn.execute(
            "INSERT INTO sections (project_id, title, created_at) VALUES (?1, ?2, ?3)",
            params![
                entity.project_id,
                entity.title,
                chrono::Utc::now().timestamp_millis()
            ],
        )?;
        let id = EntityId::try_from(conn.last_insert_rowid())
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        info!(section = id, project = entity.project_id, "section created");
        find_section(&conn, id)?
            .ok_or_else(|| DomainError::Internal(format!("Section {} vanished", id)))
    }

    async fn find_by_id(&self, id: EntityId) -> DomainResult<Option<Section>> {
        let conn = self.conn.lock().await;
        find_section(&conn, id)
    }

    async fn update(&self, entity: &Section) -> DomainResult<Section> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE sections SET title = ?1 WHERE id = ?2",
            params![entity.title, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Section {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: EntityId) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;

        // Manual cascade: the section's tasks go with it
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks WHERE section_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM sections WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!("Section {} not found", id)));
        }
        tx.commit()?;

        info!(section = id, "section deleted");
        Ok(())
    }
}

/// Convert a database row to Section
fn row_to_section(row: &Row<'_>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
    })
}
