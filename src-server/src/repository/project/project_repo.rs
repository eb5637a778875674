//! Project Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Project CRUD operations.
//! Specialized operations are in separate modules:
//! - project_positioning: dense positions of every project container
//! - project_views: favourite / shared membership

use async_trait::async_trait;
use board_dnd::{append_new, ContainerId, EntityId, RenderOrder, View};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::super::traits::Repository;
use super::project_positioning::{member_ids, reindex_container};
use crate::domain::{
    normalize_description, normalize_title, DomainError, DomainResult, Project,
};

pub(super) const PROJECT_COLUMNS: &str = "id, user_id, guest_id, icon, title, description, \
     position, favourite, favourite_position, shared, shared_position";

/// SQLite implementation of Project repository
pub struct ProjectRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
    pub(super) order: RenderOrder,
}

impl ProjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>, order: RenderOrder) -> Self {
        Self { conn, order }
    }

    pub fn render_order(&self) -> RenderOrder {
        self.order
    }
}

pub(super) fn find_project(conn: &Connection, id: EntityId) -> DomainResult<Option<Project>> {
    let sql = format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_project).optional()?)
}

pub(super) fn require_project(conn: &Connection, id: EntityId) -> DomainResult<Project> {
    find_project(conn, id)?.ok_or_else(|| DomainError::NotFound(format!("Project {} not found", id)))
}

#[async_trait]
impl Repository<Project> for ProjectRepository {
    async fn create(&self, entity: &Project) -> DomainResult<Project> {
        let conn = self.conn.lock().await;

        let owned = ContainerId::OwnedProjects(entity.user_id);
        let position = append_new(&member_ids(&conn, owned, self.order)?);

        conn.execute(
            "INSERT INTO projects (user_id, guest_id, icon, title, description, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entity.user_id,
                entity.guest_id,
                entity.icon,
                normalize_title(&entity.title),
                normalize_description(&entity.description),
                position,
            ],
        )?;
        let id = EntityId::try_from(conn.last_insert_rowid())
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        info!(project = id, user = entity.user_id, position, "project created");
        require_project(&conn, id)
    }

    async fn find_by_id(&self, id: EntityId) -> DomainResult<Option<Project>> {
        let conn = self.conn.lock().await;
        find_project(&conn, id)
    }

    async fn update(&self, entity: &Project) -> DomainResult<Project> {
        let conn = self.conn.lock().await;

        let changed = conn.execute(
            "UPDATE projects SET icon = ?1, title = ?2, description = ?3 WHERE id = ?4",
            params![
                entity.icon,
                normalize_title(&entity.title),
                normalize_description(&entity.description),
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Project {} not found", entity.id)));
        }

        require_project(&conn, entity.id)
    }

    async fn delete(&self, id: EntityId) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let project = require_project(&conn, id)?;

        // Manual cascade: tasks, then sections, then the project
        {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM tasks WHERE section_id IN (SELECT id FROM sections WHERE project_id = ?1)",
                params![id],
            )?;
            tx.execute("DELETE FROM sections WHERE project_id = ?1", params![id])?;
            tx.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
            tx.commit()?;
        }

        // Close the gaps in every list the project appeared in
        for container in project.containers() {
            reindex_container(&mut conn, container, self.order)?;
        }

        info!(project = id, "project deleted");
        Ok(())
    }
}

/// Projects of a container in render order
pub(super) fn list_container(
    conn: &Connection,
    container: ContainerId,
    order: RenderOrder,
) -> DomainResult<Vec<Project>> {
    let ids = member_ids(conn, container, order)?;
    ids.into_iter()
        .map(|id| require_project(conn, id))
        .collect()
}

/// Convert a database row to Project
pub(super) fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        user_id: row.get(1)?,
        guest_id: row.get(2)?,
        icon: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        position: row.get(6)?,
        favourite: row.get(7)?,
        favourite_position: row.get(8)?,
        shared: row.get(9)?,
        shared_position: row.get(10)?,
    })
}

/// Column holding a view's positions
pub(super) fn view_column(view: View) -> &'static str {
    match view {
        View::Favourites => "favourite_position",
        View::Shared => "shared_position",
    }
}
