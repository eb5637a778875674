//! Project View Operations
//!
//! Favourite and shared lists are boolean-gated: turning the flag on appends
//! the project at the top of the view, turning it off renumbers the rest.

use async_trait::async_trait;
use board_dnd::{append_new, renumber, ContainerId, EntityId, RenderOrder, UserId, View};
use rusqlite::{params, Connection};
use tracing::info;

use super::super::renumber::commit_batch;
use super::project_positioning::member_ids;
use super::project_repo::{list_container, require_project, view_column};
use crate::domain::{DomainError, DomainResult, Project};

/// Trait for favourite / shared view operations
#[async_trait]
pub trait ProjectViewOperations {
    /// Projects of a project container in render order
    async fn list_container(&self, container: ContainerId) -> DomainResult<Vec<Project>>;

    /// Turns a project's membership in `view` on or off
    async fn set_membership(
        &self,
        project_id: EntityId,
        view: View,
        turned_on: bool,
    ) -> DomainResult<Project>;

    /// Shares a project with `guest`, moving it out of a previous guest's list
    async fn share_with(&self, project_id: EntityId, guest: UserId) -> DomainResult<Project>;
}

fn flag_column(view: View) -> &'static str {
    match view {
        View::Favourites => "favourite",
        View::Shared => "shared",
    }
}

/// Removes `project` from `container` of `view` and renumbers the remaining members
fn leave_view(
    conn: &mut Connection,
    project: &Project,
    view: View,
    container: ContainerId,
    order: RenderOrder,
) -> DomainResult<()> {
    let remaining: Vec<EntityId> = member_ids(conn, container, order)?
        .into_iter()
        .filter(|id| *id != project.id)
        .collect();
    let writes = renumber(&remaining, order);
    let leave_sql = format!(
        "UPDATE projects SET {} = 0, {} = 0 WHERE id = ?1",
        flag_column(view),
        view_column(view)
    );
    let renumber_sql = format!("UPDATE projects SET {} = ?1 WHERE id = ?2", view_column(view));

    commit_batch(conn, &[container], |tx| {
        tx.execute(&leave_sql, params![project.id])?;
        let mut stmt = tx.prepare(&renumber_sql)?;
        for write in &writes {
            stmt.execute(params![write.position, write.id])?;
        }
        Ok(())
    })
}

#[async_trait]
impl ProjectViewOperations for super::project_repo::ProjectRepository {
    async fn list_container(&self, container: ContainerId) -> DomainResult<Vec<Project>> {
        let conn = self.conn.lock().await;
        list_container(&conn, container, self.order)
    }

    async fn set_membership(
        &self,
        project_id: EntityId,
        view: View,
        turned_on: bool,
    ) -> DomainResult<Project> {
        let mut conn = self.conn.lock().await;
        let project = require_project(&conn, project_id)?;

        if project.is_member_of(view) == turned_on {
            return Ok(project);
        }
        let user = project.view_user(view).ok_or_else(|| {
            DomainError::InvalidInput(format!("Project {} has no guest to share with", project_id))
        })?;
        let container = view.container(user);

        if turned_on {
            let position = append_new(&member_ids(&conn, container, self.order)?);
            let sql = format!(
                "UPDATE projects SET {} = 1, {} = ?1 WHERE id = ?2",
                flag_column(view),
                view_column(view)
            );
            commit_batch(&mut conn, &[container], |tx| {
                tx.execute(&sql, params![position, project_id])?;
                Ok(())
            })?;
            info!(project = project_id, view = view.as_str(), position, "joined view");
        } else {
            leave_view(&mut conn, &project, view, container, self.order)?;
            info!(project = project_id, view = view.as_str(), "left view");
        }

        require_project(&conn, project_id)
    }

    async fn share_with(&self, project_id: EntityId, guest: UserId) -> DomainResult<Project> {
        let mut conn = self.conn.lock().await;
        let project = require_project(&conn, project_id)?;

        if project.user_id == guest {
            return Err(DomainError::InvalidInput(
                "A project cannot be shared with its owner".to_string(),
            ));
        }
        if project.shared && project.guest_id == Some(guest) {
            return Ok(project);
        }

        if let (true, Some(previous)) = (project.shared, project.guest_id) {
            leave_view(
                &mut conn,
                &project,
                View::Shared,
                ContainerId::Shared(previous),
                self.order,
            )?;
        }

        let container = ContainerId::Shared(guest);
        let position = append_new(&member_ids(&conn, container, self.order)?);
        commit_batch(&mut conn, &[container], |tx| {
            tx.execute(
                "UPDATE projects SET guest_id = ?1, shared = 1, shared_position = ?2 WHERE id = ?3",
                params![guest, position, project_id],
            )?;
            Ok(())
        })?;
        info!(project = project_id, guest, position, "project shared");

        require_project(&conn, project_id)
    }
}
