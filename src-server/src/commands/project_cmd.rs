//! Project Commands
//!
//! CRUD, views and sharing of projects.

use board_dnd::{ContainerId, EntityId, UserId};
use tracing::warn;

use crate::domain::{Project, ProjectBoard, SectionWithTasks};
use crate::repository::{ProjectViewOperations, Repository};
use crate::AppState;

/// Create a project with default content at the top of the owner's list
pub async fn create_project(state: &AppState, user_id: UserId) -> Result<Project, String> {
    state
        .projects
        .create(&Project::new(0, user_id, 0))
        .await
        .map_err(|e| e.to_string())
}

/// Projects owned by the user, in render order
pub async fn list_projects(state: &AppState, user_id: UserId) -> Result<Vec<Project>, String> {
    list(state, ContainerId::OwnedProjects(user_id)).await
}

/// The user's favourite projects, in render order
pub async fn list_favourites(state: &AppState, user_id: UserId) -> Result<Vec<Project>, String> {
    list(state, ContainerId::Favourites(user_id)).await
}

/// Projects shared with the user, in render order
pub async fn list_shared(state: &AppState, user_id: UserId) -> Result<Vec<Project>, String> {
    list(state, ContainerId::Shared(user_id)).await
}

async fn list(state: &AppState, container: ContainerId) -> Result<Vec<Project>, String> {
    state
        .projects
        .list_container(container)
        .await
        .map_err(|e| e.to_string())
}

/// A project with its sections and tasks, if the user may see it
pub async fn get_project(
    state: &AppState,
    project_id: EntityId,
    user_id: UserId,
) -> Result<ProjectBoard, String> {
    let project = state
        .projects
        .find_by_id(project_id)
        .await
        .map_err(|e| e.to_string())?
        .filter(|p| p.is_visible_to(user_id))
        .ok_or_else(|| {
            warn!(project = project_id, user = user_id, "project not visible");
            format!("Project {} not found", project_id)
        })?;

    let mut sections = Vec::new();
    for section in state
        .sections
        .list_by_project(project_id)
        .await
        .map_err(|e| e.to_string())?
    {
        let tasks = state
            .tasks
            .list_by_section(section.id)
            .await
            .map_err(|e| e.to_string())?;
        sections.push(SectionWithTasks { section, tasks });
    }

    Ok(ProjectBoard { project, sections })
}

/// Update project content; omitted fields keep their value
pub async fn update_project(
    state: &AppState,
    project_id: EntityId,
    title: Option<String>,
    description: Option<String>,
    icon: Option<String>,
) -> Result<Project, String> {
    let existing = state
        .projects
        .find_by_id(project_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Project {} not found", project_id))?;

    let updated = Project {
        title: title.unwrap_or(existing.title.clone()),
        description: description.unwrap_or(existing.description.clone()),
        icon: icon.unwrap_or(existing.icon.clone()),
        ..existing
    };
    state
        .projects
        .update(&updated)
        .await
        .map_err(|e| e.to_string())
}

/// Share a project with another user
pub async fn share_project(
    state: &AppState,
    project_id: EntityId,
    guest_id: UserId,
) -> Result<Project, String> {
    state
        .projects
        .share_with(project_id, guest_id)
        .await
        .map_err(|e| e.to_string())
}

/// Delete a project with its sections and tasks
pub async fn delete_project(state: &AppState, project_id: EntityId) -> Result<(), String> {
    state
        .projects
        .delete(project_id)
        .await
        .map_err(|e| e.to_string())
}
