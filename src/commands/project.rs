//! Project Commands
//!
//! Frontend bindings for project-related backend commands.

use board_dnd::{EntityId, UserId};
use serde::Serialize;

use super::{call, Backend};
use crate::error::UiResult;
use crate::models::{Project, ProjectBoard};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserArgs {
    user_id: UserId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectArgs {
    project_id: EntityId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetProjectArgs {
    project_id: EntityId,
    user_id: UserId,
}

/// Content fields of a project; `None` keeps the stored value
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch<'a> {
    pub project_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareArgs {
    project_id: EntityId,
    guest_id: UserId,
}

// ========================
// Commands
// ========================

pub async fn create_project(backend: &dyn Backend, user_id: UserId) -> UiResult<Project> {
    call(backend, "create_project", &UserArgs { user_id }).await
}

pub async fn list_projects(backend: &dyn Backend, user_id: UserId) -> UiResult<Vec<Project>> {
    call(backend, "list_projects", &UserArgs { user_id }).await
}

pub async fn list_favourites(backend: &dyn Backend, user_id: UserId) -> UiResult<Vec<Project>> {
    call(backend, "list_favourites", &UserArgs { user_id }).await
}

pub async fn list_shared(backend: &dyn Backend, user_id: UserId) -> UiResult<Vec<Project>> {
    call(backend, "list_shared", &UserArgs { user_id }).await
}

pub async fn get_project(
    backend: &dyn Backend,
    project_id: EntityId,
    user_id: UserId,
) -> UiResult<ProjectBoard> {
    call(backend, "get_project", &GetProjectArgs { project_id, user_id }).await
}

pub async fn update_project(backend: &dyn Backend, patch: &ProjectPatch<'_>) -> UiResult<Project> {
    call(backend, "update_project", patch).await
}

pub async fn share_project(
    backend: &dyn Backend,
    project_id: EntityId,
    guest_id: UserId,
) -> UiResult<Project> {
    call(backend, "share_project", &ShareArgs { project_id, guest_id }).await
}

pub async fn delete_project(backend: &dyn Backend, project_id: EntityId) -> UiResult<()> {
    call(backend, "delete_project", &ProjectArgs { project_id }).await
}
