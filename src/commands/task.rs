//! Task Commands

use board_dnd::EntityId;
use serde::Serialize;

use super::{call, Backend};
use crate::error::UiResult;
use crate::models::Task;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionArgs {
    section_id: EntityId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskArgs {
    task_id: EntityId,
}

/// Content fields of a task; `None` keeps the stored value
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch<'a> {
    pub task_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

pub async fn create_task(backend: &dyn Backend, section_id: EntityId) -> UiResult<Task> {
    call(backend, "create_task", &SectionArgs { section_id }).await
}

pub async fn update_task(backend: &dyn Backend, patch: &TaskPatch<'_>) -> UiResult<Task> {
    call(backend, "update_task", patch).await
}

pub async fn delete_task(backend: &dyn Backend, task_id: EntityId) -> UiResult<()> {
    call(backend, "delete_task", &TaskArgs { task_id }).await
}
