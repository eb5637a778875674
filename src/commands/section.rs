//! Section Commands

use board_dnd::EntityId;
use serde::Serialize;

use super::{call, Backend};
use crate::error::UiResult;
use crate::models::Section;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectArgs {
    project_id: EntityId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionArgs {
    section_id: EntityId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSectionArgs<'a> {
    section_id: EntityId,
    title: &'a str,
}

pub async fn create_section(backend: &dyn Backend, project_id: EntityId) -> UiResult<Section> {
    call(backend, "create_section", &ProjectArgs { project_id }).await
}

pub async fn update_section(
    backend: &dyn Backend,
    section_id: EntityId,
    title: &str,
) -> UiResult<Section> {
    call(backend, "update_section", &UpdateSectionArgs { section_id, title }).await
}

pub async fn delete_section(backend: &dyn Backend, section_id: EntityId) -> UiResult<()> {
    call(backend, "delete_section", &SectionArgs { section_id }).await
}
