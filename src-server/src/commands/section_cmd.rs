//! Section Commands

use board_dnd::EntityId;

use crate::domain::Section;
use crate::repository::Repository;
use crate::AppState;

/// Append an empty section to a project
pub async fn create_section(state: &AppState, project_id: EntityId) -> Result<Section, String> {
    state
        .sections
        .create(&Section::new(0, project_id))
        .await
        .map_err(|e| e.to_string())
}

pub async fn update_section(
    state: &AppState,
    section_id: EntityId,
    title: String,
) -> Result<Section, String> {
    let existing = state
        .sections
        .find_by_id(section_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Section {} not found", section_id))?;

    state
        .sections
        .update(&Section { title, ..existing })
        .await
        .map_err(|e| e.to_string())
}

/// Delete a section and its tasks
pub async fn delete_section(state: &AppState, section_id: EntityId) -> Result<(), String> {
    state
        .sections
        .delete(section_id)
        .await
        .map_err(|e| e.to_string())
}
