//! Task Commands

use board_dnd::EntityId;

use crate::domain::Task;
use crate::repository::Repository;
use crate::AppState;

/// Create an empty task at the top of a section
pub async fn create_task(state: &AppState, section_id: EntityId) -> Result<Task, String> {
    state
        .tasks
        .create(&Task::new(0, section_id, 0))
        .await
        .map_err(|e| e.to_string())
}

/// Update task content; omitted fields keep their value
pub async fn update_task(
    state: &AppState,
    task_id: EntityId,
    title: Option<String>,
    content: Option<String>,
) -> Result<Task, String> {
    let existing = state
        .tasks
        .find_by_id(task_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Task {} not found", task_id))?;

    let updated = Task {
        title: title.unwrap_or(existing.title.clone()),
        content: content.unwrap_or(existing.content.clone()),
        ..existing
    };
    state
        .tasks
        .update(&updated)
        .await
        .map_err(|e| e.to_string())
}

/// Delete a task and close the gap in its section
pub async fn delete_task(state: &AppState, task_id: EntityId) -> Result<(), String> {
    state
        .tasks
        .delete(task_id)
        .await
        .map_err(|e| e.to_string())
}
