//! Position Commands
//!
//! Submissions produced by drag and drop and by membership toggles.

use board_dnd::{MoveSubmission, ToggleSubmission};

use super::{call, Backend};
use crate::error::UiResult;
use crate::models::Project;

pub async fn update_positions(backend: &dyn Backend, submission: &MoveSubmission) -> UiResult<()> {
    call(backend, "update_positions", submission).await
}

pub async fn toggle_membership(
    backend: &dyn Backend,
    toggle: &ToggleSubmission,
) -> UiResult<Project> {
    call(backend, "toggle_membership", toggle).await
}
