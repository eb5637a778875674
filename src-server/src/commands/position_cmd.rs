//! Position Commands
//!
//! The authoritative side of drag and drop: renumbers whole containers from
//! the orders the client submits, and flips favourite / shared membership.

use board_dnd::{ContainerId, MoveSubmission, OrderError, ToggleSubmission};
use tracing::{debug, error};

use crate::domain::{DomainError, Project};
use crate::repository::{
    ProjectPositioningOperations, ProjectViewOperations, TaskPositioningOperations,
};
use crate::AppState;

/// Apply a move submission to the container(s) it names
pub async fn update_positions(
    state: &AppState,
    submission: MoveSubmission,
) -> Result<(), String> {
    let source = submission.source_container_id;
    let destination = submission.destination_container_id;
    debug!(
        moved = submission.moved_entity_id,
        %source,
        %destination,
        "position update"
    );

    let result = match (source, destination) {
        (ContainerId::Section(from), ContainerId::Section(to)) if from == to => state
            .tasks
            .apply_order(to, &submission.destination_ordered_ids)
            .await
            .map(|_| ()),
        (ContainerId::Section(_), ContainerId::Section(_)) => {
            state.tasks.move_across(&submission).await.map(|_| ())
        }
        _ if source == destination => state
            .projects
            .apply_order(destination, &submission.destination_ordered_ids)
            .await
            .map(|_| ()),
        _ => Err(DomainError::from(OrderError::IncompatibleContainers {
            from: source,
            to: destination,
        })),
    };

    result.map_err(|e| {
        error!(%source, %destination, error = %e, "position update rejected");
        e.to_string()
    })
}

/// Turn favourite / shared membership on or off
pub async fn toggle_membership(
    state: &AppState,
    toggle: ToggleSubmission,
) -> Result<Project, String> {
    state
        .projects
        .set_membership(toggle.entity_id, toggle.view, toggle.turned_on)
        .await
        .map_err(|e| {
            error!(project = toggle.entity_id, view = toggle.view.as_str(), error = %e, "membership toggle failed");
            e.to_string()
        })
}
