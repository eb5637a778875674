//! Position update payloads sent from the client to the server

use serde::{Deserialize, Serialize};

use crate::event::{ContainerId, EntityId, View};

/// Structural move: the full post-move order of each affected container
///
/// For a move inside one container both ids are equal and only
/// `destination_ordered_ids` is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSubmission {
    pub moved_entity_id: EntityId,
    pub source_container_id: ContainerId,
    pub destination_container_id: ContainerId,
    #[serde(default)]
    pub source_ordered_ids: Vec<EntityId>,
    pub destination_ordered_ids: Vec<EntityId>,
}

impl MoveSubmission {
    /// Submission for a reorder inside one container
    pub fn within(moved: EntityId, container: ContainerId, ordered_ids: Vec<EntityId>) -> Self {
        Self {
            moved_entity_id: moved,
            source_container_id: container,
            destination_container_id: container,
            source_ordered_ids: ordered_ids.clone(),
            destination_ordered_ids: ordered_ids,
        }
    }

    pub fn is_cross_container(&self) -> bool {
        self.source_container_id != self.destination_container_id
    }
}

/// Membership flip of a project in a derived view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSubmission {
    pub entity_id: EntityId,
    pub view: View,
    pub turned_on: bool,
}
