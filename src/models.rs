//! Frontend Models
//!
//! Data structures matching backend entities.

use board_dnd::{ContainerId, EntityId, Position, UserId, View};
use serde::{Deserialize, Serialize};

/// Project data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub user_id: UserId,
    pub guest_id: Option<UserId>,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub position: Position,
    pub favourite: bool,
    pub favourite_position: Position,
    pub shared: bool,
    pub shared_position: Position,
}

impl Project {
    pub fn is_member_of(&self, view: View) -> bool {
        match view {
            View::Favourites => self.favourite,
            View::Shared => self.shared,
        }
    }

    /// User whose list shows this project in `view`
    pub fn view_user(&self, view: View) -> Option<UserId> {
        match view {
            View::Favourites => Some(self.user_id),
            View::Shared => self.guest_id,
        }
    }

    pub(crate) fn set_membership(&mut self, view: View, on: bool) {
        match view {
            View::Favourites => self.favourite = on,
            View::Shared => self.shared = on,
        }
    }
}

/// Section data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Section {
    pub fn container(&self) -> ContainerId {
        ContainerId::Section(self.id)
    }
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub section_id: EntityId,
    pub title: String,
    pub content: String,
    pub position: Position,
}

/// The open project page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBoard {
    pub project: Project,
    pub sections: Vec<Section>,
}

/// Entities that carry a position in one or more containers
pub(crate) trait Positioned {
    fn entity_id(&self) -> EntityId;
    fn position_in(&self, container: ContainerId) -> Position;
    fn set_position_in(&mut self, container: ContainerId, position: Position);
}

impl Positioned for Project {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn position_in(&self, container: ContainerId) -> Position {
        match container {
            ContainerId::Favourites(_) => self.favourite_position,
            ContainerId::Shared(_) => self.shared_position,
            ContainerId::OwnedProjects(_) | ContainerId::Section(_) => self.position,
        }
    }

    fn set_position_in(&mut self, container: ContainerId, position: Position) {
        match container {
            ContainerId::Favourites(_) => self.favourite_position = position,
            ContainerId::Shared(_) => self.shared_position = position,
            ContainerId::OwnedProjects(_) | ContainerId::Section(_) => self.position = position,
        }
    }
}

impl Positioned for Task {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn position_in(&self, _container: ContainerId) -> Position {
        self.position
    }

    fn set_position_in(&mut self, _container: ContainerId, position: Position) {
        self.position = position;
    }
}
