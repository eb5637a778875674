//! Board Events
//!
//! What the drag-and-drop layer and the favourite/share buttons deliver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of any orderable record (project, section, task)
pub type EntityId = u32;

/// Identifier of a user owning or receiving projects
pub type UserId = u32;

/// A position space: the set of siblings sharing one dense ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum ContainerId {
    /// Tasks of a section, ordered by `position`
    Section(EntityId),
    /// Projects owned by a user, ordered by `position`
    OwnedProjects(UserId),
    /// Favourite projects of their owner, ordered by `favourite_position`
    Favourites(UserId),
    /// Projects shared with a guest, ordered by `shared_position`
    Shared(UserId),
}

impl ContainerId {
    /// The derived view this container belongs to, if any
    pub fn view(&self) -> Option<View> {
        match self {
            ContainerId::Favourites(_) => Some(View::Favourites),
            ContainerId::Shared(_) => Some(View::Shared),
            ContainerId::Section(_) | ContainerId::OwnedProjects(_) => None,
        }
    }

    /// Whether this container holds projects (as opposed to tasks)
    pub fn holds_projects(&self) -> bool {
        !matches!(self, ContainerId::Section(_))
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Section(id) => write!(f, "section:{}", id),
            ContainerId::OwnedProjects(user) => write!(f, "projects:{}", user),
            ContainerId::Favourites(user) => write!(f, "favourites:{}", user),
            ContainerId::Shared(user) => write!(f, "shared:{}", user),
        }
    }
}

/// Boolean-gated project views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Favourites,
    Shared,
}

impl View {
    /// Container of this view for the given user
    pub fn container(self, user: UserId) -> ContainerId {
        match self {
            View::Favourites => ContainerId::Favourites(user),
            View::Shared => ContainerId::Shared(user),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Favourites => "favourites",
            View::Shared => "shared",
        }
    }
}

/// Drop delivered by the drag-and-drop layer, indices are UI list indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropEvent {
    pub source: ContainerId,
    pub source_index: usize,
    pub destination: ContainerId,
    pub destination_index: usize,
}

impl DropEvent {
    pub fn new(
        source: ContainerId,
        source_index: usize,
        destination: ContainerId,
        destination_index: usize,
    ) -> Self {
        Self {
            source,
            source_index,
            destination,
            destination_index,
        }
    }

    /// Drop inside a single container
    pub fn within(container: ContainerId, from: usize, to: usize) -> Self {
        Self::new(container, from, container, to)
    }
}

/// Favourite / share flag flip for one project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipToggle {
    pub entity: EntityId,
    /// User whose view is affected (owner for favourites, guest for shared)
    pub user: UserId,
    pub view: View,
    pub turned_on: bool,
}

/// Anything that can change an ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    Drop(DropEvent),
    Toggle(MembershipToggle),
}

impl From<DropEvent> for BoardEvent {
    fn from(event: DropEvent) -> Self {
        BoardEvent::Drop(event)
    }
}

impl From<MembershipToggle> for BoardEvent {
    fn from(toggle: MembershipToggle) -> Self {
        BoardEvent::Toggle(toggle)
    }
}
