//! Section Entity
//!
//! Sections are append-only columns of a project, ordered by creation.

use board_dnd::{ContainerId, EntityId};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::task::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
}

impl Section {
    pub fn new(id: EntityId, project_id: EntityId) -> Self {
        Self {
            id,
            project_id,
            title: String::new(),
        }
    }

    /// Position space of this section's tasks
    pub fn container(&self) -> ContainerId {
        ContainerId::Section(self.id)
    }
}

impl Entity for Section {
    type Id = EntityId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A section with its tasks in render order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionWithTasks {
    #[serde(flatten)]
    pub section: Section,
    pub tasks: Vec<Task>,
}
