//! Task Entity

use board_dnd::{EntityId, Position};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A card inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    /// Parent section (the task's container)
    pub section_id: EntityId,
    pub title: String,
    /// Rich-text body, stored opaquely
    pub content: String,
    pub position: Position,
}

impl Task {
    pub fn new(id: EntityId, section_id: EntityId, position: Position) -> Self {
        Self {
            id,
            section_id,
            title: String::new(),
            content: String::new(),
            position,
        }
    }
}

impl Entity for Task {
    type Id = EntityId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new(4, 2, 0);
        assert_eq!(task.id(), 4);
        assert_eq!(task.section_id, 2);
        assert!(task.title.is_empty());
    }
}
