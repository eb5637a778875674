//! Project Entity
//!
//! A project sits in three independent position spaces: its owner's project
//! list, its owner's favourites (when `favourite`), and its guest's shared list
//! (when `shared`).

use board_dnd::{ContainerId, EntityId, Position, UserId, View};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::section::SectionWithTasks;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_ICON: &str = "📃";
pub const DEFAULT_DESCRIPTION: &str = "Add a description here
    🟢 It can be a multi-line description
    🟢 Start by replacing this text...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    /// Owner
    pub user_id: UserId,
    /// User the project is shared with
    pub guest_id: Option<UserId>,
    pub icon: String,
    pub title: String,
    pub description: String,
    /// Rank in the owner's project list
    pub position: Position,
    pub favourite: bool,
    pub favourite_position: Position,
    pub shared: bool,
    pub shared_position: Position,
}

impl Project {
    /// Create a project with default content at the given list position
    pub fn new(id: EntityId, user_id: UserId, position: Position) -> Self {
        Self {
            id,
            user_id,
            guest_id: None,
            icon: DEFAULT_ICON.to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            position,
            favourite: false,
            favourite_position: 0,
            shared: false,
            shared_position: 0,
        }
    }

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

    /// Every container the project currently occupies
    pub fn containers(&self) -> Vec<ContainerId> {
        let mut containers = vec![ContainerId::OwnedProjects(self.user_id)];
        for view in [View::Favourites, View::Shared] {
            if let (true, Some(user)) = (self.is_member_of(view), self.view_user(view)) {
                containers.push(view.container(user));
            }
        }
        containers
    }

    pub fn is_visible_to(&self, user: UserId) -> bool {
        self.user_id == user || self.guest_id == Some(user)
    }
}

impl Entity for Project {
    type Id = EntityId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Title to store for a user-supplied title
pub fn normalize_title(title: &str) -> String {
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Description to store for a user-supplied description
pub fn normalize_description(description: &str) -> String {
    if description.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        description.to_string()
    }
}

/// A project with its sections and their tasks, as shown on the board page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBoard {
    pub project: Project,
    pub sections: Vec<SectionWithTasks>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let project = Project::new(1, 7, 3);
        assert_eq!(project.id(), 1);
        assert_eq!(project.title, DEFAULT_TITLE);
        assert_eq!(project.icon, DEFAULT_ICON);
        assert!(!project.favourite);
        assert_eq!(project.containers(), vec![ContainerId::OwnedProjects(7)]);
    }

    #[test]
    fn test_containers_follow_flags() {
        let mut project = Project::new(1, 7, 0);
        project.favourite = true;
        project.shared = true;
        assert_eq!(project.containers().len(), 2, "shared without guest has no container");

        project.guest_id = Some(8);
        assert_eq!(
            project.containers(),
            vec![
                ContainerId::OwnedProjects(7),
                ContainerId::Favourites(7),
                ContainerId::Shared(8),
            ]
        );
        assert!(project.is_visible_to(8));
        assert!(!project.is_visible_to(9));
    }

    #[test]
    fn test_normalize_empty_fields() {
        assert_eq!(normalize_title(""), DEFAULT_TITLE);
        assert_eq!(normalize_title("Plan"), "Plan");
        assert_eq!(normalize_description(""), DEFAULT_DESCRIPTION);
    }
}
