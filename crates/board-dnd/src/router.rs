//! Container Router
//!
//! Decides which position spaces an event touches.

use std::collections::HashSet;
use tracing::debug;

use crate::error::OrderError;
use crate::event::{BoardEvent, ContainerId, EntityId, View};

/// Classified event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Reorder inside one container
    Reorder {
        container: ContainerId,
        from: usize,
        to: usize,
    },
    /// Task changes section; the destination becomes its parent
    CrossContainer {
        source: ContainerId,
        destination: ContainerId,
        from: usize,
        to: usize,
    },
    /// Favourite / shared flag flip on one project
    MembershipToggle {
        entity: EntityId,
        view: View,
        container: ContainerId,
        turned_on: bool,
    },
}

impl MoveKind {
    /// Containers whose positions change
    pub fn affected(&self) -> Vec<ContainerId> {
        match self {
            MoveKind::Reorder { container, .. } => vec![*container],
            MoveKind::CrossContainer {
                source,
                destination,
                ..
            } => vec![*source, *destination],
            MoveKind::MembershipToggle { container, .. } => vec![*container],
        }
    }

    /// New parent of the moved entity, for moves that change it
    pub fn new_parent(&self) -> Option<ContainerId> {
        match self {
            MoveKind::CrossContainer { destination, .. } => Some(*destination),
            _ => None,
        }
    }
}

/// Knows which containers are currently loaded and classifies events
#[derive(Debug, Clone, Default)]
pub struct ContainerRouter {
    known: HashSet<ContainerId>,
}

impl ContainerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_containers(containers: impl IntoIterator<Item = ContainerId>) -> Self {
        Self {
            known: containers.into_iter().collect(),
        }
    }

    pub fn register(&mut self, container: ContainerId) {
        self.known.insert(container);
    }

    pub fn forget(&mut self, container: ContainerId) {
        self.known.remove(&container);
    }

    /// Forgets every container matching `predicate`
    pub fn forget_where(&mut self, predicate: impl Fn(&ContainerId) -> bool) {
        self.known.retain(|container| !predicate(container));
    }

    pub fn knows(&self, container: ContainerId) -> bool {
        self.known.contains(&container)
    }

    fn resolve(&self, container: ContainerId) -> Result<ContainerId, OrderError> {
        if self.knows(container) {
            Ok(container)
        } else {
            Err(OrderError::UnknownContainer(container))
        }
    }

    /// Classifies an event; every event gets a kind or an error
    pub fn classify(&self, event: &BoardEvent) -> Result<MoveKind, OrderError> {
        let kind = match *event {
            BoardEvent::Drop(drop) => {
                let source = self.resolve(drop.source)?;
                let destination = self.resolve(drop.destination)?;
                if source == destination {
                    MoveKind::Reorder {
                        container: source,
                        from: drop.source_index,
                        to: drop.destination_index,
                    }
                } else if matches!(
                    (source, destination),
                    (ContainerId::Section(_), ContainerId::Section(_))
                ) {
                    MoveKind::CrossContainer {
                        source,
                        destination,
                        from: drop.source_index,
                        to: drop.destination_index,
                    }
                } else {
                    return Err(OrderError::IncompatibleContainers {
                        from: source,
                        to: destination,
                    });
                }
            }
            BoardEvent::Toggle(toggle) => MoveKind::MembershipToggle {
                entity: toggle.entity,
                view: toggle.view,
                container: self.resolve(toggle.view.container(toggle.user))?,
                turned_on: toggle.turned_on,
            },
        };
        debug!(?kind, "classified board event");
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DropEvent, MembershipToggle};

    fn router() -> ContainerRouter {
        ContainerRouter::with_containers([
            ContainerId::Section(1),
            ContainerId::Section(2),
            ContainerId::OwnedProjects(9),
            ContainerId::Favourites(9),
        ])
    }

    #[test]
    fn test_same_container_is_reorder() {
        let event = DropEvent::within(ContainerId::Section(1), 0, 2).into();
        let kind = router().classify(&event).unwrap();
        assert_eq!(
            kind,
            MoveKind::Reorder {
                container: ContainerId::Section(1),
                from: 0,
                to: 2
            }
        );
        assert_eq!(kind.affected(), vec![ContainerId::Section(1)]);
        assert_eq!(kind.new_parent(), None);
    }

    #[test]
    fn test_section_change_is_cross_container() {
        let event = DropEvent::new(ContainerId::Section(1), 0, ContainerId::Section(2), 0).into();
        let kind = router().classify(&event).unwrap();
        assert_eq!(kind.affected().len(), 2);
        assert_eq!(kind.new_parent(), Some(ContainerId::Section(2)));
    }

    #[test]
    fn test_unknown_container_is_rejected() {
        let event = DropEvent::new(ContainerId::Section(1), 0, ContainerId::Section(5), 0).into();
        assert_eq!(
            router().classify(&event),
            Err(OrderError::UnknownContainer(ContainerId::Section(5)))
        );
    }

    #[test]
    fn test_project_list_to_favourites_is_incompatible() {
        let event = DropEvent::new(
            ContainerId::OwnedProjects(9),
            0,
            ContainerId::Favourites(9),
            0,
        )
        .into();
        assert!(matches!(
            router().classify(&event),
            Err(OrderError::IncompatibleContainers { .. })
        ));
    }

    #[test]
    fn test_toggle_targets_view_container() {
        let toggle = MembershipToggle {
            entity: 4,
            user: 9,
            view: View::Favourites,
            turned_on: true,
        };
        let kind = router().classify(&toggle.into()).unwrap();
        assert_eq!(kind.affected(), vec![ContainerId::Favourites(9)]);

        let shared = MembershipToggle {
            view: View::Shared,
            ..toggle
        };
        assert_eq!(
            router().classify(&shared.into()),
            Err(OrderError::UnknownContainer(ContainerId::Shared(9)))
        );
    }

    #[test]
    fn test_forget_sections() {
        let mut router = router();
        router.forget_where(|c| matches!(c, ContainerId::Section(_)));
        assert!(!router.knows(ContainerId::Section(1)));
        assert!(router.knows(ContainerId::OwnedProjects(9)));
    }
}
