//! Ordering errors

use thiserror::Error;

use crate::event::{ContainerId, EntityId};

/// Why a move could not be applied
///
/// None of these are fatal: the caller keeps its current order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The move references a container the router does not know
    #[error("unknown container {0}")]
    UnknownContainer(ContainerId),

    /// An index delivered by the drag interaction does not fit the container
    #[error("index {index} out of range for container of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    /// A drop between position spaces that never exchange members
    #[error("cannot move from {from} to {to}")]
    IncompatibleContainers { from: ContainerId, to: ContainerId },

    /// A membership toggle for a project the user's view cannot hold
    #[error("project {entity} cannot enter or leave {container}")]
    NotInView {
        entity: EntityId,
        container: ContainerId,
    },
}
