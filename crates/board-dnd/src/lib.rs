//! Board DragDrop Engine
//!
//! Ordering rules shared by the client store and the server:
//! - event: drop events, membership toggles and container identifiers
//! - position: the dense position model and the render comparator
//! - reindex: pure reorder / move / insert / remove functions
//! - router: classification of events into move kinds
//! - submission: wire format of position updates

mod error;
mod event;
mod position;
mod reindex;
mod router;
mod submission;

pub use error::OrderError;
pub use event::{BoardEvent, ContainerId, DropEvent, EntityId, MembershipToggle, UserId, View};
pub use position::{
    assign_positions, size_after_insert, size_after_remove, validate, validate_positions,
    Position, RenderOrder,
};
pub use reindex::{
    append_new, close_gap_on_remove, move_across_containers, position_writes, reconcile_order,
    renumber, reorder_within_container, PositionWrite,
};
pub use router::{ContainerRouter, MoveKind};
pub use submission::{MoveSubmission, ToggleSubmission};
