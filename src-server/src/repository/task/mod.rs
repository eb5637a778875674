//! Task Repository Module
//!
//! - task_repo: Core CRUD operations
//! - task_positioning: Ordering inside and across sections

mod task_positioning;
mod task_repo;

pub use task_positioning::TaskPositioningOperations;
pub use task_repo::TaskRepository;
