//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod project;
mod renumber;
mod section_repo;
mod task;
mod traits;

#[cfg(test)]
mod tests;

pub use db::{init_db, DbState};
pub use project::{ProjectPositioningOperations, ProjectRepository, ProjectViewOperations};
pub use section_repo::SectionRepository;
pub use task::{TaskPositioningOperations, TaskRepository};
pub use traits::Repository;
