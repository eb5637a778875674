//! Project Repository Module
//!
//! This module provides project repository functionality split into specialized sub-modules:
//! - project_repo: Core CRUD operations
//! - project_positioning: Position management of project containers
//! - project_views: Favourite / shared membership

mod project_positioning;
mod project_repo;
mod project_views;

pub use project_repo::ProjectRepository;

// Re-export all operation traits so they can be used by importing ProjectRepository
pub use project_positioning::ProjectPositioningOperations;
pub use project_views::ProjectViewOperations;
