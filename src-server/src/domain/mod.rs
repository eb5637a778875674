//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod project;
mod section;
mod task;

pub use entity::{DomainError, DomainResult, Entity};
pub use project::{
    normalize_description, normalize_title, Project, ProjectBoard, DEFAULT_DESCRIPTION,
    DEFAULT_ICON, DEFAULT_TITLE,
};
pub use section::{Section, SectionWithTasks};
pub use task::Task;
