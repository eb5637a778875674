//! Taskboard client
//!
//! Keeps the project lists and the open board in memory, applies drags,
//! toggles and edits to them immediately and forwards them to the backend:
//! - commands: typed wrappers over a [`commands::Backend`]
//! - store: the optimistic board store
//! - debounce: per-field delayed writes for text edits

pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod models;
pub mod store;

pub use commands::Backend;
pub use config::ClientConfig;
pub use error::{UiError, UiResult};
pub use store::{BoardState, BoardStore};
