//! Client Errors

use board_dnd::OrderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    /// The backend answered a command with an error
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Malformed backend reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("No project board is open")]
    NoBoard,

    #[error("Invalid client config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type UiResult<T> = Result<T, UiError>;
