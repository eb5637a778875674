//! Taskboard Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and SQLite implementations
//! - commands: Command handlers that bridge the client to the repositories

use board_dnd::RenderOrder;
use rolling_logger::{LoggerConfig, LoggerError};
use thiserror::Error;
use tracing::info;

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;

use config::ServerConfig;
use domain::DomainError;
use repository::{init_db, DbState, ProjectRepository, SectionRepository, TaskRepository};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub projects: ProjectRepository,
    pub sections: SectionRepository,
    pub tasks: TaskRepository,
    pub order: RenderOrder,
}

impl AppState {
    /// Open the database named by `config` and build the repositories on it
    pub async fn open(config: &ServerConfig) -> Result<Self, DomainError> {
        let db_state = init_db(&config.db_path).await?;
        let order = config.render_order;

        Ok(Self {
            projects: ProjectRepository::new(db_state.connection(), order),
            sections: SectionRepository::new(db_state.connection()),
            tasks: TaskRepository::new(db_state.connection(), order),
            db_state,
            order,
        })
    }
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Logger(#[from] LoggerError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Install logging, then open the database
pub async fn start(config: &ServerConfig) -> Result<AppState, StartError> {
    let mut logger = LoggerConfig::new("taskboard")
        .with_level(config.log_level.clone())
        .with_max_files(config.max_log_files);
    if let Some(dir) = &config.log_dir {
        logger = logger.with_log_dir(dir.clone());
    }
    let log_file = rolling_logger::init_logger(&logger)?;

    let state = match AppState::open(config).await {
        Ok(state) => {
            let _ = rolling_logger::info("Database ready");
            state
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("Database init failed: {}", e));
            return Err(e.into());
        }
    };
    info!(
        db = %config.db_path.display(),
        log_file = ?log_file,
        order = ?state.order,
        "taskboard started"
    );
    Ok(state)
}
