//! Commands Layer
//!
//! Command handlers that bridge the client to the repositories. Every
//! handler returns `Result<T, String>`; `dispatch` routes a command name and
//! its camelCase JSON arguments to the matching handler.

mod position_cmd;
mod project_cmd;
mod section_cmd;
mod task_cmd;

pub use position_cmd::*;
pub use project_cmd::*;
pub use section_cmd::*;
pub use task_cmd::*;

use board_dnd::{EntityId, MoveSubmission, ToggleSubmission, UserId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserArgs {
    user_id: UserId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetProjectArgs {
    project_id: EntityId,
    user_id: UserId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectArgs {
    project_id: EntityId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProjectArgs {
    project_id: EntityId,
    title: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareProjectArgs {
    project_id: EntityId,
    guest_id: UserId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionArgs {
    section_id: EntityId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSectionArgs {
    section_id: EntityId,
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskArgs {
    task_id: EntityId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskArgs {
    task_id: EntityId,
    title: Option<String>,
    content: Option<String>,
}

fn parse<T: DeserializeOwned>(cmd: &str, args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments for {}: {}", cmd, e))
}

fn reply<T: Serialize>(result: Result<T, String>) -> Result<Value, String> {
    result.and_then(|value| serde_json::to_value(value).map_err(|e| e.to_string()))
}

/// Run command `cmd` with its JSON arguments, returning the JSON result
pub async fn dispatch(state: &AppState, cmd: &str, args: Value) -> Result<Value, String> {
    debug!(cmd, "dispatch");

    match cmd {
        "create_project" => {
            let a: UserArgs = parse(cmd, args)?;
            reply(create_project(state, a.user_id).await)
        }
        "list_projects" => {
            let a: UserArgs = parse(cmd, args)?;
            reply(list_projects(state, a.user_id).await)
        }
        "list_favourites" => {
            let a: UserArgs = parse(cmd, args)?;
            reply(list_favourites(state, a.user_id).await)
        }
        "list_shared" => {
            let a: UserArgs = parse(cmd, args)?;
            reply(list_shared(state, a.user_id).await)
        }
        "get_project" => {
            let a: GetProjectArgs = parse(cmd, args)?;
            reply(get_project(state, a.project_id, a.user_id).await)
        }
        "update_project" => {
            let a: UpdateProjectArgs = parse(cmd, args)?;
            reply(update_project(state, a.project_id, a.title, a.description, a.icon).await)
        }
        "share_project" => {
            let a: ShareProjectArgs = parse(cmd, args)?;
            reply(share_project(state, a.project_id, a.guest_id).await)
        }
        "delete_project" => {
            let a: ProjectArgs = parse(cmd, args)?;
            reply(delete_project(state, a.project_id).await)
        }
        "toggle_membership" => {
            let toggle: ToggleSubmission = parse(cmd, args)?;
            reply(toggle_membership(state, toggle).await)
        }
        "update_positions" => {
            let submission: MoveSubmission = parse(cmd, args)?;
            reply(update_positions(state, submission).await)
        }
        "create_section" => {
            let a: ProjectArgs = parse(cmd, args)?;
            reply(create_section(state, a.project_id).await)
        }
        "update_section" => {
            let a: UpdateSectionArgs = parse(cmd, args)?;
            reply(update_section(state, a.section_id, a.title).await)
        }
        "delete_section" => {
            let a: SectionArgs = parse(cmd, args)?;
            reply(delete_section(state, a.section_id).await)
        }
        "create_task" => {
            let a: SectionArgs = parse(cmd, args)?;
            reply(create_task(state, a.section_id).await)
        }
        "update_task" => {
            let a: UpdateTaskArgs = parse(cmd, args)?;
            reply(update_task(state, a.task_id, a.title, a.content).await)
        }
        "delete_task" => {
            let a: TaskArgs = parse(cmd, args)?;
            reply(delete_task(state, a.task_id).await)
        }
        _ => {
            warn!(cmd, "unknown command");
            Err(format!("Unknown command: {}", cmd))
        }
    }
}
