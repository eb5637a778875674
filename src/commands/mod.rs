//! Backend Command Wrappers
//!
//! Typed bindings to backend commands, organized by domain. Every wrapper
//! goes through a [`Backend`], which carries a command name and its
//! camelCase JSON arguments to the server.

mod position;
mod project;
mod section;
mod task;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{UiError, UiResult};

/// Transport to the authoritative store
#[async_trait]
pub trait Backend: Send + Sync {
    async fn invoke(&self, cmd: &str, args: Value) -> Result<Value, String>;
}

async fn call<A, T>(backend: &dyn Backend, cmd: &str, args: &A) -> UiResult<T>
where
    A: Serialize + ?Sized + Sync,
    T: DeserializeOwned,
{
    let args = serde_json::to_value(args)?;
    let result = backend.invoke(cmd, args).await.map_err(UiError::Backend)?;
    Ok(serde_json::from_value(result)?)
}

// Re-export all public items
pub use position::*;
pub use project::*;
pub use section::*;
pub use task::*;
