//! Client Configuration

use board_dnd::RenderOrder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::UiResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Quiet window before a text edit is written
    pub debounce_ms: u64,
    pub render_order: RenderOrder,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            render_order: RenderOrder::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
