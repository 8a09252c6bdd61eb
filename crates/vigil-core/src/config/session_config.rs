//! Assessment session configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lint the bank when a session is created and refuse invalid content.
    /// Default: true.
    pub validate_on_load: Option<bool>,
    /// Where the JSON snapshot store keeps session state.
    pub snapshot_path: Option<String>,
}

impl SessionConfig {
    pub fn effective_validate_on_load(&self) -> bool {
        self.validate_on_load
            .unwrap_or(defaults::DEFAULT_VALIDATE_ON_LOAD)
    }
}
