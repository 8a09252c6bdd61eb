//! Visibility resolution configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Hide already-answered questions from the pending list. Default: true.
    pub hide_answered: Option<bool>,
    /// Run dependency-cycle detection as part of content lint. Default: true.
    pub detect_cycles: Option<bool>,
    /// Fact keys produced outside the bank (detectors). Gates may reference
    /// them without a lint warning.
    pub external_facts: Vec<String>,
}

impl VisibilityConfig {
    pub fn effective_hide_answered(&self) -> bool {
        self.hide_answered.unwrap_or(defaults::DEFAULT_HIDE_ANSWERED)
    }

    pub fn effective_detect_cycles(&self) -> bool {
        self.detect_cycles.unwrap_or(defaults::DEFAULT_DETECT_CYCLES)
    }
}
