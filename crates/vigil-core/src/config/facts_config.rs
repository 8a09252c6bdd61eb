//! Facts store configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    /// Confidence recorded for facts written by answers. Default: 1.0.
    pub answer_confidence: Option<f64>,
    /// Category for facts whose question has no domain. Default: "general".
    pub default_category: Option<String>,
}

impl FactsConfig {
    pub fn effective_answer_confidence(&self) -> f64 {
        self.answer_confidence
            .unwrap_or(defaults::DEFAULT_FACT_CONFIDENCE)
    }

    pub fn effective_default_category(&self) -> &str {
        self.default_category
            .as_deref()
            .unwrap_or(defaults::DEFAULT_FACT_CATEGORY)
    }
}
