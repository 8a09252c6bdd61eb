use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Gate;
use crate::facts::FactValue;

/// Assessment phase. Breaks priority ties: onboarding first, deep-dive last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Onboarding,
    #[default]
    Core,
    DeepDive,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Core => "core",
            Self::DeepDive => "deep-dive",
        }
    }

    /// Sort rank; lower is presented first.
    pub fn rank(self) -> u8 {
        match self {
            Self::Onboarding => 0,
            Self::Core => 1,
            Self::DeepDive => 2,
        }
    }
}

/// One selectable answer. Selecting it writes `facts` and earns `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facts: BTreeMap<String, FactValue>,
    #[serde(default)]
    pub points: i64,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, points: i64) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            facts: BTreeMap::new(),
            points,
        }
    }

    pub fn with_fact(mut self, key: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.facts.insert(key.into(), value.into());
        self
    }
}

/// A question definition. Immutable content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "gates")]
    pub conditions: Gate,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    /// Domain the question was declared under; filled by the bank loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            conditions: Gate::default(),
            priority: 0,
            phase: Phase::default(),
            options: Vec::new(),
            domain: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_conditions(mut self, conditions: Gate) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_option(mut self, option: QuestionOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Fact keys any of this question's options can write.
    pub fn written_fact_keys(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .flat_map(|o| o.facts.keys().map(String::as_str))
    }
}
