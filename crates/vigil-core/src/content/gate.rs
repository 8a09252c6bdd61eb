use serde::{Deserialize, Serialize};

use super::Comparator;
use crate::facts::FactValue;

/// A single leaf predicate over one answer or fact key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateCondition {
    /// Question ID or fact key the condition reads.
    pub question_id: String,
    pub when: Comparator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FactValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<FactValue>>,
}

impl GateCondition {
    pub fn new(question_id: impl Into<String>, when: Comparator) -> Self {
        Self {
            question_id: question_id.into(),
            when,
            value: None,
            values: None,
        }
    }

    pub fn equals(question_id: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(question_id, Comparator::Equals).with_value(value)
    }

    pub fn one_of<V: Into<FactValue>>(
        question_id: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(question_id, Comparator::In).with_values(values)
    }

    pub fn exists(question_id: impl Into<String>) -> Self {
        Self::new(question_id, Comparator::Exists)
    }

    pub fn with_value(mut self, value: impl Into<FactValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_values<V: Into<FactValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Declarative condition tree controlling whether a question or suite is
/// exposed.
///
/// Passes when every `all` condition holds, at least one `any` condition
/// holds, and no `none` condition holds. Each clause is vacuously true when
/// absent or empty, including `any`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<GateCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<GateCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub none: Option<Vec<GateCondition>>,
}

impl Gate {
    /// A gate with no clauses; passes for every context.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn with_all(mut self, conditions: Vec<GateCondition>) -> Self {
        self.all = Some(conditions);
        self
    }

    pub fn with_any(mut self, conditions: Vec<GateCondition>) -> Self {
        self.any = Some(conditions);
        self
    }

    pub fn with_none(mut self, conditions: Vec<GateCondition>) -> Self {
        self.none = Some(conditions);
        self
    }

    /// True when no clause carries a condition.
    pub fn is_unconditional(&self) -> bool {
        self.conditions().next().is_none()
    }

    /// Every condition across `all`, `any` and `none`, in that order.
    pub fn conditions(&self) -> impl Iterator<Item = &GateCondition> {
        [&self.all, &self.any, &self.none]
            .into_iter()
            .flat_map(|clause| clause.iter().flatten())
    }

    /// Keys read by this gate, deduplicated, in first-reference order.
    pub fn referenced_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for condition in self.conditions() {
            if !keys.contains(&condition.question_id.as_str()) {
                keys.push(&condition.question_id);
            }
        }
        keys
    }
}
