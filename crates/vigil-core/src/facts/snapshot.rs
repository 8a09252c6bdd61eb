use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Answer, Fact};

/// Persisted shape of a facts/answers store: question ID → Answer and
/// fact key → Fact. The storage collaborator treats it as an opaque blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
    #[serde(default)]
    pub facts: BTreeMap<String, Fact>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.facts.is_empty()
    }
}
