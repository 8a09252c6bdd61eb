use serde::{Deserialize, Serialize};

use super::{Gate, Question};

/// A named bundle of questions exposed only once every unlock gate passes.
///
/// Content may declare gates either as `gates: [...]` or as
/// `unlock: { gates: [...] }`; both forms load into [`Suite::gates`].
/// Members are either referenced by ID (`questionIds`) or defined inline
/// (`questions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSuite")]
pub struct Suite {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// AND across the array, independent of each gate's internal clauses.
    #[serde(default)]
    pub gates: Vec<Gate>,
    #[serde(default)]
    pub question_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub priority: i32,
}

impl Suite {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            gates: Vec::new(),
            question_ids: Vec::new(),
            questions: Vec::new(),
            priority: 0,
        }
    }

    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn with_member(mut self, question_id: impl Into<String>) -> Self {
        self.question_ids.push(question_id.into());
        self
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Member question IDs: referenced ones first, then inline definitions
    /// not already referenced.
    pub fn member_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.question_ids.iter().map(String::as_str).collect();
        for question in &self.questions {
            if !ids.contains(&question.id.as_str()) {
                ids.push(&question.id);
            }
        }
        ids
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuite {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    gates: Vec<Gate>,
    #[serde(default)]
    unlock: Option<RawUnlock>,
    #[serde(default)]
    question_ids: Vec<String>,
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    priority: i32,
}

#[derive(Deserialize)]
struct RawUnlock {
    #[serde(default)]
    gates: Vec<Gate>,
}

impl From<RawSuite> for Suite {
    fn from(raw: RawSuite) -> Self {
        let mut gates = raw.gates;
        if let Some(unlock) = raw.unlock {
            gates.extend(unlock.gates);
        }
        Self {
            id: raw.id,
            title: raw.title,
            gates,
            question_ids: raw.question_ids,
            questions: raw.questions,
            priority: raw.priority,
        }
    }
}
