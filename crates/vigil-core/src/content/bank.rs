//! QuestionBank: the full static content a resolver runs against.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Question, Suite};
use crate::errors::ContentError;

/// All questions and suites, with declaration order preserved.
///
/// Inline suite questions are hoisted into the question list after the base
/// questions (in suite order) and added to their suite's `question_ids`, so
/// every question has one declaration index and every suite lists all its
/// members by ID.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    suites: Vec<Suite>,
    /// First declaration index per question ID.
    positions: HashMap<String, usize>,
    /// IDs reachable only through a suite.
    suite_members: BTreeSet<String>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>, suites: Vec<Suite>) -> Self {
        let mut questions = questions;
        let mut suites = suites;

        for suite in &mut suites {
            for question in std::mem::take(&mut suite.questions) {
                if !suite.question_ids.contains(&question.id) {
                    suite.question_ids.push(question.id.clone());
                }
                questions.push(question);
            }
        }

        let mut positions = HashMap::with_capacity(questions.len());
        for (idx, question) in questions.iter().enumerate() {
            positions.entry(question.id.clone()).or_insert(idx);
        }

        let suite_members = suites
            .iter()
            .flat_map(|s| s.question_ids.iter().cloned())
            .collect();

        Self {
            questions,
            suites,
            positions,
            suite_members,
        }
    }

    /// Parse a bank document (see [`BankDocument`]).
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Self::from_json_named(json, "<string>")
    }

    /// Load a bank document from a file.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_named(&content, &path.display().to_string())
    }

    fn from_json_named(json: &str, source_name: &str) -> Result<Self, ContentError> {
        let document: BankDocument =
            serde_json::from_str(json).map_err(|e| ContentError::Parse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        Ok(document.into_bank())
    }

    /// Every question in declaration order, including suite members.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.positions.get(id).map(|&idx| &self.questions[idx])
    }

    pub fn suite(&self, id: &str) -> Option<&Suite> {
        self.suites.iter().find(|s| s.id == id)
    }

    /// Declaration index of a question, used as the final ordering tiebreak.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Whether a question is only reachable through a suite.
    pub fn is_suite_member(&self, id: &str) -> bool {
        self.suite_members.contains(id)
    }

    /// Questions not claimed by any suite, in declaration order.
    pub fn base_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(|q| !self.suite_members.contains(&q.id))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// On-disk shape of a question bank: domains → levels → questions, plus a
/// suites array. A flat top-level `questions` array is also accepted and is
/// declared before any domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankDocument {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub suites: Vec<Suite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub levels: Vec<Level>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl BankDocument {
    pub fn into_bank(self) -> QuestionBank {
        let mut questions = self.questions;
        for domain in self.domains {
            for level in domain.levels {
                for mut question in level.questions {
                    if question.domain.is_none() {
                        question.domain = Some(domain.id.clone());
                    }
                    questions.push(question);
                }
            }
        }
        QuestionBank::new(questions, self.suites)
    }
}
