//! Content lint: integrity checks run on a question bank before it is used.
//!
//! Errors make a bank unusable (ambiguous IDs, dangling suite members,
//! dependency cycles). Warnings flag content that evaluates but probably
//! does not do what its author meant.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use vigil_core::config::VisibilityConfig;
use vigil_core::errors::ContentError;
use vigil_core::{Gate, QuestionBank};

use crate::graph::DependencyGraph;
use crate::resolver::GateOwner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LintIssue {
    DuplicateQuestionId { question_id: String, count: usize },
    DuplicateSuiteId { suite_id: String, count: usize },
    DuplicateOptionId { question_id: String, option_id: String },
    UnknownSuiteMember { suite_id: String, question_id: String },
    DependencyCycle { nodes: Vec<String> },
    UnknownComparator { owner: GateOwner, question_id: String, comparator: String },
    UnknownReference { owner: GateOwner, key: String },
    SharedSuiteMember { question_id: String, suite_ids: Vec<String> },
}

impl LintIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateQuestionId { .. }
            | Self::DuplicateSuiteId { .. }
            | Self::DuplicateOptionId { .. }
            | Self::UnknownSuiteMember { .. }
            | Self::DependencyCycle { .. } => Severity::Error,
            Self::UnknownComparator { .. }
            | Self::UnknownReference { .. }
            | Self::SharedSuiteMember { .. } => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateQuestionId { question_id, count } => {
                write!(f, "question ID {question_id} declared {count} times")
            }
            Self::DuplicateSuiteId { suite_id, count } => {
                write!(f, "suite ID {suite_id} declared {count} times")
            }
            Self::DuplicateOptionId { question_id, option_id } => {
                write!(f, "question {question_id} has option {option_id} more than once")
            }
            Self::UnknownSuiteMember { suite_id, question_id } => {
                write!(f, "suite {suite_id} lists unknown question {question_id}")
            }
            Self::DependencyCycle { nodes } => {
                write!(f, "dependency cycle among {{{}}}", nodes.join(", "))
            }
            Self::UnknownComparator { owner, question_id, comparator } => {
                write!(f, "{owner}: unknown comparator {comparator:?} on {question_id}")
            }
            Self::UnknownReference { owner, key } => {
                write!(f, "{owner}: references {key}, which nothing defines")
            }
            Self::SharedSuiteMember { question_id, suite_ids } => {
                write!(f, "question {question_id} belongs to suites {}", suite_ids.join(", "))
            }
        }
    }
}

/// All findings for one bank, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn errors(&self) -> impl Iterator<Item = &LintIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LintIssue> {
        self.issues.iter().filter(|i| !i.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// `Err(LintFailed)` when any error was found; warnings alone pass and
    /// stay available on the returned report.
    pub fn into_result(self) -> Result<Self, ContentError> {
        let errors: Vec<String> = self.errors().map(ToString::to_string).collect();
        if errors.is_empty() {
            return Ok(self);
        }
        Err(ContentError::LintFailed {
            error_count: errors.len(),
            summary: errors.join("; "),
        })
    }
}

/// Run every content check against a bank.
pub fn lint_bank(bank: &QuestionBank, config: &VisibilityConfig) -> LintReport {
    let mut issues = Vec::new();

    check_duplicate_ids(bank, &mut issues);
    check_suite_members(bank, &mut issues);
    if config.effective_detect_cycles() {
        for nodes in DependencyGraph::build(bank).find_cycles() {
            issues.push(LintIssue::DependencyCycle { nodes });
        }
    }
    check_gates(bank, config, &mut issues);

    let report = LintReport { issues };
    for issue in report.errors() {
        tracing::warn!(issue = %issue, "content lint error");
    }
    tracing::info!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "content lint finished"
    );
    report
}

fn count_by<'a>(ids: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

fn check_duplicate_ids(bank: &QuestionBank, issues: &mut Vec<LintIssue>) {
    for (id, count) in count_by(bank.questions().iter().map(|q| q.id.as_str())) {
        if count > 1 {
            issues.push(LintIssue::DuplicateQuestionId {
                question_id: id.to_string(),
                count,
            });
        }
    }
    for (id, count) in count_by(bank.suites().iter().map(|s| s.id.as_str())) {
        if count > 1 {
            issues.push(LintIssue::DuplicateSuiteId {
                suite_id: id.to_string(),
                count,
            });
        }
    }
    for question in bank.questions() {
        for (option_id, count) in count_by(question.options.iter().map(|o| o.id.as_str())) {
            if count > 1 {
                issues.push(LintIssue::DuplicateOptionId {
                    question_id: question.id.clone(),
                    option_id: option_id.to_string(),
                });
            }
        }
    }
}

fn check_suite_members(bank: &QuestionBank, issues: &mut Vec<LintIssue>) {
    let mut owners: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for suite in bank.suites() {
        for member in &suite.question_ids {
            if bank.question(member).is_none() {
                issues.push(LintIssue::UnknownSuiteMember {
                    suite_id: suite.id.clone(),
                    question_id: member.clone(),
                });
            }
            owners
                .entry(member.as_str())
                .or_default()
                .insert(suite.id.as_str());
        }
    }
    for (question_id, suite_ids) in owners {
        if suite_ids.len() > 1 {
            issues.push(LintIssue::SharedSuiteMember {
                question_id: question_id.to_string(),
                suite_ids: suite_ids.into_iter().map(str::to_string).collect(),
            });
        }
    }
}

fn check_gates(bank: &QuestionBank, config: &VisibilityConfig, issues: &mut Vec<LintIssue>) {
    let mut defined: BTreeSet<&str> = bank.questions().iter().map(|q| q.id.as_str()).collect();
    defined.extend(bank.questions().iter().flat_map(|q| q.written_fact_keys()));
    defined.extend(config.external_facts.iter().map(String::as_str));

    let mut check = |owner: GateOwner, gate: &Gate| {
        for condition in gate.conditions() {
            if !condition.when.is_known() {
                issues.push(LintIssue::UnknownComparator {
                    owner: owner.clone(),
                    question_id: condition.question_id.clone(),
                    comparator: condition.when.to_string(),
                });
            }
        }
        for key in gate.referenced_keys() {
            if !defined.contains(key) {
                issues.push(LintIssue::UnknownReference {
                    owner: owner.clone(),
                    key: key.to_string(),
                });
            }
        }
    };

    for question in bank.questions() {
        check(
            GateOwner::Question {
                question_id: question.id.clone(),
            },
            &question.conditions,
        );
    }
    for suite in bank.suites() {
        for (gate_index, gate) in suite.gates.iter().enumerate() {
            check(
                GateOwner::Suite {
                    suite_id: suite.id.clone(),
                    gate_index,
                },
                gate,
            );
        }
    }
}
