//! # vigil-visibility
//!
//! Computes which questions are visible and which suites are unlocked for a
//! given evaluation context, and checks question-bank content before it is
//! used: dependency cycles, dangling references, duplicate IDs.

pub mod graph;
pub mod lint;
pub mod resolver;

pub use graph::{DependencyGraph, DependencyNode, EdgeKind, NodeKind};
pub use lint::{lint_bank, LintIssue, LintReport, Severity};
pub use resolver::{GateOwner, VisibilityDiagnostic, VisibilityResolver, VisibilityResult};
