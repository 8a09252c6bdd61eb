//! Typed comparator outcomes.

use std::fmt;

use serde::Serialize;
use vigil_core::facts::ValueKind;

/// Why a comparator could not be applied to its operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NotApplicable {
    /// The condition lacks the operand its comparator reads.
    MissingOperand { operand: &'static str },
    /// An operand has a shape the comparator does not accept.
    TypeMismatch {
        expected: &'static str,
        actual: ValueKind,
    },
    /// Content used a comparator name the engine does not know.
    UnknownComparator { name: String },
}

impl fmt::Display for NotApplicable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperand { operand } => write!(f, "missing operand `{operand}`"),
            Self::TypeMismatch { expected, actual } => {
                write!(f, "expected {expected}, found {actual}")
            }
            Self::UnknownComparator { name } => write!(f, "unknown comparator {name:?}"),
        }
    }
}

/// Outcome of one comparator application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum Verdict {
    Pass,
    Fail,
    /// The comparator did not apply. `fallback` is the boolean the
    /// condition resolves to: false for most comparators, true for the
    /// permissive negations.
    NotApplicable {
        reason: NotApplicable,
        fallback: bool,
    },
}

impl Verdict {
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn not_applicable(reason: NotApplicable, fallback: bool) -> Self {
        Self::NotApplicable { reason, fallback }
    }

    /// Collapse to the boolean the gate algebra consumes.
    pub fn passed(&self) -> bool {
        match self {
            Self::Pass => true,
            Self::Fail => false,
            Self::NotApplicable { fallback, .. } => *fallback,
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable { .. })
    }
}
