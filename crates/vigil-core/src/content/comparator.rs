use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparator of a gate condition (`when` in content).
///
/// Unrecognised names are kept as [`Comparator::Unknown`] so a bank with one
/// bad condition still loads; the evaluator treats them as non-passing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Comparator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    NotContains,
    Exists,
    NotExists,
    Truthy,
    Falsy,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Unknown(String),
}

impl Comparator {
    /// Names of every recognised comparator, in content spelling.
    pub const KNOWN: [&'static str; 14] = [
        "equals",
        "not_equals",
        "in",
        "not_in",
        "contains",
        "not_contains",
        "exists",
        "not_exists",
        "truthy",
        "falsy",
        "greater_than",
        "less_than",
        "greater_equal",
        "less_equal",
    ];

    pub fn parse(name: &str) -> Self {
        match name {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "in" => Self::In,
            "not_in" => Self::NotIn,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "exists" => Self::Exists,
            "not_exists" => Self::NotExists,
            "truthy" => Self::Truthy,
            "falsy" => Self::Falsy,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "greater_equal" => Self::GreaterEqual,
            "less_equal" => Self::LessEqual,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
            Self::Truthy => "truthy",
            Self::Falsy => "falsy",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterEqual => "greater_equal",
            Self::LessEqual => "less_equal",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Comparators whose result can only flip from false to true when the
    /// referenced key gains a value.
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Equals | Self::In | Self::Exists | Self::Truthy)
    }

    /// Comparators that read `values` rather than `value`.
    pub fn uses_value_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Comparators that read no operand at all.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Self::Exists | Self::NotExists | Self::Truthy | Self::Falsy
        )
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Comparator {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for Comparator {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<Comparator> for String {
    fn from(comparator: Comparator) -> Self {
        comparator.as_str().to_string()
    }
}
