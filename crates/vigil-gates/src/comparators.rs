//! Comparator semantics.
//!
//! Missing data fails closed: a condition over an absent key does not pass,
//! except for the negations documented as permissive (`not_in` without a
//! `values` list, `not_contains`, `not_exists`, `falsy`). Values are never
//! coerced across tags; numeric comparators only accept numbers.

use vigil_core::content::Comparator;
use vigil_core::facts::FactValue;

use crate::verdict::{NotApplicable, Verdict};

/// Apply `when` to the stored value of a key and the condition's operands.
pub fn compare(
    when: &Comparator,
    actual: Option<&FactValue>,
    value: Option<&FactValue>,
    values: Option<&[FactValue]>,
) -> Verdict {
    match when {
        Comparator::Equals => equality(actual, value, false),
        Comparator::NotEquals => equality(actual, value, true),
        Comparator::In => match values {
            None => Verdict::not_applicable(
                NotApplicable::MissingOperand { operand: "values" },
                false,
            ),
            Some(values) => match actual {
                None => Verdict::Fail,
                Some(actual) => Verdict::from_bool(values.contains(actual)),
            },
        },
        // No list means no restriction.
        Comparator::NotIn => match values {
            None => Verdict::Pass,
            Some(values) => match actual {
                None => Verdict::Fail,
                Some(actual) => Verdict::from_bool(!values.contains(actual)),
            },
        },
        Comparator::Contains => containment(actual, value, false),
        Comparator::NotContains => containment(actual, value, true),
        Comparator::Exists => Verdict::from_bool(actual.is_some()),
        Comparator::NotExists => Verdict::from_bool(actual.is_none()),
        Comparator::Truthy => Verdict::from_bool(actual.is_some_and(FactValue::is_truthy)),
        Comparator::Falsy => Verdict::from_bool(!actual.is_some_and(FactValue::is_truthy)),
        Comparator::GreaterThan => numeric(actual, value, |a, b| a > b),
        Comparator::LessThan => numeric(actual, value, |a, b| a < b),
        Comparator::GreaterEqual => numeric(actual, value, |a, b| a >= b),
        Comparator::LessEqual => numeric(actual, value, |a, b| a <= b),
        Comparator::Unknown(name) => Verdict::not_applicable(
            NotApplicable::UnknownComparator { name: name.clone() },
            false,
        ),
    }
}

/// Strict equality: same tag and same value.
fn equality(actual: Option<&FactValue>, value: Option<&FactValue>, negate: bool) -> Verdict {
    let Some(expected) = value else {
        return Verdict::not_applicable(NotApplicable::MissingOperand { operand: "value" }, false);
    };
    match actual {
        None => Verdict::Fail,
        Some(actual) => Verdict::from_bool((actual == expected) != negate),
    }
}

enum Containment {
    Found(bool),
    Missing,
    Incomparable(NotApplicable),
}

/// Dual-mode containment: substring when the stored value is a string,
/// membership when it is a string array. `not_contains` is permissive for
/// every case it cannot decide.
fn containment(actual: Option<&FactValue>, value: Option<&FactValue>, negate: bool) -> Verdict {
    match contains(actual, value) {
        Containment::Found(found) => Verdict::from_bool(found != negate),
        Containment::Missing => Verdict::from_bool(negate),
        Containment::Incomparable(reason) => Verdict::not_applicable(reason, negate),
    }
}

fn contains(actual: Option<&FactValue>, value: Option<&FactValue>) -> Containment {
    let Some(actual) = actual else {
        return Containment::Missing;
    };
    let Some(needle) = value else {
        return Containment::Incomparable(NotApplicable::MissingOperand { operand: "value" });
    };
    match (actual, needle) {
        (FactValue::Str(haystack), FactValue::Str(needle)) => {
            Containment::Found(haystack.contains(needle.as_str()))
        }
        (FactValue::StrArray(items), FactValue::Str(needle)) => {
            Containment::Found(items.iter().any(|item| item == needle))
        }
        // A string array can never hold a non-string.
        (FactValue::StrArray(_), _) => Containment::Found(false),
        (FactValue::Str(_), other) => Containment::Incomparable(NotApplicable::TypeMismatch {
            expected: "string",
            actual: other.kind(),
        }),
        (other, _) => Containment::Incomparable(NotApplicable::TypeMismatch {
            expected: "string or string-array",
            actual: other.kind(),
        }),
    }
}

fn numeric(
    actual: Option<&FactValue>,
    value: Option<&FactValue>,
    op: impl Fn(f64, f64) -> bool,
) -> Verdict {
    let Some(expected) = value else {
        return Verdict::not_applicable(NotApplicable::MissingOperand { operand: "value" }, false);
    };
    let Some(actual) = actual else {
        return Verdict::Fail;
    };
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => Verdict::from_bool(op(a, b)),
        (None, _) => Verdict::not_applicable(
            NotApplicable::TypeMismatch {
                expected: "number",
                actual: actual.kind(),
            },
            false,
        ),
        (_, None) => Verdict::not_applicable(
            NotApplicable::TypeMismatch {
                expected: "number",
                actual: expected.kind(),
            },
            false,
        ),
    }
}
