//! Answer derivation: a submitted value plus the question it answers
//! becomes an answer record and the facts its selected options establish.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use vigil_core::config::FactsConfig;
use vigil_core::errors::FactsError;
use vigil_core::facts::{Answer, AnswerValue, Confidence, Fact, FactSource};
use vigil_core::{Question, QuestionOption};

/// An answer and its derived facts, fully validated and ready to commit.
///
/// Built before the store is touched; [`FactsStore::record_answer`]
/// applies the whole record in one step.
///
/// [`FactsStore::record_answer`]: crate::FactsStore::record_answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub answer: Answer,
    pub facts: Vec<Fact>,
}

impl AnswerRecord {
    pub fn question_id(&self) -> &str {
        &self.answer.question_id
    }
}

/// Validate `value` against `question` and build the record to commit.
///
/// - A string selects one option by ID.
/// - A string array selects several options (multi-select); points sum
///   (saturating) and facts merge, later selections overwriting earlier ones
///   on the same key.
/// - Booleans and numbers are accepted only by questions without options.
///
/// Derived facts are tagged [`FactSource::UserAnswer`], categorised under
/// the question's domain, and expire with the answer.
pub fn derive_answer(
    question: &Question,
    value: AnswerValue,
    now: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    config: &FactsConfig,
) -> Result<AnswerRecord, FactsError> {
    let selected = selected_options(question, &value)?;

    let mut points = 0i64;
    let mut written: BTreeMap<&str, &AnswerValue> = BTreeMap::new();
    for option in &selected {
        points = points.saturating_add(option.points);
        for (key, fact_value) in &option.facts {
            written.insert(key.as_str(), fact_value);
        }
    }

    let category = question
        .domain
        .as_deref()
        .unwrap_or_else(|| config.effective_default_category())
        .to_string();
    let confidence = Confidence::new(config.effective_answer_confidence());

    let facts = written
        .into_iter()
        .map(|(key, fact_value)| Fact {
            key: key.to_string(),
            value: fact_value.clone(),
            confidence,
            source: FactSource::UserAnswer,
            established_at: now,
            expires_at,
            category: category.clone(),
            answered_by: Some(question.id.clone()),
        })
        .collect();

    Ok(AnswerRecord {
        answer: Answer {
            question_id: question.id.clone(),
            value,
            timestamp: now,
            points_earned: points,
            expires_at,
        },
        facts,
    })
}

fn selected_options<'q>(
    question: &'q Question,
    value: &AnswerValue,
) -> Result<Vec<&'q QuestionOption>, FactsError> {
    match value {
        AnswerValue::Str(option_id) => Ok(vec![find_option(question, option_id)?]),
        AnswerValue::StrArray(option_ids) => {
            let mut seen = Vec::with_capacity(option_ids.len());
            for option_id in option_ids {
                if seen.iter().any(|o: &&QuestionOption| o.id == *option_id) {
                    return Err(FactsError::InvalidAnswer {
                        question_id: question.id.clone(),
                        reason: format!("option {option_id} selected twice"),
                    });
                }
                seen.push(find_option(question, option_id)?);
            }
            Ok(seen)
        }
        AnswerValue::Bool(_) | AnswerValue::Num(_) if question.options.is_empty() => {
            if matches!(value, AnswerValue::Num(n) if !n.is_finite()) {
                return Err(FactsError::InvalidAnswer {
                    question_id: question.id.clone(),
                    reason: "number is not finite".to_string(),
                });
            }
            Ok(Vec::new())
        }
        other => Err(FactsError::InvalidAnswer {
            question_id: question.id.clone(),
            reason: format!("expected an option ID, got {}", other.kind()),
        }),
    }
}

fn find_option<'q>(
    question: &'q Question,
    option_id: &str,
) -> Result<&'q QuestionOption, FactsError> {
    question
        .option(option_id)
        .ok_or_else(|| FactsError::UnknownOption {
            question_id: question.id.clone(),
            option_id: option_id.to_string(),
        })
}
