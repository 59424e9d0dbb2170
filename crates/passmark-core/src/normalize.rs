//! Boundary adapter from loosely-typed external records to the canonical model.
//!
//! External sources spell fields differently, encode flags as `0`/`1` and
//! difficulty as either names or numeric codes. Everything lenient lives in
//! this module; the engines only ever see [`Question`], [`UserAnswer`] and
//! [`FrequentlyAskedQuestionData`]. Nothing here fails: unknown encodings fall
//! back to `false` / [`Difficulty::Low`], and a record with no id under any
//! accepted spelling is skipped.

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, FrequentlyAskedQuestionData, Question, QuestionId, UserAnswer};

/// A JSON scalar of unknown type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LooseValue {
    /// Render as a canonical question id. Integral floats lose their `.0`.
    pub fn to_id(&self) -> QuestionId {
        match self {
            LooseValue::Integer(n) => n.to_string(),
            LooseValue::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                format!("{}", *f as i64)
            }
            LooseValue::Float(f) => f.to_string(),
            LooseValue::Text(s) => s.trim().to_string(),
            LooseValue::Bool(b) => b.to_string(),
            LooseValue::Other(v) => v.to_string(),
        }
    }
}

/// A question record in any of the accepted external shapes.
///
/// The id spellings are separate fields so a record carrying several of them
/// (a row `id` next to the real `question_id`) still deserializes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub question_id: Option<LooseValue>,
    #[serde(default, rename = "questionId")]
    pub question_id_camel: Option<LooseValue>,
    #[serde(default)]
    pub id: Option<LooseValue>,
    #[serde(
        default,
        alias = "isMandatory",
        alias = "mandatory",
        alias = "required"
    )]
    pub is_mandatory: Option<LooseValue>,
    #[serde(default, alias = "level")]
    pub difficulty: Option<LooseValue>,
}

/// An answer record in any of the accepted external shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnswer {
    #[serde(default)]
    pub question_id: Option<LooseValue>,
    #[serde(default, rename = "questionId")]
    pub question_id_camel: Option<LooseValue>,
    #[serde(
        default,
        alias = "isCorrect",
        alias = "status",
        alias = "correct"
    )]
    pub is_correct: Option<LooseValue>,
}

/// Either a list of years or a single comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawYearList {
    List(Vec<LooseValue>),
    Joined(String),
}

/// A ranking-corpus record in any of the accepted external shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrequentQuestion {
    #[serde(default)]
    pub question_id: Option<LooseValue>,
    #[serde(default, rename = "questionId")]
    pub question_id_camel: Option<LooseValue>,
    #[serde(default)]
    pub id: Option<LooseValue>,
    #[serde(default, alias = "body")]
    pub content: Option<String>,
    #[serde(default, alias = "yearList", alias = "years")]
    pub year_list: Option<RawYearList>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default, alias = "expertScore")]
    pub expert_score: Option<f64>,
}

/// Map a boolean-like value. Only `true` and the number `1` are truthy.
pub fn normalize_flag(value: &LooseValue) -> bool {
    match value {
        LooseValue::Bool(b) => *b,
        LooseValue::Integer(n) => *n == 1,
        LooseValue::Float(f) => *f == 1.0,
        _ => false,
    }
}

/// Map a difficulty code given as a name or a number.
///
/// Names are case-insensitive: `HIGH`/`H`, `MID`/`M`/`MEDIUM`, anything else
/// is LOW. Numbers: `>= 3` is HIGH, exactly `2` is MID, anything else is LOW.
pub fn normalize_difficulty(value: &LooseValue) -> Difficulty {
    match value {
        LooseValue::Text(s) => match s.trim().to_uppercase().as_str() {
            "HIGH" | "H" => Difficulty::High,
            "MID" | "M" | "MEDIUM" => Difficulty::Mid,
            _ => Difficulty::Low,
        },
        LooseValue::Integer(n) => difficulty_from_code(*n as f64),
        LooseValue::Float(f) => difficulty_from_code(*f),
        _ => Difficulty::Low,
    }
}

fn difficulty_from_code(code: f64) -> Difficulty {
    if code >= 3.0 {
        Difficulty::High
    } else if code == 2.0 {
        Difficulty::Mid
    } else {
        Difficulty::Low
    }
}

/// Split a comma-separated year string such as `"2021,2022,2023"`.
///
/// Entries are trimmed, empty entries dropped and repeats removed, keeping
/// first-occurrence order.
pub fn parse_year_list(joined: &str) -> Vec<String> {
    dedupe_years(joined.split(',').map(|y| y.trim().to_string()))
}

fn dedupe_years(years: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for year in years {
        if !year.is_empty() && !out.contains(&year) {
            out.push(year);
        }
    }
    out
}

/// Canonical id from the first present spelling, in priority order.
fn resolve_id(candidates: &[Option<&LooseValue>]) -> Option<QuestionId> {
    candidates.iter().flatten().next().map(|v| v.to_id())
}

impl RawQuestion {
    /// `question_id`, then `questionId`, then `id`.
    pub fn resolved_id(&self) -> Option<QuestionId> {
        resolve_id(&[
            self.question_id.as_ref(),
            self.question_id_camel.as_ref(),
            self.id.as_ref(),
        ])
    }
}

impl RawAnswer {
    /// `question_id`, then `questionId`.
    pub fn resolved_id(&self) -> Option<QuestionId> {
        resolve_id(&[self.question_id.as_ref(), self.question_id_camel.as_ref()])
    }
}

impl RawFrequentQuestion {
    /// `question_id`, then `questionId`, then `id`.
    pub fn resolved_id(&self) -> Option<QuestionId> {
        resolve_id(&[
            self.question_id.as_ref(),
            self.question_id_camel.as_ref(),
            self.id.as_ref(),
        ])
    }
}

fn normalize_year_list(raw: Option<&RawYearList>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(RawYearList::Joined(s)) => parse_year_list(s),
        Some(RawYearList::List(items)) => dedupe_years(items.iter().map(LooseValue::to_id)),
    }
}

/// Normalize question records.
pub fn normalize_questions(records: &[RawQuestion]) -> Vec<Question> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let Some(id) = r.resolved_id() else {
                tracing::warn!("skipping question record {i}: no id");
                return None;
            };
            Some(Question {
                id,
                is_mandatory: r.is_mandatory.as_ref().is_some_and(normalize_flag),
                difficulty: r
                    .difficulty
                    .as_ref()
                    .map(normalize_difficulty)
                    .unwrap_or(Difficulty::Low),
            })
        })
        .collect()
}

/// Normalize answer records.
pub fn normalize_answers(records: &[RawAnswer]) -> Vec<UserAnswer> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let Some(question_id) = r.resolved_id() else {
                tracing::warn!("skipping answer record {i}: no question id");
                return None;
            };
            Some(UserAnswer {
                question_id,
                is_correct: r.is_correct.as_ref().is_some_and(normalize_flag),
            })
        })
        .collect()
}

/// Normalize ranking-corpus records.
pub fn normalize_frequent_questions(
    records: &[RawFrequentQuestion],
) -> Vec<FrequentlyAskedQuestionData> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let Some(id) = r.resolved_id() else {
                tracing::warn!("skipping corpus record {i}: no id");
                return None;
            };
            Some(FrequentlyAskedQuestionData {
                id,
                content: r.content.clone().unwrap_or_default(),
                year_list: normalize_year_list(r.year_list.as_ref()),
                accuracy: r.accuracy.unwrap_or(0.0),
                expert_score: r.expert_score.unwrap_or(0.0),
            })
        })
        .collect()
}
