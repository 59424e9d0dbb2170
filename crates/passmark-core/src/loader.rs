//! JSON record loader.
//!
//! Reads question, answer and ranking-corpus files in their external shapes
//! and normalizes them. A file holds either a top-level array of records or an
//! object wrapping the array under a well-known key. Records that cannot be
//! read at all are skipped with a warning.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{FrequentlyAskedQuestionData, Question, UserAnswer};
use crate::normalize::{
    normalize_answers, normalize_frequent_questions, normalize_questions, RawAnswer,
    RawFrequentQuestion, RawQuestion,
};

const QUESTION_KEYS: &[&str] = &["questions", "items"];
const ANSWER_KEYS: &[&str] = &["answers", "questions"];
const CORPUS_KEYS: &[&str] = &["questions", "corpus", "items"];

/// Load and normalize catalog questions from a JSON file.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let raw: Vec<RawQuestion> = read_records(path, QUESTION_KEYS)?;
    Ok(normalize_questions(&raw))
}

/// Load and normalize user answers from a JSON file.
pub fn load_answers(path: &Path) -> Result<Vec<UserAnswer>> {
    let raw: Vec<RawAnswer> = read_records(path, ANSWER_KEYS)?;
    Ok(normalize_answers(&raw))
}

/// Load and normalize a ranking corpus from a JSON file.
pub fn load_frequent_questions(path: &Path) -> Result<Vec<FrequentlyAskedQuestionData>> {
    let raw: Vec<RawFrequentQuestion> = read_records(path, CORPUS_KEYS)?;
    Ok(normalize_frequent_questions(&raw))
}

fn read_records<T: DeserializeOwned>(path: &Path, keys: &[&str]) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records file: {}", path.display()))?;

    parse_records_str(&content, keys, path)
}

/// Parse a JSON string of records (useful for testing).
pub fn parse_records_str<T: DeserializeOwned>(
    content: &str,
    keys: &[&str],
    source_path: &Path,
) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match keys.iter().find_map(|k| map.remove(*k)) {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!(
                "expected a JSON array or an object with one of {:?}: {}",
                keys,
                source_path.display()
            ),
        },
        _ => anyhow::bail!(
            "expected a JSON array of records: {}",
            source_path.display()
        ),
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("skipping record {i} in {}: {}", source_path.display(), e);
            }
        }
    }

    Ok(records)
}
