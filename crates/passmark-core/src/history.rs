//! Attempt history and progress against previous attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ScoreResult;

/// A persisted summary of one scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub taken_at: DateTime<Utc>,
    pub final_score: f64,
    pub correct_count: usize,
    pub wrong_count: usize,
}

impl AttemptRecord {
    /// Summarize a score result. Answers that were not correct count as wrong.
    pub fn from_result(result: &ScoreResult, answered: usize, taken_at: DateTime<Utc>) -> Self {
        let correct_count = result.breakdown.correct_answers;
        Self {
            taken_at,
            final_score: result.final_score,
            correct_count,
            wrong_count: answered.saturating_sub(correct_count),
        }
    }
}

/// How a new attempt compares with earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// The most recent earlier attempt.
    pub previous: Option<AttemptRecord>,
    /// The highest-scoring earlier attempt.
    pub best: Option<AttemptRecord>,
    pub delta_from_previous: Option<f64>,
    pub delta_from_best: Option<f64>,
    pub is_personal_best: bool,
}

/// Compare `current` against `history` (in any order).
///
/// Among equally high scores the earliest attempt is reported as best.
pub fn summarize_progress(history: &[AttemptRecord], current: &AttemptRecord) -> ProgressSummary {
    let previous = history.iter().max_by_key(|r| r.taken_at).cloned();

    let best = history
        .iter()
        .reduce(|best, r| {
            match r.final_score.total_cmp(&best.final_score) {
                std::cmp::Ordering::Greater => r,
                std::cmp::Ordering::Equal if r.taken_at < best.taken_at => r,
                _ => best,
            }
        })
        .cloned();

    let delta_from_previous = previous.as_ref().map(|p| current.final_score - p.final_score);
    let delta_from_best = best.as_ref().map(|b| current.final_score - b.final_score);
    let is_personal_best = best
        .as_ref()
        .map_or(true, |b| current.final_score > b.final_score);

    ProgressSummary {
        previous,
        best,
        delta_from_previous,
        delta_from_best,
        is_personal_best,
    }
}
