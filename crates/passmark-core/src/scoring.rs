//! Exam attempt scoring.
//!
//! An attempt's pass percentage combines plain accuracy, a multiplicative
//! penalty for missed mandatory questions and an additive bonus for correct
//! answers to harder questions:
//!
//! ```text
//! final = base * mandatory_factor + difficulty_bonus
//! ```
//!
//! followed by optional clipping to `max_score` and rounding.

use std::collections::HashMap;

use crate::config::ScoringConfig;
use crate::model::{
    Difficulty, PerDifficulty, Question, ScoreBreakdown, ScoreResult, UserAnswer,
};

/// Round half away from zero to `places` decimal digits.
///
/// Non-finite input yields `0.0`. When `places` is too large to scale by,
/// the value is returned unrounded.
pub fn round_to_places(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let Ok(exponent) = i32::try_from(places) else {
        return value;
    };
    let factor = 10f64.powi(exponent);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Score one exam attempt.
///
/// Answers referencing a question id that is not in `questions` still count
/// toward `correct_answers` but are left out of the mandatory and difficulty
/// tallies.
pub fn calculate_score(
    questions: &[Question],
    answers: &[UserAnswer],
    config: &ScoringConfig,
) -> ScoreResult {
    let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();

    let total_questions = questions.len();
    let mandatory_questions = questions.iter().filter(|q| q.is_mandatory).count();

    let mut correct_answers = 0usize;
    let mut correct_mandatory = 0usize;
    let mut correct_by_difficulty: PerDifficulty<usize> = PerDifficulty::default();
    let mut unmatched = 0usize;

    for answer in answers.iter().filter(|a| a.is_correct) {
        correct_answers += 1;
        match by_id.get(answer.question_id.as_str()) {
            Some(question) => {
                if question.is_mandatory {
                    correct_mandatory += 1;
                }
                *correct_by_difficulty.get_mut(question.difficulty) += 1;
            }
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        tracing::debug!("{unmatched} correct answer(s) reference unknown questions");
    }

    let base_score = if total_questions == 0 {
        0.0
    } else {
        correct_answers as f64 * 100.0 / total_questions as f64
    };

    let mandatory_factor = mandatory_factor(
        correct_mandatory,
        mandatory_questions,
        config.mandatory_penalty_factor,
    );

    let difficulty_bonus = Difficulty::ALL
        .iter()
        .map(|&d| correct_by_difficulty.get(d) as f64 * config.difficulty_bonus.get(d))
        .sum::<f64>();

    let mut final_score = base_score * mandatory_factor + difficulty_bonus;
    if config.clip_max_score && final_score > config.max_score {
        final_score = config.max_score;
    }
    let final_score = round_to_places(final_score, config.decimal_places);

    ScoreResult {
        final_score,
        breakdown: ScoreBreakdown {
            base_score,
            mandatory_factor,
            difficulty_bonus,
            total_questions,
            correct_answers,
            mandatory_questions,
            correct_mandatory,
            correct_by_difficulty,
        },
    }
}

/// Full credit when there are no mandatory questions or all were answered
/// correctly; otherwise scale down by the missed share times `penalty`.
fn mandatory_factor(correct: usize, total: usize, penalty: f64) -> f64 {
    if total == 0 || correct == total {
        return 1.0;
    }
    let ratio = correct as f64 / total as f64;
    1.0 - (1.0 - ratio) * penalty
}
