//! Core data model types for passmark.
//!
//! These are the canonical records the engines operate on. Loosely-typed
//! external data is turned into these by [`crate::normalize`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a catalog question.
pub type QuestionId = String;

/// Question difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Low,
    Mid,
    High,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Low, Difficulty::Mid, Difficulty::High];

    /// Ordinal rank used for prioritization: LOW=1, MID=2, HIGH=3.
    pub fn rank(self) -> u32 {
        match self {
            Difficulty::Low => 1,
            Difficulty::Mid => 2,
            Difficulty::High => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Low => write!(f, "LOW"),
            Difficulty::Mid => write!(f, "MID"),
            Difficulty::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// Strict parse of the canonical names. The lenient boundary parser lives
    /// in [`crate::normalize::normalize_difficulty`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Difficulty::Low),
            "MID" => Ok(Difficulty::Mid),
            "HIGH" => Ok(Difficulty::High),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// One value per difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerDifficulty<T> {
    #[serde(rename = "LOW", default)]
    pub low: T,
    #[serde(rename = "MID", default)]
    pub mid: T,
    #[serde(rename = "HIGH", default)]
    pub high: T,
}

impl<T: Copy> PerDifficulty<T> {
    pub fn new(low: T, mid: T, high: T) -> Self {
        Self { low, mid, high }
    }

    pub fn get(&self, difficulty: Difficulty) -> T {
        match difficulty {
            Difficulty::Low => self.low,
            Difficulty::Mid => self.mid,
            Difficulty::High => self.high,
        }
    }

    pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut T {
        match difficulty {
            Difficulty::Low => &mut self.low,
            Difficulty::Mid => &mut self.mid,
            Difficulty::High => &mut self.high,
        }
    }
}

/// A catalog question as seen by the score engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub is_mandatory: bool,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, is_mandatory: bool, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            is_mandatory,
            difficulty,
        }
    }
}

/// A user's answer to one question in one attempt.
///
/// Several answers may reference the same question id; they are counted
/// individually and never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: QuestionId,
    pub is_correct: bool,
}

impl UserAnswer {
    pub fn new(question_id: impl Into<QuestionId>, is_correct: bool) -> Self {
        Self {
            question_id: question_id.into(),
            is_correct,
        }
    }
}

/// Outcome of scoring a single exam attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Pass percentage after penalty, bonus, clipping and rounding.
    pub final_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// The intermediate quantities behind a [`ScoreResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_score: f64,
    pub mandatory_factor: f64,
    pub difficulty_bonus: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub mandatory_questions: usize,
    pub correct_mandatory: usize,
    pub correct_by_difficulty: PerDifficulty<usize>,
}

/// Historical data for one question in the ranking corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentlyAskedQuestionData {
    pub id: QuestionId,
    #[serde(default)]
    pub content: String,
    /// Distinct years, within the lookback window, in which the question appeared.
    #[serde(default)]
    pub year_list: Vec<String>,
    /// Historical answer accuracy in `[0, 1]`.
    #[serde(default)]
    pub accuracy: f64,
    /// Caller-normalized expert rating in `[0, 1]`.
    #[serde(default)]
    pub expert_score: f64,
}

/// Importance score of one question in the ranking corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentlyAskedScoreResult {
    pub question_id: QuestionId,
    pub frequency_score: f64,
    pub accuracy_score: f64,
    pub expert_score: f64,
    pub year_bonus: f64,
    pub final_score: f64,
    pub year_list: Vec<String>,
    pub is_every_year: bool,
}
