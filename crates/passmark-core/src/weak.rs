//! Weak-question prioritization.
//!
//! Picks the questions a user should revisit: those they got wrong most often,
//! ordered by how much a miss costs (harder and mandatory questions first).
//! Users with no mistakes yet are pointed at the hardest questions instead.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Difficulty, Question, QuestionId, UserAnswer};

/// Weight of a mandatory question relative to an optional one.
const MANDATORY_MULTIPLIER: u32 = 2;

/// Priority of revisiting a question: difficulty rank times 2 if mandatory.
pub fn weakness_priority(question: &Question) -> u32 {
    let mandatory = if question.is_mandatory {
        MANDATORY_MULTIPLIER
    } else {
        1
    };
    question.difficulty.rank() * mandatory
}

/// Return up to `limit` question ids to revisit, most urgent first.
///
/// `history` is every answer the user has given, across attempts.
pub fn prioritize_weak_questions(
    questions: &[Question],
    history: &[UserAnswer],
    limit: usize,
) -> Vec<QuestionId> {
    let missed = most_missed(history, limit.saturating_mul(2));

    if missed.is_empty() {
        tracing::debug!("no incorrect answers in history; falling back to HIGH difficulty");
        let mut hardest: Vec<&Question> = questions
            .iter()
            .filter(|q| q.difficulty == Difficulty::High)
            .collect();
        hardest.sort_by(|a, b| compare_ids(&a.id, &b.id));
        return hardest.into_iter().take(limit).map(|q| q.id.clone()).collect();
    }

    let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();
    let mut prioritized: Vec<(&Question, u32)> = missed
        .iter()
        .filter_map(|id| by_id.get(id.as_str()).copied())
        .map(|q| (q, weakness_priority(q)))
        .collect();

    prioritized.sort_by(|a, b| b.1.cmp(&a.1));
    prioritized
        .into_iter()
        .take(limit)
        .map(|(q, _)| q.id.clone())
        .collect()
}

/// Ids with the most incorrect answers, at most `take` of them. Ties keep the
/// order in which each id was first missed.
fn most_missed(history: &[UserAnswer], take: usize) -> Vec<QuestionId> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for answer in history.iter().filter(|a| !a.is_correct) {
        let id = answer.question_id.as_str();
        match index.get(id) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(id, counts.len());
                counts.push((id, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(take)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Numeric ids compare numerically and sort before non-numeric ones, which
/// compare lexically.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
