//! Frequently-asked question ranking.
//!
//! Each question gets a composite importance score from how often it appeared
//! in the lookback window, how poorly it is usually answered and an expert
//! rating, plus a discrete bonus for appearing in every (or nearly every)
//! year. The corpus is then sorted and truncated to the top K.

use std::collections::{HashMap, HashSet};

use crate::config::{DedupePolicy, RankingConfig};
use crate::model::{FrequentlyAskedQuestionData, FrequentlyAskedScoreResult, QuestionId};
use crate::scoring::round_to_places;

/// How many of a user's most recent answers are excluded when picking
/// frequently-asked questions for them.
pub const RECENT_ANSWER_WINDOW: usize = 20;

/// Score a single question.
///
/// `frequency_score` is not clamped: a year list longer than
/// `years_to_consider` yields a value above 1.
pub fn score_question(
    question: &FrequentlyAskedQuestionData,
    config: &RankingConfig,
) -> FrequentlyAskedScoreResult {
    let appearances = question.year_list.len();

    let frequency_score = if appearances == 0 || config.years_to_consider == 0 {
        0.0
    } else {
        appearances as f64 / config.years_to_consider as f64
    };
    let accuracy_score = (1.0 - question.accuracy).clamp(0.0, 1.0);
    let expert_score = question.expert_score;

    let is_every_year = appearances > 0 && appearances == config.years_to_consider;
    let year_bonus = year_bonus(appearances, is_every_year, config);

    let weighted = frequency_score * config.frequency_weight
        + accuracy_score * config.accuracy_weight
        + expert_score * config.expert_weight;

    FrequentlyAskedScoreResult {
        question_id: question.id.clone(),
        frequency_score,
        accuracy_score,
        expert_score,
        year_bonus,
        final_score: round_to_places(weighted + year_bonus, config.decimal_places),
        year_list: question.year_list.clone(),
        is_every_year,
    }
}

/// Exact-match step function; counts between tiers get nothing.
fn year_bonus(appearances: usize, is_every_year: bool, config: &RankingConfig) -> f64 {
    if appearances == 0 {
        0.0
    } else if is_every_year {
        config.every_year_bonus
    } else {
        config
            .almost_every_year_bonus
            .get(appearances)
            .unwrap_or(0.0)
    }
}

/// Collapse records sharing an id in a single ordered pass.
///
/// The surviving record keeps the position of the id's first occurrence.
/// Under [`DedupePolicy::LastWins`] it carries the data of the id's last
/// occurrence; under [`DedupePolicy::FirstWins`] the first.
pub fn dedupe_by_id(
    questions: &[FrequentlyAskedQuestionData],
    policy: DedupePolicy,
) -> Vec<&FrequentlyAskedQuestionData> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(questions.len());
    let mut kept: Vec<&FrequentlyAskedQuestionData> = Vec::with_capacity(questions.len());

    for question in questions {
        match slots.get(question.id.as_str()) {
            Some(&slot) => {
                if policy == DedupePolicy::LastWins {
                    kept[slot] = question;
                }
            }
            None => {
                slots.insert(question.id.as_str(), kept.len());
                kept.push(question);
            }
        }
    }

    kept
}

/// Score the corpus and return the `k` most important questions, highest
/// `final_score` first.
///
/// Equal scores keep their relative input order. When `dedupe` is set, the
/// corpus is first collapsed by id using `config.dedupe_policy`.
pub fn select_top_k(
    questions: &[FrequentlyAskedQuestionData],
    k: usize,
    config: &RankingConfig,
    dedupe: bool,
) -> Vec<FrequentlyAskedScoreResult> {
    let candidates: Vec<&FrequentlyAskedQuestionData> = if dedupe {
        let kept = dedupe_by_id(questions, config.dedupe_policy);
        if kept.len() < questions.len() {
            tracing::debug!(
                "collapsed {} duplicate record(s) ({:?})",
                questions.len() - kept.len(),
                config.dedupe_policy
            );
        }
        kept
    } else {
        questions.iter().collect()
    };

    let mut scored: Vec<FrequentlyAskedScoreResult> = candidates
        .into_iter()
        .map(|q| score_question(q, config))
        .collect();

    scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    scored.truncate(k);
    scored
}

/// Drop ranked results the user answered recently, then keep at most `limit`.
pub fn exclude_recent(
    ranked: Vec<FrequentlyAskedScoreResult>,
    recent_ids: &[QuestionId],
    limit: usize,
) -> Vec<FrequentlyAskedScoreResult> {
    let recent: HashSet<&str> = recent_ids.iter().map(String::as_str).collect();
    ranked
        .into_iter()
        .filter(|r| !recent.contains(r.question_id.as_str()))
        .take(limit)
        .collect()
}

/// Number of results flagged as appearing in every year of the window.
pub fn every_year_count(results: &[FrequentlyAskedScoreResult]) -> usize {
    results.iter().filter(|r| r.is_every_year).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YearTierBonus;

    fn years(n: usize) -> Vec<String> {
        (0..n).map(|i| (2016 + i).to_string()).collect()
    }

    fn question(
        id: &str,
        appearances: usize,
        accuracy: f64,
        expert: f64,
    ) -> FrequentlyAskedQuestionData {
        FrequentlyAskedQuestionData {
            id: id.to_string(),
            content: format!("question {id}"),
            year_list: years(appearances),
            accuracy,
            expert_score: expert,
        }
    }

    #[test]
    fn every_year_gets_full_bonus() {
        let config = RankingConfig::default();
        let result = score_question(&question("q", 8, 0.5, 0.5), &config);
        assert!(result.is_every_year);
        assert_eq!(result.year_bonus, config.every_year_bonus);
        assert_eq!(result.frequency_score, 1.0);
        assert_eq!(result.accuracy_score, 0.5);
        // 1.0*0.5 + 0.5*0.3 + 0.5*0.2 + 0.2
        assert_eq!(result.final_score, 0.95);
    }

    #[test]
    fn almost_every_year_tiers_are_exact() {
        let config = RankingConfig::default();
        let seven = score_question(&question("q", 7, 0.0, 0.0), &config);
        assert_eq!(seven.year_bonus, 0.1);
        assert!(!seven.is_every_year);

        let six = score_question(&question("q", 6, 0.0, 0.0), &config);
        assert_eq!(six.year_bonus, 0.05);

        let five = score_question(&question("q", 5, 0.0, 0.0), &config);
        assert_eq!(five.year_bonus, 0.0);
    }

    #[test]
    fn more_years_than_window_is_unclamped_and_unbonused() {
        let config = RankingConfig::default();
        let result = score_question(&question("q", 10, 1.0, 0.0), &config);
        assert_eq!(result.frequency_score, 1.25);
        assert_eq!(result.year_bonus, 0.0);
        assert!(!result.is_every_year);
        assert_eq!(result.final_score, 0.625);
    }

    #[test]
    fn empty_year_list_scores_zero_frequency() {
        let config = RankingConfig::default();
        let result = score_question(&question("q", 0, 1.0, 0.0), &config);
        assert_eq!(result.frequency_score, 0.0);
        assert_eq!(result.year_bonus, 0.0);
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn accuracy_score_is_clamped() {
        let config = RankingConfig::default();
        let over = score_question(&question("q", 0, 1.4, 0.0), &config);
        assert_eq!(over.accuracy_score, 0.0);
        let under = score_question(&question("q", 0, -0.3, 0.0), &config);
        assert_eq!(under.accuracy_score, 1.0);
    }

    #[test]
    fn every_year_takes_precedence_over_tier_of_same_count() {
        let config = RankingConfig {
            years_to_consider: 7,
            every_year_bonus: 0.3,
            almost_every_year_bonus: YearTierBonus::default(),
            ..RankingConfig::default()
        };
        let result = score_question(&question("q", 7, 0.0, 0.0), &config);
        assert!(result.is_every_year);
        assert_eq!(result.year_bonus, 0.3);
    }

    #[test]
    fn weights_are_applied_as_given() {
        let config = RankingConfig {
            frequency_weight: 1.0,
            accuracy_weight: 1.0,
            expert_weight: 1.0,
            every_year_bonus: 0.0,
            ..RankingConfig::default()
        };
        let result = score_question(&question("q", 8, 0.0, 1.0), &config);
        assert_eq!(result.final_score, 3.0);
    }

    #[test]
    fn top_k_truncates_and_sorts() {
        let corpus: Vec<_> = (0..500)
            .map(|i| {
                let accuracy = (i % 10) as f64 / 10.0;
                let expert = (i % 7) as f64 / 7.0;
                question(&format!("q{i}"), i % 9, accuracy, expert)
            })
            .collect();
        let config = RankingConfig::default();

        let top = select_top_k(&corpus, 300, &config, true);
        assert_eq!(top.len(), 300);
        assert!(top.windows(2).all(|w| w[0].final_score >= w[1].final_score));

        let small = select_top_k(&corpus[..50], 300, &config, true);
        assert_eq!(small.len(), 50);
    }

    #[test]
    fn top_k_of_empty_corpus_is_empty() {
        assert!(select_top_k(&[], 300, &RankingConfig::default(), true).is_empty());
        let corpus = vec![question("a", 3, 0.5, 0.5)];
        assert!(select_top_k(&corpus, 0, &RankingConfig::default(), false).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let corpus = vec![
            question("first", 3, 0.5, 0.5),
            question("better", 8, 0.1, 0.9),
            question("second", 3, 0.5, 0.5),
        ];
        let top = select_top_k(&corpus, 3, &RankingConfig::default(), false);
        let ids: Vec<&str> = top.iter().map(|r| r.question_id.as_str()).collect();
        assert_eq!(ids, vec!["better", "first", "second"]);
    }

    #[test]
    fn dedupe_last_record_wins() {
        let corpus = vec![
            question("dup", 8, 0.0, 1.0),
            question("other", 2, 0.5, 0.5),
            question("dup", 1, 0.9, 0.0),
        ];
        let config = RankingConfig::default();
        let top = select_top_k(&corpus, 10, &config, true);

        let dups: Vec<_> = top.iter().filter(|r| r.question_id == "dup").collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].year_list.len(), 1);
        assert_eq!(*dups[0], score_question(&corpus[2], &config));
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn dedupe_first_wins_when_configured() {
        let corpus = vec![question("dup", 8, 0.0, 1.0), question("dup", 1, 0.9, 0.0)];
        let config = RankingConfig {
            dedupe_policy: DedupePolicy::FirstWins,
            ..RankingConfig::default()
        };
        let top = select_top_k(&corpus, 10, &config, true);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].year_list.len(), 8);
    }

    #[test]
    fn dedupe_keeps_first_slot() {
        let corpus = vec![
            question("a", 1, 0.0, 0.0),
            question("b", 2, 0.0, 0.0),
            question("a", 3, 0.0, 0.0),
        ];
        let kept = dedupe_by_id(&corpus, DedupePolicy::LastWins);
        let shape: Vec<(&str, usize)> = kept
            .iter()
            .map(|q| (q.id.as_str(), q.year_list.len()))
            .collect();
        assert_eq!(shape, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn without_dedupe_repeated_ids_are_all_scored() {
        let corpus = vec![question("dup", 8, 0.0, 1.0), question("dup", 1, 0.9, 0.0)];
        let top = select_top_k(&corpus, 10, &RankingConfig::default(), false);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn exclude_recent_filters_then_limits() {
        let corpus = vec![
            question("a", 8, 0.0, 1.0),
            question("b", 7, 0.0, 1.0),
            question("c", 6, 0.0, 1.0),
            question("d", 5, 0.0, 1.0),
        ];
        let ranked = select_top_k(&corpus, 10, &RankingConfig::default(), true);
        let picked = exclude_recent(ranked, &["a".to_string(), "c".to_string()], 1);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].question_id, "b");
    }

    #[test]
    fn counts_every_year_results() {
        let config = RankingConfig::default();
        let results: Vec<_> = [8, 8, 7, 0]
            .iter()
            .map(|&n| score_question(&question("q", n, 0.5, 0.5), &config))
            .collect();
        assert_eq!(every_year_count(&results), 2);
    }
}
