//! End-to-end pipeline tests over the core library.
//!
//! These exercise the path raw JSON records take through normalization into
//! the scoring and ranking engines, and on to history and export.

use chrono::{Duration, TimeZone, Utc};

use passmark_core::config::{PassmarkConfig, RankingConfig, ScoringConfig};
use passmark_core::export::RankingExport;
use passmark_core::history::{summarize_progress, AttemptRecord};
use passmark_core::normalize::{
    normalize_answers, normalize_frequent_questions, normalize_questions, RawAnswer,
    RawFrequentQuestion, RawQuestion,
};
use passmark_core::ranking::select_top_k;
use passmark_core::scoring::calculate_score;
use passmark_core::weak::prioritize_weak_questions;

fn raw_questions() -> Vec<RawQuestion> {
    serde_json::from_str(
        r#"[
          {"questionId": "1", "isMandatory": true, "level": 2},
          {"question_id": 2, "mandatory": 1, "difficulty": "m"},
          {"id": 3, "required": "1", "difficulty": "LOW"},
          {"id": 3.0, "is_mandatory": 1, "difficulty": "LOW"},
          {"id": 4, "is_mandatory": 0, "difficulty": 3},
          {"id": 5, "is_mandatory": false, "difficulty": "high"},
          {"id": 6, "difficulty": "MEDIUM"},
          {"id": 7},
          {"id": 8, "difficulty": null},
          {"id": 9, "difficulty": 2.0},
          {"id": 10, "difficulty": "unknown"}
        ]"#,
    )
    .unwrap()
}

#[test]
fn loose_records_score_like_canonical_ones() {
    let raw = raw_questions();
    // Record 3 appears twice; the string "1" is not a truthy flag, the
    // numeric 1 on the second copy is.
    let mut questions = normalize_questions(&raw);
    questions.remove(2);
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[2].id, "3");
    assert!(questions[2].is_mandatory);

    let raw_answers: Vec<RawAnswer> = serde_json::from_str(
        r#"[
          {"questionId": 1, "isCorrect": 1},
          {"question_id": "2", "status": true},
          {"question_id": 3, "correct": 1.0},
          {"question_id": 4, "is_correct": true},
          {"question_id": 5, "is_correct": true},
          {"question_id": 6, "is_correct": true},
          {"question_id": 7, "is_correct": true},
          {"question_id": 8, "is_correct": true},
          {"question_id": 9, "is_correct": "yes"},
          {"question_id": 10}
        ]"#,
    )
    .unwrap();
    let answers = normalize_answers(&raw_answers);

    let result = calculate_score(&questions, &answers, &ScoringConfig::default());
    assert_eq!(result.final_score, 80.4);
    assert_eq!(result.breakdown.correct_answers, 8);
    assert_eq!(result.breakdown.correct_mandatory, 3);
}

#[test]
fn scoring_feeds_history_and_weak_questions() {
    let raw = raw_questions();
    let mut questions = normalize_questions(&raw);
    questions.remove(2);

    let config = PassmarkConfig::default();
    let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

    let first_answers: Vec<_> = questions
        .iter()
        .map(|q| passmark_core::UserAnswer::new(q.id.clone(), q.id != "1" && q.id != "5"))
        .collect();
    let first = calculate_score(&questions, &first_answers, &config.scoring);
    let first_record = AttemptRecord::from_result(&first, first_answers.len(), t0);

    let second_answers: Vec<_> = questions
        .iter()
        .map(|q| passmark_core::UserAnswer::new(q.id.clone(), true))
        .collect();
    let second = calculate_score(&questions, &second_answers, &config.scoring);
    assert_eq!(second.final_score, 100.0);

    let record = AttemptRecord::from_result(&second, second_answers.len(), t0 + Duration::days(1));
    let progress = summarize_progress(&[first_record.clone()], &record);
    assert_eq!(progress.previous, Some(first_record));
    assert!(progress.is_personal_best);
    assert!(progress.delta_from_previous.unwrap() > 0.0);

    // Only the first attempt had misses: the mandatory MID and the HIGH one.
    let weak = prioritize_weak_questions(&questions, &first_answers, 5);
    assert_eq!(weak, vec!["1".to_string(), "5".to_string()]);
}

#[test]
fn corpus_ranks_and_exports() {
    let raw: Vec<RawFrequentQuestion> = serde_json::from_str(
        r#"[
          {"id": 1, "body": "Ohm's law", "years": "2016, 2017,2018,2019,2020,2021,2022,2023", "accuracy": 0.8, "expertScore": 0.9},
          {"questionId": 2, "yearList": [2017, 2018, 2019, 2020, 2021, 2022, 2023], "accuracy": 0.4, "expert_score": 0.8},
          {"id": 3, "year_list": "2021,,2021,2023", "accuracy": -0.4},
          {"id": 4, "accuracy": 1.0}
        ]"#,
    )
    .unwrap();
    let corpus = normalize_frequent_questions(&raw);
    assert_eq!(corpus[0].year_list.len(), 8);
    assert_eq!(corpus[2].year_list, vec!["2021", "2023"]);

    let config = RankingConfig::default();
    let ranked = select_top_k(&corpus, 3, &config, true);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].question_id, "1");
    assert!(ranked[0].is_every_year);
    assert_eq!(ranked[1].question_id, "2");
    assert_eq!(ranked[1].year_bonus, 0.1);
    // Out-of-range accuracy is clamped, not rejected.
    assert_eq!(ranked[2].question_id, "3");
    assert_eq!(ranked[2].accuracy_score, 1.0);
    assert_eq!(ranked[2].final_score, 0.425);

    let export = RankingExport::new(ranked, &config);
    assert_eq!(export.every_year_count, 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranking.json");
    export.save_json(&path).unwrap();
    let loaded = RankingExport::load_json(&path).unwrap();
    assert_eq!(loaded.questions, export.questions);
    assert_eq!(loaded.generated_at, export.generated_at);
}
