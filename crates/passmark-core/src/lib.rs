//! passmark-core: exam scoring and frequently-asked question ranking.
//!
//! This crate defines the canonical record types, the boundary adapter that
//! produces them from loosely-typed data, and the two pure engines: the
//! per-attempt score engine and the corpus ranking engine.

pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod ranking;
pub mod scoring;
pub mod weak;

pub use config::{DedupePolicy, PassmarkConfig, RankingConfig, ScoringConfig};
pub use error::ConfigError;
pub use model::{
    Difficulty, FrequentlyAskedQuestionData, FrequentlyAskedScoreResult, Question, ScoreResult,
    UserAnswer,
};
pub use ranking::{score_question, select_top_k};
pub use scoring::calculate_score;
