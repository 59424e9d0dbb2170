//! Scoring and ranking configuration.
//!
//! Both engines take their configuration by reference on every call; nothing
//! here is global. Validation is a separate, explicit step performed where a
//! configuration is constructed or loaded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::PerDifficulty;

/// Decimal places beyond this lose meaning in f64 rounding.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Configuration for [`crate::scoring::calculate_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// How strongly missed mandatory questions scale the base score down.
    pub mandatory_penalty_factor: f64,
    /// Points added per correct answer, by difficulty.
    pub difficulty_bonus: PerDifficulty<f64>,
    /// Whether scores above `max_score` are clipped.
    pub clip_max_score: bool,
    pub max_score: f64,
    pub decimal_places: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mandatory_penalty_factor: 0.2,
            difficulty_bonus: PerDifficulty::new(0.0, 0.0, 0.2),
            clip_max_score: true,
            max_score: 100.0,
            decimal_places: 2,
        }
    }
}

impl ScoringConfig {
    /// Check for values that would make scores meaningless.
    /// Returns every problem at once, not just the first.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        check_non_negative(
            &mut errors,
            "scoring.mandatory_penalty_factor",
            self.mandatory_penalty_factor,
        );
        check_non_negative(
            &mut errors,
            "scoring.difficulty_bonus.LOW",
            self.difficulty_bonus.low,
        );
        check_non_negative(
            &mut errors,
            "scoring.difficulty_bonus.MID",
            self.difficulty_bonus.mid,
        );
        check_non_negative(
            &mut errors,
            "scoring.difficulty_bonus.HIGH",
            self.difficulty_bonus.high,
        );

        if !self.max_score.is_finite() {
            errors.push(ConfigError::NotFinite {
                field: "scoring.max_score".into(),
                value: self.max_score,
            });
        } else if self.max_score <= 0.0 {
            errors.push(ConfigError::NotPositive {
                field: "scoring.max_score".into(),
                value: self.max_score,
            });
        }

        check_decimal_places(&mut errors, "scoring.decimal_places", self.decimal_places);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Which record survives when the ranking corpus contains repeated ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupePolicy {
    /// The record encountered last in input order wins.
    #[default]
    LastWins,
    /// The record encountered first in input order wins.
    FirstWins,
}

/// Bonus per exact appearance count, e.g. `{7: 0.1, 6: 0.05}`.
///
/// Stored with integer keys; (de)serialized with string keys so it can live
/// in a TOML table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct YearTierBonus(BTreeMap<usize, f64>);

impl YearTierBonus {
    pub fn new(tiers: impl IntoIterator<Item = (usize, f64)>) -> Self {
        Self(tiers.into_iter().collect())
    }

    /// Bonus for exactly `count` appearances, if that count is a tier.
    pub fn get(&self, count: usize) -> Option<f64> {
        self.0.get(&count).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl Default for YearTierBonus {
    fn default() -> Self {
        Self::new([(7, 0.1), (6, 0.05)])
    }
}

impl TryFrom<BTreeMap<String, f64>> for YearTierBonus {
    type Error = String;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(k, v)| {
                k.trim()
                    .parse::<usize>()
                    .map(|count| (count, v))
                    .map_err(|_| format!("year tier key must be a year count, got '{k}'"))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(YearTierBonus)
    }
}

impl From<YearTierBonus> for BTreeMap<String, f64> {
    fn from(tiers: YearTierBonus) -> Self {
        tiers.0.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Configuration for [`crate::ranking`].
///
/// The three weights are expected to sum to 1.0 but this is not enforced;
/// the engine applies them as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    pub frequency_weight: f64,
    pub accuracy_weight: f64,
    pub expert_weight: f64,
    /// Bonus when a question appeared in every year of the window.
    pub every_year_bonus: f64,
    /// Bonus tiers for exact near-complete appearance counts.
    pub almost_every_year_bonus: YearTierBonus,
    /// Length of the lookback window in years.
    pub years_to_consider: usize,
    pub decimal_places: u32,
    pub dedupe_policy: DedupePolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            frequency_weight: 0.5,
            accuracy_weight: 0.3,
            expert_weight: 0.2,
            every_year_bonus: 0.2,
            almost_every_year_bonus: YearTierBonus::default(),
            years_to_consider: 8,
            decimal_places: 4,
            dedupe_policy: DedupePolicy::LastWins,
        }
    }
}

impl RankingConfig {
    /// Sum of the three weights.
    pub fn weight_sum(&self) -> f64 {
        self.frequency_weight + self.accuracy_weight + self.expert_weight
    }

    /// Check for values that would make rankings meaningless.
    /// Weights that do not sum to 1.0 are accepted.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        check_non_negative(&mut errors, "ranking.frequency_weight", self.frequency_weight);
        check_non_negative(&mut errors, "ranking.accuracy_weight", self.accuracy_weight);
        check_non_negative(&mut errors, "ranking.expert_weight", self.expert_weight);
        check_non_negative(&mut errors, "ranking.every_year_bonus", self.every_year_bonus);
        for (count, bonus) in self.almost_every_year_bonus.iter() {
            check_non_negative(
                &mut errors,
                &format!("ranking.almost_every_year_bonus.{count}"),
                bonus,
            );
        }

        if self.years_to_consider == 0 {
            errors.push(ConfigError::EmptyYearWindow {
                field: "ranking.years_to_consider".into(),
            });
        }

        check_decimal_places(&mut errors, "ranking.decimal_places", self.decimal_places);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !value.is_finite() {
        errors.push(ConfigError::NotFinite {
            field: field.to_string(),
            value,
        });
    } else if value < 0.0 {
        errors.push(ConfigError::Negative {
            field: field.to_string(),
            value,
        });
    }
}

fn check_decimal_places(errors: &mut Vec<ConfigError>, field: &str, value: u32) {
    if value > MAX_DECIMAL_PLACES {
        errors.push(ConfigError::TooManyDecimalPlaces {
            field: field.to_string(),
            value,
            max: MAX_DECIMAL_PLACES,
        });
    }
}

/// Top-level passmark configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassmarkConfig {
    pub scoring: ScoringConfig,
    pub ranking: RankingConfig,
}

impl PassmarkConfig {
    /// Validate both sections, collecting every error.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if let Err(e) = self.scoring.validate() {
            errors.extend(e);
        }
        if let Err(e) = self.ranking.validate() {
            errors.extend(e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `passmark.toml` in the current directory
/// 2. `~/.config/passmark/config.toml`
///
/// Environment variable overrides: `PASSMARK_DECIMAL_PLACES`,
/// `PASSMARK_YEARS_TO_CONSIDER`, `PASSMARK_MANDATORY_PENALTY`.
pub fn load_config() -> Result<PassmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations, and
/// validate it.
pub fn load_config_from(path: Option<&Path>) -> Result<PassmarkConfig> {
    finish_config(read_config(path)?)
}

/// Read, parse and apply environment overrides without validating.
pub fn read_config(path: Option<&Path>) -> Result<PassmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("passmark.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PassmarkConfig::default(),
    };

    let config = apply_env_overrides(config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Parse a TOML string into a [`PassmarkConfig`] without validating it.
pub fn parse_config_str(content: &str) -> Result<PassmarkConfig> {
    let config: PassmarkConfig = toml::from_str(content).context("invalid passmark config")?;
    Ok(config)
}

/// Validate a loaded configuration, failing with every message joined.
pub fn finish_config(config: PassmarkConfig) -> Result<PassmarkConfig> {
    if let Err(errors) = config.validate() {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        anyhow::bail!("invalid configuration: {joined}");
    }

    let sum = config.ranking.weight_sum();
    if (sum - 1.0).abs() > 1e-9 {
        tracing::warn!("ranking weights sum to {sum}, not 1.0; scores are not normalized");
    }

    Ok(config)
}

/// Apply `PASSMARK_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(
    mut config: PassmarkConfig,
    lookup: F,
) -> Result<PassmarkConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("PASSMARK_DECIMAL_PLACES") {
        let places = parse_override::<u32>("PASSMARK_DECIMAL_PLACES", &raw)?;
        config.scoring.decimal_places = places;
        config.ranking.decimal_places = places;
    }

    if let Some(raw) = lookup("PASSMARK_YEARS_TO_CONSIDER") {
        config.ranking.years_to_consider =
            parse_override::<usize>("PASSMARK_YEARS_TO_CONSIDER", &raw)?;
    }

    if let Some(raw) = lookup("PASSMARK_MANDATORY_PENALTY") {
        config.scoring.mandatory_penalty_factor =
            parse_override::<f64>("PASSMARK_MANDATORY_PENALTY", &raw)?;
    }

    Ok(config)
}

fn parse_override<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidOverride {
        var: var.to_string(),
        value: raw.to_string(),
    })
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("passmark"))
}
