//! Ranking export with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RankingConfig;
use crate::model::FrequentlyAskedScoreResult;
use crate::ranking::every_year_count;

/// A persisted top-K ranking together with the configuration that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingExport {
    /// Unique export identifier.
    pub id: Uuid,
    /// When the ranking was generated.
    pub generated_at: DateTime<Utc>,
    /// Snapshot of the configuration used.
    pub config: RankingConfig,
    /// Number of ranked questions in this export.
    pub total_count: usize,
    /// How many of them appeared in every year of the window.
    pub every_year_count: usize,
    /// Ranked questions, most important first.
    pub questions: Vec<FrequentlyAskedScoreResult>,
}

impl RankingExport {
    pub fn new(questions: Vec<FrequentlyAskedScoreResult>, config: &RankingConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            config: config.clone(),
            total_count: questions.len(),
            every_year_count: every_year_count(&questions),
            questions,
        }
    }

    /// Save the export as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize ranking")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write ranking to {}", path.display()))?;
        Ok(())
    }

    /// Load an export from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ranking from {}", path.display()))?;
        let export: RankingExport =
            serde_json::from_str(&content).context("failed to parse ranking JSON")?;
        Ok(export)
    }

    /// Format the export as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Ranking:** {} questions, {} every year ({} year window), generated {}\n\n",
            self.total_count,
            self.every_year_count,
            self.config.years_to_consider,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if self.questions.is_empty() {
            return md;
        }

        md.push_str("| Rank | Question | Score | Years | Every year |\n");
        md.push_str("|------|----------|-------|-------|------------|\n");
        for (i, q) in self.questions.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {:.4} | {} | {} |\n",
                i + 1,
                q.question_id,
                q.final_score,
                q.year_list.len(),
                if q.is_every_year { "yes" } else { "" }
            ));
        }

        md
    }
}
