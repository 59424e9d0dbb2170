//! The `passmark score` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use passmark_core::config::load_config_from;
use passmark_core::history::{summarize_progress, AttemptRecord, ProgressSummary};
use passmark_core::loader::{load_answers, load_questions};
use passmark_core::model::{Difficulty, ScoreResult};
use passmark_core::scoring::calculate_score;

#[derive(Serialize)]
struct ScoreOutput<'a> {
    #[serde(flatten)]
    result: &'a ScoreResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<&'a ProgressSummary>,
}

pub fn execute(
    questions_path: PathBuf,
    answers_path: PathBuf,
    history_path: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let questions = load_questions(&questions_path)?;
    let answers = load_answers(&answers_path)?;
    tracing::debug!(
        "scoring {} answers against {} questions",
        answers.len(),
        questions.len()
    );

    let result = calculate_score(&questions, &answers, &config.scoring);

    let progress = match &history_path {
        Some(path) => Some(record_attempt(path, &result, answers.len())?),
        None => None,
    };

    match format.as_str() {
        "json" => {
            let output = ScoreOutput {
                result: &result,
                progress: progress.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print_breakdown(&result, progress.as_ref()),
    }

    Ok(())
}

/// Compare the attempt with the stored history, then append it.
fn record_attempt(path: &Path, result: &ScoreResult, answered: usize) -> Result<ProgressSummary> {
    let mut history: Vec<AttemptRecord> = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse history JSON")?
    } else {
        Vec::new()
    };

    let current = AttemptRecord::from_result(result, answered, chrono::Utc::now());
    let summary = summarize_progress(&history, &current);

    history.push(current);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&history)?)
        .with_context(|| format!("failed to write history to {}", path.display()))?;

    Ok(summary)
}

fn print_breakdown(result: &ScoreResult, progress: Option<&ProgressSummary>) {
    use comfy_table::{Cell, Table};

    let b = &result.breakdown;
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Correct answers"),
        Cell::new(format!("{}/{}", b.correct_answers, b.total_questions)),
    ]);
    table.add_row(vec![
        Cell::new("Mandatory correct"),
        Cell::new(format!("{}/{}", b.correct_mandatory, b.mandatory_questions)),
    ]);
    for d in Difficulty::ALL {
        table.add_row(vec![
            Cell::new(format!("Correct {d}")),
            Cell::new(b.correct_by_difficulty.get(d)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Base score"),
        Cell::new(format!("{:.2}", b.base_score)),
    ]);
    table.add_row(vec![
        Cell::new("Mandatory factor"),
        Cell::new(format!("{:.4}", b.mandatory_factor)),
    ]);
    table.add_row(vec![
        Cell::new("Difficulty bonus"),
        Cell::new(format!("{:.2}", b.difficulty_bonus)),
    ]);

    println!("{table}");
    println!("Final score: {}", result.final_score);

    if let Some(p) = progress {
        match (p.delta_from_previous, p.delta_from_best) {
            (Some(prev), Some(best)) => {
                println!("Change from previous attempt: {prev:+.2}");
                println!("Change from best attempt: {best:+.2}");
            }
            _ => println!("First recorded attempt."),
        }
        if p.is_personal_best {
            println!("New personal best!");
        }
    }
}
