//! The `passmark rank` command.

use std::path::PathBuf;

use anyhow::Result;

use passmark_core::config::{load_config_from, DedupePolicy};
use passmark_core::export::RankingExport;
use passmark_core::loader::{load_answers, load_frequent_questions};
use passmark_core::model::QuestionId;
use passmark_core::ranking::{exclude_recent, select_top_k, RECENT_ANSWER_WINDOW};

/// Rows shown in the text summary table.
const TEXT_PREVIEW_ROWS: usize = 20;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    corpus_path: PathBuf,
    top: usize,
    no_dedupe: bool,
    first_wins: bool,
    exclude_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(top >= 1, "--top must be at least 1");
    anyhow::ensure!(
        !(no_dedupe && first_wins),
        "--first-wins has no effect together with --no-dedupe"
    );

    let mut config = load_config_from(config_path.as_deref())?.ranking;
    if first_wins {
        config.dedupe_policy = DedupePolicy::FirstWins;
    }

    let corpus = load_frequent_questions(&corpus_path)?;
    tracing::info!("ranking {} questions from {}", corpus.len(), corpus_path.display());

    let ranked = match &exclude_path {
        Some(path) => {
            let recent = recent_question_ids(path)?;
            let all = select_top_k(&corpus, corpus.len(), &config, !no_dedupe);
            exclude_recent(all, &recent, top)
        }
        None => select_top_k(&corpus, top, &config, !no_dedupe),
    };

    let export = RankingExport::new(ranked, &config);

    if let Some(dir) = &output {
        let timestamp = export.generated_at.format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("ranking-{timestamp}.json"));
        export.save_json(&path)?;
        eprintln!("Ranking saved to: {}", path.display());
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&export)?),
        "markdown" | "md" => println!("{}", export.to_markdown()),
        _ => print_summary(&export),
    }

    Ok(())
}

/// Ids of the most recently answered questions; the file is in answer order,
/// oldest first.
fn recent_question_ids(path: &std::path::Path) -> Result<Vec<QuestionId>> {
    let answers = load_answers(path)?;
    Ok(answers
        .iter()
        .rev()
        .take(RECENT_ANSWER_WINDOW)
        .map(|a| a.question_id.clone())
        .collect())
}

fn print_summary(export: &RankingExport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Question",
        "Score",
        "Frequency",
        "Accuracy",
        "Expert",
        "Bonus",
    ]);

    for (i, q) in export.questions.iter().take(TEXT_PREVIEW_ROWS).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&q.question_id),
            Cell::new(format!("{:.4}", q.final_score)),
            Cell::new(format!("{:.3}", q.frequency_score)),
            Cell::new(format!("{:.3}", q.accuracy_score)),
            Cell::new(format!("{:.3}", q.expert_score)),
            Cell::new(format!("{:.2}", q.year_bonus)),
        ]);
    }

    println!("{table}");
    if export.total_count > TEXT_PREVIEW_ROWS {
        println!("... {} more", export.total_count - TEXT_PREVIEW_ROWS);
    }
    println!(
        "Selected {} questions ({} appeared every year)",
        export.total_count, export.every_year_count
    );
}
