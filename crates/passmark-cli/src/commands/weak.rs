//! The `passmark weak` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use passmark_core::loader::{load_answers, load_questions};
use passmark_core::model::Question;
use passmark_core::weak::{prioritize_weak_questions, weakness_priority};

pub fn execute(questions_path: PathBuf, answers_path: PathBuf, limit: usize) -> Result<()> {
    anyhow::ensure!(limit >= 1, "--limit must be at least 1");

    let questions = load_questions(&questions_path)?;
    let history = load_answers(&answers_path)?;

    let weak = prioritize_weak_questions(&questions, &history, limit);
    if weak.is_empty() {
        println!("No weak questions found.");
        return Ok(());
    }

    let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();
    let mut missed: HashMap<&str, usize> = HashMap::new();
    for answer in history.iter().filter(|a| !a.is_correct) {
        *missed.entry(answer.question_id.as_str()).or_default() += 1;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Question",
        "Difficulty",
        "Mandatory",
        "Missed",
        "Priority",
    ]);

    for (i, id) in weak.iter().enumerate() {
        let Some(q) = by_id.get(id.as_str()) else {
            continue;
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(id),
            Cell::new(q.difficulty),
            Cell::new(if q.is_mandatory { "yes" } else { "" }),
            Cell::new(missed.get(id.as_str()).copied().unwrap_or(0)),
            Cell::new(weakness_priority(q)),
        ]);
    }

    println!("{table}");
    Ok(())
}
