//! The `passmark init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("passmark.toml").exists() {
        println!("passmark.toml already exists, skipping.");
    } else {
        std::fs::write("passmark.toml", SAMPLE_CONFIG)?;
        println!("Created passmark.toml");
    }

    std::fs::create_dir_all("data")?;
    for (name, content) in [
        ("data/questions.json", EXAMPLE_QUESTIONS),
        ("data/answers.json", EXAMPLE_ANSWERS),
        ("data/corpus.json", EXAMPLE_CORPUS),
    ] {
        if Path::new(name).exists() {
            println!("{name} already exists, skipping.");
        } else {
            std::fs::write(name, content)?;
            println!("Created {name}");
        }
    }

    let exam = "--questions data/questions.json --answers data/answers.json";
    println!("\nNext steps:");
    println!("  1. Run: passmark score {exam}");
    println!("  2. Run: passmark rank --corpus data/corpus.json --top 300");
    println!("  3. Run: passmark weak {exam}");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# passmark configuration

[scoring]
mandatory_penalty_factor = 0.2
clip_max_score = true
max_score = 100.0
decimal_places = 2

[scoring.difficulty_bonus]
LOW = 0.0
MID = 0.0
HIGH = 0.2

[ranking]
# Expected to sum to 1.0; not enforced.
frequency_weight = 0.5
accuracy_weight = 0.3
expert_weight = 0.2
every_year_bonus = 0.2
years_to_consider = 8
decimal_places = 4
# "last_wins" or "first_wins"
dedupe_policy = "last_wins"

[ranking.almost_every_year_bonus]
7 = 0.1
6 = 0.05
"#;

const EXAMPLE_QUESTIONS: &str = r#"[
  {"id": 1, "is_mandatory": 1, "difficulty": "MID"},
  {"id": 2, "is_mandatory": 1, "difficulty": "MID"},
  {"id": 3, "is_mandatory": 1, "difficulty": "LOW"},
  {"id": 4, "is_mandatory": 0, "difficulty": "HIGH"},
  {"id": 5, "is_mandatory": 0, "difficulty": "HIGH"},
  {"id": 6, "is_mandatory": 0, "difficulty": "MID"},
  {"id": 7, "is_mandatory": 0, "difficulty": "LOW"},
  {"id": 8, "is_mandatory": 0, "difficulty": "LOW"},
  {"id": 9, "is_mandatory": 0, "difficulty": "MID"},
  {"id": 10, "is_mandatory": 0, "difficulty": "LOW"}
]
"#;

const EXAMPLE_ANSWERS: &str = r#"[
  {"question_id": 1, "status": true},
  {"question_id": 2, "status": true},
  {"question_id": 3, "status": true},
  {"question_id": 4, "status": true},
  {"question_id": 5, "status": true},
  {"question_id": 6, "status": true},
  {"question_id": 7, "status": true},
  {"question_id": 8, "status": true},
  {"question_id": 9, "status": false},
  {"question_id": 10, "status": false}
]
"#;

const EXAMPLE_CORPUS: &str = r#"[
  {"id": 1, "content": "Ohm's law", "year_list": "2016,2017,2018,2019,2020,2021,2022,2023", "accuracy": 0.82, "expert_score": 0.9},
  {"id": 2, "content": "Three-phase power", "year_list": "2017,2018,2019,2020,2021,2022,2023", "accuracy": 0.41, "expert_score": 0.8},
  {"id": 3, "content": "Grounding systems", "year_list": "2019,2021,2023", "accuracy": 0.35, "expert_score": 0.6},
  {"id": 4, "content": "Transformer losses", "year_list": "2018,2019,2020,2021,2022,2023", "accuracy": 0.55, "expert_score": 0.7}
]
"#;
