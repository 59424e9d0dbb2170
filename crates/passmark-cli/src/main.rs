//! passmark CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "passmark",
    version,
    about = "Exam pass-score calculator and frequent-question ranker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one exam attempt
    Score {
        /// Question catalog JSON
        #[arg(long)]
        questions: PathBuf,

        /// User answers JSON
        #[arg(long)]
        answers: PathBuf,

        /// Attempt history JSON; the new attempt is compared and appended
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rank a historical question corpus and select the top K
    Rank {
        /// Question corpus JSON
        #[arg(long)]
        corpus: PathBuf,

        /// Number of questions to select
        #[arg(long, default_value = "300")]
        top: usize,

        /// Keep records with repeated ids
        #[arg(long)]
        no_dedupe: bool,

        /// On repeated ids keep the first record instead of the last
        #[arg(long)]
        first_wins: bool,

        /// Answers JSON whose most recent questions are excluded
        #[arg(long)]
        exclude: Option<PathBuf>,

        /// Output directory for the ranking export
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the questions a user should revisit
    Weak {
        /// Question catalog JSON
        #[arg(long)]
        questions: PathBuf,

        /// Answer history JSON
        #[arg(long)]
        answers: PathBuf,

        /// Number of questions to list
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Validate a config file
    ValidateConfig {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example data
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("passmark=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            questions,
            answers,
            history,
            format,
            config,
        } => commands::score::execute(questions, answers, history, format, config),
        Commands::Rank {
            corpus,
            top,
            no_dedupe,
            first_wins,
            exclude,
            output,
            format,
            config,
        } => commands::rank::execute(
            corpus, top, no_dedupe, first_wins, exclude, output, format, config,
        ),
        Commands::Weak {
            questions,
            answers,
            limit,
        } => commands::weak::execute(questions, answers, limit),
        Commands::ValidateConfig { config } => commands::validate::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
