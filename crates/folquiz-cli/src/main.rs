//! folquiz CLI: generate and grade first-order logic truth-value quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "folquiz",
    version,
    about = "First-order logic truth-value quizzes over small finite models"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz
    Generate {
        /// Atomic problems (stage 0)
        #[arg(long)]
        stage0: Option<usize>,

        /// Existential problems (stage 1)
        #[arg(long)]
        stage1: Option<usize>,

        /// Universal problems (stage 2)
        #[arg(long)]
        stage2: Option<usize>,

        /// Scope and mixed-quantifier problems (stage 3)
        #[arg(long)]
        stage3: Option<usize>,

        /// Number of individuals in the model (3-5)
        #[arg(long)]
        domain_size: Option<usize>,

        /// Seed for a reproducible quiz
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade answers against a saved quiz
    Grade {
        /// Quiz JSON written by `folquiz generate`
        #[arg(long)]
        quiz: PathBuf,

        /// Answer sheet (.toml or .json)
        #[arg(long, conflicts_with = "answer_list", required_unless_present = "answer_list")]
        answers: Option<PathBuf>,

        /// Inline answers, e.g. "T,F:alice,T:bob"
        #[arg(long)]
        answer_list: Option<String>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the formatted report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check an answer sheet against a quiz
    Validate {
        /// Quiz JSON written by `folquiz generate`
        #[arg(long)]
        quiz: PathBuf,

        /// Answer sheet (.toml or .json)
        #[arg(long)]
        answers: PathBuf,
    },

    /// List formula templates
    Catalog {
        /// Only this stage (0-3 or atomic/existential/universal/scope)
        #[arg(long)]
        stage: Option<String>,
    },

    /// Create a starter config and answer sheet
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            stage0,
            stage1,
            stage2,
            stage3,
            domain_size,
            seed,
            output,
            format,
            config,
        } => commands::generate::execute(commands::generate::GenerateArgs {
            stage_counts: [stage0, stage1, stage2, stage3],
            domain_size,
            seed,
            output,
            format,
            config,
        }),
        Commands::Grade {
            quiz,
            answers,
            answer_list,
            format,
            output,
        } => commands::grade::execute(quiz, answers, answer_list, format, output),
        Commands::Validate { quiz, answers } => commands::validate::execute(quiz, answers),
        Commands::Catalog { stage } => commands::catalog::execute(stage),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
