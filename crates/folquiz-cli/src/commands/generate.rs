//! The `folquiz generate` command.

use std::path::PathBuf;

use anyhow::Result;

use folquiz_core::config::load_config_from;
use folquiz_core::engine::QuizAssembler;
use folquiz_core::quiz::Quiz;
use folquiz_report::html::write_quiz_html;

/// Flags for `folquiz generate`; `None` leaves the configured value.
pub struct GenerateArgs {
    pub stage_counts: [Option<usize>; 4],
    pub domain_size: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let formats = parse_formats(&args.format)?;

    let config = load_config_from(args.config.as_deref())?;
    let mut quiz_config = config.to_quiz_config();

    let [stage0, stage1, stage2, stage3] = args.stage_counts;
    let counts = &mut quiz_config.stage_counts;
    for (slot, flag) in [
        (&mut counts.stage0, stage0),
        (&mut counts.stage1, stage1),
        (&mut counts.stage2, stage2),
        (&mut counts.stage3, stage3),
    ] {
        if let Some(n) = flag {
            *slot = n;
        }
    }
    if args.domain_size.is_some() {
        quiz_config.domain_size = args.domain_size;
    }
    if args.seed.is_some() {
        quiz_config.seed = args.seed;
    }

    anyhow::ensure!(
        quiz_config.stage_counts.total() > 0,
        "at least one problem must be requested"
    );

    tracing::debug!(?quiz_config, "resolved generation settings");
    let quiz = QuizAssembler::new(quiz_config).generate()?;

    print_quiz(&quiz);

    let output = args.output.unwrap_or(config.output_dir);
    std::fs::create_dir_all(&output)?;
    let stem = quiz_file_stem(&quiz);

    for fmt in formats {
        match fmt {
            QuizFormat::Json => {
                let path = output.join(format!("{stem}.json"));
                quiz.save_json(&path)?;
                eprintln!("Quiz saved to: {}", path.display());
            }
            QuizFormat::Html => {
                let path = output.join(format!("{stem}.html"));
                write_quiz_html(&quiz, &path)?;
                eprintln!("Worksheet: {}", path.display());
            }
        }
    }

    Ok(())
}

/// `quiz-<timestamp>-<id prefix>`, unique across runs within the same second.
fn quiz_file_stem(quiz: &Quiz) -> String {
    let timestamp = quiz.metadata.generated_at.format("%Y-%m-%dT%H%M%S");
    let id = quiz.metadata.id.simple().to_string();
    format!("quiz-{timestamp}-{}", &id[..8])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizFormat {
    Json,
    Html,
}

fn parse_formats(format: &str) -> Result<Vec<QuizFormat>> {
    if format == "all" {
        return Ok(vec![QuizFormat::Json, QuizFormat::Html]);
    }
    format
        .split(',')
        .map(|f| match f.trim() {
            "json" => Ok(QuizFormat::Json),
            "html" => Ok(QuizFormat::Html),
            other => anyhow::bail!("unknown format: {other} (expected json, html, or all)"),
        })
        .collect()
}

fn print_quiz(quiz: &Quiz) {
    use comfy_table::{Cell, Table};

    println!("Quiz {}", quiz.metadata.id);
    println!("Domain: {{ {} }}", quiz.model.domain().join(", "));

    let mut legend = Table::new();
    let mut header = vec!["Individual".to_string()];
    header.extend(quiz.model.predicate_letters().map(String::from));
    legend.set_header(header);
    for individual in quiz.model.domain() {
        let mut row = vec![Cell::new(individual)];
        row.extend(quiz.model.predicate_letters().map(|letter| {
            Cell::new(if quiz.model.holds(letter, individual) {
                "x"
            } else {
                ""
            })
        }));
        legend.add_row(row);
    }
    println!("{legend}");

    for (letter, individual) in quiz.constants.iter() {
        println!("{letter} = {individual}");
    }
    println!();

    for problem in &quiz.problems {
        let hint = match (problem.requires_witness, problem.requires_counterexample) {
            (true, _) => "  [witness if true]",
            (_, true) => "  [counterexample if false]",
            _ => "",
        };
        println!("{:>2}. {}{hint}", problem.number, problem.formula);
    }
}
