//! The `folquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use folquiz_core::parser::{parse_answer_sheet, validate_answer_sheet};
use folquiz_core::quiz::Quiz;

pub fn execute(quiz_path: PathBuf, answers_path: PathBuf) -> Result<()> {
    let quiz = Quiz::load_json(&quiz_path)?;
    let sheet = parse_answer_sheet(&answers_path)?;

    println!(
        "Quiz {} ({} problems), {} answers",
        quiz.metadata.id,
        quiz.len(),
        sheet.answers.len()
    );

    let warnings = validate_answer_sheet(&quiz, &sheet);
    for w in &warnings {
        let prefix = w
            .problem
            .map(|n| format!("  [{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Answer sheet valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
