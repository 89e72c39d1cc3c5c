//! The `folquiz grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use folquiz_core::grader::grade_quiz;
use folquiz_core::parser::{
    parse_answer_shorthand, parse_answer_sheet, validate_answer_sheet, AnswerSheet,
};
use folquiz_core::quiz::Quiz;
use folquiz_core::report::QuizGradingReport;
use folquiz_report::html::{generate_report_html, write_report_html};

pub fn execute(
    quiz_path: PathBuf,
    answers_path: Option<PathBuf>,
    answer_list: Option<String>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let quiz = Quiz::load_json(&quiz_path)?;

    let sheet = match (answers_path, answer_list) {
        (Some(path), _) => parse_answer_sheet(&path)?,
        (None, Some(list)) => AnswerSheet {
            answers: parse_answer_shorthand(&list)?,
            ..Default::default()
        },
        (None, None) => anyhow::bail!("either --answers or --answer-list is required"),
    };

    for w in validate_answer_sheet(&quiz, &sheet) {
        let prefix = w
            .problem
            .map(|n| format!("[{n}] "))
            .unwrap_or_default();
        eprintln!("{prefix}WARNING: {}", w.message);
    }

    let report = grade_quiz(&quiz, &sheet.answers)?;

    if format == "text" {
        print_summary(&report, sheet.student.as_deref());
        return Ok(());
    }

    let Some(path) = output else {
        let rendered = match format.as_str() {
            "json" => serde_json::to_string_pretty(&report)?,
            "markdown" | "md" => report.to_markdown(),
            "html" => generate_report_html(&report),
            other => anyhow::bail!(unknown_format(other)),
        };
        println!("{rendered}");
        return Ok(());
    };

    match format.as_str() {
        "json" => report.save_json(&path)?,
        "markdown" | "md" => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, report.to_markdown())
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        "html" => write_report_html(&report, &path)?,
        other => anyhow::bail!(unknown_format(other)),
    }
    eprintln!("Report saved to: {}", path.display());

    Ok(())
}

fn unknown_format(format: &str) -> String {
    format!("unknown format: {format} (expected text, json, markdown, or html)")
}

fn print_summary(report: &QuizGradingReport, student: Option<&str>) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Formula", "Answer", "Expected", "Result", "Note"]);

    for r in &report.results {
        let answer = match &r.submitted_witness {
            Some(w) => format!("{} ({w})", truth_label(r.submitted_truth_value)),
            None => truth_label(r.submitted_truth_value).to_string(),
        };
        table.add_row(vec![
            Cell::new(r.number),
            Cell::new(&r.formula),
            Cell::new(answer),
            Cell::new(truth_label(r.correct_answer)),
            Cell::new(if r.correct { "correct" } else { "incorrect" }),
            Cell::new(r.witness_message.as_deref().unwrap_or("")),
        ]);
    }

    println!("{table}");

    if let Some(student) = student {
        println!("Student: {student}");
    }
    println!(
        "Score: {}/{} ({}%)",
        report.correct_problems, report.total_problems, report.percentage
    );
    for s in &report.per_stage {
        println!(
            "  Stage {}: {}/{} ({:.1}%)",
            s.stage,
            s.correct,
            s.total,
            s.accuracy * 100.0
        );
    }
    if report.witnesses.required > 0 {
        println!(
            "  Witnesses/counterexamples: {}/{}",
            report.witnesses.supplied_correctly, report.witnesses.required
        );
    }
}

fn truth_label(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}
