//! Quiz grading report with JSON persistence and Markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grader::GradingResult;
use crate::statistics::{
    compute_stage_stats, compute_witness_stats, percentage, score, StageStats, WitnessStats,
};

/// Graded quiz: per-problem results plus aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizGradingReport {
    /// Id of the graded quiz.
    pub quiz_id: Uuid,
    pub results: Vec<GradingResult>,
    pub total_problems: usize,
    pub correct_problems: usize,
    /// `correct_problems / total_problems`.
    pub score: f64,
    pub percentage: u32,
    pub per_stage: Vec<StageStats>,
    pub witnesses: WitnessStats,
}

impl QuizGradingReport {
    /// Aggregate per-problem results.
    pub fn from_results(quiz_id: Uuid, results: Vec<GradingResult>) -> Self {
        let total_problems = results.len();
        let correct_problems = results.iter().filter(|r| r.correct).count();
        let score = score(correct_problems, total_problems);
        let per_stage = compute_stage_stats(&results);
        let witnesses = compute_witness_stats(&results);

        tracing::info!(
            quiz_id = %quiz_id,
            correct = correct_problems,
            total = total_problems,
            "graded quiz"
        );

        Self {
            quiz_id,
            results,
            total_problems,
            correct_problems,
            score,
            percentage: percentage(score),
            per_stage,
            witnesses,
        }
    }

    /// Results that were not fully correct.
    pub fn mistakes(&self) -> impl Iterator<Item = &GradingResult> {
        self.results.iter().filter(|r| !r.correct)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizGradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {}/{} ({}%)\n\n",
            self.correct_problems, self.total_problems, self.percentage
        ));

        if !self.per_stage.is_empty() {
            md.push_str("### By stage\n\n");
            md.push_str("| Stage | Correct | Truth values | Accuracy |\n");
            md.push_str("|-------|---------|--------------|----------|\n");
            for s in &self.per_stage {
                md.push_str(&format!(
                    "| {} | {}/{} | {}/{} | {:.1}% |\n",
                    s.stage,
                    s.correct,
                    s.total,
                    s.truth_values_correct,
                    s.total,
                    s.accuracy * 100.0
                ));
            }
            md.push('\n');
        }

        if !self.results.is_empty() {
            md.push_str("### Problems\n\n");
            md.push_str("| # | Formula | Answer | Expected | Result | Note |\n");
            md.push_str("|---|---------|--------|----------|--------|------|\n");
            for r in &self.results {
                md.push_str(&format!(
                    "| {} | `{}` | {} | {} | {} | {} |\n",
                    r.number,
                    r.formula,
                    truth_label(r.submitted_truth_value),
                    truth_label(r.correct_answer),
                    if r.correct { "correct" } else { "incorrect" },
                    r.witness_message.as_deref().unwrap_or("")
                ));
            }
        }

        md
    }
}

fn truth_label(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}
