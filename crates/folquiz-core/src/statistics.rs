//! Score aggregation for graded quizzes.

use serde::{Deserialize, Serialize};

use crate::grader::GradingResult;
use crate::model::Stage;

/// Fraction of correct answers; `0.0` when nothing was answered.
pub fn score(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64
}

/// A score as a whole percentage, rounded half away from zero.
pub fn percentage(score: f64) -> u32 {
    (score * 100.0).round() as u32
}

/// Results for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStats {
    pub stage: Stage,
    pub total: usize,
    pub correct: usize,
    /// Correct truth values, ignoring witnesses.
    pub truth_values_correct: usize,
    pub accuracy: f64,
}

/// How students fared on problems that asked for a witness or counterexample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WitnessStats {
    /// Problems whose ground truth made a witness/counterexample mandatory.
    pub required: usize,
    /// Of those, how many got an acceptable individual.
    pub supplied_correctly: usize,
}

/// Per-stage breakdown, ascending by stage; stages with no results are omitted.
pub fn compute_stage_stats(results: &[GradingResult]) -> Vec<StageStats> {
    Stage::ALL
        .into_iter()
        .filter_map(|stage| {
            let in_stage: Vec<_> = results.iter().filter(|r| r.stage == stage).collect();
            if in_stage.is_empty() {
                return None;
            }
            let total = in_stage.len();
            let correct = in_stage.iter().filter(|r| r.correct).count();
            let truth_values_correct = in_stage.iter().filter(|r| r.truth_value_correct).count();
            Some(StageStats {
                stage,
                total,
                correct,
                truth_values_correct,
                accuracy: score(correct, total),
            })
        })
        .collect()
}

pub fn compute_witness_stats(results: &[GradingResult]) -> WitnessStats {
    let required: Vec<_> = results.iter().filter(|r| r.witness_required).collect();
    WitnessStats {
        required: required.len(),
        supplied_correctly: required.iter().filter(|r| r.witness_correct).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(stage: Stage, correct: bool, witness_required: bool) -> GradingResult {
        GradingResult {
            number: 1,
            formula: String::new(),
            template_id: "t".into(),
            stage,
            correct,
            truth_value_correct: true,
            witness_correct: correct,
            witness_required,
            correct_answer: true,
            witness_message: None,
            submitted_truth_value: true,
            submitted_witness: None,
        }
    }

    #[test]
    fn score_and_percentage() {
        assert_eq!(score(0, 0), 0.0);
        assert_eq!(score(3, 4), 0.75);
        assert_eq!(percentage(score(2, 3)), 67);
        assert_eq!(percentage(score(1, 3)), 33);
        assert_eq!(percentage(score(1, 8)), 13);
        assert_eq!(percentage(1.0), 100);
    }

    #[test]
    fn stage_breakdown_skips_unanswered_stages() {
        let results = vec![
            result(Stage::Existential, true, true),
            result(Stage::Existential, false, true),
            result(Stage::Scope, true, false),
        ];
        let stats = compute_stage_stats(&results);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].stage, Stage::Existential);
        assert_eq!((stats[0].correct, stats[0].total), (1, 2));
        assert_eq!(stats[0].truth_values_correct, 2);
        assert_eq!(stats[0].accuracy, 0.5);
        assert_eq!(stats[1].stage, Stage::Scope);
    }

    #[test]
    fn witness_breakdown() {
        let results = vec![
            result(Stage::Existential, true, true),
            result(Stage::Universal, false, true),
            result(Stage::Atomic, false, false),
        ];
        let stats = compute_witness_stats(&results);
        assert_eq!(stats.required, 2);
        assert_eq!(stats.supplied_correctly, 1);
    }
}
