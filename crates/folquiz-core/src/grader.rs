//! Grading student answers against a quiz.
//!
//! Ground truth is recomputed from the template's evaluator, the quiz's model,
//! and the problem's stored substitution. A missing or wrong witness is a
//! graded outcome, never an error.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::Stage;
use crate::quiz::{InstantiatedProblem, Quiz};
use crate::report::QuizGradingReport;

/// Marker a student may submit instead of a witness.
pub const NOT_APPLICABLE: &str = "n/a";

/// One submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAnswer {
    pub truth_value: bool,
    /// Witness or counterexample individual, or [`NOT_APPLICABLE`].
    #[serde(default)]
    pub witness: Option<String>,
}

impl StudentAnswer {
    pub fn new(truth_value: bool, witness: Option<&str>) -> Self {
        Self {
            truth_value,
            witness: witness.map(str::to_string),
        }
    }

    /// The submitted individual, if any. Blank and `n/a` count as no answer.
    pub fn candidate(&self) -> Option<&str> {
        normalize_witness(self.witness.as_deref())
    }
}

/// Trim a submitted witness; blank and `n/a` (any case) become `None`.
pub fn normalize_witness(witness: Option<&str>) -> Option<&str> {
    witness
        .map(str::trim)
        .filter(|w| !w.is_empty() && !w.eq_ignore_ascii_case(NOT_APPLICABLE))
}

/// Grading outcome for a single problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingResult {
    pub number: usize,
    pub formula: String,
    pub template_id: String,
    pub stage: Stage,
    /// Truth value correct AND witness correct.
    pub correct: bool,
    pub truth_value_correct: bool,
    /// Defaults to `true` when no witness is required.
    pub witness_correct: bool,
    pub witness_required: bool,
    /// Ground-truth value of the formula.
    pub correct_answer: bool,
    /// Why the witness or counterexample was rejected.
    #[serde(default)]
    pub witness_message: Option<String>,
    pub submitted_truth_value: bool,
    #[serde(default)]
    pub submitted_witness: Option<String>,
}

/// Which kind of supporting individual a problem asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Support {
    Witness,
    Counterexample,
}

impl Support {
    fn noun(self) -> &'static str {
        match self {
            Support::Witness => "witness",
            Support::Counterexample => "counterexample",
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            Support::Witness => "A witness is required for this true existential claim.",
            Support::Counterexample => {
                "A counterexample is required for this false universal claim."
            }
        }
    }
}

/// Grade one answer. `number` is 1-based.
pub fn check_answer(
    quiz: &Quiz,
    number: usize,
    truth_value: bool,
    witness: Option<&str>,
) -> Result<GradingResult, QuizError> {
    let problem = quiz.problem(number).ok_or(QuizError::InvalidProblemIndex {
        number,
        total: quiz.len(),
    })?;
    let template = problem.template;
    let model = &quiz.model;
    let subs = &problem.substitution;

    subs.check_against(template, model)?;

    let correct_answer = template.truth(model, subs);
    let truth_value_correct = truth_value == correct_answer;

    let support = match (problem.requires_witness, problem.requires_counterexample) {
        (true, _) if correct_answer => Some(Support::Witness),
        (_, true) if !correct_answer => Some(Support::Counterexample),
        _ => None,
    };

    let (witness_correct, witness_message) = match support {
        None => (true, None),
        Some(kind) => match normalize_witness(witness) {
            None => (false, Some(kind.missing_message().to_string())),
            Some(candidate) if !model.contains(candidate) => (
                false,
                Some(format!("\"{candidate}\" is not in the domain.")),
            ),
            Some(candidate) => {
                let verdict = match kind {
                    Support::Witness => template.check_witness(candidate, model, subs),
                    Support::Counterexample => {
                        template.check_counterexample(candidate, model, subs)
                    }
                }
                .ok_or_else(|| QuizError::MissingEvaluator {
                    template: template.id.to_string(),
                    kind: kind.noun(),
                })?;
                let message = (!verdict)
                    .then(|| format!("\"{candidate}\" is not a valid {}.", kind.noun()));
                (verdict, message)
            }
        },
    };

    let result = GradingResult {
        number: problem.number,
        formula: problem.formula.clone(),
        template_id: template.id.to_string(),
        stage: problem.stage,
        correct: truth_value_correct && witness_correct,
        truth_value_correct,
        witness_correct,
        witness_required: support.is_some(),
        correct_answer,
        witness_message,
        submitted_truth_value: truth_value,
        submitted_witness: witness.map(str::to_string),
    };

    tracing::debug!(
        problem = result.number,
        template = template.id,
        correct = result.correct,
        witness_required = result.witness_required,
        "graded answer"
    );

    Ok(result)
}

/// Grade answers in order; answer `i` is graded against problem `i + 1`.
pub fn grade_quiz(quiz: &Quiz, answers: &[StudentAnswer]) -> Result<QuizGradingReport, QuizError> {
    if answers.len() != quiz.len() {
        tracing::warn!(
            answers = answers.len(),
            problems = quiz.len(),
            "answer count differs from problem count"
        );
    }

    let results = answers
        .iter()
        .enumerate()
        .map(|(index, answer)| {
            check_answer(quiz, index + 1, answer.truth_value, answer.witness.as_deref())
        })
        .collect::<Result<Vec<_>, QuizError>>()?;

    Ok(QuizGradingReport::from_results(quiz.metadata.id, results))
}

/// Whether the problem asks for a witness or counterexample given its ground truth.
pub fn requires_support(problem: &InstantiatedProblem, correct_answer: bool) -> bool {
    (problem.requires_witness && correct_answer)
        || (problem.requires_counterexample && !correct_answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_builtin;
    use crate::instantiate::{render, Substitution};
    use crate::model::{ConstantAssignment, Model};
    use crate::quiz::QuizMetadata;
    use uuid::Uuid;

    /// Quiz over domain [alice, bob, charlie], P = {alice}, Q = {bob, charlie}, c = alice.
    fn quiz_with(ids: &[&str]) -> Quiz {
        let model = Model::from_lists(
            &["alice", "bob", "charlie"],
            &[('P', &["alice"]), ('Q', &["bob", "charlie"]), ('R', &[])],
        )
        .unwrap();
        let mut constants = ConstantAssignment::new();
        constants.assign('c', "alice");

        let problems: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let template = find_builtin(id).unwrap();
                let substitution =
                    crate::instantiate::substitute(template, &model, &constants).unwrap();
                InstantiatedProblem {
                    number: i + 1,
                    formula: render(template.pattern, &substitution),
                    template,
                    substitution,
                    stage: template.stage,
                    requires_witness: template.requires_witness,
                    requires_counterexample: template.requires_counterexample,
                }
            })
            .collect();

        Quiz {
            metadata: QuizMetadata {
                id: Uuid::nil(),
                generated_at: chrono::Utc::now(),
                domain_size: model.domain_size(),
                total_problems: problems.len(),
                seed: None,
            },
            model,
            constants,
            problems,
        }
    }

    #[test]
    fn conjunction_with_constant_end_to_end() {
        let quiz = quiz_with(&["stage0_conjunction"]);
        assert_eq!(quiz.problems[0].formula, "P(c) ∧ Q(c)");

        let right = check_answer(&quiz, 1, false, None).unwrap();
        assert!(right.correct);
        assert!(!right.correct_answer);
        assert!(!right.witness_required);

        let wrong = check_answer(&quiz, 1, true, None).unwrap();
        assert!(!wrong.correct);
        assert!(!wrong.truth_value_correct);
        assert!(wrong.witness_correct);
    }

    #[test]
    fn existential_accepts_exactly_the_valid_witnesses() {
        let quiz = quiz_with(&["stage1_simple_existential"]);
        let valid: Vec<_> = quiz
            .model
            .domain()
            .iter()
            .filter(|x| check_answer(&quiz, 1, true, Some(x.as_str())).unwrap().correct)
            .cloned()
            .collect();
        assert_eq!(valid, vec!["alice".to_string()]);
    }

    #[test]
    fn witness_messages() {
        let quiz = quiz_with(&["stage1_simple_existential"]);

        for absent in [None, Some(""), Some("  "), Some("n/a"), Some("N/A")] {
            let r = check_answer(&quiz, 1, true, absent).unwrap();
            assert!(!r.correct);
            assert!(r.truth_value_correct);
            assert!(r.witness_message.unwrap().contains("required"));
        }

        let outsider = check_answer(&quiz, 1, true, Some("zed")).unwrap();
        assert!(!outsider.correct);
        assert!(outsider
            .witness_message
            .unwrap()
            .contains("not in the domain"));

        let invalid = check_answer(&quiz, 1, true, Some("bob")).unwrap();
        assert!(!invalid.witness_correct);
        assert_eq!(
            invalid.witness_message.as_deref(),
            Some("\"bob\" is not a valid witness.")
        );

        let valid = check_answer(&quiz, 1, true, Some(" alice ")).unwrap();
        assert!(valid.correct);
        assert!(valid.witness_message.is_none());
    }

    #[test]
    fn false_existential_needs_no_witness() {
        let quiz = quiz_with(&["stage1_existential_conjunction_2pred"]);
        let r = check_answer(&quiz, 1, false, None).unwrap();
        assert!(!r.correct_answer);
        assert!(!r.witness_required);
        assert!(r.correct);
    }

    #[test]
    fn false_universal_needs_a_counterexample() {
        let quiz = quiz_with(&["stage2_simple_universal"]);
        let missing = check_answer(&quiz, 1, false, Some("n/a")).unwrap();
        assert!(missing.witness_required);
        assert!(missing
            .witness_message
            .unwrap()
            .contains("counterexample is required"));

        let bad = check_answer(&quiz, 1, false, Some("alice")).unwrap();
        assert_eq!(
            bad.witness_message.as_deref(),
            Some("\"alice\" is not a valid counterexample.")
        );

        let good = check_answer(&quiz, 1, false, Some("bob")).unwrap();
        assert!(good.correct);
    }

    #[test]
    fn unnecessary_witness_is_not_penalised() {
        let quiz = quiz_with(&["stage3_negated_universal", "stage2_universal_tautology"]);
        let scope = check_answer(&quiz, 1, true, Some("zed")).unwrap();
        assert!(scope.correct);
        assert!(!scope.witness_required);

        let tautology = check_answer(&quiz, 2, true, Some("alice")).unwrap();
        assert!(tautology.correct);
    }

    #[test]
    fn out_of_range_problem_numbers() {
        let quiz = quiz_with(&["stage0_atomic_pos"]);
        assert_eq!(
            check_answer(&quiz, 0, true, None).unwrap_err(),
            QuizError::InvalidProblemIndex { number: 0, total: 1 }
        );
        assert!(check_answer(&quiz, 2, true, None).is_err());
    }

    #[test]
    fn mismatched_substitution_is_reported() {
        let mut quiz = quiz_with(&["stage0_conjunction"]);
        quiz.problems[0].substitution = Substitution::new().with_predicate('P', 'P');
        assert!(check_answer(&quiz, 1, true, None)
            .unwrap_err()
            .is_catalog_bug());
    }

    #[test]
    fn grade_quiz_aggregates() {
        let quiz = quiz_with(&[
            "stage0_conjunction",
            "stage1_simple_existential",
            "stage2_simple_universal",
        ]);
        let answers = vec![
            StudentAnswer::new(false, None),
            StudentAnswer::new(true, Some("bob")),
            StudentAnswer::new(false, Some("charlie")),
        ];
        let report = grade_quiz(&quiz, &answers).unwrap();
        assert_eq!(report.total_problems, 3);
        assert_eq!(report.correct_problems, 2);
        assert_eq!(report.percentage, 67);
        assert!((report.score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn grade_quiz_is_idempotent() {
        let quiz = quiz_with(&["stage1_simple_existential", "stage3_separate_existentials"]);
        let answers = vec![
            StudentAnswer::new(true, Some("alice")),
            StudentAnswer::new(false, None),
        ];
        let first = grade_quiz(&quiz, &answers).unwrap();
        let second = grade_quiz(&quiz, &answers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn too_many_answers_is_an_error() {
        let quiz = quiz_with(&["stage0_atomic_pos"]);
        let answers = vec![StudentAnswer::new(true, None); 2];
        assert!(matches!(
            grade_quiz(&quiz, &answers),
            Err(QuizError::InvalidProblemIndex { number: 2, total: 1 })
        ));
    }

    #[test]
    fn requires_support_matches_grading() {
        let quiz = quiz_with(&["stage1_simple_existential", "stage2_simple_universal"]);
        assert!(requires_support(&quiz.problems[0], true));
        assert!(!requires_support(&quiz.problems[0], false));
        assert!(requires_support(&quiz.problems[1], false));
        assert!(!requires_support(&quiz.problems[1], true));
    }
}
