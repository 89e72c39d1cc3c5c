//! Quiz engine error types.
//!
//! These errors represent failures of quiz generation and grading requests.
//! An incorrect witness or counterexample is *not* an error: it is an expected
//! outcome and is recorded on the [`GradingResult`](crate::grader::GradingResult).

use thiserror::Error;

/// Errors that can occur when generating or grading a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// A template was requested from a stage with no catalog entries.
    #[error("stage {0} has no templates in the catalog")]
    EmptyStage(u8),

    /// A grading request referenced a problem number outside the quiz.
    #[error("problem {number} is out of range (quiz has {total} problems)")]
    InvalidProblemIndex { number: usize, total: usize },

    /// A stage number outside 0..=3.
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    /// A template identifier that the catalog does not know.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// The requested domain size is outside the supported range.
    #[error("domain size must be between {min} and {max}, got {requested}")]
    InvalidDomainSize {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// More predicates requested than the predicate alphabet holds.
    #[error("cannot interpret {requested} predicates (alphabet has {available})")]
    TooManyPredicates { requested: usize, available: usize },

    /// More constants requested than the constant alphabet holds.
    #[error("cannot assign {requested} constants (alphabet has {available})")]
    TooManyConstants { requested: usize, available: usize },

    /// A hand-built model violates the domain/extension invariants.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// A template's placeholders cannot be bound with the given model or substitution.
    #[error("template '{template}' needs {needed} {kind}, only {available} available")]
    ArityMismatch {
        template: String,
        kind: &'static str,
        needed: usize,
        available: usize,
    },

    /// A template flags a witness/counterexample requirement but ships no evaluator for it.
    #[error("template '{template}' requires a {kind} but has no {kind} evaluator")]
    MissingEvaluator {
        template: String,
        kind: &'static str,
    },
}

impl QuizError {
    /// Returns `true` if the error points at a broken catalog entry rather than bad input.
    pub fn is_catalog_bug(&self) -> bool {
        matches!(
            self,
            QuizError::MissingEvaluator { .. } | QuizError::ArityMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = QuizError::InvalidProblemIndex {
            number: 9,
            total: 7,
        };
        assert_eq!(
            err.to_string(),
            "problem 9 is out of range (quiz has 7 problems)"
        );
        assert_eq!(
            QuizError::EmptyStage(3).to_string(),
            "stage 3 has no templates in the catalog"
        );
    }

    #[test]
    fn catalog_bugs_are_classified() {
        assert!(QuizError::MissingEvaluator {
            template: "t".into(),
            kind: "witness",
        }
        .is_catalog_bug());
        assert!(!QuizError::EmptyStage(0).is_catalog_bug());
    }
}
