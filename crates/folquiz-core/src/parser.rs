//! Answer sheet parsing.
//!
//! Loads student answers from TOML (or JSON) answer sheets and from a compact
//! command-line shorthand, and validates a sheet against a quiz.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grader::{normalize_witness, requires_support, StudentAnswer};
use crate::quiz::Quiz;

/// A student's answers to one quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    #[serde(default)]
    pub student: Option<String>,
    /// The quiz these answers were written for, if recorded.
    #[serde(default)]
    pub quiz_id: Option<Uuid>,
    #[serde(default)]
    pub answers: Vec<StudentAnswer>,
}

/// Intermediate TOML structure for answer sheet files.
#[derive(Debug, Deserialize)]
struct TomlAnswerFile {
    #[serde(default)]
    answer_sheet: Option<TomlAnswerSheetHeader>,
    #[serde(default)]
    answers: Vec<TomlAnswer>,
}

#[derive(Debug, Deserialize)]
struct TomlAnswerSheetHeader {
    #[serde(default)]
    student: Option<String>,
    #[serde(default)]
    quiz_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlAnswer {
    /// Optional explicit problem number; must match the entry's position.
    #[serde(default)]
    problem: Option<usize>,
    truth_value: bool,
    #[serde(default)]
    witness: Option<String>,
}

/// Parse an answer sheet file; `.json` files are read as JSON, everything else as TOML.
pub fn parse_answer_sheet(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer sheet: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        return serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()));
    }

    parse_answer_sheet_str(&content, path)
}

/// Parse a TOML answer sheet from a string (useful for testing).
pub fn parse_answer_sheet_str(content: &str, source_path: &Path) -> Result<AnswerSheet> {
    let parsed: TomlAnswerFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let (student, quiz_id) = match parsed.answer_sheet {
        Some(header) => {
            let quiz_id = header
                .quiz_id
                .map(|id| {
                    Uuid::parse_str(&id).with_context(|| format!("invalid quiz_id: {id}"))
                })
                .transpose()?;
            (header.student, quiz_id)
        }
        None => (None, None),
    };

    let answers = parsed
        .answers
        .into_iter()
        .enumerate()
        .map(|(index, a)| {
            if let Some(problem) = a.problem {
                anyhow::ensure!(
                    problem == index + 1,
                    "answer #{} is labelled problem {problem}; answers must be listed in order",
                    index + 1
                );
            }
            Ok(StudentAnswer {
                truth_value: a.truth_value,
                witness: a.witness,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AnswerSheet {
        student,
        quiz_id,
        answers,
    })
}

/// Parse the compact form `T:alice,F,T:n/a,false`.
///
/// Each comma-separated entry is a truth value (`T`/`F`/`true`/`false`, any
/// case), optionally followed by `:` and a witness.
pub fn parse_answer_shorthand(s: &str) -> Result<Vec<StudentAnswer>> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (truth, witness) = match entry.split_once(':') {
                Some((truth, witness)) => (truth.trim(), Some(witness.trim())),
                None => (entry, None),
            };
            let truth_value = match truth.to_lowercase().as_str() {
                "t" | "true" => true,
                "f" | "false" => false,
                other => anyhow::bail!("invalid truth value: '{other}' (expected T or F)"),
            };
            Ok(StudentAnswer::new(truth_value, witness))
        })
        .collect()
}

/// A warning from answer sheet validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The problem number (if applicable).
    pub problem: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check an answer sheet against a quiz for common issues.
///
/// None of these stop grading: unnecessary witnesses are not penalised and
/// missing answers are simply not graded.
pub fn validate_answer_sheet(quiz: &Quiz, sheet: &AnswerSheet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Some(id) = sheet.quiz_id {
        if id != quiz.metadata.id {
            warnings.push(ValidationWarning {
                problem: None,
                message: format!(
                    "answer sheet was written for quiz {id}, not {}",
                    quiz.metadata.id
                ),
            });
        }
    }

    if sheet.answers.len() < quiz.len() {
        warnings.push(ValidationWarning {
            problem: None,
            message: format!(
                "{} of {} problems are unanswered and will not be graded",
                quiz.len() - sheet.answers.len(),
                quiz.len()
            ),
        });
    } else if sheet.answers.len() > quiz.len() {
        warnings.push(ValidationWarning {
            problem: None,
            message: format!(
                "{} answers given for {} problems; grading will fail",
                sheet.answers.len(),
                quiz.len()
            ),
        });
    }

    for (problem, answer) in quiz.problems.iter().zip(&sheet.answers) {
        let Some(candidate) = normalize_witness(answer.witness.as_deref()) else {
            continue;
        };

        if !quiz.model.contains(candidate) {
            warnings.push(ValidationWarning {
                problem: Some(problem.number),
                message: format!("witness '{candidate}' is not an individual of the domain"),
            });
        }

        if !problem.requires_witness && !problem.requires_counterexample {
            warnings.push(ValidationWarning {
                problem: Some(problem.number),
                message: "a witness was given but this problem never asks for one".into(),
            });
        } else if !requires_support(problem, answer.truth_value) {
            warnings.push(ValidationWarning {
                problem: Some(problem.number),
                message: "a witness was given but the submitted truth value does not call for one"
                    .into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{QuizAssembler, QuizConfig, StageCounts};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[answer_sheet]
student = "sam"
quiz_id = "00000000-0000-0000-0000-000000000000"

[[answers]]
truth_value = true
witness = "alice"

[[answers]]
problem = 2
truth_value = false
"#;

    fn stage_quiz(stage1: usize, stage3: usize) -> Quiz {
        let config = QuizConfig {
            stage_counts: StageCounts {
                stage0: 0,
                stage1,
                stage2: 0,
                stage3,
            },
            ..Default::default()
        };
        QuizAssembler::new(config)
            .assemble(&mut StdRng::seed_from_u64(8))
            .unwrap()
    }

    #[test]
    fn parse_valid_toml() {
        let sheet = parse_answer_sheet_str(VALID_TOML, &PathBuf::from("a.toml")).unwrap();
        assert_eq!(sheet.student.as_deref(), Some("sam"));
        assert_eq!(sheet.quiz_id, Some(Uuid::nil()));
        assert_eq!(sheet.answers.len(), 2);
        assert_eq!(sheet.answers[0], StudentAnswer::new(true, Some("alice")));
        assert_eq!(sheet.answers[1], StudentAnswer::new(false, None));
    }

    #[test]
    fn header_is_optional() {
        let sheet =
            parse_answer_sheet_str("[[answers]]\ntruth_value = true\n", &PathBuf::from("a.toml"))
                .unwrap();
        assert!(sheet.student.is_none());
        assert_eq!(sheet.answers.len(), 1);
    }

    #[test]
    fn out_of_order_problem_labels_are_rejected() {
        let toml = "[[answers]]\nproblem = 3\ntruth_value = true\n";
        let err = parse_answer_sheet_str(toml, &PathBuf::from("a.toml")).unwrap_err();
        assert!(err.to_string().contains("labelled problem 3"));
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_answer_sheet_str("answers = [ {", &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn parse_json_sheet_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(
            &path,
            r#"{"student":null,"answers":[{"truth_value":false,"witness":"n/a"}]}"#,
        )
        .unwrap();
        let sheet = parse_answer_sheet(&path).unwrap();
        assert_eq!(sheet.answers[0].candidate(), None);
    }

    #[test]
    fn shorthand() {
        let answers = parse_answer_shorthand("T:alice, f ,true:n/a,FALSE").unwrap();
        assert_eq!(
            answers,
            vec![
                StudentAnswer::new(true, Some("alice")),
                StudentAnswer::new(false, None),
                StudentAnswer::new(true, Some("n/a")),
                StudentAnswer::new(false, None),
            ]
        );
        assert!(parse_answer_shorthand("T,maybe").is_err());
        assert!(parse_answer_shorthand("").unwrap().is_empty());
    }

    #[test]
    fn validate_counts_and_witnesses() {
        let quiz = stage_quiz(1, 1);
        let sheet = AnswerSheet {
            answers: vec![
                StudentAnswer::new(false, Some("zed")),
                StudentAnswer::new(true, Some("alice")),
            ],
            ..Default::default()
        };
        let warnings = validate_answer_sheet(&quiz, &sheet);
        assert!(warnings
            .iter()
            .any(|w| w.problem == Some(1) && w.message.contains("not an individual")));
        assert!(warnings
            .iter()
            .any(|w| w.problem == Some(1) && w.message.contains("does not call for one")));
        assert!(warnings
            .iter()
            .any(|w| w.problem == Some(2) && w.message.contains("never asks")));

        let short = AnswerSheet {
            answers: vec![StudentAnswer::new(true, None)],
            ..Default::default()
        };
        let warnings = validate_answer_sheet(&quiz, &short);
        assert!(warnings.iter().any(|w| w.message.contains("unanswered")));
    }

    #[test]
    fn validate_flags_foreign_quiz_id() {
        let quiz = stage_quiz(1, 0);
        let sheet = AnswerSheet {
            quiz_id: Some(Uuid::nil()),
            answers: vec![StudentAnswer::new(true, Some("alice"))],
            ..Default::default()
        };
        let warnings = validate_answer_sheet(&quiz, &sheet);
        assert!(warnings.iter().any(|w| w.message.contains("written for quiz")));
    }
}
