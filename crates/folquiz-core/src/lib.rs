//! folquiz-core: Template catalog, model generation, quiz assembly, and grading.
//!
//! This crate defines the finite models, the formula template library, and
//! the grading logic that the rest of folquiz builds on. Every random
//! operation takes an explicit [`rand::Rng`] so quizzes can be reproduced
//! from a seed.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod grader;
pub mod instantiate;
pub mod model;
pub mod parser;
pub mod quiz;
pub mod report;
pub mod statistics;

pub use catalog::{Catalog, Template};
pub use engine::{generate_quiz, QuizAssembler, QuizConfig, StageCounts};
pub use error::QuizError;
pub use grader::{check_answer, grade_quiz, GradingResult, StudentAnswer};
pub use model::{ConstantAssignment, Model, Stage};
pub use quiz::{InstantiatedProblem, Quiz};
pub use report::QuizGradingReport;
