//! Quiz assembly.
//!
//! Generates one model and one constant assignment, draws templates stage by
//! stage, and instantiates each draw over that shared model so look-alike
//! formulas with different scope can be compared side by side.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::QuizError;
use crate::generator::{generate_constants, generate_model};
use crate::instantiate::{render, substitute};
use crate::model::Stage;
use crate::quiz::{InstantiatedProblem, Quiz, QuizMetadata};

/// Predicates every generated model interprets: the largest arity in the library.
pub const MODEL_PREDICATES: usize = 3;

/// Constants every quiz assigns: the largest constant arity in the library.
pub const QUIZ_CONSTANTS: usize = 1;

/// How many templates to draw from each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    #[serde(default = "default_stage0")]
    pub stage0: usize,
    #[serde(default = "default_stage1")]
    pub stage1: usize,
    #[serde(default = "default_stage2")]
    pub stage2: usize,
    #[serde(default = "default_stage3")]
    pub stage3: usize,
}

fn default_stage0() -> usize {
    1
}
fn default_stage1() -> usize {
    2
}
fn default_stage2() -> usize {
    2
}
fn default_stage3() -> usize {
    2
}

impl Default for StageCounts {
    fn default() -> Self {
        Self {
            stage0: default_stage0(),
            stage1: default_stage1(),
            stage2: default_stage2(),
            stage3: default_stage3(),
        }
    }
}

impl StageCounts {
    pub fn get(&self, stage: Stage) -> usize {
        match stage {
            Stage::Atomic => self.stage0,
            Stage::Existential => self.stage1,
            Stage::Universal => self.stage2,
            Stage::Scope => self.stage3,
        }
    }

    pub fn total(&self) -> usize {
        Stage::ALL.into_iter().map(|s| self.get(s)).sum()
    }
}

/// Configuration for quiz generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub stage_counts: StageCounts,
    /// Fixed domain size; drawn from 3..=5 when absent.
    #[serde(default)]
    pub domain_size: Option<usize>,
    /// Seed for a reproducible quiz.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Builds quizzes from a catalog.
#[derive(Debug, Clone)]
pub struct QuizAssembler {
    catalog: Catalog,
    config: QuizConfig,
}

impl QuizAssembler {
    /// An assembler over the built-in catalog.
    pub fn new(config: QuizConfig) -> Self {
        Self::with_catalog(Catalog::builtin(), config)
    }

    pub fn with_catalog(catalog: Catalog, config: QuizConfig) -> Self {
        Self { catalog, config }
    }

    /// Assemble a quiz, seeding a generator from the configured seed or the
    /// thread-local source.
    pub fn generate(&self) -> Result<Quiz, QuizError> {
        match self.config.seed {
            Some(seed) => self.assemble(&mut StdRng::seed_from_u64(seed)),
            None => self.assemble(&mut rand::rng()),
        }
    }

    /// Assemble a quiz from an explicit random source.
    ///
    /// Problems are numbered stage 0 draws first, then stage 1, 2, and 3, in
    /// draw order within each stage. Draws are independent, so a template may
    /// appear more than once.
    pub fn assemble<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Quiz, QuizError> {
        let counts = self.config.stage_counts;

        let model = generate_model(rng, self.config.domain_size, MODEL_PREDICATES)?;
        let constants = generate_constants(rng, &model, QUIZ_CONSTANTS)?;

        let mut drawn = Vec::with_capacity(counts.total());
        for stage in Stage::ALL {
            for _ in 0..counts.get(stage) {
                drawn.push(self.catalog.pick_random(stage, rng)?);
            }
        }

        let problems = drawn
            .into_iter()
            .enumerate()
            .map(|(index, template)| {
                let substitution = substitute(template, &model, &constants)?;
                Ok(InstantiatedProblem {
                    number: index + 1,
                    formula: render(template.pattern, &substitution),
                    template,
                    substitution,
                    stage: template.stage,
                    requires_witness: template.requires_witness,
                    requires_counterexample: template.requires_counterexample,
                })
            })
            .collect::<Result<Vec<_>, QuizError>>()?;

        let metadata = QuizMetadata {
            id: Uuid::new_v4(),
            generated_at: chrono::Utc::now(),
            domain_size: model.domain_size(),
            total_problems: problems.len(),
            seed: self.config.seed,
        };

        tracing::info!(
            quiz_id = %metadata.id,
            problems = metadata.total_problems,
            domain_size = metadata.domain_size,
            "assembled quiz"
        );

        Ok(Quiz {
            model,
            constants,
            problems,
            metadata,
        })
    }
}

/// Assemble a quiz over the built-in catalog.
pub fn generate_quiz(config: QuizConfig) -> Result<Quiz, QuizError> {
    QuizAssembler::new(config).generate()
}
