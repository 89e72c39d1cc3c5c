//! The formula template catalog.
//!
//! Every template pairs a display pattern with hand-written evaluators. The
//! catalog is a flat, immutable table: templates are `'static`, shared by every
//! quiz, and never mutated after load.

use std::fmt;

use rand::Rng;

use crate::error::QuizError;
use crate::instantiate::Substitution;
use crate::model::{Model, Stage, CONSTANT_LETTERS, PREDICATE_LETTERS};

/// Truth evaluator: `(model, substitution) -> bool`, seen through a [`Binding`].
pub type TruthFn = fn(&Binding<'_>) -> bool;

/// Witness/counterexample evaluator: `(candidate, model, substitution) -> bool`.
pub type CandidateFn = fn(&str, &Binding<'_>) -> bool;

/// A model viewed through one problem's substitution.
///
/// Evaluators speak in template placeholders (`P`, `Q`, `c`, ...); the binding
/// resolves them to the model's predicate letters and individuals.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    model: &'a Model,
    subs: &'a Substitution,
}

impl<'a> Binding<'a> {
    pub fn new(model: &'a Model, subs: &'a Substitution) -> Self {
        Self { model, subs }
    }

    /// Whether the predicate bound to `placeholder` holds of `individual`.
    ///
    /// # Panics
    ///
    /// Panics if the substitution does not bind `placeholder`; that is a
    /// catalog bug, not a data problem.
    pub fn is(&self, placeholder: char, individual: &str) -> bool {
        let letter = self.subs.predicate(placeholder).unwrap_or_else(|| {
            panic!("predicate placeholder {placeholder} is not bound by the substitution")
        });
        self.model.holds(letter, individual)
    }

    /// The individual bound to a constant placeholder.
    ///
    /// # Panics
    ///
    /// Panics if the substitution does not bind `placeholder`.
    pub fn constant(&self, placeholder: char) -> &'a str {
        self.subs.constant(placeholder).unwrap_or_else(|| {
            panic!("constant placeholder {placeholder} is not bound by the substitution")
        })
    }

    /// Some individual in the domain satisfies `matrix`.
    pub fn exists(&self, matrix: impl Fn(&str) -> bool) -> bool {
        self.model.domain().iter().any(|x| matrix(x.as_str()))
    }

    /// Every individual in the domain satisfies `matrix`.
    pub fn forall(&self, matrix: impl Fn(&str) -> bool) -> bool {
        self.model.domain().iter().all(|x| matrix(x.as_str()))
    }
}

/// One formula shape with its evaluators.
#[derive(Clone, Copy)]
pub struct Template {
    /// Unique identifier, e.g. `stage1_simple_existential`.
    pub id: &'static str,
    /// Display pattern with placeholder tokens, e.g. `∃x(P(x) ∧ Q(x))`.
    pub pattern: &'static str,
    pub stage: Stage,
    /// Number of predicate placeholders (first N of `P, Q, R, S, T`).
    pub predicates: usize,
    /// Number of constant placeholders (first N of `c, d, e, f, g`).
    pub constants: usize,
    /// A true instance must be backed by a witness.
    pub requires_witness: bool,
    /// A false instance must be backed by a counterexample.
    pub requires_counterexample: bool,
    pub description: &'static str,
    /// How this formula differs from a look-alike with different scope.
    pub scope_note: Option<&'static str>,
    tautology: bool,
    truth: TruthFn,
    witness: Option<CandidateFn>,
    counterexample: Option<CandidateFn>,
}

impl Template {
    pub const fn new(
        id: &'static str,
        pattern: &'static str,
        stage: Stage,
        predicates: usize,
        constants: usize,
        description: &'static str,
        truth: TruthFn,
    ) -> Self {
        Self {
            id,
            pattern,
            stage,
            predicates,
            constants,
            requires_witness: false,
            requires_counterexample: false,
            description,
            scope_note: None,
            tautology: false,
            truth,
            witness: None,
            counterexample: None,
        }
    }

    /// Require a witness for true instances, checked by `check`.
    pub const fn with_witness(mut self, check: CandidateFn) -> Self {
        self.requires_witness = true;
        self.witness = Some(check);
        self
    }

    /// Require a counterexample for false instances, checked by `check`.
    pub const fn with_counterexample(mut self, check: CandidateFn) -> Self {
        self.requires_counterexample = true;
        self.counterexample = Some(check);
        self
    }

    /// Attach a counterexample evaluator without requiring one.
    pub const fn with_counterexample_evaluator(mut self, check: CandidateFn) -> Self {
        self.counterexample = Some(check);
        self
    }

    pub const fn with_scope_note(mut self, note: &'static str) -> Self {
        self.scope_note = Some(note);
        self
    }

    /// Mark the formula as true in every model.
    pub const fn tautology(mut self) -> Self {
        self.tautology = true;
        self
    }

    /// Truth value of the template under `model` and `subs`.
    pub fn truth(&self, model: &Model, subs: &Substitution) -> bool {
        (self.truth)(&Binding::new(model, subs))
    }

    /// Whether `candidate` witnesses the formula; `None` if the template has no witness evaluator.
    pub fn check_witness(&self, candidate: &str, model: &Model, subs: &Substitution) -> Option<bool> {
        self.witness
            .map(|check| check(candidate, &Binding::new(model, subs)))
    }

    /// Whether `candidate` refutes the formula; `None` if the template has no counterexample evaluator.
    pub fn check_counterexample(
        &self,
        candidate: &str,
        model: &Model,
        subs: &Substitution,
    ) -> Option<bool> {
        self.counterexample
            .map(|check| check(candidate, &Binding::new(model, subs)))
    }

    pub fn has_witness_evaluator(&self) -> bool {
        self.witness.is_some()
    }

    pub fn has_counterexample_evaluator(&self) -> bool {
        self.counterexample.is_some()
    }

    pub fn is_tautology(&self) -> bool {
        self.tautology
    }

    /// Predicate placeholders used by the pattern, in order.
    pub fn predicate_placeholders(&self) -> &'static [char] {
        &PREDICATE_LETTERS[..self.predicates.min(PREDICATE_LETTERS.len())]
    }

    /// Constant placeholders used by the pattern, in order.
    pub fn constant_placeholders(&self) -> &'static [char] {
        &CONSTANT_LETTERS[..self.constants.min(CONSTANT_LETTERS.len())]
    }

    /// Check the entry's metadata against its evaluators and pattern.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.requires_witness && !self.has_witness_evaluator() {
            return Err(QuizError::MissingEvaluator {
                template: self.id.to_string(),
                kind: "witness",
            });
        }
        if self.requires_counterexample && !self.has_counterexample_evaluator() {
            return Err(QuizError::MissingEvaluator {
                template: self.id.to_string(),
                kind: "counterexample",
            });
        }
        if !(1..=3).contains(&self.predicates) {
            return Err(QuizError::ArityMismatch {
                template: self.id.to_string(),
                kind: "predicates",
                needed: self.predicates,
                available: 3,
            });
        }
        if self.constants > 1 {
            return Err(QuizError::ArityMismatch {
                template: self.id.to_string(),
                kind: "constants",
                needed: self.constants,
                available: 1,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("stage", &self.stage)
            .field("predicates", &self.predicates)
            .field("constants", &self.constants)
            .field("requires_witness", &self.requires_witness)
            .field("requires_counterexample", &self.requires_counterexample)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Template {}

/// An ordered registry of templates.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<&'static Template>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The full built-in template library.
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN.iter().collect(),
        }
    }

    /// A catalog over an explicit set of templates, kept in the given order.
    pub fn from_templates(templates: impl IntoIterator<Item = &'static Template>) -> Self {
        Self {
            templates: templates.into_iter().collect(),
        }
    }

    /// This catalog minus the templates whose ids are listed.
    pub fn without(&self, ids: &[&str]) -> Self {
        Self {
            templates: self
                .templates
                .iter()
                .copied()
                .filter(|t| !ids.contains(&t.id))
                .collect(),
        }
    }

    /// Templates of one stage, in catalog order.
    pub fn list_templates(&self, stage: Stage) -> Vec<&'static Template> {
        self.templates
            .iter()
            .copied()
            .filter(|t| t.stage == stage)
            .collect()
    }

    /// All templates, stage 0 first, catalog order within a stage.
    pub fn list_all(&self) -> Vec<&'static Template> {
        Stage::ALL
            .into_iter()
            .flat_map(|stage| self.list_templates(stage))
            .collect()
    }

    /// Draw one template of `stage` uniformly at random.
    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        stage: Stage,
        rng: &mut R,
    ) -> Result<&'static Template, QuizError> {
        let candidates = self.list_templates(stage);
        if candidates.is_empty() {
            return Err(QuizError::EmptyStage(stage.index()));
        }
        let template = candidates[rng.random_range(0..candidates.len())];
        tracing::debug!(stage = stage.index(), template = template.id, "drew template");
        Ok(template)
    }

    pub fn find(&self, id: &str) -> Option<&'static Template> {
        self.templates.iter().copied().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Largest predicate arity of any template.
    pub fn max_predicates(&self) -> usize {
        self.templates.iter().map(|t| t.predicates).max().unwrap_or(0)
    }

    /// Largest constant arity of any template.
    pub fn max_constants(&self) -> usize {
        self.templates.iter().map(|t| t.constants).max().unwrap_or(0)
    }
}

/// Look a template up in the built-in library.
pub fn find_builtin(id: &str) -> Option<&'static Template> {
    BUILTIN.iter().find(|t| t.id == id)
}

/// The built-in library.
pub static BUILTIN: &[Template] = &[
    // Stage 0: atomic sentences about a constant.
    Template::new(
        "stage0_atomic_pos",
        "P(c)",
        Stage::Atomic,
        1,
        1,
        "Atomic sentence with constant",
        |b| b.is('P', b.constant('c')),
    ),
    Template::new(
        "stage0_atomic_neg",
        "¬P(c)",
        Stage::Atomic,
        1,
        1,
        "Negated atomic sentence",
        |b| !b.is('P', b.constant('c')),
    ),
    Template::new(
        "stage0_conjunction",
        "P(c) ∧ Q(c)",
        Stage::Atomic,
        2,
        1,
        "Conjunction of two predicates",
        |b| {
            let c = b.constant('c');
            b.is('P', c) && b.is('Q', c)
        },
    ),
    Template::new(
        "stage0_disjunction",
        "P(c) ∨ Q(c)",
        Stage::Atomic,
        2,
        1,
        "Disjunction of two predicates",
        |b| {
            let c = b.constant('c');
            b.is('P', c) || b.is('Q', c)
        },
    ),
    Template::new(
        "stage0_conditional",
        "P(c) → Q(c)",
        Stage::Atomic,
        2,
        1,
        "Conditional with two predicates",
        |b| {
            let c = b.constant('c');
            !b.is('P', c) || b.is('Q', c)
        },
    ),
    Template::new(
        "stage0_conditional_negated_consequent",
        "P(c) → ¬Q(c)",
        Stage::Atomic,
        2,
        1,
        "Conditional with negated consequent",
        |b| {
            let c = b.constant('c');
            !b.is('P', c) || !b.is('Q', c)
        },
    ),
    Template::new(
        "stage0_disjunction_with_three",
        "P(c) ∨ (Q(c) ∨ R(c))",
        Stage::Atomic,
        3,
        1,
        "Nested disjunction with three predicates",
        |b| {
            let c = b.constant('c');
            b.is('P', c) || b.is('Q', c) || b.is('R', c)
        },
    ),
    Template::new(
        "stage0_disjunction_neg_first",
        "¬P(c) ∨ Q(c)",
        Stage::Atomic,
        2,
        1,
        "Disjunction with negated first disjunct",
        |b| {
            let c = b.constant('c');
            !b.is('P', c) || b.is('Q', c)
        },
    ),
    Template::new(
        "stage0_tautology",
        "P(c) ∨ ¬P(c)",
        Stage::Atomic,
        1,
        1,
        "Tautology (law of excluded middle)",
        |_| true,
    )
    .tautology(),
    // Stage 1: existentials. A true instance needs a witness.
    Template::new(
        "stage1_simple_existential",
        "∃xP(x)",
        Stage::Existential,
        1,
        0,
        "Simple existential quantifier",
        |b| b.exists(|x| b.is('P', x)),
    )
    .with_witness(|x, b| b.is('P', x)),
    Template::new(
        "stage1_existential_conjunction_2pred",
        "∃x(P(x) ∧ Q(x))",
        Stage::Existential,
        2,
        0,
        "Existential with conjunction of two predicates",
        |b| b.exists(|x| b.is('P', x) && b.is('Q', x)),
    )
    .with_witness(|x, b| b.is('P', x) && b.is('Q', x)),
    Template::new(
        "stage1_existential_conjunction_3pred",
        "∃x(P(x) ∧ Q(x) ∧ R(x))",
        Stage::Existential,
        3,
        0,
        "Existential with conjunction of three predicates",
        |b| b.exists(|x| b.is('P', x) && b.is('Q', x) && b.is('R', x)),
    )
    .with_witness(|x, b| b.is('P', x) && b.is('Q', x) && b.is('R', x)),
    Template::new(
        "stage1_existential_disjunction",
        "∃x(P(x) ∨ Q(x))",
        Stage::Existential,
        2,
        0,
        "Existential with disjunction",
        |b| b.exists(|x| b.is('P', x) || b.is('Q', x)),
    )
    .with_witness(|x, b| b.is('P', x) || b.is('Q', x)),
    Template::new(
        "stage1_existential_with_negation",
        "∃x(P(x) ∧ ¬Q(x))",
        Stage::Existential,
        2,
        0,
        "Existential with negated predicate",
        |b| b.exists(|x| b.is('P', x) && !b.is('Q', x)),
    )
    .with_witness(|x, b| b.is('P', x) && !b.is('Q', x)),
    Template::new(
        "stage1_existential_negated_first",
        "∃x(¬P(x) ∧ Q(x))",
        Stage::Existential,
        2,
        0,
        "Existential with negated first conjunct",
        |b| b.exists(|x| !b.is('P', x) && b.is('Q', x)),
    )
    .with_witness(|x, b| !b.is('P', x) && b.is('Q', x)),
    Template::new(
        "stage1_existential_negated_predicate",
        "∃x¬P(x)",
        Stage::Existential,
        1,
        0,
        "Existential quantifier with simple negation",
        |b| b.exists(|x| !b.is('P', x)),
    )
    .with_witness(|x, b| !b.is('P', x)),
    Template::new(
        "stage1_existential_conditional",
        "∃x(P(x) → Q(x))",
        Stage::Existential,
        2,
        0,
        "Existential with conditional (true unless every individual is P but not Q)",
        |b| b.exists(|x| !b.is('P', x) || b.is('Q', x)),
    )
    .with_witness(|x, b| !b.is('P', x) || b.is('Q', x)),
    // Stage 2: universals. A false instance needs a counterexample.
    Template::new(
        "stage2_simple_universal",
        "∀xP(x)",
        Stage::Universal,
        1,
        0,
        "Simple universal quantifier",
        |b| b.forall(|x| b.is('P', x)),
    )
    .with_counterexample(|x, b| !b.is('P', x)),
    Template::new(
        "stage2_universal_negation",
        "∀x¬P(x)",
        Stage::Universal,
        1,
        0,
        "Universal quantifier with negation",
        |b| b.forall(|x| !b.is('P', x)),
    )
    .with_counterexample(|x, b| b.is('P', x)),
    Template::new(
        "stage2_universal_conditional_2pred",
        "∀x(P(x) → Q(x))",
        Stage::Universal,
        2,
        0,
        "Universal conditional (standard form)",
        |b| b.forall(|x| !b.is('P', x) || b.is('Q', x)),
    )
    .with_counterexample(|x, b| b.is('P', x) && !b.is('Q', x)),
    Template::new(
        "stage2_universal_conditional_disjunction",
        "∀x(P(x) → (Q(x) ∨ R(x)))",
        Stage::Universal,
        3,
        0,
        "Universal conditional with disjunctive consequent",
        |b| b.forall(|x| !b.is('P', x) || b.is('Q', x) || b.is('R', x)),
    )
    .with_counterexample(|x, b| b.is('P', x) && !b.is('Q', x) && !b.is('R', x)),
    Template::new(
        "stage2_universal_disjunction",
        "∀x(P(x) ∨ Q(x))",
        Stage::Universal,
        2,
        0,
        "Universal quantifier with disjunction",
        |b| b.forall(|x| b.is('P', x) || b.is('Q', x)),
    )
    .with_counterexample(|x, b| !b.is('P', x) && !b.is('Q', x)),
    Template::new(
        "stage2_universal_conjunction",
        "∀x(P(x) ∧ Q(x))",
        Stage::Universal,
        2,
        0,
        "Universal quantifier with conjunction",
        |b| b.forall(|x| b.is('P', x) && b.is('Q', x)),
    )
    .with_counterexample(|x, b| !b.is('P', x) || !b.is('Q', x)),
    Template::new(
        "stage2_universal_biconditional",
        "∀x(P(x) ↔ ¬Q(x))",
        Stage::Universal,
        2,
        0,
        "Universal biconditional with negation",
        |b| b.forall(|x| b.is('P', x) != b.is('Q', x)),
    )
    .with_counterexample(|x, b| b.is('P', x) == b.is('Q', x)),
    Template::new(
        "stage2_universal_tautology",
        "∀x(P(x) ∨ ¬P(x))",
        Stage::Universal,
        1,
        0,
        "Universal tautology (always true)",
        |_| true,
    )
    .with_counterexample_evaluator(|_, _| false)
    .tautology(),
    // Stage 3: scope distinctions and mixed quantifiers.
    Template::new(
        "stage3_separate_existentials",
        "∃xP(x) ∧ ∃xQ(x)",
        Stage::Scope,
        2,
        0,
        "Two separate existential quantifiers (different witnesses allowed)",
        |b| b.exists(|x| b.is('P', x)) && b.exists(|x| b.is('Q', x)),
    )
    .with_scope_note("Different from ∃x(P(x) ∧ Q(x)): the two conjuncts may have different witnesses"),
    Template::new(
        "stage3_single_existential_conjunction",
        "∃x(P(x) ∧ Q(x))",
        Stage::Scope,
        2,
        0,
        "Single existential with conjunction (same witness required)",
        |b| b.exists(|x| b.is('P', x) && b.is('Q', x)),
    )
    .with_scope_note("Different from ∃xP(x) ∧ ∃xQ(x): one individual must be both P and Q"),
    Template::new(
        "stage3_separate_universals",
        "∀xP(x) ∨ ∀xQ(x)",
        Stage::Scope,
        2,
        0,
        "Disjunction of two universal quantifiers",
        |b| b.forall(|x| b.is('P', x)) || b.forall(|x| b.is('Q', x)),
    )
    .with_scope_note("Different from ∀x(P(x) ∨ Q(x)): everyone is P, or everyone is Q"),
    Template::new(
        "stage3_universal_disjunction",
        "∀x(P(x) ∨ Q(x))",
        Stage::Scope,
        2,
        0,
        "Universal quantifier over disjunction",
        |b| b.forall(|x| b.is('P', x) || b.is('Q', x)),
    )
    .with_scope_note("Different from ∀xP(x) ∨ ∀xQ(x): each individual may satisfy a different disjunct"),
    Template::new(
        "stage3_existential_implies_universal",
        "∃xP(x) → ∀xQ(x)",
        Stage::Scope,
        2,
        0,
        "Existential as antecedent, universal as consequent",
        |b| !b.exists(|x| b.is('P', x)) || b.forall(|x| b.is('Q', x)),
    ),
    Template::new(
        "stage3_universal_implies_existential",
        "∀xP(x) → ∃xQ(x)",
        Stage::Scope,
        2,
        0,
        "Universal as antecedent, existential as consequent",
        |b| !b.forall(|x| b.is('P', x)) || b.exists(|x| b.is('Q', x)),
    ),
    Template::new(
        "stage3_existential_and_negated_existential",
        "∃xP(x) ∧ ∃x¬P(x)",
        Stage::Scope,
        1,
        0,
        "Domain has both P and non-P",
        |b| b.exists(|x| b.is('P', x)) && b.exists(|x| !b.is('P', x)),
    ),
    Template::new(
        "stage3_negated_existential",
        "¬∃xP(x)",
        Stage::Scope,
        1,
        0,
        "Negated existential (equivalent to ∀x¬P(x))",
        |b| !b.exists(|x| b.is('P', x)),
    ),
    Template::new(
        "stage3_negated_universal",
        "¬∀xP(x)",
        Stage::Scope,
        1,
        0,
        "Negated universal (equivalent to ∃x¬P(x))",
        |b| !b.forall(|x| b.is('P', x)),
    ),
];
