//! Binding template placeholders to a concrete model.
//!
//! [`substitute`] builds the [`Substitution`] a problem is graded against;
//! [`render`] produces its display formula. Rendering replaces predicate
//! placeholders only: constant placeholders stay symbolic (`P(c)`), and the
//! constant's referent is shown in the model legend instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Template;
use crate::error::QuizError;
use crate::model::{ConstantAssignment, Model};

/// Placeholder bindings for one problem instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// Predicate placeholder → model predicate letter.
    #[serde(default)]
    predicates: BTreeMap<char, char>,
    /// Constant placeholder → domain individual.
    #[serde(default)]
    constants: BTreeMap<char, String>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predicate(mut self, placeholder: char, letter: char) -> Self {
        self.predicates.insert(placeholder, letter);
        self
    }

    pub fn with_constant(mut self, placeholder: char, individual: impl Into<String>) -> Self {
        self.constants.insert(placeholder, individual.into());
        self
    }

    /// The predicate letter bound to `placeholder`.
    pub fn predicate(&self, placeholder: char) -> Option<char> {
        self.predicates.get(&placeholder).copied()
    }

    /// The individual bound to a constant `placeholder`.
    pub fn constant(&self, placeholder: char) -> Option<&str> {
        self.constants.get(&placeholder).map(String::as_str)
    }

    pub fn predicates(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.predicates.iter().map(|(k, v)| (*k, *v))
    }

    pub fn constants(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.constants.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Check that this substitution binds every placeholder of `template`
    /// to something `model` interprets.
    pub fn check_against(&self, template: &Template, model: &Model) -> Result<(), QuizError> {
        let bound_predicates = template
            .predicate_placeholders()
            .iter()
            .filter(|p| {
                self.predicate(**p)
                    .is_some_and(|letter| model.extension(letter).is_some())
            })
            .count();
        if bound_predicates < template.predicates {
            return Err(QuizError::ArityMismatch {
                template: template.id.to_string(),
                kind: "predicates",
                needed: template.predicates,
                available: bound_predicates,
            });
        }

        let bound_constants = template
            .constant_placeholders()
            .iter()
            .filter(|c| self.constant(**c).is_some_and(|x| model.contains(x)))
            .count();
        if bound_constants < template.constants {
            return Err(QuizError::ArityMismatch {
                template: template.id.to_string(),
                kind: "constants",
                needed: template.constants,
                available: bound_constants,
            });
        }

        Ok(())
    }
}

/// Bind `template`'s placeholders to `model` and `constants`.
///
/// The template's first N predicate placeholders map, in order, to the model's
/// first N predicate letters; its constant placeholders map to the matching
/// entries of the constant assignment.
pub fn substitute(
    template: &Template,
    model: &Model,
    constants: &ConstantAssignment,
) -> Result<Substitution, QuizError> {
    let letters: Vec<char> = model.predicate_letters().take(template.predicates).collect();
    if letters.len() < template.predicates {
        return Err(QuizError::ArityMismatch {
            template: template.id.to_string(),
            kind: "predicates",
            needed: template.predicates,
            available: letters.len(),
        });
    }

    let mut subs = Substitution::new();
    for (placeholder, letter) in template.predicate_placeholders().iter().zip(letters) {
        subs.predicates.insert(*placeholder, letter);
    }

    for placeholder in template.constant_placeholders() {
        let individual = constants
            .get(*placeholder)
            .ok_or_else(|| QuizError::ArityMismatch {
                template: template.id.to_string(),
                kind: "constants",
                needed: template.constants,
                available: constants.len(),
            })?;
        subs.constants.insert(*placeholder, individual.to_string());
    }

    tracing::debug!(template = template.id, ?subs, "built substitution");
    Ok(subs)
}

/// Render a display formula from `pattern`.
///
/// Each predicate placeholder immediately followed by `(` is replaced by its
/// bound letter, in a single left-to-right pass. Everything else, including
/// constant placeholders, connectives, quantifiers, and parentheses, is kept
/// verbatim.
pub fn render(pattern: &str, subs: &Substitution) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        match subs.predicate(ch) {
            Some(letter) if chars.peek() == Some(&'(') => out.push(letter),
            _ => out.push(ch),
        }
    }

    out
}
