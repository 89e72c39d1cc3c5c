//! Core data model types for folquiz.
//!
//! A [`Model`] is a finite interpretation: an ordered domain of named
//! individuals plus one extension per predicate letter. Constants are
//! interpreted separately by a [`ConstantAssignment`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Canonical pool of individual names. Domains are always a prefix of this list.
pub const NAME_POOL: [&str; 5] = ["alice", "bob", "charlie", "daisy", "eddy"];

/// Predicate letters, in placeholder order.
pub static PREDICATE_LETTERS: [char; 5] = ['P', 'Q', 'R', 'S', 'T'];

/// Constant letters, in placeholder order.
pub static CONSTANT_LETTERS: [char; 5] = ['c', 'd', 'e', 'f', 'g'];

/// Smallest domain a generated model may have.
pub const MIN_DOMAIN_SIZE: usize = 3;

/// Largest domain a generated model may have.
pub const MAX_DOMAIN_SIZE: usize = NAME_POOL.len();

/// Difficulty tier of a formula template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Stage {
    /// Propositional combinations of atomic sentences about a constant.
    Atomic = 0,
    /// Single existential quantifier.
    Existential = 1,
    /// Single universal quantifier.
    Universal = 2,
    /// Scope distinctions and mixed quantifiers.
    Scope = 3,
}

impl Stage {
    /// All stages in ascending order.
    pub const ALL: [Stage; 4] = [
        Stage::Atomic,
        Stage::Existential,
        Stage::Universal,
        Stage::Scope,
    ];

    /// The stage's integer tier.
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> Self {
        stage.index()
    }
}

impl TryFrom<u8> for Stage {
    type Error = QuizError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Stage::ALL
            .into_iter()
            .find(|s| s.index() == value)
            .ok_or_else(|| QuizError::UnknownStage(value.to_string()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Atomic => "atomic",
            Stage::Existential => "existential",
            Stage::Universal => "universal",
            Stage::Scope => "scope",
        };
        write!(f, "{} ({name})", self.index())
    }
}

impl FromStr for Stage {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "atomic" => Ok(Stage::Atomic),
            "1" | "existential" => Ok(Stage::Existential),
            "2" | "universal" => Ok(Stage::Universal),
            "3" | "scope" | "mixed" => Ok(Stage::Scope),
            other => Err(QuizError::UnknownStage(other.to_string())),
        }
    }
}

/// A finite interpretation of unary predicates over named individuals.
///
/// Invariants, checked on construction and deserialization:
/// - the domain has no duplicate individuals;
/// - every extension is a subset of the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedModel")]
pub struct Model {
    domain: Vec<String>,
    extensions: BTreeMap<char, BTreeSet<String>>,
}

#[derive(Deserialize)]
struct UncheckedModel {
    domain: Vec<String>,
    #[serde(default)]
    extensions: BTreeMap<char, BTreeSet<String>>,
}

impl TryFrom<UncheckedModel> for Model {
    type Error = QuizError;

    fn try_from(raw: UncheckedModel) -> Result<Self, Self::Error> {
        Model::new(raw.domain, raw.extensions)
    }
}

impl Model {
    /// Build a model, checking the domain and extension invariants.
    pub fn new(
        domain: Vec<String>,
        extensions: BTreeMap<char, BTreeSet<String>>,
    ) -> Result<Self, QuizError> {
        let mut seen = BTreeSet::new();
        for individual in &domain {
            if !seen.insert(individual.as_str()) {
                return Err(QuizError::InvalidModel(format!(
                    "individual '{individual}' appears twice in the domain"
                )));
            }
        }

        for (letter, extension) in &extensions {
            if let Some(stray) = extension.iter().find(|x| !seen.contains(x.as_str())) {
                return Err(QuizError::InvalidModel(format!(
                    "extension of {letter} contains '{stray}', which is not in the domain"
                )));
            }
        }

        Ok(Self { domain, extensions })
    }

    /// Convenience constructor from string slices.
    pub fn from_lists(domain: &[&str], extensions: &[(char, &[&str])]) -> Result<Self, QuizError> {
        let domain = domain.iter().map(|s| s.to_string()).collect();
        let extensions = extensions
            .iter()
            .map(|(letter, members)| (*letter, members.iter().map(|s| s.to_string()).collect()))
            .collect();
        Self::new(domain, extensions)
    }

    /// Individuals in canonical order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }

    /// Whether `individual` belongs to the domain.
    pub fn contains(&self, individual: &str) -> bool {
        self.domain.iter().any(|x| x == individual)
    }

    /// Interpreted predicate letters in alphabetical order.
    pub fn predicate_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.extensions.keys().copied()
    }

    pub fn predicate_count(&self) -> usize {
        self.extensions.len()
    }

    /// The extension of `letter`, if the model interprets it.
    pub fn extension(&self, letter: char) -> Option<&BTreeSet<String>> {
        self.extensions.get(&letter)
    }

    /// Whether `individual` is in the extension of `letter`.
    ///
    /// An uninterpreted letter has an empty extension.
    pub fn holds(&self, letter: char, individual: &str) -> bool {
        self.extensions
            .get(&letter)
            .is_some_and(|ext| ext.contains(individual))
    }

    /// Extension of `letter` listed in domain order.
    pub fn members(&self, letter: char) -> Vec<&str> {
        self.domain
            .iter()
            .filter(|x| self.holds(letter, x))
            .map(String::as_str)
            .collect()
    }
}

/// Interpretation of constant letters as domain individuals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstantAssignment(BTreeMap<char, String>);

impl ConstantAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `letter` to `individual`, replacing any earlier binding.
    pub fn assign(&mut self, letter: char, individual: impl Into<String>) {
        self.0.insert(letter, individual.into());
    }

    /// The individual denoted by `letter`.
    pub fn get(&self, letter: char) -> Option<&str> {
        self.0.get(&letter).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.0.iter().map(|(c, x)| (*c, x.as_str()))
    }
}

impl FromIterator<(char, String)> for ConstantAssignment {
    fn from_iter<I: IntoIterator<Item = (char, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_and_parse() {
        assert_eq!(Stage::Existential.to_string(), "1 (existential)");
        assert_eq!("2".parse::<Stage>().unwrap(), Stage::Universal);
        assert_eq!("Scope".parse::<Stage>().unwrap(), Stage::Scope);
        assert_eq!("mixed".parse::<Stage>().unwrap(), Stage::Scope);
        assert!("4".parse::<Stage>().is_err());
        assert_eq!(Stage::try_from(0).unwrap(), Stage::Atomic);
        assert!(matches!(
            Stage::try_from(7),
            Err(QuizError::UnknownStage(s)) if s == "7"
        ));
    }

    #[test]
    fn stage_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Stage::Universal).unwrap(), "2");
        let stage: Stage = serde_json::from_str("3").unwrap();
        assert_eq!(stage, Stage::Scope);
        assert!(serde_json::from_str::<Stage>("9").is_err());
    }

    #[test]
    fn model_rejects_duplicate_individuals() {
        let err = Model::from_lists(&["alice", "alice"], &[]).unwrap_err();
        assert!(matches!(err, QuizError::InvalidModel(_)));
    }

    #[test]
    fn model_rejects_extension_outside_domain() {
        let err = Model::from_lists(&["alice", "bob"], &[('P', &["zed"])]).unwrap_err();
        assert!(err.to_string().contains("zed"));
    }

    #[test]
    fn holds_and_members() {
        let model =
            Model::from_lists(&["alice", "bob", "charlie"], &[('P', &["charlie", "alice"])])
                .unwrap();
        assert!(model.holds('P', "alice"));
        assert!(!model.holds('P', "bob"));
        assert!(!model.holds('Q', "alice"));
        assert_eq!(model.members('P'), vec!["alice", "charlie"]);
        assert!(model.contains("bob"));
        assert!(!model.contains("daisy"));
    }

    #[test]
    fn model_deserialization_checks_invariants() {
        let ok = r#"{"domain":["alice","bob"],"extensions":{"P":["bob"]}}"#;
        let model: Model = serde_json::from_str(ok).unwrap();
        assert!(model.holds('P', "bob"));

        let bad = r#"{"domain":["alice"],"extensions":{"P":["bob"]}}"#;
        assert!(serde_json::from_str::<Model>(bad).is_err());
    }

    #[test]
    fn constant_assignment_lookup() {
        let mut constants = ConstantAssignment::new();
        constants.assign('c', "bob");
        assert_eq!(constants.get('c'), Some("bob"));
        assert_eq!(constants.get('d'), None);
        assert_eq!(constants.len(), 1);
    }
}
