//! Quiz value types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Template;
use crate::instantiate::Substitution;
use crate::model::{ConstantAssignment, Model, Stage};

/// One template instantiated over the quiz's model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiatedProblem {
    /// 1-based position in the quiz.
    pub number: usize,
    /// Display formula; constant placeholders are left symbolic.
    pub formula: String,
    /// The originating template, serialized by id.
    #[serde(rename = "template_id", with = "template_ref")]
    pub template: &'static Template,
    pub substitution: Substitution,
    pub stage: Stage,
    pub requires_witness: bool,
    pub requires_counterexample: bool,
}

/// Generation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizMetadata {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub domain_size: usize,
    pub total_problems: usize,
    /// Seed of the random source, when the quiz was generated reproducibly.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A generated quiz: one model, one constant assignment, ordered problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub model: Model,
    pub constants: ConstantAssignment,
    pub problems: Vec<InstantiatedProblem>,
    pub metadata: QuizMetadata,
}

impl Quiz {
    /// The problem with 1-based `number`.
    pub fn problem(&self, number: usize) -> Option<&InstantiatedProblem> {
        number
            .checked_sub(1)
            .and_then(|index| self.problems.get(index))
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Save the quiz as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize quiz")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write quiz to {}", path.display()))?;
        Ok(())
    }

    /// Load a quiz from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz from {}", path.display()))?;
        let quiz: Quiz = serde_json::from_str(&content).context("failed to parse quiz JSON")?;
        Ok(quiz)
    }
}

/// Serialize a template reference as its id; resolve ids against the built-in catalog.
mod template_ref {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::catalog::{find_builtin, Template};
    use crate::error::QuizError;

    pub fn serialize<S: Serializer>(template: &&'static Template, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(template.id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<&'static Template, D::Error> {
        let id = String::deserialize(d)?;
        match find_builtin(&id) {
            Some(template) => Ok(template),
            None => Err(D::Error::custom(QuizError::UnknownTemplate(id))),
        }
    }
}
