//! Random model and constant generation.
//!
//! The only randomness in a quiz comes from here. Every function takes the
//! random source as a parameter, so a seeded generator reproduces a quiz.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use crate::error::QuizError;
use crate::model::{
    ConstantAssignment, Model, CONSTANT_LETTERS, MAX_DOMAIN_SIZE, MIN_DOMAIN_SIZE, NAME_POOL,
    PREDICATE_LETTERS,
};

/// Generate a random model.
///
/// The domain is the first `domain_size` names of [`NAME_POOL`]; when
/// `domain_size` is `None` it is drawn uniformly from 3..=5. Each of the first
/// `predicate_count` predicate letters gets an extension in which every
/// individual is included independently with probability 1/2.
pub fn generate_model<R: Rng + ?Sized>(
    rng: &mut R,
    domain_size: Option<usize>,
    predicate_count: usize,
) -> Result<Model, QuizError> {
    let domain_size = match domain_size {
        Some(n) if (MIN_DOMAIN_SIZE..=MAX_DOMAIN_SIZE).contains(&n) => n,
        Some(n) => {
            return Err(QuizError::InvalidDomainSize {
                requested: n,
                min: MIN_DOMAIN_SIZE,
                max: MAX_DOMAIN_SIZE,
            })
        }
        None => rng.random_range(MIN_DOMAIN_SIZE..=MAX_DOMAIN_SIZE),
    };

    if predicate_count > PREDICATE_LETTERS.len() {
        return Err(QuizError::TooManyPredicates {
            requested: predicate_count,
            available: PREDICATE_LETTERS.len(),
        });
    }

    let domain: Vec<String> = NAME_POOL[..domain_size]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut extensions = BTreeMap::new();
    for letter in &PREDICATE_LETTERS[..predicate_count] {
        let extension: BTreeSet<String> = domain
            .iter()
            .filter(|_| rng.random_bool(0.5))
            .cloned()
            .collect();
        extensions.insert(*letter, extension);
    }

    let model = Model::new(domain, extensions)?;
    tracing::debug!(domain_size, predicate_count, "generated model");
    Ok(model)
}

/// Assign each of the first `count` constant letters a uniformly random
/// individual of `model`'s domain, with replacement.
pub fn generate_constants<R: Rng + ?Sized>(
    rng: &mut R,
    model: &Model,
    count: usize,
) -> Result<ConstantAssignment, QuizError> {
    if count > CONSTANT_LETTERS.len() {
        return Err(QuizError::TooManyConstants {
            requested: count,
            available: CONSTANT_LETTERS.len(),
        });
    }
    if count > 0 && model.domain_size() == 0 {
        return Err(QuizError::InvalidModel(
            "cannot assign constants over an empty domain".into(),
        ));
    }

    let constants: ConstantAssignment = CONSTANT_LETTERS[..count]
        .iter()
        .map(|letter| {
            let individual = &model.domain()[rng.random_range(0..model.domain_size())];
            (*letter, individual.clone())
        })
        .collect();

    tracing::debug!(?constants, "assigned constants");
    Ok(constants)
}
