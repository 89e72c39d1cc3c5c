//! Semantic properties of the template library over arbitrary small models.

use std::collections::{BTreeMap, BTreeSet};

use folquiz_core::catalog::{find_builtin, Catalog, Template};
use folquiz_core::engine::{QuizAssembler, QuizConfig, MODEL_PREDICATES};
use folquiz_core::generator::{generate_constants, generate_model};
use folquiz_core::grader::{grade_quiz, StudentAnswer};
use folquiz_core::instantiate::{substitute, Substitution};
use folquiz_core::model::{
    ConstantAssignment, Model, MAX_DOMAIN_SIZE, MIN_DOMAIN_SIZE, NAME_POOL, PREDICATE_LETTERS,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A model over a prefix of the name pool; bit `i` of `masks[k]` puts
/// individual `i` in the extension of the `k`-th predicate letter.
fn build_model(size: usize, masks: [u8; MODEL_PREDICATES]) -> Model {
    let domain: Vec<String> = NAME_POOL[..size].iter().map(|s| s.to_string()).collect();
    let extensions: BTreeMap<char, BTreeSet<String>> = PREDICATE_LETTERS
        .iter()
        .zip(masks)
        .map(|(letter, mask)| {
            let members = domain
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, name)| name.clone())
                .collect();
            (*letter, members)
        })
        .collect();
    Model::new(domain, extensions).unwrap()
}

fn model_strategy() -> impl Strategy<Value = (Model, ConstantAssignment)> {
    (
        MIN_DOMAIN_SIZE..=MAX_DOMAIN_SIZE,
        any::<[u8; MODEL_PREDICATES]>(),
        0..MAX_DOMAIN_SIZE,
    )
        .prop_map(|(size, masks, c)| {
            let model = build_model(size, masks);
            let constant = model.domain()[c % size].clone();
            let constants: ConstantAssignment = [('c', constant)].into_iter().collect();
            (model, constants)
        })
}

fn bind(template: &Template, model: &Model, constants: &ConstantAssignment) -> Substitution {
    substitute(template, model, constants).unwrap()
}

fn truth_of(id: &str, model: &Model, constants: &ConstantAssignment) -> bool {
    let template = find_builtin(id).unwrap();
    template.truth(model, &bind(template, model, constants))
}

proptest! {
    #[test]
    fn tautologies_hold_everywhere((model, constants) in model_strategy()) {
        let tautologies: Vec<_> = Catalog::builtin()
            .list_all()
            .into_iter()
            .filter(|t| t.is_tautology())
            .collect();
        prop_assert_eq!(tautologies.len(), 2);
        for template in tautologies {
            prop_assert!(template.truth(&model, &bind(template, &model, &constants)), "{}", template.id);
        }
    }

    #[test]
    fn universal_tautology_rejects_every_counterexample((model, constants) in model_strategy()) {
        let template = find_builtin("stage2_universal_tautology").unwrap();
        let subs = bind(template, &model, &constants);
        for x in model.domain() {
            prop_assert_eq!(template.check_counterexample(x, &model, &subs), Some(false), "{}", x);
        }
    }

    #[test]
    fn quantifier_duality((model, constants) in model_strategy()) {
        prop_assert_eq!(
            truth_of("stage3_negated_existential", &model, &constants),
            truth_of("stage2_universal_negation", &model, &constants)
        );
        prop_assert_eq!(
            truth_of("stage3_negated_universal", &model, &constants),
            truth_of("stage1_existential_negated_predicate", &model, &constants)
        );
    }

    #[test]
    fn joint_existential_implies_separate((model, constants) in model_strategy()) {
        if truth_of("stage3_single_existential_conjunction", &model, &constants) {
            prop_assert!(truth_of("stage3_separate_existentials", &model, &constants));
        }
        if truth_of("stage3_separate_universals", &model, &constants) {
            prop_assert!(truth_of("stage3_universal_disjunction", &model, &constants));
        }
    }

    #[test]
    fn witnesses_agree_with_truth((model, constants) in model_strategy()) {
        for template in Catalog::builtin().list_all() {
            let subs = bind(template, &model, &constants);
            let truth = template.truth(&model, &subs);

            if template.requires_witness {
                let any_witness = model
                    .domain()
                    .iter()
                    .any(|x| template.check_witness(x, &model, &subs) == Some(true));
                prop_assert_eq!(truth, any_witness, "{}", template.id);
            }

            if template.requires_counterexample {
                let any_counterexample = model
                    .domain()
                    .iter()
                    .any(|x| template.check_counterexample(x, &model, &subs) == Some(true));
                prop_assert_eq!(!truth, any_counterexample, "{}", template.id);
            }
        }
    }

    #[test]
    fn generated_models_are_well_formed(seed in any::<u64>(), size in proptest::option::of(MIN_DOMAIN_SIZE..=MAX_DOMAIN_SIZE)) {
        let mut rng = StdRng::seed_from_u64(seed);
        let model = generate_model(&mut rng, size, MODEL_PREDICATES).unwrap();

        prop_assert!((MIN_DOMAIN_SIZE..=MAX_DOMAIN_SIZE).contains(&model.domain_size()));
        if let Some(size) = size {
            prop_assert_eq!(model.domain_size(), size);
        }
        prop_assert_eq!(model.domain(), &NAME_POOL[..model.domain_size()]);
        prop_assert_eq!(
            model.predicate_letters().collect::<Vec<_>>(),
            PREDICATE_LETTERS[..MODEL_PREDICATES].to_vec()
        );
        for letter in model.predicate_letters() {
            for member in model.members(letter) {
                prop_assert!(model.contains(member));
            }
        }

        let constants = generate_constants(&mut rng, &model, 1).unwrap();
        for (_, individual) in constants.iter() {
            prop_assert!(model.contains(individual));
        }
    }

    #[test]
    fn grading_is_idempotent(seed in any::<u64>(), truths in proptest::collection::vec(any::<bool>(), 7), witness in 0..MAX_DOMAIN_SIZE) {
        let quiz = QuizAssembler::new(QuizConfig::default())
            .assemble(&mut StdRng::seed_from_u64(seed))
            .unwrap();
        let answers: Vec<_> = truths
            .iter()
            .map(|t| StudentAnswer::new(*t, Some(NAME_POOL[witness])))
            .collect();

        let first = grade_quiz(&quiz, &answers).unwrap();
        let second = grade_quiz(&quiz, &answers).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.correct_problems <= first.total_problems);
        prop_assert_eq!(first.total_problems, quiz.len());
    }
}
