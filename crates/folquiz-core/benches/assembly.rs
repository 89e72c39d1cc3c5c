use criterion::{black_box, criterion_group, criterion_main, Criterion};

use folquiz_core::catalog::Catalog;
use folquiz_core::engine::{QuizAssembler, QuizConfig, MODEL_PREDICATES};
use folquiz_core::generator::generate_model;
use folquiz_core::model::Stage;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_generate_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_model");
    let mut rng = StdRng::seed_from_u64(1);

    for size in [3, 5] {
        group.bench_function(format!("domain={size}"), |b| {
            b.iter(|| generate_model(&mut rng, black_box(Some(size)), MODEL_PREDICATES))
        });
    }

    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let assembler = QuizAssembler::new(QuizConfig::default());
    let mut rng = StdRng::seed_from_u64(2);

    group.bench_function("default_counts", |b| {
        b.iter(|| assembler.assemble(black_box(&mut rng)))
    });

    group.finish();
}

fn bench_pick_random(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(3);

    c.bench_function("pick_random/scope", |b| {
        b.iter(|| catalog.pick_random(black_box(Stage::Scope), &mut rng))
    });
}

criterion_group!(benches, bench_generate_model, bench_assemble, bench_pick_random);
criterion_main!(benches);
