//! Lineage resolution benchmarks
//!
//! Run with: `cargo bench --package blend-core resolve_benchmark`

use blend_core::{Composer, ComposerConfig, Lineage, Options, Record, Value, fields};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn build_chain(composer: &Composer, depth: usize) -> (Lineage, Lineage) {
    let root = Lineage::root(composer.base_options());
    let mut leaf = root.clone();
    for level in 0..depth {
        let definition = Options::new()
            .with(fields::NAME, format!("level-{level}"))
            .with(
                fields::METHODS,
                Record::new().with(format!("method{level}"), "handler"),
            )
            .with("created", Value::func(|_| Value::Null));
        leaf = composer.extend(&leaf, &definition);
    }
    (root, leaf)
}

fn bench_cached_resolve(c: &mut Criterion) {
    let composer = Composer::new(ComposerConfig::production());
    let mut group = c.benchmark_group("resolve_cached");

    for &depth in &[1, 10, 50] {
        let (_root, leaf) = build_chain(&composer, depth);
        composer.resolve(&leaf);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, leaf| {
            b.iter(|| black_box(composer.resolve(black_box(leaf))));
        });
    }

    group.finish();
}

fn bench_invalidated_resolve(c: &mut Criterion) {
    let composer = Composer::new(ComposerConfig::production());
    let mut group = c.benchmark_group("resolve_after_root_mixin");

    for &depth in &[1, 10, 50] {
        let (root, leaf) = build_chain(&composer, depth);
        composer.resolve(&leaf);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, leaf| {
            b.iter(|| {
                composer.mixin(&root, &Options::new().with("template", "<div/>"));
                black_box(composer.resolve(black_box(leaf)))
            });
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let composer = Composer::new(ComposerConfig::production());
    let parent = composer.base_options();
    let mixins = (0..8)
        .map(|i| {
            Options::new()
                .with("mounted", Value::func(|_| Value::Null))
                .with(fields::COMPUTED, Record::new().with(format!("c{i}"), "getter"))
        })
        .collect::<Vec<_>>();
    let child = Options::new()
        .with(fields::MIXINS, Value::list(mixins))
        .with(fields::PROPS, Value::list(["user-name", "max-size", "title"]))
        .with(fields::DATA, Value::func(|_| Value::Record(Record::new())));

    c.bench_function("merge_with_mixins", |b| {
        b.iter(|| black_box(composer.merge(black_box(&parent), black_box(&child), None)));
    });
}

criterion_group!(benches, bench_cached_resolve, bench_invalidated_resolve, bench_merge);
criterion_main!(benches);
