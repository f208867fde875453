//! # Citadel Container Benchmarks
//!
//! | Operation | Expectation |
//! |-----------|-------------|
//! | lookup by hint | shared read lock, no allocation |
//! | resolve prepared | fast path, no preparation lock |
//! | lazy materialization | one construction per handler |

use rand::Rng;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use container_runtime::ContainerConfig;
use ct_tests::fixtures::{widget_container, widget_role, WidgetSpec};

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for hints in [1usize, 8, 64] {
        let (container, _) = widget_container(ContainerConfig::default());
        for index in 0..hints {
            container
                .add_component(WidgetSpec::new(format!("widget-{index}")).lazy().metadata())
                .unwrap();
        }
        let role = widget_role();
        let names: Vec<String> = (0..hints).map(|index| format!("widget-{index}")).collect();
        let mut rng = rand::thread_rng();

        group.bench_with_input(BenchmarkId::new("by_hint", hints), &names, |b, names| {
            b.iter(|| {
                let target = &names[rng.gen_range(0..names.len())];
                black_box(container.lookup(&role, Some(target.as_str())).is_ok())
            })
        });
        group.bench_with_input(BenchmarkId::new("default", hints), &hints, |b, _| {
            b.iter(|| black_box(container.lookup(&role, None).is_ok()))
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let (prepared, _) = widget_container(ContainerConfig::default());
    prepared
        .add_component(WidgetSpec::new("eager").metadata())
        .unwrap();
    prepared.initialize().unwrap();
    let role = widget_role();

    group.bench_function("prepared", |b| {
        b.iter(|| black_box(prepared.resolve(&role, Some("eager")).is_ok()))
    });

    group.bench_function("lazy_first_lookup", |b| {
        b.iter_batched(
            || {
                let (container, _) = widget_container(ContainerConfig::default());
                container
                    .add_component(WidgetSpec::new("lazy").lazy().metadata())
                    .unwrap();
                container
            },
            |container| black_box(container.resolve(&role, Some("lazy")).is_ok()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_resolve);
criterion_main!(benches);
