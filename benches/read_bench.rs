//! Criterion benchmark harness: measures the randomized read phase for each
//! layout strategy over an in-memory SQLite store.
//!
//! The write phase runs once per layout outside the measurement loop; every
//! iteration replays the full permuted read-back with count verification.
//!
//! cargo bench --bench read_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use layout_bench::layout::{all_layouts, BenchParams, Layout};
use layout_bench::runner;
use layout_bench::store::sqlite::SqliteStore;
use std::time::Duration;

/// Population levels to benchmark.
fn population_levels() -> Vec<(&'static str, BenchParams)> {
    vec![
        (
            "std",
            BenchParams {
                num_users: 10,
                records_per_user: 10,
                do_write: true,
                seed: Some(0x5EED),
            },
        ),
        (
            "wide",
            BenchParams {
                num_users: 50,
                records_per_user: 10,
                do_write: true,
                seed: Some(0x5EED),
            },
        ),
    ]
}

fn bench_read_phase(c: &mut Criterion) {
    for layout in all_layouts() {
        let mut group = c.benchmark_group(format!("read/{}", layout.name()));
        group.measurement_time(Duration::from_secs(10));
        group.sample_size(50);

        for (label, params) in population_levels() {
            let mut store = SqliteStore::open_in_memory().expect("open in-memory store");
            for user in 0..params.num_users {
                let failures = layout.write_user(&mut store, &params, user);
                assert!(failures.is_empty(), "write failed during setup");
            }
            let read_params = BenchParams {
                do_write: false,
                ..params
            };

            group.bench_with_input(
                BenchmarkId::from_parameter(label),
                &read_params,
                |b, params| {
                    b.iter(|| {
                        let result = runner::run_layout(&mut store, layout.as_ref(), params);
                        assert!(result.issues.is_empty());
                    });
                },
            );
        }
        group.finish();
    }
}

criterion_group!(benches, bench_read_phase);
criterion_main!(benches);
