//! Peak and cluster extraction benchmarks.
//!
//! Times a full `PeakClus::run` over synthetic lattice fields of increasing
//! size, once per variate count, comparing sequential execution with the
//! library's automatic strategy.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use peakclus_benches::{
    error::BenchSetupError,
    field::{SyntheticField, SyntheticFieldConfig},
    params::LatticeBenchParams,
};
use peakclus_core::{ExecutionStrategy, PeakClusBuilder, VariateCount};

/// Seed used for all synthetic field generation in this benchmark.
const SEED: u64 = 42;

/// Lattice sides to benchmark.
const SIDES: &[usize] = &[32, 64, 128];

/// Variate counts to benchmark.
const VARIATES: &[VariateCount] = &[VariateCount::One, VariateCount::Three];

/// Cluster-forming threshold applied to every field.
const THRESHOLD: f64 = 1.5;

fn extraction_impl(
    c: &mut Criterion,
    group_name: &str,
    strategy: ExecutionStrategy,
) -> Result<(), BenchSetupError> {
    let search = PeakClusBuilder::new()
        .with_threshold(THRESHOLD)
        .with_execution_strategy(strategy)
        .build()?;
    let mut group = c.benchmark_group(group_name);
    group.sample_size(20);

    for &side in SIDES {
        for &variates in VARIATES {
            let field = SyntheticField::generate(&SyntheticFieldConfig {
                side,
                bumps: side.div_ceil(4),
                variates,
                seed: SEED,
            })?;
            // Fail during setup rather than inside the timing loop.
            search.run(&field.model, &field.mask, &field.edges)?;

            group.bench_with_input(
                BenchmarkId::from_parameter(LatticeBenchParams { side, variates }),
                &field,
                |b, field| {
                    b.iter(|| search.run(&field.model, &field.mask, &field.edges));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn extraction_sequential(c: &mut Criterion) {
    if let Err(err) = extraction_impl(c, "extract_sequential", ExecutionStrategy::Sequential) {
        panic!("extract_sequential benchmark setup failed: {err}");
    }
}

fn extraction_auto(c: &mut Criterion) {
    if let Err(err) = extraction_impl(c, "extract_auto", ExecutionStrategy::Auto) {
        panic!("extract_auto benchmark setup failed: {err}");
    }
}

criterion_group!(benches, extraction_sequential, extraction_auto);
criterion_main!(benches);
