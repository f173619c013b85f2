//! Criterion benchmarks for batscope_core parsing and alignment
//!
//! Run with: cargo bench -p batscope_core

use std::fmt::Write;

use batscope_core::analysis::AlignedSeriesSet;
use batscope_core::parser::{VectorParseOptions, parse_scalar_str, parse_vector_str};
use batscope_core::pipeline::analyze_parsed;
use batscope_core::series::VectorSeriesSet;
use batscope_core::{AnalysisConfig, KeyResolver};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Synthetic `.vec` file: fitness and loudness vectors for `uavs` bats with
/// `steps` jittered samples each
fn synthetic_vector_file(uavs: u32, steps: u32, seed: u64) -> String {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut out = String::from("version 3\nrun Bench-0\nattr configname Bench\n");

    for uav in 0..uavs {
        let _ = writeln!(
            out,
            "vector {} BatSwarmNetwork.uav[{uav}].batAlgorithm fitness:vector ETV",
            uav * 2
        );
        let _ = writeln!(
            out,
            "vector {} BatSwarmNetwork.uav[{uav}].batAlgorithm loudness:vector ETV",
            uav * 2 + 1
        );
    }

    let mut event = 0u64;
    for step in 0..steps {
        for uav in 0..uavs {
            let time = step as f64 + rng.random_range(0.0..0.5);
            let fitness = 100.0 * (-(step as f64) / steps as f64).exp() + rng.random_range(0.0..5.0);
            let loudness = 1.0 - step as f64 / steps as f64;
            event += 1;
            let _ = writeln!(out, "{} {event} {time:.4} {fitness:.4}", uav * 2);
            let _ = writeln!(out, "{} {event} {time:.4} {loudness:.4}", uav * 2 + 1);
        }
    }
    out
}

fn synthetic_scalar_file(uavs: u32) -> String {
    let mut out = String::from("version 3\nrun Bench-0\n");
    for uav in 0..uavs {
        let _ = writeln!(
            out,
            "scalar BatSwarmNetwork.uav[{uav}].batAlgorithm finalFitness {}",
            10.0 + uav as f64
        );
        let _ = writeln!(
            out,
            "scalar BatSwarmNetwork.uav[{uav}].batAlgorithm obstaclesAvoided {}",
            uav % 4
        );
    }
    out
}

fn bench_vector_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_parsing");

    for steps in [100, 1000].iter() {
        let text = synthetic_vector_file(10, *steps, 42);
        group.bench_with_input(BenchmarkId::new("steps", steps), &text, |b, text| {
            b.iter(|| parse_vector_str(black_box(text), VectorParseOptions::default()))
        });
    }

    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let text = synthetic_vector_file(20, 500, 7);
    let parsed = parse_vector_str(&text, VectorParseOptions::default());
    let series = VectorSeriesSet::build(parsed.records).into_sorted();
    let groups = KeyResolver::default().group_series(series.into_iter().map(|(_, s)| s));
    let config = AnalysisConfig::default();

    c.bench_function("align_20_uavs_500_steps", |b| {
        b.iter(|| {
            for group in &groups {
                black_box(AlignedSeriesSet::from_group(black_box(group), &config.align));
            }
        })
    });
}

fn bench_full_run(c: &mut Criterion) {
    let vec = synthetic_vector_file(10, 200, 3);
    let sca = synthetic_scalar_file(10);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_run_10_uavs", |b| {
        b.iter(|| {
            analyze_parsed(
                "Bench-#0",
                Some(parse_scalar_str(black_box(&sca))),
                Some(parse_vector_str(black_box(&vec), config.vector)),
                &config,
            )
        })
    });
}

criterion_group!(benches, bench_vector_parsing, bench_alignment, bench_full_run);
criterion_main!(benches);
