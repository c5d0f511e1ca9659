//! EcoSelect dynamics benchmarks
//!
//! - Interaction matrix construction for growing candidate counts
//! - Population simulation to the default iteration cap
//! - Jacobi stability diagnostic

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ecoselect_common::Candidate;
use ecoselect_dynamics::{
    EigenStability, InteractionMatrixBuilder, PopulationDynamicsSimulator, SimulationConfig,
    StabilityValidator,
};

/// Deterministic pseudo-embeddings spread around a few directions
fn embeddings(n: usize, dim: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| {
            (0..dim)
                .map(|d| (((i * 31 + d * 17) % 97) as f32 / 97.0) - 0.5)
                .collect()
        })
        .collect()
}

fn candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| Candidate::new(format!("candidate output number {}", i)))
        .collect()
}

fn bench_matrix_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("interaction");
    let builder = InteractionMatrixBuilder::default();

    for n in [4usize, 16, 64].iter() {
        let cs = candidates(*n);
        let es = embeddings(*n, 384);
        group.bench_with_input(BenchmarkId::new("build_alpha_matrix", n), n, |b, _| {
            b.iter(|| builder.build_alpha_matrix(black_box(&cs), black_box(&es)))
        });
    }

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    let builder = InteractionMatrixBuilder::default();
    let simulator = PopulationDynamicsSimulator::new(SimulationConfig {
        max_iterations: 100,
        ..Default::default()
    });

    for n in [4usize, 16, 64].iter() {
        let alpha = builder
            .build_alpha_matrix(&candidates(*n), &embeddings(*n, 64))
            .expect("matrix");
        let rates: Vec<f64> = (0..*n).map(|i| (i % 10) as f64 / 10.0).collect();
        group.bench_with_input(BenchmarkId::new("simulate", n), n, |b, _| {
            b.iter(|| simulator.simulate(black_box(&rates), black_box(&alpha)))
        });
    }

    group.finish();
}

fn bench_stability(c: &mut Criterion) {
    let builder = InteractionMatrixBuilder::default();
    let alpha = builder
        .build_alpha_matrix(&candidates(16), &embeddings(16, 64))
        .expect("matrix");
    let validator = EigenStability::default();

    c.bench_function("stability/jacobi_16", |b| {
        b.iter(|| validator.assess(black_box(&alpha)))
    });
}

criterion_group!(benches, bench_matrix_build, bench_simulation, bench_stability);
criterion_main!(benches);
