use criterion::{criterion_group, criterion_main, Criterion};
use pbo_core::{solve_qubo_bruteforce, ConstraintOptions, Pcbo, Pubo};
use std::hint::black_box;

/// Dense cubic objective over `n` variables.
fn cubic(n: usize) -> Pubo<usize> {
    let mut p = Pubo::<usize>::new();
    for i in 0..n {
        p.add_term([i], (i as i64 % 5) - 2);
        for j in (i + 1)..n {
            p.add_term([i, j], ((i * j) as i64 % 7) - 3);
            if j + 1 < n {
                p.add_term([i, j, j + 1], ((i + j) as i64 % 3) - 1);
            }
        }
    }
    p
}

fn benchmark_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumeration");

    for n in [8usize, 12, 16] {
        let p = cubic(n);
        group.bench_function(format!("pubo_{}", n), |b| {
            b.iter(|| black_box(p.minimum().unwrap()))
        });
    }

    group.finish();
}

fn benchmark_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduction");

    let p = cubic(10);
    group.bench_function("to_qubo_10", |b| b.iter(|| black_box(p.to_qubo().unwrap())));

    let q = p.to_qubo().unwrap();
    group.bench_function("solve_reduced_qubo_10", |b| {
        b.iter(|| black_box(solve_qubo_bruteforce(&q).unwrap()))
    });

    group.finish();
}

fn benchmark_constraints(c: &mut Criterion) {
    let mut group = c.benchmark_group("constraints");

    group.bench_function("cardinality_le_8", |b| {
        b.iter(|| {
            let mut objective: pbo_core::Pubo = Pubo::new();
            let mut count: pbo_core::Pubo = Pubo::constant(-3);
            for i in 0..8i64 {
                objective.add_term([i], -(i % 3) - 1);
                count.add_term([i], 1);
            }
            let mut model = Pcbo::from(objective);
            model
                .add_constraint_le_zero(&count, &ConstraintOptions::new().lam(10))
                .unwrap();
            black_box(model.solve_bruteforce().unwrap())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_enumeration,
    benchmark_reduction,
    benchmark_constraints
);
criterion_main!(benches);
