//! Criterion benchmarks for the elliptical distribution engine.
//!
//! Measures density evaluation, factorisation, radial quantile solves and
//! sampling across dimensions to characterise scaling behaviour.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use elliptical_core::math::linalg::CorrelationMatrix;
use elliptical_models::elliptical::EllipticalDistribution;
use elliptical_models::families::{Normal, Student};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Equicorrelated matrix with off-diagonal `rho`.
fn equicorrelation(n: usize, rho: f64) -> CorrelationMatrix<f64> {
    let data: Vec<f64> = (0..n * n)
        .map(|k| if k / n == k % n { 1.0 } else { rho })
        .collect();
    CorrelationMatrix::new(&data, n).unwrap()
}

fn normal(n: usize) -> EllipticalDistribution<Normal> {
    Normal::distribution(vec![0.0; n], vec![1.5; n], equicorrelation(n, 0.3)).unwrap()
}

fn student(n: usize) -> EllipticalDistribution<Student> {
    Student::distribution(5.0, vec![0.0; n], vec![1.5; n], equicorrelation(n, 0.3)).unwrap()
}

/// Benchmark density evaluation with a warm cache.
fn bench_pdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf");

    for n in [2, 10, 50] {
        let x: Vec<f64> = (0..n).map(|i| 0.1 * i as f64).collect();

        let d = normal(n);
        d.compute_pdf(&x).unwrap();
        group.bench_with_input(BenchmarkId::new("normal", n), &x, |b, x| {
            b.iter(|| d.compute_pdf(black_box(x)).unwrap());
        });

        let t = student(n);
        t.compute_pdf(&x).unwrap();
        group.bench_with_input(BenchmarkId::new("student", n), &x, |b, x| {
            b.iter(|| t.compute_pdf(black_box(x)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("ddf_normal", n), &x, |b, x| {
            b.iter(|| d.compute_ddf(black_box(x)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark factorisation after each parameter change.
fn bench_factorization(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorization");

    for n in [2, 10, 50] {
        let base = normal(n);
        let sigma = vec![2.0; n];
        group.bench_with_input(BenchmarkId::new("set_sigma_then_pdf", n), &n, |b, &n| {
            let mut d = base.clone();
            let x = vec![0.0; n];
            b.iter(|| {
                d.set_sigma(sigma.clone()).unwrap();
                d.compute_pdf(black_box(&x)).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark radial quantile and minimum-volume level set solves.
fn bench_level_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_set");

    for n in [2, 10, 50] {
        let d = normal(n);
        group.bench_with_input(BenchmarkId::new("normal_0.95", n), &d, |b, d| {
            b.iter(|| d.compute_minimum_volume_level_set(black_box(0.95)).unwrap());
        });

        let t = student(n);
        group.bench_with_input(BenchmarkId::new("student_0.99", n), &t, |b, t| {
            b.iter(|| t.compute_radial_quantile(black_box(0.99)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark sampling 1000 realizations.
fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    for n in [2, 10] {
        let t = student(n);
        group.bench_with_input(BenchmarkId::new("student_1000", n), &t, |b, t| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| t.sample(1000, &mut rng).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pdf,
    bench_factorization,
    bench_level_set,
    bench_sampling
);
criterion_main!(benches);
