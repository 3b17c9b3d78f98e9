use criterion::{criterion_group, criterion_main, Criterion};

use mcquad::integrators::replicate;
use mcquad::registry::InverseCircle;

use rand_pcg::Pcg64;

fn sequential(c: &mut Criterion) {
    let integrand = InverseCircle;

    c.bench_function("sequential 100k calls", |b| {
        b.iter(|| {
            replicate::integrate::<f64, Pcg64, _>(&integrand, 100_000, 1, 42, false).unwrap()
        })
    });
}

fn parallel(c: &mut Criterion) {
    let integrand = InverseCircle;

    c.bench_function("4 workers with 100k calls each", |b| {
        b.iter(|| {
            replicate::integrate::<f64, Pcg64, _>(&integrand, 100_000, 4, 42, false).unwrap()
        })
    });
}

criterion_group!(benches, sequential, parallel);
criterion_main!(benches);
