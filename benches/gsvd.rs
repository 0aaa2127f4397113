use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use numlab::linalg::{ggsvd3, ggsvd3_work_len};
use numlab::{DenseMatrix, GsvdJob};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random(rng: &mut StdRng, rows: usize, cols: usize) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(rows, cols, |_, _| rng.sample(StandardNormal))
}

/// (m, p, n)
const SHAPES: [(usize, usize, usize); 4] = [(5, 5, 5), (10, 10, 10), (20, 10, 15), (40, 40, 40)];

// ---------------------------------------------------------------------------
// In-place driver with preallocated workspace
// ---------------------------------------------------------------------------

fn ggsvd3_in_place(c: &mut Criterion) {
    let mut g = c.benchmark_group("ggsvd3");
    let mut rng = StdRng::seed_from_u64(0);

    for &(m, p, n) in &SHAPES {
        let a0 = random(&mut rng, m, n);
        let b0 = random(&mut rng, p, n);
        let mut u = DenseMatrix::zeros(m, m);
        let mut v = DenseMatrix::zeros(p, p);
        let mut q = DenseMatrix::zeros(n, n);
        let mut alpha = vec![0.0; n];
        let mut beta = vec![0.0; n];
        let mut iwork = vec![0usize; n];
        let mut work = vec![0.0; ggsvd3_work_len(m, p, n)];
        let lwork = work.len() as isize;

        g.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}x{}", m, p, n)), &(), |bch, _| {
            bch.iter(|| {
                let mut a = a0.clone();
                let mut b = b0.clone();
                ggsvd3(
                    GsvdJob::Compute,
                    GsvdJob::Compute,
                    GsvdJob::Compute,
                    &mut a.view_mut(),
                    &mut b.view_mut(),
                    &mut alpha,
                    &mut beta,
                    &mut u.view_mut(),
                    &mut v.view_mut(),
                    &mut q.view_mut(),
                    &mut work,
                    lwork,
                    &mut iwork,
                )
            })
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Allocating wrapper
// ---------------------------------------------------------------------------

fn gsvd_wrapper(c: &mut Criterion) {
    let mut g = c.benchmark_group("gsvd_wrapper");
    let mut rng = StdRng::seed_from_u64(1);

    for &(m, p, n) in &SHAPES {
        let a = random(&mut rng, m, n);
        let b = random(&mut rng, p, n);
        g.bench_function(format!("{}x{}x{}", m, p, n), |bch| {
            bch.iter(|| std::hint::black_box(&a).gsvd(std::hint::black_box(&b)))
        });
    }

    g.finish();
}

criterion_group!(benches, ggsvd3_in_place, gsvd_wrapper);
criterion_main!(benches);
