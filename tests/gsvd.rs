use numlab::{lange, DenseMatrix, Gsvd, GsvdJob, Native, NormType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// (m, p, n)
const CASES: [(usize, usize, usize); 5] = [(3, 3, 5), (5, 5, 5), (5, 5, 10), (10, 5, 5), (10, 10, 10)];

/// Extra columns of row padding for the strided variants.
const PADS: [usize; 2] = [0, 7];

// ── Helpers ─────────────────────────────────────────────────────────

fn random(rng: &mut StdRng, rows: usize, cols: usize, pad: usize) -> DenseMatrix<f64> {
    let mut a = DenseMatrix::with_stride(rows, cols, cols.max(1) + pad, f64::NAN);
    for i in 0..rows {
        for j in 0..cols {
            a[(i, j)] = rng.sample(StandardNormal);
        }
    }
    a
}

fn nan_square(n: usize, pad: usize) -> DenseMatrix<f64> {
    DenseMatrix::with_stride(n, n, n.max(1) + pad, f64::NAN)
}

fn max_abs_diff(x: &DenseMatrix<f64>, y: &DenseMatrix<f64>) -> f64 {
    assert_eq!((x.nrows(), x.ncols()), (y.nrows(), y.ncols()));
    lange(NormType::MaxAbs, &(x - y))
}

/// `Xᵀ·M·Q`
fn project(x: &DenseMatrix<f64>, m: &DenseMatrix<f64>, q: &DenseMatrix<f64>) -> DenseMatrix<f64> {
    &(&x.transpose() * m) * q
}

fn scale(m: &DenseMatrix<f64>) -> f64 {
    m.frobenius_norm().max(1.0)
}

fn assert_orthogonal(x: &DenseMatrix<f64>, name: &str, case: &str) {
    let r = x.orthogonality_residual();
    assert!(r < 1e-13, "{}: {} not orthogonal, |I - XᵀX|₁ = {:e}", case, name, r);
}

// ── Drivers ─────────────────────────────────────────────────────────

struct Preprocessed {
    a: DenseMatrix<f64>,
    b: DenseMatrix<f64>,
    u: DenseMatrix<f64>,
    v: DenseMatrix<f64>,
    q: DenseMatrix<f64>,
    k: usize,
    l: usize,
}

fn run_ggsvp3(
    imp: &impl Gsvd<f64>,
    a0: &DenseMatrix<f64>,
    b0: &DenseMatrix<f64>,
    pad: usize,
    tol: f64,
) -> Preprocessed {
    let (m, n, p) = (a0.nrows(), a0.ncols(), b0.nrows());
    let mut a = a0.clone();
    let mut b = b0.clone();
    let mut u = nan_square(m, pad);
    let mut v = nan_square(p, pad);
    let mut q = nan_square(n, pad);
    let mut iwork = vec![0usize; n];
    let mut tau = vec![0.0; n];

    let mut query = [0.0];
    imp.ggsvp3(
        GsvdJob::Compute,
        GsvdJob::Compute,
        GsvdJob::Compute,
        &mut a.view_mut(),
        &mut b.view_mut(),
        tol,
        tol,
        &mut u.view_mut(),
        &mut v.view_mut(),
        &mut q.view_mut(),
        &mut iwork,
        &mut tau,
        &mut query,
        -1,
    );
    assert_eq!(query[0] as usize, imp.ggsvp3_work_len(m, p, n));
    let mut work = vec![0.0; query[0] as usize];
    let lwork = work.len() as isize;

    let (k, l) = imp.ggsvp3(
        GsvdJob::Compute,
        GsvdJob::Compute,
        GsvdJob::Compute,
        &mut a.view_mut(),
        &mut b.view_mut(),
        tol,
        tol,
        &mut u.view_mut(),
        &mut v.view_mut(),
        &mut q.view_mut(),
        &mut iwork,
        &mut tau,
        &mut work,
        lwork,
    );
    Preprocessed { a, b, u, v, q, k, l }
}

struct Decomposed {
    a: DenseMatrix<f64>,
    b: DenseMatrix<f64>,
    u: DenseMatrix<f64>,
    v: DenseMatrix<f64>,
    q: DenseMatrix<f64>,
    alpha: Vec<f64>,
    beta: Vec<f64>,
    iwork: Vec<usize>,
    k: usize,
    l: usize,
    converged: bool,
}

fn run_ggsvd3(imp: &impl Gsvd<f64>, a0: &DenseMatrix<f64>, b0: &DenseMatrix<f64>, pad: usize) -> Decomposed {
    let (m, n, p) = (a0.nrows(), a0.ncols(), b0.nrows());
    let mut a = a0.clone();
    let mut b = b0.clone();
    let mut u = nan_square(m, pad);
    let mut v = nan_square(p, pad);
    let mut q = nan_square(n, pad);
    let mut alpha = vec![f64::NAN; n];
    let mut beta = vec![f64::NAN; n];
    let mut iwork = vec![0usize; n];

    let mut query = [0.0];
    imp.ggsvd3(
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
        &mut query,
        -1,
        &mut iwork,
    );
    let mut work = vec![0.0; query[0] as usize];
    let lwork = work.len() as isize;

    let (k, l, converged) = imp.ggsvd3(
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
    );
    Decomposed {
        a,
        b,
        u,
        v,
        q,
        alpha,
        beta,
        iwork,
        k,
        l,
        converged,
    }
}

// ── Expected forms ──────────────────────────────────────────────────

/// Copy of the reduced `A` with every structurally zero entry cleared.
fn zero_a(a: &DenseMatrix<f64>, k: usize, l: usize) -> DenseMatrix<f64> {
    let (m, n) = (a.nrows(), a.ncols());
    DenseMatrix::from_fn(m, n, |i, j| {
        let keep = if i < k {
            // [0 A12 A13], A12 upper triangular
            j >= n - k - l + i
        } else if i < k + l {
            // [0 0 A23], A23 upper triangular
            j >= n - l + (i - k)
        } else {
            false
        };
        if keep {
            a[(i, j)]
        } else {
            0.0
        }
    })
}

/// Copy of the reduced `B` with every structurally zero entry cleared.
fn zero_b(b: &DenseMatrix<f64>, l: usize) -> DenseMatrix<f64> {
    let (p, n) = (b.nrows(), b.ncols());
    DenseMatrix::from_fn(p, n, |i, j| if i < l && j >= n - l + i { b[(i, j)] } else { 0.0 })
}

/// `D1` (m×(k+l)).
fn d1(m: usize, k: usize, l: usize, alpha: &[f64]) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(m, k + l, |i, j| {
        if i != j {
            0.0
        } else if i < k {
            1.0
        } else {
            alpha[i]
        }
    })
}

/// `D2` (p×(k+l)).
fn d2(p: usize, k: usize, l: usize, beta: &[f64]) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(p, k + l, |i, j| if i < l && j == k + i { beta[j] } else { 0.0 })
}

/// `[0 R]` ((k+l)×n), with the rows of `R` past `m` taken from `B`.
fn zero_r(a: &DenseMatrix<f64>, b: &DenseMatrix<f64>, k: usize, l: usize) -> DenseMatrix<f64> {
    let (m, n) = (a.nrows(), a.ncols());
    let kl = k + l;
    DenseMatrix::from_fn(kl, n, |i, j| {
        if j < n - kl + i {
            0.0
        } else if i < m {
            a[(i, j)]
        } else {
            b[(i - k, j)]
        }
    })
}

// ── Preprocessing ───────────────────────────────────────────────────

#[test]
fn ggsvp3_reduces_random_pairs() {
    let mut rng = StdRng::seed_from_u64(1);
    for &(m, p, n) in &CASES {
        for &pad in &PADS {
            let case = format!("m={} p={} n={} pad={}", m, p, n, pad);
            let a0 = random(&mut rng, m, n, pad);
            let b0 = random(&mut rng, p, n, pad);
            let tola = (m.max(n) as f64) * lange(NormType::One, &a0) * f64::EPSILON;
            let tolb = (p.max(n) as f64) * lange(NormType::One, &b0) * f64::EPSILON;
            let r = run_ggsvp3(&Native, &a0, &b0, pad, tola.max(tolb));

            assert!(r.k + r.l <= n, "{}: k={} l={}", case, r.k, r.l);
            assert_eq!(r.l, p.min(n), "{}", case);
            assert_orthogonal(&r.u, "U", &case);
            assert_orthogonal(&r.v, "V", &case);
            assert_orthogonal(&r.q, "Q", &case);

            let ea = zero_a(&r.a, r.k, r.l);
            let eb = zero_b(&r.b, r.l);
            assert_eq!(max_abs_diff(&r.a, &ea), 0.0, "{}: A not in reduced form", case);
            assert_eq!(max_abs_diff(&r.b, &eb), 0.0, "{}: B not in reduced form", case);

            let da = max_abs_diff(&project(&r.u, &a0, &r.q), &ea);
            let db = max_abs_diff(&project(&r.v, &b0, &r.q), &eb);
            assert!(da < 1e-14 * scale(&a0) * n as f64, "{}: |UᵀAQ - A'| = {:e}", case, da);
            assert!(db < 1e-14 * scale(&b0) * n as f64, "{}: |VᵀBQ - B'| = {:e}", case, db);
        }
    }
}

#[test]
fn ggsvp3_detects_rank_deficiency() {
    // B has rank 2, A = I: k + l = n = 4 with l = 2
    let n = 4;
    let a0 = DenseMatrix::eye(n);
    let b0 = DenseMatrix::from_rows(
        3,
        n,
        &[1.0, 2.0, 0.0, 1.0, 2.0, 4.0, 0.0, 2.0, 0.0, 1.0, 1.0, 0.0],
    );
    let r = run_ggsvp3(&Native, &a0, &b0, 3, 1e-12);
    assert_eq!((r.k, r.l), (2, 2));
    assert_orthogonal(&r.u, "U", "rank 2");
    assert_orthogonal(&r.v, "V", "rank 2");
    assert_orthogonal(&r.q, "Q", "rank 2");
    let da = max_abs_diff(&project(&r.u, &a0, &r.q), &zero_a(&r.a, r.k, r.l));
    let db = max_abs_diff(&project(&r.v, &b0, &r.q), &zero_b(&r.b, r.l));
    assert!(da < 1e-13 && db < 1e-13);
}

// ── Full decomposition ──────────────────────────────────────────────

#[test]
fn ggsvd3_random_pairs() {
    let mut rng = StdRng::seed_from_u64(2);
    for &(m, p, n) in &CASES {
        for &pad in &PADS {
            let case = format!("m={} p={} n={} pad={}", m, p, n, pad);
            let a0 = random(&mut rng, m, n, pad);
            let b0 = random(&mut rng, p, n, pad);
            let d = run_ggsvd3(&Native, &a0, &b0, pad);
            assert!(d.converged, "{}: no convergence", case);
            let (k, l) = (d.k, d.l);
            assert!(k + l <= n, "{}", case);

            assert_orthogonal(&d.u, "U", &case);
            assert_orthogonal(&d.v, "V", &case);
            assert_orthogonal(&d.q, "Q", &case);

            for i in 0..k {
                assert_eq!((d.alpha[i], d.beta[i]), (1.0, 0.0), "{}: pair {}", case, i);
            }
            for i in k..(k + l).min(m) {
                let s = d.alpha[i] * d.alpha[i] + d.beta[i] * d.beta[i];
                assert!((s - 1.0).abs() < 1e-13, "{}: alpha²+beta² = {} at {}", case, s, i);
            }
            for i in m.min(k + l)..k + l {
                assert_eq!((d.alpha[i], d.beta[i]), (0.0, 1.0), "{}: pair {}", case, i);
            }
            for i in k + l..n {
                assert_eq!((d.alpha[i], d.beta[i]), (0.0, 0.0), "{}: pair {}", case, i);
            }

            let zr = zero_r(&d.a, &d.b, k, l);
            let da = max_abs_diff(&project(&d.u, &a0, &d.q), &(&d1(m, k, l, &d.alpha) * &zr));
            let db = max_abs_diff(&project(&d.v, &b0, &d.q), &(&d2(p, k, l, &d.beta) * &zr));
            assert!(da < 1e-13 * scale(&a0), "{}: |UᵀAQ - D1[0 R]| = {:e}", case, da);
            assert!(db < 1e-13 * scale(&b0), "{}: |VᵀBQ - D2[0 R]| = {:e}", case, db);

            // the recorded exchanges sort alpha[k..] decreasingly
            let mut sorted = d.alpha.clone();
            for i in 0..l.min(m.saturating_sub(k)) {
                sorted.swap(k + i, d.iwork[k + i]);
            }
            for i in k + 1..(k + l).min(m) {
                assert!(sorted[i - 1] >= sorted[i], "{}: alpha not ordered by sort record", case);
            }
        }
    }
}

#[test]
fn ggsvd3_one_by_one() {
    let a0 = DenseMatrix::from_rows(1, 1, &[-2.0]);
    let b0 = DenseMatrix::from_rows(1, 1, &[3.0]);
    let d = run_ggsvd3(&Native, &a0, &b0, 0);
    assert!(d.converged);
    assert_eq!((d.k, d.l), (0, 1));
    for x in [&d.u, &d.v, &d.q] {
        assert!((x[(0, 0)].abs() - 1.0).abs() < 1e-15);
    }
    let ratio = d.alpha[0] / d.beta[0];
    assert!((ratio - 2.0 / 3.0).abs() < 1e-14);
}

#[test]
fn ggsvd3_zero_b() {
    // B = 0 gives l = 0 and alpha = 1 on the rank of A
    let a0 = DenseMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 7.0]);
    let b0 = DenseMatrix::zeros(2, 2);
    let d = run_ggsvd3(&Native, &a0, &b0, 2);
    assert!(d.converged);
    assert_eq!((d.k, d.l), (2, 0));
    assert_eq!(&d.alpha[..], &[1.0, 1.0]);
    assert_eq!(&d.beta[..], &[0.0, 0.0]);
    let zr = zero_r(&d.a, &d.b, d.k, d.l);
    let da = max_abs_diff(&project(&d.u, &a0, &d.q), &(&d1(3, 2, 0, &d.alpha) * &zr));
    assert!(da < 1e-13 * scale(&a0));
}

#[test]
fn workspace_query_writes_only_the_size() {
    let mut rng = StdRng::seed_from_u64(3);
    let (m, p, n) = (4, 3, 5);
    let a0 = random(&mut rng, m, n, 0);
    let b0 = random(&mut rng, p, n, 0);
    let mut a = a0.clone();
    let mut b = b0.clone();
    let mut u = nan_square(m, 0);
    let mut v = nan_square(p, 0);
    let mut q = nan_square(n, 0);
    let mut alpha = vec![f64::NAN; n];
    let mut beta = vec![f64::NAN; n];
    let mut iwork = vec![usize::MAX; n];
    let mut work = vec![-5.0; 4];

    let (k, l, ok) = Native.ggsvd3(
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
        -1,
        &mut iwork,
    );
    assert_eq!((k, l, ok), (0, 0, true));
    assert_eq!(work[0] as usize, Gsvd::<f64>::ggsvd3_work_len(&Native, m, p, n));
    assert_eq!(&work[1..], &[-5.0, -5.0, -5.0]);
    assert_eq!(a, a0);
    assert_eq!(b, b0);
    assert!(alpha.iter().chain(&beta).all(|x| x.is_nan()));
    assert!(iwork.iter().all(|&i| i == usize::MAX));
    for x in [&u, &v, &q] {
        assert!(x.as_slice().iter().all(|e| e.is_nan()));
    }
}

#[test]
fn skipped_factors_need_no_storage() {
    let mut rng = StdRng::seed_from_u64(4);
    let (m, p, n) = (5, 4, 4);
    let a0 = random(&mut rng, m, n, 0);
    let b0 = random(&mut rng, p, n, 0);
    let mut a = a0.clone();
    let mut b = b0.clone();
    let mut alpha = vec![0.0; n];
    let mut beta = vec![0.0; n];
    let mut iwork = vec![0; n];
    let mut work = vec![0.0; Gsvd::<f64>::ggsvd3_work_len(&Native, m, p, n)];
    let lwork = work.len() as isize;
    let mut empty = DenseMatrix::<f64>::zeros(0, 0);
    let mut q = nan_square(n, 1);

    let (k, l, ok) = Native.ggsvd3(
        GsvdJob::None,
        GsvdJob::None,
        GsvdJob::Compute,
        &mut a.view_mut(),
        &mut b.view_mut(),
        &mut alpha,
        &mut beta,
        &mut empty.view_mut(),
        &mut DenseMatrix::<f64>::zeros(0, 0).view_mut(),
        &mut q.view_mut(),
        &mut work,
        lwork,
        &mut iwork,
    );
    assert!(ok);
    assert_eq!(k + l, n);
    assert_orthogonal(&q, "Q", "jobu = jobv = None");

    // the generalized singular values match a run that computes everything
    let full = run_ggsvd3(&Native, &a0, &b0, 0);
    for i in 0..n {
        assert!((alpha[i] - full.alpha[i]).abs() < 1e-13);
        assert!((beta[i] - full.beta[i]).abs() < 1e-13);
    }
}

// ── High-level wrapper ──────────────────────────────────────────────

#[test]
fn gsvd_wrapper_matches_identities() {
    let mut rng = StdRng::seed_from_u64(5);
    for &(m, p, n) in &CASES {
        let a = random(&mut rng, m, n, 0);
        let b = random(&mut rng, p, n, 0);
        let g = a.gsvd(&b).unwrap();
        let zr = g.zero_r();
        let da = max_abs_diff(&project(g.u(), &a, g.q()), &(&g.d1() * &zr));
        let db = max_abs_diff(&project(g.v(), &b, g.q()), &(&g.d2() * &zr));
        assert!(da < 1e-13 * scale(&a) && db < 1e-13 * scale(&b), "m={} p={} n={}", m, p, n);
        assert_eq!(g.singular_values().len(), g.l());
    }
}
