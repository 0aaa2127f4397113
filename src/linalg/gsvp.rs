use log::debug;

use crate::blas::{Side, Transpose};
use crate::dense::MatrixViewMut;
use crate::linalg::householder::{geqp3, geqr2, gerq2, larf, load_col, org2r, orm2r, ormr2};
use crate::linalg::GsvdJob;
use crate::traits::FloatScalar;

/// Length of `work` required by [`ggsvp3`] for `A: m×n`, `B: p×n`.
pub fn ggsvp3_work_len(m: usize, p: usize, n: usize) -> usize {
    1.max(3 * n + m.max(p)).max(2 * m.max(p).max(n))
}

fn check_square<T>(job: GsvdJob, x: &MatrixViewMut<'_, T>, dim: usize, name: &str) {
    if job.wanted() {
        assert!(
            x.nrows() == dim && x.ncols() == dim,
            "{} must be {}x{}, got {}x{}",
            name,
            dim,
            dim,
            x.nrows(),
            x.ncols()
        );
    }
}

/// Orthogonal preprocessing for the generalized SVD.
///
/// Computes orthogonal `U` (m×m), `V` (p×p) and `Q` (n×n) such that
///
/// ```text
///              n-k-l  k    l
///  Uᵀ·A·Q = k ( 0    A12  A13 )      Vᵀ·B·Q = l ( 0  0  B13 )
///           l ( 0     0   A23 )             p-l ( 0  0   0  )
///       m-k-l ( 0     0    0  )
/// ```
///
/// (shown for `m >= k + l`) where `A12` is `k×k` upper triangular and
/// nonsingular, and `A23`, `B13` are `l×l` upper triangular with `B13`
/// nonsingular. `k + l` is the effective numerical rank of `[A; B]`,
/// decided against the tolerances `tola` and `tolb`. When `m < k + l`
/// only the first `m` rows exist and `A23` is `(m-k)×l` upper trapezoidal.
///
/// On exit `A` and `B` hold the reduced triangular blocks and `(k, l)` is
/// returned. Factors whose job is [`GsvdJob::None`] are left untouched.
///
/// `iwork` needs `n` entries and `tau` needs `n`. With `lwork == -1` the
/// routine only stores the required `work` length in `work[0]` and returns
/// `(0, 0)`; otherwise `lwork` (and `work.len()`) must be at least
/// [`ggsvp3_work_len`].
#[allow(clippy::too_many_arguments)]
pub fn ggsvp3<T: FloatScalar>(
    jobu: GsvdJob,
    jobv: GsvdJob,
    jobq: GsvdJob,
    a: &mut MatrixViewMut<'_, T>,
    b: &mut MatrixViewMut<'_, T>,
    tola: T,
    tolb: T,
    u: &mut MatrixViewMut<'_, T>,
    v: &mut MatrixViewMut<'_, T>,
    q: &mut MatrixViewMut<'_, T>,
    iwork: &mut [usize],
    tau: &mut [T],
    work: &mut [T],
    lwork: isize,
) -> (usize, usize) {
    let (m, n) = (a.nrows(), a.ncols());
    let p = b.nrows();
    assert_eq!(b.ncols(), n, "A and B must have the same number of columns");

    let need = ggsvp3_work_len(m, p, n);
    if lwork == -1 {
        work[0] = T::from_usize(need);
        return (0, 0);
    }
    assert!(
        lwork >= need as isize && work.len() >= need,
        "ggsvp3 workspace too small: need {}, got lwork {} and {} elements",
        need,
        lwork,
        work.len()
    );
    assert!(iwork.len() >= n, "iwork must have at least n = {} entries", n);
    assert!(tau.len() >= n, "tau must have at least n = {} entries", n);
    check_square(jobu, u, m, "U");
    check_square(jobv, v, p, "V");
    check_square(jobq, q, n, "Q");

    let zero = T::zero();

    // ── B·P = V·[S11 S12; 0 0] ──
    geqp3(b, &mut iwork[..n], tau, work);
    a.permute_cols(&iwork[..n]);

    let l = (0..p.min(n)).filter(|&i| b[(i, i)].abs() > tolb).count();

    if jobv.wanted() {
        v.fill(zero);
        for i in 1..p {
            for j in 0..i.min(n) {
                v[(i, j)] = b[(i, j)];
            }
        }
        org2r(v, p.min(n), tau, work);
    }

    for j in 0..l {
        for i in j + 1..l {
            b[(i, j)] = zero;
        }
    }
    if p > l {
        b.block_mut(l, 0, p - l, n).fill(zero);
    }

    if jobq.wanted() {
        q.set_diagonal(zero, T::one());
        q.permute_cols(&iwork[..n]);
    }

    // ── RQ of [S11 S12] = [0 S12]·Z ──
    if n != l {
        gerq2(&mut b.block_mut(0, 0, l, n), tau, work);
        ormr2(Side::Right, Transpose::Trans, &b.block(0, 0, l, n), l, tau, a, work);
        if jobq.wanted() {
            ormr2(Side::Right, Transpose::Trans, &b.block(0, 0, l, n), l, tau, q, work);
        }
        b.block_mut(0, 0, l, n - l).fill(zero);
        for j in n - l..n {
            for i in j - (n - l) + 1..l {
                b[(i, j)] = zero;
            }
        }
    }

    // ── A11 = U·[0 T12; 0 0]·P1ᵀ ──
    let nl = n - l;
    geqp3(&mut a.block_mut(0, 0, m, nl), &mut iwork[..nl], tau, work);

    let k = (0..m.min(nl)).filter(|&i| a[(i, i)].abs() > tola).count();

    // A12 := Uᵀ·A12; the reflectors and A12 share the buffer of A
    {
        let (refl, w) = work.split_at_mut(m);
        for i in 0..m.min(nl) {
            load_col(&a.as_view(), i, i, m - i, refl);
            larf(Side::Left, &refl[..m - i], tau[i], &mut a.block_mut(i, nl, m - i, l), w);
        }
    }

    if jobu.wanted() {
        u.fill(zero);
        for i in 1..m {
            for j in 0..i.min(nl) {
                u[(i, j)] = a[(i, j)];
            }
        }
        org2r(u, m.min(nl), tau, work);
    }

    if jobq.wanted() {
        q.block_mut(0, 0, n, nl).permute_cols(&iwork[..nl]);
    }

    for j in 0..k {
        for i in j + 1..k {
            a[(i, j)] = zero;
        }
    }
    if m > k {
        a.block_mut(k, 0, m - k, nl).fill(zero);
    }

    // ── RQ of [T11 T12] = [0 T12]·Z1 ──
    if nl > k {
        gerq2(&mut a.block_mut(0, 0, k, nl), tau, work);
        if jobq.wanted() {
            ormr2(
                Side::Right,
                Transpose::Trans,
                &a.block(0, 0, k, nl),
                k,
                tau,
                &mut q.block_mut(0, 0, n, nl),
                work,
            );
        }
        a.block_mut(0, 0, k, nl - k).fill(zero);
        for j in nl - k..nl {
            for i in j - (nl - k) + 1..k {
                a[(i, j)] = zero;
            }
        }
    }

    // ── QR of A(k.., n-l..) ──
    if m > k {
        geqr2(&mut a.block_mut(k, nl, m - k, l), tau, work);
        if jobu.wanted() {
            orm2r(
                Side::Right,
                Transpose::NoTrans,
                &a.block(k, nl, m - k, l),
                (m - k).min(l),
                tau,
                &mut u.block_mut(0, k, m, m - k),
                work,
            );
        }
        for j in nl..n {
            for i in j - nl + k + 1..m {
                a[(i, j)] = zero;
            }
        }
    }

    debug!("ggsvp3: m={} p={} n={} -> k={} l={}", m, p, n, k, l);
    (k, l)
}
