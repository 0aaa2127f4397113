use log::debug;

use crate::dense::{lange, MatrixViewMut, NormType};
use crate::linalg::gsvp::{ggsvp3, ggsvp3_work_len};
use crate::linalg::tgsja::tgsja;
use crate::linalg::GsvdJob;
use crate::traits::FloatScalar;

/// Length of `work` required by [`ggsvd3`] for `A: m×n`, `B: p×n`.
pub fn ggsvd3_work_len(m: usize, p: usize, n: usize) -> usize {
    n + ggsvp3_work_len(m, p, n)
}

/// Generalized singular value decomposition of the pair `(A, B)`.
///
/// Computes orthogonal `U`, `V`, `Q` with
///
/// ```text
/// Uᵀ·A·Q = D1·[0 R],    Vᵀ·B·Q = D2·[0 R]
/// ```
///
/// where `R` is `(k+l)×(k+l)` upper triangular and nonsingular, and
/// `D1`, `D2` are diagonal-like with `alpha` and `beta` on their
/// diagonals. The ratios `alpha[i] / beta[i]` for `i` in `k..k+l` are the
/// generalized singular values; see [`tgsja`] for the layout of `alpha`,
/// `beta` and of `R` in `A` and `B` on exit.
///
/// Tolerances are `max(m, n)·max(‖A‖₁, safmin)·ulp` and likewise for `B`.
///
/// On exit `iwork[k..k+min(l, m-k))` records the selection-sort exchanges
/// ordering `alpha[k..]` decreasingly: step `i` swaps entry `k+i` with
/// `iwork[k+i]`. `alpha` itself is not permuted.
///
/// With `lwork == -1` only `work[0]` is written, with the required length,
/// and `(0, 0, true)` is returned. Returns `(k, l, converged)`.
#[allow(clippy::too_many_arguments)]
pub fn ggsvd3<T: FloatScalar>(
    jobu: GsvdJob,
    jobv: GsvdJob,
    jobq: GsvdJob,
    a: &mut MatrixViewMut<'_, T>,
    b: &mut MatrixViewMut<'_, T>,
    alpha: &mut [T],
    beta: &mut [T],
    u: &mut MatrixViewMut<'_, T>,
    v: &mut MatrixViewMut<'_, T>,
    q: &mut MatrixViewMut<'_, T>,
    work: &mut [T],
    lwork: isize,
    iwork: &mut [usize],
) -> (usize, usize, bool) {
    let (m, n) = (a.nrows(), a.ncols());
    let p = b.nrows();
    assert_eq!(b.ncols(), n, "A and B must have the same number of columns");

    let need = ggsvd3_work_len(m, p, n);
    if lwork == -1 {
        work[0] = T::from_usize(need);
        return (0, 0, true);
    }
    assert!(
        lwork >= need as isize && work.len() >= need,
        "ggsvd3 workspace too small: need {}, got lwork {} and {} elements",
        need,
        lwork,
        work.len()
    );
    assert!(alpha.len() >= n && beta.len() >= n, "alpha and beta need n = {} entries", n);
    assert!(iwork.len() >= n, "iwork must have at least n = {} entries", n);

    let anorm = lange(NormType::One, a);
    let bnorm = lange(NormType::One, b);
    let ulp = T::ulp();
    let unfl = T::safe_min();
    let tola = T::from_usize(m.max(n)) * anorm.max(unfl) * ulp;
    let tolb = T::from_usize(p.max(n)) * bnorm.max(unfl) * ulp;
    debug!("ggsvd3: |A|_1={:?} |B|_1={:?} tola={:?} tolb={:?}", anorm, bnorm, tola, tolb);

    let (tau, rest) = work.split_at_mut(n);
    let rest_len = rest.len() as isize;
    let (k, l) = ggsvp3(jobu, jobv, jobq, a, b, tola, tolb, u, v, q, iwork, tau, rest, rest_len);
    let (_, converged) = tgsja(jobu, jobv, jobq, k, l, a, b, tola, tolb, alpha, beta, u, v, q, rest);

    // selection sort of alpha[k..k+ibnd) on a scratch copy
    let sorted = &mut work[..n];
    sorted.copy_from_slice(&alpha[..n]);
    let ibnd = l.min(m - k);
    for i in 0..ibnd {
        let mut isub = i;
        let mut smax = sorted[k + i];
        for j in i + 1..ibnd {
            if sorted[k + j] > smax {
                isub = j;
                smax = sorted[k + j];
            }
        }
        if isub != i {
            sorted[k + isub] = sorted[k + i];
            sorted[k + i] = smax;
        }
        iwork[k + i] = k + isub;
    }

    (k, l, converged)
}

/// Generalized SVD capability.
///
/// Lets the same drivers and tests run against any implementation of the
/// two stages; [`Native`] is the implementation in this crate.
#[allow(clippy::too_many_arguments)]
pub trait Gsvd<T: FloatScalar> {
    /// Required `work` length of [`Gsvd::ggsvp3`].
    fn ggsvp3_work_len(&self, m: usize, p: usize, n: usize) -> usize;

    /// Required `work` length of [`Gsvd::ggsvd3`].
    fn ggsvd3_work_len(&self, m: usize, p: usize, n: usize) -> usize;

    /// See [`ggsvp3`](crate::linalg::ggsvp3).
    fn ggsvp3(
        &self,
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
    ) -> (usize, usize);

    /// See [`ggsvd3`](crate::linalg::ggsvd3).
    fn ggsvd3(
        &self,
        jobu: GsvdJob,
        jobv: GsvdJob,
        jobq: GsvdJob,
        a: &mut MatrixViewMut<'_, T>,
        b: &mut MatrixViewMut<'_, T>,
        alpha: &mut [T],
        beta: &mut [T],
        u: &mut MatrixViewMut<'_, T>,
        v: &mut MatrixViewMut<'_, T>,
        q: &mut MatrixViewMut<'_, T>,
        work: &mut [T],
        lwork: isize,
        iwork: &mut [usize],
    ) -> (usize, usize, bool);
}

/// Pure-Rust implementation of [`Gsvd`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Native;

impl<T: FloatScalar> Gsvd<T> for Native {
    fn ggsvp3_work_len(&self, m: usize, p: usize, n: usize) -> usize {
        ggsvp3_work_len(m, p, n)
    }

    fn ggsvd3_work_len(&self, m: usize, p: usize, n: usize) -> usize {
        ggsvd3_work_len(m, p, n)
    }

    fn ggsvp3(
        &self,
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
        ggsvp3(jobu, jobv, jobq, a, b, tola, tolb, u, v, q, iwork, tau, work, lwork)
    }

    fn ggsvd3(
        &self,
        jobu: GsvdJob,
        jobv: GsvdJob,
        jobq: GsvdJob,
        a: &mut MatrixViewMut<'_, T>,
        b: &mut MatrixViewMut<'_, T>,
        alpha: &mut [T],
        beta: &mut [T],
        u: &mut MatrixViewMut<'_, T>,
        v: &mut MatrixViewMut<'_, T>,
        q: &mut MatrixViewMut<'_, T>,
        work: &mut [T],
        lwork: isize,
        iwork: &mut [usize],
    ) -> (usize, usize, bool) {
        ggsvd3(jobu, jobv, jobq, a, b, alpha, beta, u, v, q, work, lwork, iwork)
    }
}
