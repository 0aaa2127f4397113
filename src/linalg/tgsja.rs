use log::{debug, trace, warn};

use crate::blas::rot_within;
use crate::dense::MatrixViewMut;
use crate::linalg::rotation::{lags2, lapll, lartg};
use crate::linalg::GsvdJob;
use crate::traits::FloatScalar;

/// Maximum number of Jacobi cycles [`tgsja`] runs before giving up.
pub const MAX_CYCLES: usize = 40;

/// Generalized SVD of two upper triangular blocks by Jacobi rotations.
///
/// `A` (m×n) and `B` (p×n) must be in the form produced by
/// [`ggsvp3`](crate::linalg::ggsvp3) with the given `k` and `l`. Each cycle
/// sweeps all pairs `(i, j)` of the `l` trailing columns with [`lags2`],
/// alternating between upper and lower triangular passes, until the rows
/// of `A23` and `B13` are pairwise parallel to within `min(tola, tolb)`.
///
/// On exit:
/// - `alpha[0..k] = 1`, `beta[0..k] = 0`;
/// - `alpha[i]² + beta[i]² = 1` for `i` in `k..min(m, k+l)`;
/// - `alpha[i] = 0`, `beta[i] = 1` for `i` in `m..k+l` when `m < k + l`;
/// - `alpha[i] = beta[i] = 0` for `i` in `k+l..n`;
/// - the triangular `R` is stored in `A(0..min(k+l, m), n-k-l..n)`, and
///   when `m < k + l` its trailing rows remain in `B(m-k..l, n+m-k-l..n)`.
///
/// Accumulators with job [`GsvdJob::Compute`] are post-multiplied by the
/// rotations (they are updated, not initialized). `work` needs `2l`
/// entries. Returns the number of cycles and whether the iteration
/// converged within [`MAX_CYCLES`]; on failure every output is still
/// written but is unreliable.
#[allow(clippy::too_many_arguments)]
pub fn tgsja<T: FloatScalar>(
    jobu: GsvdJob,
    jobv: GsvdJob,
    jobq: GsvdJob,
    k: usize,
    l: usize,
    a: &mut MatrixViewMut<'_, T>,
    b: &mut MatrixViewMut<'_, T>,
    tola: T,
    tolb: T,
    alpha: &mut [T],
    beta: &mut [T],
    u: &mut MatrixViewMut<'_, T>,
    v: &mut MatrixViewMut<'_, T>,
    q: &mut MatrixViewMut<'_, T>,
    work: &mut [T],
) -> (usize, bool) {
    let (m, n) = (a.nrows(), a.ncols());
    let p = b.nrows();
    assert_eq!(b.ncols(), n, "A and B must have the same number of columns");
    assert!(k + l <= n, "k + l = {} exceeds n = {}", k + l, n);
    assert!(l <= p, "l = {} exceeds p = {}", l, p);
    assert!(alpha.len() >= n && beta.len() >= n, "alpha and beta need n = {} entries", n);
    assert!(work.len() >= 2 * l, "tgsja workspace too small");
    if jobu.wanted() {
        assert!(u.nrows() == m && u.ncols() == m, "U must be {}x{}", m, m);
    }
    if jobv.wanted() {
        assert!(v.nrows() == p && v.ncols() == p, "V must be {}x{}", p, p);
    }
    if jobq.wanted() {
        assert!(q.nrows() == n && q.ncols() == n, "Q must be {}x{}", n, n);
    }

    let zero = T::zero();
    let nl = n - l;
    let (sa, sb) = (a.stride(), b.stride());
    let tol = tola.min(tolb);

    let mut converged = false;
    let mut ncycle = MAX_CYCLES;
    let mut upper = false;
    for cycle in 1..=MAX_CYCLES {
        upper = !upper;

        for i in 0..l.saturating_sub(1) {
            for j in i + 1..l {
                let a1 = if k + i < m { a[(k + i, nl + i)] } else { zero };
                let a3 = if k + j < m { a[(k + j, nl + j)] } else { zero };
                let b1 = b[(i, nl + i)];
                let b3 = b[(j, nl + j)];
                let (a2, b2) = if upper {
                    let a2 = if k + i < m { a[(k + i, nl + j)] } else { zero };
                    (a2, b[(i, nl + j)])
                } else {
                    let a2 = if k + j < m { a[(k + j, nl + i)] } else { zero };
                    (a2, b[(j, nl + i)])
                };

                let rot = lags2(upper, a1, a2, a3, b1, b2, b3);
                let (csu, snu) = rot.u;
                let (csv, snv) = rot.v;
                let (csq, snq) = rot.q;

                // Uᵀ·A and Vᵀ·B on the two rows
                if k + j < m {
                    rot_within(l, a.as_mut_slice(), (k + j) * sa + nl, (k + i) * sa + nl, 1, csu, snu);
                }
                rot_within(l, b.as_mut_slice(), j * sb + nl, i * sb + nl, 1, csv, snv);

                // A·Q and B·Q on the two columns
                rot_within((k + l).min(m), a.as_mut_slice(), nl + j, nl + i, sa, csq, snq);
                rot_within(l, b.as_mut_slice(), nl + j, nl + i, sb, csq, snq);

                if upper {
                    if k + i < m {
                        a[(k + i, nl + j)] = zero;
                    }
                    b[(i, nl + j)] = zero;
                } else {
                    if k + j < m {
                        a[(k + j, nl + i)] = zero;
                    }
                    b[(j, nl + i)] = zero;
                }

                if jobu.wanted() && k + j < m {
                    let su = u.stride();
                    rot_within(m, u.as_mut_slice(), k + j, k + i, su, csu, snu);
                }
                if jobv.wanted() {
                    let sv = v.stride();
                    rot_within(p, v.as_mut_slice(), j, i, sv, csv, snv);
                }
                if jobq.wanted() {
                    let sq = q.stride();
                    rot_within(n, q.as_mut_slice(), nl + j, nl + i, sq, csq, snq);
                }
            }
        }

        if !upper {
            // rows of A23 and B13 must be parallel
            let mut error = zero;
            let (x, y) = work.split_at_mut(l);
            for i in 0..l.min(m.saturating_sub(k)) {
                let len = l - i;
                x[..len].copy_from_slice(&a.row(k + i)[nl + i..n]);
                y[..len].copy_from_slice(&b.row(i)[nl + i..n]);
                let ssmin = lapll(len, x, 1, y, 1);
                error = error.max(ssmin);
            }
            trace!("tgsja cycle {}: residual {:?} (tolerance {:?})", cycle, error, tol);
            if error.abs() <= tol {
                converged = true;
                ncycle = cycle;
                break;
            }
        }
    }

    if converged {
        debug!("tgsja converged after {} cycles (k={}, l={})", ncycle, k, l);
    } else {
        warn!("tgsja did not converge in {} cycles (k={}, l={})", MAX_CYCLES, k, l);
    }

    // ── Generalized singular value pairs ──
    for i in 0..k {
        alpha[i] = T::one();
        beta[i] = zero;
    }
    for i in 0..l.min(m.saturating_sub(k)) {
        let a1 = a[(k + i, nl + i)];
        let b1 = b[(i, nl + i)];
        let gamma = b1 / a1;
        let row = &mut a.row_mut(k + i)[nl + i..n];
        if gamma <= T::max_value() && gamma >= -T::max_value() {
            if gamma < zero {
                for x in b.row_mut(i)[nl + i..n].iter_mut() {
                    *x = -*x;
                }
                if jobv.wanted() {
                    for r in 0..p {
                        v[(r, i)] = -v[(r, i)];
                    }
                }
            }
            let (c, s, _) = lartg(gamma.abs(), T::one());
            beta[k + i] = c;
            alpha[k + i] = s;
            if alpha[k + i] >= beta[k + i] {
                let f = T::one() / alpha[k + i];
                for x in row.iter_mut() {
                    *x = *x * f;
                }
            } else {
                let f = T::one() / beta[k + i];
                let brow = &mut b.row_mut(i)[nl + i..n];
                for x in brow.iter_mut() {
                    *x = *x * f;
                }
                row.copy_from_slice(brow);
            }
        } else {
            alpha[k + i] = zero;
            beta[k + i] = T::one();
            row.copy_from_slice(&b.row(i)[nl + i..n]);
        }
    }
    for i in m.min(k + l)..k + l {
        alpha[i] = zero;
        beta[i] = T::one();
    }
    for i in k + l..n {
        alpha[i] = zero;
        beta[i] = zero;
    }

    (ncycle, converged)
}
