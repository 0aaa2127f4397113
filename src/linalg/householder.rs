use crate::blas::{nrm2, scal, Side, Transpose};
use crate::dense::{MatrixView, MatrixViewMut};
use crate::linalg::rotation::{lapy2, sign};
use crate::traits::FloatScalar;

// ── Reflector generation and application ────────────────────────────

/// Generate an elementary reflector `H = I - tau·v·vᵀ` with
/// `H·[alpha; x] = [beta; 0]` and `v = [1; x']`.
///
/// `x` holds the `n - 1` trailing entries with increment `incx` and is
/// overwritten with `x'`. Returns `(beta, tau)`. When `x` is already zero,
/// `tau = 0` and `H` is the identity.
pub fn larfg<T: FloatScalar>(n: usize, alpha: T, x: &mut [T], incx: usize) -> (T, T) {
    if n <= 1 {
        return (alpha, T::zero());
    }
    let mut xnorm = nrm2(n - 1, x, incx);
    if xnorm == T::zero() {
        return (alpha, T::zero());
    }

    let mut alpha = alpha;
    let mut beta = -sign(lapy2(alpha, xnorm), alpha);
    let safmin = T::safe_min() / T::unit_roundoff();
    let mut knt = 0;
    if beta.abs() < safmin {
        // beta may be inaccurate; rescale x and recompute
        let rsafmn = T::one() / safmin;
        loop {
            knt += 1;
            scal(n - 1, rsafmn, x, incx);
            beta = beta * rsafmn;
            alpha = alpha * rsafmn;
            if beta.abs() >= safmin || knt >= 20 {
                break;
            }
        }
        xnorm = nrm2(n - 1, x, incx);
        beta = -sign(lapy2(alpha, xnorm), alpha);
    }
    let tau = (beta - alpha) / beta;
    scal(n - 1, T::one() / (alpha - beta), x, incx);
    for _ in 0..knt {
        beta = beta * safmin;
    }
    (beta, tau)
}

/// Apply `H = I - tau·v·vᵀ` to `c` from the left (`H·C`) or right (`C·H`).
///
/// `v` has length `c.nrows()` for [`Side::Left`] and `c.ncols()` for
/// [`Side::Right`]. The left product needs `work.len() >= c.ncols()`.
pub fn larf<T: FloatScalar>(side: Side, v: &[T], tau: T, c: &mut MatrixViewMut<'_, T>, work: &mut [T]) {
    if tau == T::zero() {
        return;
    }
    let (m, n) = (c.nrows(), c.ncols());
    match side {
        Side::Left => {
            assert!(v.len() >= m, "reflector shorter than {} rows", m);
            assert!(work.len() >= n, "larf workspace too small");
            // w = Cᵀv
            let w = &mut work[..n];
            w.fill(T::zero());
            for (i, &vi) in v.iter().enumerate().take(m) {
                if vi != T::zero() {
                    for (wj, &cij) in w.iter_mut().zip(c.row(i)) {
                        *wj = *wj + vi * cij;
                    }
                }
            }
            // C -= tau·v·wᵀ
            for (i, &vi) in v.iter().enumerate().take(m) {
                let f = tau * vi;
                if f != T::zero() {
                    for (cij, &wj) in c.row_mut(i).iter_mut().zip(w.iter()) {
                        *cij = *cij - f * wj;
                    }
                }
            }
        }
        Side::Right => {
            assert!(v.len() >= n, "reflector shorter than {} columns", n);
            for i in 0..m {
                let row = c.row_mut(i);
                let mut s = T::zero();
                for (&x, &vj) in row.iter().zip(v) {
                    s = s + x * vj;
                }
                let f = tau * s;
                for (x, &vj) in row.iter_mut().zip(v) {
                    *x = *x - f * vj;
                }
            }
        }
    }
}

/// Copy the reflector stored in column `j` below row `i` into `v`,
/// with the implicit unit at `v[0]`.
pub(crate) fn load_col<T: FloatScalar>(a: &MatrixView<'_, T>, i: usize, j: usize, len: usize, v: &mut [T]) {
    v[0] = T::one();
    for r in 1..len {
        v[r] = a[(i + r, j)];
    }
}

/// Copy the reflector stored in row `i` left of column `len - 1` into
/// `v`, with the implicit unit at `v[len - 1]`.
fn load_row<T: FloatScalar>(a: &MatrixView<'_, T>, i: usize, len: usize, v: &mut [T]) {
    v[..len - 1].copy_from_slice(&a.row(i)[..len - 1]);
    v[len - 1] = T::one();
}

/// Generate the reflector annihilating column `j` below row `i` of `a`.
fn column_reflector<T: FloatScalar>(a: &mut MatrixViewMut<'_, T>, i: usize, j: usize) -> T {
    let m = a.nrows();
    let stride = a.stride();
    let alpha = a[(i, j)];
    let data = a.as_mut_slice();
    let start = ((i + 1) * stride + j).min(data.len());
    let (beta, tau) = larfg(m - i, alpha, &mut data[start..], stride);
    a[(i, j)] = beta;
    tau
}

// ── QR and RQ factorizations ────────────────────────────────────────

/// Unblocked QR factorization `A = Q·R`.
///
/// On exit `R` occupies the upper triangle and the reflectors `H(i)` the
/// strict lower triangle; `Q = H(0)·H(1)···H(k-1)`, `k = min(m, n)`.
/// Requires `tau.len() >= k` and `work.len() >= m + n`.
pub fn geqr2<T: FloatScalar>(a: &mut MatrixViewMut<'_, T>, tau: &mut [T], work: &mut [T]) {
    let (m, n) = (a.nrows(), a.ncols());
    let k = m.min(n);
    assert!(tau.len() >= k, "tau too short");
    assert!(work.len() >= m + n, "geqr2 workspace too small");
    let (v, w) = work.split_at_mut(m);
    for i in 0..k {
        tau[i] = column_reflector(a, i, i);
        if i + 1 < n {
            load_col(&a.as_view(), i, i, m - i, v);
            larf(Side::Left, &v[..m - i], tau[i], &mut a.block_mut(i, i + 1, m - i, n - i - 1), w);
        }
    }
}

/// Unblocked RQ factorization `A = R·Q`.
///
/// With `k = min(m, n)`, the upper trapezoid ending in the last column
/// holds `R`; row `m - k + i` left of column `n - k + i` holds the
/// reflector `H(i)`, and `Q = H(0)·H(1)···H(k-1)`.
/// Requires `tau.len() >= k` and `work.len() >= m + n`.
pub fn gerq2<T: FloatScalar>(a: &mut MatrixViewMut<'_, T>, tau: &mut [T], work: &mut [T]) {
    let (m, n) = (a.nrows(), a.ncols());
    let k = m.min(n);
    assert!(tau.len() >= k, "tau too short");
    assert!(work.len() >= m + n, "gerq2 workspace too small");
    let (v, w) = work.split_at_mut(n);
    for i in (0..k).rev() {
        let r = m - k + i;
        let c = n - k + i;
        let alpha = a[(r, c)];
        let (beta, t) = larfg(c + 1, alpha, &mut a.row_mut(r)[..c], 1);
        tau[i] = t;
        a[(r, c)] = beta;
        if r > 0 {
            load_row(&a.as_view(), r, c + 1, v);
            larf(Side::Right, &v[..c + 1], t, &mut a.block_mut(0, 0, r, c + 1), w);
        }
    }
}

/// QR factorization with column pivoting, `A·P = Q·R`.
///
/// Column `j` of `A·P` is column `jpvt[j]` of `A`. Pivots are chosen
/// greedily by largest remaining column norm, with norms downdated after
/// each step and recomputed when cancellation makes the update unreliable.
/// `|R(i, i)|` is non-increasing. Storage of `Q` is as in [`geqr2`].
///
/// Requires `jpvt.len() >= n`, `tau.len() >= min(m, n)` and
/// `work.len() >= 3n + m`.
pub fn geqp3<T: FloatScalar>(a: &mut MatrixViewMut<'_, T>, jpvt: &mut [usize], tau: &mut [T], work: &mut [T]) {
    let (m, n) = (a.nrows(), a.ncols());
    let k = m.min(n);
    assert!(jpvt.len() >= n, "jpvt too short");
    assert!(tau.len() >= k, "tau too short");
    assert!(work.len() >= 3 * n + m, "geqp3 workspace too small");

    for (j, p) in jpvt.iter_mut().enumerate().take(n) {
        *p = j;
    }
    if k == 0 {
        return;
    }

    let stride = a.stride();
    let (norms, rest) = work.split_at_mut(2 * n);
    let (vn1, vn2) = norms.split_at_mut(n);
    let (v, w) = rest.split_at_mut(m);

    for j in 0..n {
        vn1[j] = nrm2(m, &a.as_slice()[j..], stride);
        vn2[j] = vn1[j];
    }
    let tol3z = T::unit_roundoff().sqrt();

    for i in 0..k {
        let mut pvt = i;
        for j in i + 1..n {
            if vn1[j] > vn1[pvt] {
                pvt = j;
            }
        }
        if pvt != i {
            a.swap_cols(pvt, i);
            jpvt.swap(pvt, i);
            vn1[pvt] = vn1[i];
            vn2[pvt] = vn2[i];
        }

        tau[i] = column_reflector(a, i, i);
        if i + 1 < n {
            load_col(&a.as_view(), i, i, m - i, v);
            larf(Side::Left, &v[..m - i], tau[i], &mut a.block_mut(i, i + 1, m - i, n - i - 1), w);
        }

        // downdate partial column norms
        for j in i + 1..n {
            if vn1[j] == T::zero() {
                continue;
            }
            let r = a[(i, j)].abs() / vn1[j];
            let temp = (T::one() - r * r).max(T::zero());
            let ratio = vn1[j] / vn2[j];
            if temp * ratio * ratio <= tol3z {
                if i + 1 < m {
                    vn1[j] = nrm2(m - i - 1, &a.as_slice()[(i + 1) * stride + j..], stride);
                    vn2[j] = vn1[j];
                } else {
                    vn1[j] = T::zero();
                    vn2[j] = T::zero();
                }
            } else {
                vn1[j] = vn1[j] * temp.sqrt();
            }
        }
    }
}

// ── Orthogonal factors ──────────────────────────────────────────────

/// Overwrite the `m×n` matrix `a` (`m >= n`) holding `k` QR reflectors
/// with the first `n` columns of `Q = H(0)···H(k-1)`.
///
/// Requires `work.len() >= m + n`.
pub fn org2r<T: FloatScalar>(a: &mut MatrixViewMut<'_, T>, k: usize, tau: &[T], work: &mut [T]) {
    let (m, n) = (a.nrows(), a.ncols());
    assert!(n <= m, "org2r requires m >= n");
    assert!(k <= n, "more reflectors than columns");
    assert!(tau.len() >= k, "tau too short");
    assert!(work.len() >= m + n, "org2r workspace too small");

    // columns k..n start as unit vectors
    for j in k..n {
        for r in 0..m {
            a[(r, j)] = T::zero();
        }
        a[(j, j)] = T::one();
    }

    let (v, w) = work.split_at_mut(m);
    for i in (0..k).rev() {
        if i + 1 < n {
            load_col(&a.as_view(), i, i, m - i, v);
            larf(Side::Left, &v[..m - i], tau[i], &mut a.block_mut(i, i + 1, m - i, n - i - 1), w);
        }
        for r in i + 1..m {
            a[(r, i)] = -tau[i] * a[(r, i)];
        }
        a[(i, i)] = T::one() - tau[i];
        for r in 0..i {
            a[(r, i)] = T::zero();
        }
    }
}

#[inline]
fn forward(side: Side, trans: Transpose) -> bool {
    match side {
        Side::Left => trans != Transpose::NoTrans,
        Side::Right => trans == Transpose::NoTrans,
    }
}

/// Multiply `c` by `Q` or `Qᵀ` from either side, `Q` being defined by the
/// first `k` QR reflectors stored in the columns of `a` (as left by
/// [`geqr2`] or [`geqp3`]).
///
/// `a` has `m` rows for [`Side::Left`] and `n` rows for [`Side::Right`].
/// Requires `work.len() >= a.nrows() + c.ncols()`.
pub fn orm2r<T: FloatScalar>(
    side: Side,
    trans: Transpose,
    a: &MatrixView<'_, T>,
    k: usize,
    tau: &[T],
    c: &mut MatrixViewMut<'_, T>,
    work: &mut [T],
) {
    let (m, n) = (c.nrows(), c.ncols());
    let nq = if side == Side::Left { m } else { n };
    assert_eq!(a.nrows(), nq, "reflector length does not match C");
    assert!(k <= nq && k <= a.ncols(), "too many reflectors");
    assert!(tau.len() >= k, "tau too short");
    assert!(work.len() >= nq + n, "orm2r workspace too small");

    let (v, w) = work.split_at_mut(nq);
    let fwd = forward(side, trans);
    for step in 0..k {
        let i = if fwd { step } else { k - 1 - step };
        load_col(a, i, i, nq - i, v);
        match side {
            Side::Left => larf(side, &v[..nq - i], tau[i], &mut c.block_mut(i, 0, m - i, n), w),
            Side::Right => larf(side, &v[..nq - i], tau[i], &mut c.block_mut(0, i, m, n - i), w),
        }
    }
}

/// Multiply `c` by `Q` or `Qᵀ` from either side, `Q` being defined by the
/// `k` RQ reflectors stored in the rows of the `k×nq` matrix `a` (as left
/// by [`gerq2`] with `k <= nq`).
///
/// Requires `work.len() >= nq + c.ncols()`.
pub fn ormr2<T: FloatScalar>(
    side: Side,
    trans: Transpose,
    a: &MatrixView<'_, T>,
    k: usize,
    tau: &[T],
    c: &mut MatrixViewMut<'_, T>,
    work: &mut [T],
) {
    let (m, n) = (c.nrows(), c.ncols());
    let nq = if side == Side::Left { m } else { n };
    assert_eq!(a.ncols(), nq, "reflector length does not match C");
    assert!(k <= nq && k <= a.nrows(), "too many reflectors");
    assert!(tau.len() >= k, "tau too short");
    assert!(work.len() >= nq + n, "ormr2 workspace too small");

    let (v, w) = work.split_at_mut(nq);
    let fwd = forward(side, trans);
    for step in 0..k {
        let i = if fwd { step } else { k - 1 - step };
        let len = nq - k + i + 1;
        load_row(a, i, len, v);
        match side {
            Side::Left => larf(side, &v[..len], tau[i], &mut c.block_mut(0, 0, len, n), w),
            Side::Right => larf(side, &v[..len], tau[i], &mut c.block_mut(0, 0, m, len), w),
        }
    }
}
