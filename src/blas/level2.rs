use num_complex::Complex;

use super::{Diag, Transpose, Uplo};
use crate::traits::FloatScalar;

/// Offset of element zero of a vector with (possibly negative) increment.
#[inline]
fn start(n: usize, incx: isize) -> usize {
    if incx < 0 {
        (n - 1) * incx.unsigned_abs()
    } else {
        0
    }
}

#[inline]
fn at(kx: usize, i: usize, incx: isize) -> usize {
    (kx as isize + i as isize * incx) as usize
}

/// `x := op(T) x` for a triangular `T` whose element `(i, j)` is read
/// through `elem`, with at most `k` off-diagonals in the stored triangle.
fn triangular_mv<T: FloatScalar>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    elem: impl Fn(usize, usize) -> Complex<T>,
    x: &mut [Complex<T>],
    incx: isize,
) {
    let kx = start(n, incx);
    let nonunit = diag == Diag::NonUnit;
    let op = |z: Complex<T>| if trans == Transpose::ConjTrans { z.conj() } else { z };

    match (trans, uplo) {
        (Transpose::NoTrans, Uplo::Upper) => {
            for i in 0..n {
                let ii = at(kx, i, incx);
                let mut sum = if nonunit { elem(i, i) * x[ii] } else { x[ii] };
                for j in i + 1..n.min(i + k + 1) {
                    sum = sum + elem(i, j) * x[at(kx, j, incx)];
                }
                x[ii] = sum;
            }
        }
        (Transpose::NoTrans, Uplo::Lower) => {
            for i in (0..n).rev() {
                let ii = at(kx, i, incx);
                let mut sum = if nonunit { elem(i, i) * x[ii] } else { x[ii] };
                for j in i.saturating_sub(k)..i {
                    sum = sum + elem(i, j) * x[at(kx, j, incx)];
                }
                x[ii] = sum;
            }
        }
        (_, Uplo::Upper) => {
            for i in (0..n).rev() {
                let ii = at(kx, i, incx);
                let xi = x[ii];
                if nonunit {
                    x[ii] = op(elem(i, i)) * xi;
                }
                for j in i + 1..n.min(i + k + 1) {
                    let jj = at(kx, j, incx);
                    x[jj] = x[jj] + op(elem(i, j)) * xi;
                }
            }
        }
        (_, Uplo::Lower) => {
            for i in 0..n {
                let ii = at(kx, i, incx);
                let xi = x[ii];
                if nonunit {
                    x[ii] = op(elem(i, i)) * xi;
                }
                for j in i.saturating_sub(k)..i {
                    let jj = at(kx, j, incx);
                    x[jj] = x[jj] + op(elem(i, j)) * xi;
                }
            }
        }
    }
}

fn check_vector<T>(x: &[T], n: usize, incx: isize) {
    assert!(incx != 0, "vector increment must be non-zero");
    if n > 0 {
        let need = (n - 1) * incx.unsigned_abs() + 1;
        assert!(
            x.len() >= need,
            "vector of length {} too short for {} elements with increment {}",
            x.len(),
            n,
            incx
        );
    }
}

/// Triangular matrix-vector product `x := op(A) x` (BLAS `trmv`).
///
/// `A` is `n x n`, row-major with row stride `lda`; only the `uplo`
/// triangle is referenced, and the diagonal is not read when `diag` is
/// [`Diag::Unit`].
///
/// ```
/// use num_complex::Complex;
/// use numlab::blas::{trmv, Diag, Transpose, Uplo};
///
/// let c = |re: f64| Complex::new(re, 0.0);
/// let a = [c(1.0), c(2.0), c(0.0), c(3.0)];
/// let mut x = [c(1.0), c(1.0)];
/// trmv(Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 2, &a, 2, &mut x, 1);
/// assert_eq!(x, [c(3.0), c(3.0)]);
/// ```
pub fn trmv<T: FloatScalar>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[Complex<T>],
    lda: usize,
    x: &mut [Complex<T>],
    incx: isize,
) {
    assert!(lda >= n.max(1), "lda {} smaller than max(1, n) = {}", lda, n.max(1));
    check_vector(x, n, incx);
    if n == 0 {
        return;
    }
    assert!(a.len() >= (n - 1) * lda + n, "matrix buffer too short");
    triangular_mv(uplo, trans, diag, n, n - 1, |i, j| a[i * lda + j], x, incx);
}

/// Triangular band matrix-vector product `x := op(A) x` (BLAS `tbmv`).
///
/// `A` is `n x n` with `k` super-diagonals (`Upper`) or sub-diagonals
/// (`Lower`), stored row-major in band form with row stride `ldab`:
///
/// - `Upper`: `A(i, j)` at `ab[i * ldab + (j - i)]` for `i <= j <= i + k`.
/// - `Lower`: `A(i, j)` at `ab[i * ldab + (j + k - i)]` for `i - k <= j <= i`.
///
/// A negative `incx` walks `x` from the back. `ab` is never modified.
pub fn tbmv<T: FloatScalar>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    ab: &[Complex<T>],
    ldab: usize,
    x: &mut [Complex<T>],
    incx: isize,
) {
    assert!(ldab >= k + 1, "ldab {} smaller than k + 1 = {}", ldab, k + 1);
    check_vector(x, n, incx);
    if n == 0 {
        return;
    }
    assert!(ab.len() >= (n - 1) * ldab + k + 1, "band buffer too short");
    match uplo {
        Uplo::Upper => triangular_mv(uplo, trans, diag, n, k, |i, j| ab[i * ldab + j - i], x, incx),
        Uplo::Lower => {
            triangular_mv(uplo, trans, diag, n, k, |i, j| ab[i * ldab + j + k - i], x, incx)
        }
    }
}
