//! Vector kernels over strided slices.
//!
//! Element `i` of a vector with increment `inc` is `x[i * inc]`. The slices
//! passed in start at element zero; only `(n - 1) * inc + 1` entries are
//! required.

use crate::traits::FloatScalar;

#[inline]
fn check_len(len: usize, n: usize, inc: usize) {
    assert!(inc > 0, "vector increment must be positive");
    assert!(
        n == 0 || len > (n - 1) * inc,
        "vector of length {} too short for {} elements with increment {}",
        len,
        n,
        inc
    );
}

/// Euclidean norm `‖x‖₂`, accumulated with scaling so that it neither
/// overflows nor underflows for representable results.
///
/// ```
/// use numlab::blas::nrm2;
/// let x = [3.0e200_f64, 0.0, 4.0e200];
/// assert!((nrm2(2, &x, 2) / 5.0e200 - 1.0).abs() < 1e-15);
/// ```
pub fn nrm2<T: FloatScalar>(n: usize, x: &[T], incx: usize) -> T {
    check_len(x.len(), n, incx);
    if n == 0 {
        return T::zero();
    }
    if n == 1 {
        return x[0].abs();
    }
    let mut scale = T::zero();
    let mut ssq = T::one();
    for i in 0..n {
        let v = x[i * incx];
        if v.is_nan() {
            return v;
        }
        if v != T::zero() {
            let a = v.abs();
            if scale < a {
                let r = scale / a;
                ssq = T::one() + ssq * r * r;
                scale = a;
            } else {
                let r = a / scale;
                ssq = ssq + r * r;
            }
        }
    }
    scale * ssq.sqrt()
}

/// `x := alpha * x`.
pub fn scal<T: FloatScalar>(n: usize, alpha: T, x: &mut [T], incx: usize) {
    check_len(x.len(), n, incx);
    for i in 0..n {
        x[i * incx] = alpha * x[i * incx];
    }
}

/// `xᵀy`.
pub fn dot<T: FloatScalar>(n: usize, x: &[T], incx: usize, y: &[T], incy: usize) -> T {
    check_len(x.len(), n, incx);
    check_len(y.len(), n, incy);
    let mut sum = T::zero();
    for i in 0..n {
        sum = sum + x[i * incx] * y[i * incy];
    }
    sum
}

/// `y := alpha * x + y`.
pub fn axpy<T: FloatScalar>(n: usize, alpha: T, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    check_len(x.len(), n, incx);
    check_len(y.len(), n, incy);
    if alpha == T::zero() {
        return;
    }
    for i in 0..n {
        y[i * incy] = y[i * incy] + alpha * x[i * incx];
    }
}

/// Apply a plane rotation to two vectors:
/// `x := c·x + s·y`, `y := c·y - s·x`.
pub fn rot<T: FloatScalar>(n: usize, x: &mut [T], incx: usize, y: &mut [T], incy: usize, c: T, s: T) {
    check_len(x.len(), n, incx);
    check_len(y.len(), n, incy);
    for i in 0..n {
        let xi = x[i * incx];
        let yi = y[i * incy];
        x[i * incx] = c * xi + s * yi;
        y[i * incy] = c * yi - s * xi;
    }
}

/// Apply a plane rotation to two positions of the same buffer, `a` and `b`
/// being the offsets of element zero of each vector.
///
/// Used where both vectors are rows or columns of one matrix view.
pub(crate) fn rot_within<T: FloatScalar>(
    n: usize,
    buf: &mut [T],
    a: usize,
    b: usize,
    inc: usize,
    c: T,
    s: T,
) {
    for i in 0..n {
        let (ia, ib) = (a + i * inc, b + i * inc);
        let xa = buf[ia];
        let xb = buf[ib];
        buf[ia] = c * xa + s * xb;
        buf[ib] = c * xb - s * xa;
    }
}
