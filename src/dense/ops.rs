use core::ops::{Mul, Sub};

use crate::traits::{FloatScalar, Scalar};

use super::norm::{lange, NormType};
use super::DenseMatrix;

// ── Transpose ───────────────────────────────────────────────────────

impl<T: Scalar> DenseMatrix<T> {
    /// Return the transpose with tight stride.
    ///
    /// ```
    /// use numlab::DenseMatrix;
    /// let a = DenseMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = a.transpose();
    /// assert_eq!(t.nrows(), 3);
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> Self {
        DenseMatrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }
}

// ── Matrix product ──────────────────────────────────────────────────

impl<T: Scalar> Mul<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: &DenseMatrix<T>) -> DenseMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let mut out = DenseMatrix::zeros(self.nrows, rhs.ncols);
        // i-k-j order walks both operands along rows
        for i in 0..self.nrows {
            for k in 0..self.ncols {
                let aik = self[(i, k)];
                if aik == T::zero() {
                    continue;
                }
                let src = rhs.row(k);
                for (o, &b) in out.row_mut(i).iter_mut().zip(src) {
                    *o = *o + aik * b;
                }
            }
        }
        out
    }
}

impl<T: Scalar> Mul for DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: DenseMatrix<T>) -> DenseMatrix<T> {
        &self * &rhs
    }
}

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar> Sub<&DenseMatrix<T>> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn sub(self, rhs: &DenseMatrix<T>) -> DenseMatrix<T> {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} - {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        DenseMatrix::from_fn(self.nrows, self.ncols, |i, j| self[(i, j)] - rhs[(i, j)])
    }
}

impl<T: Scalar> Sub for DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn sub(self, rhs: DenseMatrix<T>) -> DenseMatrix<T> {
        &self - &rhs
    }
}

// ── Orthogonality ───────────────────────────────────────────────────

impl<T: FloatScalar> DenseMatrix<T> {
    /// `‖I - QᵀQ‖₁` for a square `Q`. Zero for an exactly orthogonal matrix.
    ///
    /// ```
    /// use numlab::DenseMatrix;
    /// let (c, s) = (0.6_f64, 0.8);
    /// let q = DenseMatrix::from_rows(2, 2, &[c, -s, s, c]);
    /// assert!(q.orthogonality_residual() < 1e-15);
    /// ```
    pub fn orthogonality_residual(&self) -> T {
        assert!(self.is_square(), "orthogonality residual requires a square matrix");
        let n = self.ncols;
        let qtq = &self.transpose() * self;
        let resid = DenseMatrix::from_fn(n, n, |i, j| {
            let id = if i == j { T::one() } else { T::zero() };
            id - qtq[(i, j)]
        });
        lange(NormType::One, &resid)
    }
}
