use crate::traits::{FloatScalar, MatrixRef};

#[cfg(feature = "alloc")]
use super::DenseMatrix;

/// Matrix norm selector for [`lange`] and [`DenseMatrix::norm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormType {
    /// Largest absolute element, `max |a_ij|` (not a consistent norm).
    MaxAbs,
    /// Maximum column sum of absolute values.
    One,
    /// Maximum row sum of absolute values.
    Infinity,
    /// Square root of the sum of squares.
    Frobenius,
}

/// Norm of a general matrix (LAPACK `lange`).
///
/// Returns zero for an empty matrix. A NaN element makes the result NaN.
///
/// ```
/// use numlab::{lange, MatrixView, NormType};
///
/// let data = [1.0_f64, -2.0, 3.0, 4.0];
/// let a = MatrixView::new(&data, 2, 2, 2);
/// assert_eq!(lange(NormType::MaxAbs, &a), 4.0);
/// assert_eq!(lange(NormType::One, &a), 6.0);
/// assert_eq!(lange(NormType::Infinity, &a), 7.0);
/// assert!((lange(NormType::Frobenius, &a) - 30.0_f64.sqrt()).abs() < 1e-15);
/// ```
pub fn lange<T: FloatScalar>(norm: NormType, a: &impl MatrixRef<T>) -> T {
    let (m, n) = (a.nrows(), a.ncols());
    if m == 0 || n == 0 {
        return T::zero();
    }
    match norm {
        NormType::MaxAbs => {
            let mut value = T::zero();
            for i in 0..m {
                for j in 0..n {
                    let t = a.get(i, j).abs();
                    if value < t || t.is_nan() {
                        value = t;
                    }
                }
            }
            value
        }
        NormType::One => {
            let mut value = T::zero();
            for j in 0..n {
                let mut sum = T::zero();
                for i in 0..m {
                    sum = sum + a.get(i, j).abs();
                }
                if value < sum || sum.is_nan() {
                    value = sum;
                }
            }
            value
        }
        NormType::Infinity => {
            let mut value = T::zero();
            for i in 0..m {
                let mut sum = T::zero();
                for j in 0..n {
                    sum = sum + a.get(i, j).abs();
                }
                if value < sum || sum.is_nan() {
                    value = sum;
                }
            }
            value
        }
        NormType::Frobenius => {
            // scaled sum of squares
            let mut scale = T::zero();
            let mut ssq = T::one();
            for i in 0..m {
                for j in 0..n {
                    let x = *a.get(i, j);
                    if x.is_nan() {
                        return x;
                    }
                    if x != T::zero() {
                        let ax = x.abs();
                        if scale < ax {
                            let r = scale / ax;
                            ssq = T::one() + ssq * r * r;
                            scale = ax;
                        } else {
                            let r = ax / scale;
                            ssq = ssq + r * r;
                        }
                    }
                }
            }
            scale * ssq.sqrt()
        }
    }
}

#[cfg(feature = "alloc")]
impl<T: FloatScalar> DenseMatrix<T> {
    /// Matrix norm of the requested kind.
    pub fn norm(&self, kind: NormType) -> T {
        lange(kind, self)
    }

    /// Frobenius norm.
    ///
    /// ```
    /// use numlab::DenseMatrix;
    /// let m = DenseMatrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// assert!((m.frobenius_norm() - 5.0).abs() < 1e-15);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        lange(NormType::Frobenius, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::MatrixView;

    #[test]
    fn frobenius_does_not_overflow() {
        let data = [1e300_f64, 1e300, 1e300, 1e300];
        let a = MatrixView::new(&data, 2, 2, 2);
        let f = lange(NormType::Frobenius, &a);
        assert!((f / 2e300 - 1.0).abs() < 1e-15);
    }

    #[test]
    fn padding_ignored() {
        let data = [1.0_f64, 2.0, 1e9, 3.0, 4.0, 1e9];
        let a = MatrixView::new(&data, 2, 2, 3);
        assert_eq!(lange(NormType::MaxAbs, &a), 4.0);
        assert_eq!(lange(NormType::One, &a), 6.0);
    }

    #[test]
    fn nan_propagates() {
        let data = [1.0_f64, f64::NAN];
        let a = MatrixView::new(&data, 1, 2, 2);
        assert!(lange(NormType::One, &a).is_nan());
        assert!(lange(NormType::MaxAbs, &a).is_nan());
        assert!(lange(NormType::Frobenius, &a).is_nan());
    }

    #[test]
    fn empty_is_zero() {
        let data: [f64; 0] = [];
        let a = MatrixView::new(&data, 0, 3, 3);
        assert_eq!(lange(NormType::Infinity, &a), 0.0);
    }
}
