use alloc::vec;
use alloc::vec::Vec;

use log::debug;

use crate::linalg::{ggsvd3, ggsvd3_work_len, GsvdJob, LinalgError};
use crate::traits::FloatScalar;

use super::DenseMatrix;

// ── GsvdDecomposition ───────────────────────────────────────────────

/// Generalized singular value decomposition of a matrix pair.
///
/// For `A` (m×n) and `B` (p×n) with the same column count,
///
/// ```text
/// Uᵀ·A·Q = D1·[0 R],    Vᵀ·B·Q = D2·[0 R]
/// ```
///
/// with `U`, `V`, `Q` orthogonal, `R` `(k+l)×(k+l)` upper triangular and
/// `D1`, `D2` holding the cosine/sine pairs `alpha`, `beta`.
///
/// # Example
///
/// ```
/// use numlab::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
/// let b = DenseMatrix::from_rows(2, 2, &[4.0_f64, 0.0, 0.0, 3.0]);
/// let g = a.gsvd(&b).unwrap();
/// assert_eq!((g.k(), g.l()), (0, 2));
///
/// let mut sv = g.singular_values();
/// sv.sort_by(|x, y| x.partial_cmp(y).unwrap());
/// assert!((sv[0] - 0.75).abs() < 1e-12);
/// assert!((sv[1] - 4.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct GsvdDecomposition<T> {
    u: DenseMatrix<T>,
    v: DenseMatrix<T>,
    q: DenseMatrix<T>,
    r: DenseMatrix<T>,
    alpha: Vec<T>,
    beta: Vec<T>,
    order: Vec<usize>,
    k: usize,
    l: usize,
}

impl<T: FloatScalar> GsvdDecomposition<T> {
    /// Decompose `(a, b)`. Inputs are left unchanged.
    ///
    /// Returns [`LinalgError::DimensionMismatch`] if the column counts
    /// differ and [`LinalgError::ConvergenceFailure`] if the Jacobi
    /// iteration does not converge.
    pub fn new(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> Result<Self, LinalgError> {
        if a.ncols() != b.ncols() {
            return Err(LinalgError::DimensionMismatch);
        }
        let (m, n) = (a.nrows(), a.ncols());
        let p = b.nrows();

        let mut a = a.clone();
        let mut b = b.clone();
        let mut u = DenseMatrix::zeros(m, m);
        let mut v = DenseMatrix::zeros(p, p);
        let mut q = DenseMatrix::zeros(n, n);
        let mut alpha = vec![T::zero(); n];
        let mut beta = vec![T::zero(); n];
        let mut iwork = vec![0usize; n];
        let mut work = vec![T::zero(); ggsvd3_work_len(m, p, n)];
        let lwork = work.len() as isize;

        let (k, l, converged) = ggsvd3(
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
        if !converged {
            return Err(LinalgError::ConvergenceFailure);
        }
        debug!("gsvd of {}x{} and {}x{}: k={} l={}", m, n, p, n, k, l);

        // R from the top of A, with its trailing rows in B when m < k + l
        let kl = k + l;
        let mut r = DenseMatrix::zeros(kl, kl);
        for i in 0..kl.min(m) {
            for j in i..kl {
                r[(i, j)] = a[(i, n - kl + j)];
            }
        }
        for i in m..kl {
            for j in i..kl {
                r[(i, j)] = b[(i - k, n - kl + j)];
            }
        }

        let order = iwork[k..k + l.min(m.saturating_sub(k))].to_vec();
        Ok(Self {
            u,
            v,
            q,
            r,
            alpha,
            beta,
            order,
            k,
            l,
        })
    }

    /// Orthogonal `U` (m×m).
    pub fn u(&self) -> &DenseMatrix<T> {
        &self.u
    }

    /// Orthogonal `V` (p×p).
    pub fn v(&self) -> &DenseMatrix<T> {
        &self.v
    }

    /// Orthogonal `Q` (n×n).
    pub fn q(&self) -> &DenseMatrix<T> {
        &self.q
    }

    /// Upper triangular, nonsingular `R` of size `(k+l)×(k+l)`.
    pub fn r(&self) -> &DenseMatrix<T> {
        &self.r
    }

    /// Cosines, one per column of `A`.
    pub fn alpha(&self) -> &[T] {
        &self.alpha
    }

    /// Sines, one per column of `A`.
    pub fn beta(&self) -> &[T] {
        &self.beta
    }

    /// Rank of `[A; B]` beyond the row space of `B`.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of nontrivial pairs, the rank of `B`.
    pub fn l(&self) -> usize {
        self.l
    }

    /// Selection-sort exchanges ordering `alpha[k..]` decreasingly: step `i`
    /// swaps entry `k + i` with entry `sort_record()[i]`.
    pub fn sort_record(&self) -> &[usize] {
        &self.order
    }

    /// Finite generalized singular values `alpha[i] / beta[i]` for `i` in
    /// `k..k+l`, in the order produced by the decomposition.
    pub fn singular_values(&self) -> Vec<T> {
        (self.k..self.k + self.l)
            .map(|i| self.alpha[i] / self.beta[i])
            .collect()
    }

    /// `D1` (m×(k+l)): identity on the first `k` columns, then `alpha`.
    pub fn d1(&self) -> DenseMatrix<T> {
        let m = self.u.nrows();
        let kl = self.k + self.l;
        let mut d = DenseMatrix::zeros(m, kl);
        for i in 0..self.k.min(m) {
            d[(i, i)] = T::one();
        }
        for i in self.k..kl.min(m) {
            d[(i, i)] = self.alpha[i];
        }
        d
    }

    /// `D2` (p×(k+l)): zero on the first `k` columns, then `beta`.
    pub fn d2(&self) -> DenseMatrix<T> {
        let p = self.v.nrows();
        let mut d = DenseMatrix::zeros(p, self.k + self.l);
        for i in 0..self.l {
            d[(i, self.k + i)] = self.beta[self.k + i];
        }
        d
    }

    /// `[0 R]` ((k+l)×n), `R` in the trailing columns.
    pub fn zero_r(&self) -> DenseMatrix<T> {
        let n = self.q.nrows();
        let kl = self.k + self.l;
        let mut zr = DenseMatrix::zeros(kl, n);
        for i in 0..kl {
            for j in i..kl {
                zr[(i, n - kl + j)] = self.r[(i, j)];
            }
        }
        zr
    }
}

impl<T: FloatScalar> DenseMatrix<T> {
    /// Generalized SVD of `(self, b)`. See [`GsvdDecomposition`].
    pub fn gsvd(&self, b: &DenseMatrix<T>) -> Result<GsvdDecomposition<T>, LinalgError> {
        GsvdDecomposition::new(self, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(x: &DenseMatrix<f64>, y: &DenseMatrix<f64>, tol: f64) {
        assert_eq!((x.nrows(), x.ncols()), (y.nrows(), y.ncols()));
        for i in 0..x.nrows() {
            for j in 0..x.ncols() {
                assert!((x[(i, j)] - y[(i, j)]).abs() < tol, "({}, {}): {} vs {}", i, j, x[(i, j)], y[(i, j)]);
            }
        }
    }

    fn check_identities(a: &DenseMatrix<f64>, b: &DenseMatrix<f64>) -> GsvdDecomposition<f64> {
        let g = a.gsvd(b).unwrap();
        assert!(g.u().orthogonality_residual() < 1e-12);
        assert!(g.v().orthogonality_residual() < 1e-12);
        assert!(g.q().orthogonality_residual() < 1e-12);
        let zr = g.zero_r();
        assert_close(&(&(&g.u().transpose() * a) * g.q()), &(&g.d1() * &zr), 1e-10);
        assert_close(&(&(&g.v().transpose() * b) * g.q()), &(&g.d2() * &zr), 1e-10);
        g
    }

    #[test]
    fn tall_pair() {
        let a = DenseMatrix::from_rows(4, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, -1.0, 0.5, 2.0]);
        let b = DenseMatrix::from_rows(3, 3, &[2.0, -1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 4.0]);
        let g = check_identities(&a, &b);
        assert_eq!(g.k() + g.l(), 3);
        for i in g.k()..g.k() + g.l() {
            assert!((g.alpha()[i].powi(2) + g.beta()[i].powi(2) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn short_a() {
        // m < k + l: R continues in B
        let a = DenseMatrix::from_rows(1, 3, &[1.0, 2.0, 3.0]);
        let b = DenseMatrix::from_rows(3, 3, &[1.0, 0.0, 1.0, 0.0, 2.0, 1.0, 1.0, 1.0, 0.0]);
        let g = check_identities(&a, &b);
        assert_eq!(g.k() + g.l(), 3);
        for i in 1..3 {
            assert_eq!(g.alpha()[i], 0.0);
            assert_eq!(g.beta()[i], 1.0);
        }
    }

    #[test]
    fn rank_accessors() {
        // B has rank one, so the other column of A counts toward k
        let a = DenseMatrix::from_rows(2, 2, &[1.0, 2.0, -1.0, 3.0]);
        let b = DenseMatrix::from_rows(1, 2, &[1.0, 1.0]);
        let g = check_identities(&a, &b);
        assert_eq!((g.k(), g.l()), (1, 1));
        assert_eq!(g.r().nrows(), 2);
        assert_eq!(g.singular_values().len(), 1);
    }

    #[test]
    fn dimension_mismatch() {
        let a = DenseMatrix::<f64>::eye(2);
        let b = DenseMatrix::<f64>::eye(3);
        assert_eq!(a.gsvd(&b).unwrap_err(), LinalgError::DimensionMismatch);
    }
}
