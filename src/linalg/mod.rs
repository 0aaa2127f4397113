//! Dense orthogonal factorizations and the generalized SVD pipeline.
//!
//! All routines work in place on row-major strided views
//! ([`MatrixViewMut`](crate::MatrixViewMut)) and take their scratch space
//! from caller-provided slices, so nothing here allocates.
//!
//! | Stage | Routines |
//! |-------|----------|
//! | Reflectors | [`larfg`], [`larf`] |
//! | Factorizations | [`geqr2`], [`gerq2`], [`geqp3`], [`org2r`], [`orm2r`], [`ormr2`] |
//! | Rotations | [`lartg`], [`lapy2`], [`las2`], [`lasv2`], [`lags2`], [`lapll`] |
//! | GSVD | [`ggsvp3`], [`tgsja`], [`ggsvd3`] through the [`Gsvd`] trait |

pub(crate) mod gsvd;
pub(crate) mod gsvp;
pub(crate) mod householder;
pub(crate) mod rotation;
pub(crate) mod tgsja;

pub use gsvd::{ggsvd3, ggsvd3_work_len, Gsvd, Native};
pub use gsvp::{ggsvp3, ggsvp3_work_len};
pub use householder::{geqp3, geqr2, gerq2, larf, larfg, org2r, orm2r, ormr2};
pub use rotation::{lags2, lapll, lapy2, lartg, las2, lasv2, PairRotation, TriangularSvd2};
pub use tgsja::{tgsja, MAX_CYCLES};

/// Whether an orthogonal factor is accumulated.
///
/// With `Compute`, the factor's buffer is overwritten entirely; with
/// `None` it is never read or written and may be an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GsvdJob {
    Compute,
    None,
}

impl GsvdJob {
    #[inline]
    pub fn wanted(self) -> bool {
        self == GsvdJob::Compute
    }
}

/// Errors from linear algebra operations.
///
/// Returned by [`GsvdDecomposition::new`](crate::GsvdDecomposition::new)
/// and [`DenseMatrix::gsvd`](crate::DenseMatrix::gsvd). The in-place
/// routines report non-convergence as a `bool` instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinalgError {
    /// Iterative algorithm did not converge within the iteration budget.
    ConvergenceFailure,
    /// Operand shapes are incompatible.
    DimensionMismatch,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::ConvergenceFailure => write!(f, "iterative algorithm did not converge"),
            LinalgError::DimensionMismatch => write!(f, "matrix dimensions are incompatible"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
