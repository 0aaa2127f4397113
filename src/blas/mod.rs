//! Reference BLAS kernels in row-major storage.
//!
//! Level 1 routines work on any [`FloatScalar`](crate::FloatScalar). The
//! level 2 triangular products operate on `Complex<T>` and need the
//! `complex` feature.

mod level1;
#[cfg(feature = "complex")]
mod level2;

pub use level1::{axpy, dot, nrm2, rot, scal};
pub(crate) use level1::rot_within;
#[cfg(feature = "complex")]
pub use level2::{tbmv, trmv};

/// Which side an orthogonal factor is applied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Operation applied to a matrix operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    NoTrans,
    Trans,
    /// Conjugate transpose. Identical to `Trans` for real data.
    ConjTrans,
}

/// Which triangle of a matrix is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uplo {
    Upper,
    Lower,
}

/// Whether a triangular matrix has an implicit unit diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diag {
    NonUnit,
    Unit,
}
