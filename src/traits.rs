use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for real floating-point matrix elements.
///
/// Required by every decomposition, norm and rotation kernel in the crate.
/// Machine parameters follow the LAPACK `lamch` conventions.
pub trait FloatScalar: Scalar + Float {
    /// Relative machine precision with rounding, `eps / 2` (LAPACK `lamch('E')`).
    #[inline]
    fn unit_roundoff() -> Self {
        Self::epsilon() * (Self::one() / (Self::one() + Self::one()))
    }

    /// `eps * base`, the spacing of floats around one (LAPACK `lamch('P')`).
    #[inline]
    fn ulp() -> Self {
        Self::epsilon()
    }

    /// Smallest number whose reciprocal does not overflow (LAPACK `lamch('S')`).
    #[inline]
    fn safe_min() -> Self {
        Self::min_positive_value()
    }

    /// Convert a dimension into the scalar type.
    #[inline]
    fn from_usize(n: usize) -> Self {
        <Self as num_traits::NumCast>::from(n).unwrap_or_else(Self::max_value)
    }
}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Lets algorithms run over owned [`DenseMatrix`](crate::DenseMatrix)
/// values and borrowed strided views alike.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
}
