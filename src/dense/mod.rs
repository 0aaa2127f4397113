mod view;

mod norm;
#[cfg(feature = "alloc")]
mod linalg;
#[cfg(feature = "alloc")]
mod ops;

pub use norm::{lange, NormType};
pub use view::{MatrixView, MatrixViewMut};

#[cfg(feature = "alloc")]
pub use linalg::GsvdDecomposition;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use core::ops::{Index, IndexMut};

#[cfg(feature = "alloc")]
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Heap-allocated row-major matrix with an explicit row stride.
///
/// Element `(i, j)` is stored at `data[i * stride + j]`; columns
/// `ncols..stride` of each row are padding that no routine reads or writes.
/// Borrow the storage with [`view`](DenseMatrix::view) or
/// [`view_mut`](DenseMatrix::view_mut) to pass it to the in-place routines.
///
/// # Examples
///
/// ```
/// use numlab::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// assert_eq!(a[(1, 0)], 4.0);
/// assert_eq!(a.stride(), 3);
///
/// let padded = DenseMatrix::with_stride(2, 3, 7, f64::NAN);
/// assert_eq!(padded.stride(), 7);
/// assert!(padded[(1, 2)].is_nan());
/// ```
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
    stride: usize,
}

// ── Constructors ────────────────────────────────────────────────────

#[cfg(feature = "alloc")]
impl<T: Scalar> DenseMatrix<T> {
    /// Create an `nrows x ncols` matrix of zeros with tight stride.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::fill(nrows, ncols, T::zero())
    }

    /// Create a matrix filled with a given value.
    ///
    /// ```
    /// use numlab::DenseMatrix;
    /// let m = DenseMatrix::fill(2, 3, 7.0_f64);
    /// assert_eq!(m[(1, 2)], 7.0);
    /// ```
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Self {
        Self::with_stride(nrows, ncols, ncols.max(1), value)
    }

    /// Create a matrix whose rows are `stride` elements apart, every
    /// element (padding included) set to `value`.
    ///
    /// Panics if `stride < max(1, ncols)`.
    pub fn with_stride(nrows: usize, ncols: usize, stride: usize, value: T) -> Self {
        assert!(
            stride >= ncols.max(1),
            "stride {} is smaller than max(1, ncols) = {}",
            stride,
            ncols.max(1)
        );
        Self {
            data: vec![value; nrows * stride],
            nrows,
            ncols,
            stride,
        }
    }

    /// Create an `n x n` identity matrix.
    ///
    /// ```
    /// use numlab::DenseMatrix;
    /// let id = DenseMatrix::<f64>::eye(3);
    /// assert_eq!(id[(2, 2)], 1.0);
    /// assert_eq!(id[(0, 1)], 0.0);
    /// ```
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Create a matrix from a flat slice in row-major order.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        let mut m = Self::zeros(nrows, ncols);
        for i in 0..nrows {
            m.row_mut(i).copy_from_slice(&row_major[i * ncols..(i + 1) * ncols]);
        }
        m
    }

    /// Create a matrix by evaluating `f(i, j)` for every element.
    ///
    /// ```
    /// use numlab::DenseMatrix;
    /// let m = DenseMatrix::from_fn(2, 2, |i, j| (i * 10 + j) as f64);
    /// assert_eq!(m[(1, 1)], 11.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut m = Self::zeros(nrows, ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                m[(i, j)] = f(i, j);
            }
        }
        m
    }

    /// Copy a strided view into a tightly packed matrix.
    pub fn from_view(view: &MatrixView<'_, T>) -> Self {
        Self::from_fn(view.nrows(), view.ncols(), |i, j| view[(i, j)])
    }
}

// ── Accessors ───────────────────────────────────────────────────────

#[cfg(feature = "alloc")]
impl<T> DenseMatrix<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Raw storage including row padding.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        &self.data[i * self.stride..i * self.stride + self.ncols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        &mut self.data[i * self.stride..i * self.stride + self.ncols]
    }

    /// Borrow the whole matrix as a read-only strided view.
    #[inline]
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView::new(&self.data, self.nrows, self.ncols, self.stride)
    }

    /// Borrow the whole matrix as a mutable strided view.
    #[inline]
    pub fn view_mut(&mut self) -> MatrixViewMut<'_, T> {
        MatrixViewMut::new(&mut self.data, self.nrows, self.ncols, self.stride)
    }
}

#[cfg(feature = "alloc")]
impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({},{}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &self.data[row * self.stride + col]
    }
}

#[cfg(feature = "alloc")]
impl<T> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({},{}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &mut self.data[row * self.stride + col]
    }
}

#[cfg(feature = "alloc")]
impl<T> MatrixRef<T> for DenseMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.stride + col]
    }
}

#[cfg(feature = "alloc")]
impl<T> MatrixMut<T> for DenseMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.stride + col]
    }
}
