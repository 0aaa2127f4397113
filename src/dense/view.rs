use core::ops::{Index, IndexMut};

use crate::traits::{MatrixMut, MatrixRef};

#[inline]
fn required_len(nrows: usize, ncols: usize, stride: usize) -> usize {
    if nrows == 0 || ncols == 0 {
        0
    } else {
        (nrows - 1) * stride + ncols
    }
}

/// Span of row `i` in the backing slice. Zero-width views may have an
/// empty buffer, so their rows are empty ranges at zero.
#[inline]
fn row_range(i: usize, ncols: usize, stride: usize) -> core::ops::Range<usize> {
    if ncols == 0 {
        0..0
    } else {
        i * stride..i * stride + ncols
    }
}

#[inline]
fn check_layout(len: usize, nrows: usize, ncols: usize, stride: usize) {
    assert!(
        stride >= ncols.max(1),
        "stride {} is smaller than max(1, ncols) = {}",
        stride,
        ncols.max(1)
    );
    let need = required_len(nrows, ncols, stride);
    assert!(
        len >= need,
        "buffer of length {} too short for {}x{} matrix with stride {} (need {})",
        len,
        nrows,
        ncols,
        stride,
        need
    );
}

/// Borrowed read-only view of a row-major strided matrix.
///
/// Element `(i, j)` lives at `data[i * stride + j]`. Views never own their
/// buffer; sub-blocks share it without copying.
///
/// ```
/// use numlab::MatrixView;
///
/// let data = [1.0_f64, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0];
/// let a = MatrixView::new(&data, 2, 3, 4);
/// assert_eq!(a[(1, 2)], 6.0);
/// let b = a.block(0, 1, 2, 2);
/// assert_eq!(b[(1, 0)], 5.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    nrows: usize,
    ncols: usize,
    stride: usize,
}

impl<'a, T> MatrixView<'a, T> {
    /// Wrap a buffer. Panics if `stride < max(1, ncols)` or the buffer is too short.
    pub fn new(data: &'a [T], nrows: usize, ncols: usize, stride: usize) -> Self {
        check_layout(data.len(), nrows, ncols, stride);
        Self {
            data,
            nrows,
            ncols,
            stride,
        }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Distance between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The backing slice, starting at element `(0, 0)`.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Row `i` as a contiguous slice of length `ncols`.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        &self.data[row_range(i, self.ncols, self.stride)]
    }

    /// Sub-block of size `rows x cols` starting at `(i, j)`.
    ///
    /// Panics if the block extends beyond the view.
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> MatrixView<'a, T> {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.nrows, self.ncols,
        );
        let start = (i * self.stride + j).min(self.data.len());
        let len = required_len(rows, cols, self.stride);
        MatrixView {
            data: &self.data[start..start + len],
            nrows: rows,
            ncols: cols,
            stride: self.stride,
        }
    }
}

impl<T> MatrixRef<T> for MatrixView<'_, T> {
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
        debug_assert!(row < self.nrows && col < self.ncols);
        &self.data[row * self.stride + col]
    }
}

impl<T> Index<(usize, usize)> for MatrixView<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.nrows && col < self.ncols, "index ({},{}) out of bounds", row, col);
        &self.data[row * self.stride + col]
    }
}

/// Borrowed mutable view of a row-major strided matrix.
///
/// The routines in [`linalg`](crate::linalg) take their matrix arguments as
/// `MatrixViewMut` and overwrite them in place.
///
/// ```
/// use numlab::MatrixViewMut;
///
/// let mut data = vec![0.0_f64; 2 * 5];
/// let mut a = MatrixViewMut::new(&mut data, 2, 3, 5);
/// a[(1, 2)] = 7.0;
/// a.block_mut(0, 1, 2, 2).fill(1.0);
/// assert_eq!(a[(1, 2)], 1.0);
/// assert_eq!(data[5 + 2], 1.0);
/// ```
#[derive(Debug)]
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    nrows: usize,
    ncols: usize,
    stride: usize,
}

impl<'a, T> MatrixViewMut<'a, T> {
    /// Wrap a buffer. Panics if `stride < max(1, ncols)` or the buffer is too short.
    pub fn new(data: &'a mut [T], nrows: usize, ncols: usize, stride: usize) -> Self {
        check_layout(data.len(), nrows, ncols, stride);
        Self {
            data,
            nrows,
            ncols,
            stride,
        }
    }

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

    /// Reborrow as a read-only view.
    #[inline]
    pub fn as_view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: self.data,
            nrows: self.nrows,
            ncols: self.ncols,
            stride: self.stride,
        }
    }

    /// Reborrow mutably with a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> MatrixViewMut<'_, T> {
        MatrixViewMut {
            data: self.data,
            nrows: self.nrows,
            ncols: self.ncols,
            stride: self.stride,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data
    }

    /// The backing slice starting at `(0, 0)`. Strided vector kernels
    /// address rows with increment 1 and columns with increment `stride`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        &self.data[row_range(i, self.ncols, self.stride)]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        let range = row_range(i, self.ncols, self.stride);
        &mut self.data[range]
    }

    /// Mutable sub-block of size `rows x cols` starting at `(i, j)`.
    pub fn block_mut(&mut self, i: usize, j: usize, rows: usize, cols: usize) -> MatrixViewMut<'_, T> {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.nrows, self.ncols,
        );
        let start = (i * self.stride + j).min(self.data.len());
        let len = required_len(rows, cols, self.stride);
        MatrixViewMut {
            data: &mut self.data[start..start + len],
            nrows: rows,
            ncols: cols,
            stride: self.stride,
        }
    }

    /// Read-only sub-block of size `rows x cols` starting at `(i, j)`.
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> MatrixView<'_, T> {
        self.as_view().block(i, j, rows, cols)
    }

    /// Split into the rows `0..mid` and `mid..nrows`.
    pub fn split_rows_mut(&mut self, mid: usize) -> (MatrixViewMut<'_, T>, MatrixViewMut<'_, T>) {
        assert!(mid <= self.nrows, "split row {} out of bounds for {} rows", mid, self.nrows);
        let at = (mid * self.stride).min(self.data.len());
        let (top, bottom) = self.data.split_at_mut(at);
        (
            MatrixViewMut {
                data: top,
                nrows: mid,
                ncols: self.ncols,
                stride: self.stride,
            },
            MatrixViewMut {
                data: bottom,
                nrows: self.nrows - mid,
                ncols: self.ncols,
                stride: self.stride,
            },
        )
    }

    /// Swap columns `a` and `b`.
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for i in 0..self.nrows {
            self.data.swap(i * self.stride + a, i * self.stride + b);
        }
    }

    /// Reorder columns so that column `j` of the result is column `perm[j]`
    /// of the input. Done in place by following the cycles of `perm`.
    pub fn permute_cols(&mut self, perm: &[usize]) {
        assert!(perm.len() >= self.ncols, "permutation shorter than column count");
        for i in 0..self.ncols {
            let mut k = perm[i];
            while k < i {
                k = perm[k];
            }
            self.swap_cols(i, k);
        }
    }
}

impl<T: Copy> MatrixViewMut<'_, T> {
    /// Set every element to `value`. Padding between rows is left untouched.
    pub fn fill(&mut self, value: T) {
        for i in 0..self.nrows {
            self.row_mut(i).fill(value);
        }
    }

    /// Set every off-diagonal element to `off` and every diagonal element
    /// to `diag` (LAPACK `laset`).
    pub fn set_diagonal(&mut self, off: T, diag: T) {
        self.fill(off);
        for i in 0..self.nrows.min(self.ncols) {
            self.data[i * self.stride + i] = diag;
        }
    }
}

impl<T> MatrixRef<T> for MatrixViewMut<'_, T> {
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
        debug_assert!(row < self.nrows && col < self.ncols);
        &self.data[row * self.stride + col]
    }
}

impl<T> MatrixMut<T> for MatrixViewMut<'_, T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert!(row < self.nrows && col < self.ncols);
        &mut self.data[row * self.stride + col]
    }
}

impl<T> Index<(usize, usize)> for MatrixViewMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.nrows && col < self.ncols, "index ({},{}) out of bounds", row, col);
        &self.data[row * self.stride + col]
    }
}

impl<T> IndexMut<(usize, usize)> for MatrixViewMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.nrows && col < self.ncols, "index ({},{}) out of bounds", row, col);
        &mut self.data[row * self.stride + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> [i32; 12] {
        // 3x3 logical matrix in a stride-4 buffer, padding = -1
        [0, 1, 2, -1, 3, 4, 5, -1, 6, 7, 8, -1]
    }

    #[test]
    fn strided_indexing() {
        let data = buffer();
        let v = MatrixView::new(&data, 3, 3, 4);
        assert_eq!(v[(0, 0)], 0);
        assert_eq!(v[(1, 2)], 5);
        assert_eq!(v[(2, 1)], 7);
        assert_eq!(v.row(2), &[6, 7, 8]);
    }

    #[test]
    fn block_shares_buffer() {
        let mut data = buffer();
        let mut v = MatrixViewMut::new(&mut data, 3, 3, 4);
        {
            let mut b = v.block_mut(1, 1, 2, 2);
            assert_eq!(b[(0, 0)], 4);
            assert_eq!(b[(1, 1)], 8);
            b[(1, 0)] = 70;
        }
        assert_eq!(v[(2, 1)], 70);
        assert_eq!(data[3], -1);
    }

    #[test]
    fn empty_block_at_edge() {
        let data = buffer();
        let v = MatrixView::new(&data, 3, 3, 4);
        let b = v.block(3, 3, 0, 0);
        assert_eq!(b.nrows(), 0);
        assert_eq!(b.as_slice().len(), 0);
    }

    #[test]
    fn zero_width_block_rows() {
        let mut data = buffer();
        let mut v = MatrixViewMut::new(&mut data, 3, 3, 4);
        {
            let mut b = v.block_mut(0, 3, 3, 0);
            b.fill(99);
            for i in 0..3 {
                assert!(b.row(i).is_empty());
                assert!(b.row_mut(i).is_empty());
                assert!(b.as_view().row(i).is_empty());
            }
        }
        assert_eq!(data, buffer());
    }

    #[test]
    fn fill_keeps_padding() {
        let mut data = buffer();
        MatrixViewMut::new(&mut data, 3, 3, 4).fill(9);
        assert_eq!(data, [9, 9, 9, -1, 9, 9, 9, -1, 9, 9, 9, -1]);
    }

    #[test]
    fn permute_cols_forward() {
        let mut data = [0, 1, 2, 3, 10, 11, 12, 13];
        let mut v = MatrixViewMut::new(&mut data, 2, 4, 4);
        v.permute_cols(&[2, 0, 3, 1]);
        assert_eq!(v.row(0), &[2, 0, 3, 1]);
        assert_eq!(v.row(1), &[12, 10, 13, 11]);
    }

    #[test]
    fn split_rows() {
        let mut data = buffer();
        let mut v = MatrixViewMut::new(&mut data, 3, 3, 4);
        let (mut top, bottom) = v.split_rows_mut(1);
        top[(0, 2)] = bottom[(1, 2)];
        assert_eq!(top.nrows(), 1);
        assert_eq!(bottom.nrows(), 2);
        assert_eq!(data[2], 8);
    }

    #[test]
    #[should_panic(expected = "stride")]
    fn stride_too_small() {
        let data = [0.0_f64; 6];
        let _ = MatrixView::new(&data, 2, 3, 2);
    }

    #[test]
    #[should_panic(expected = "too short")]
    fn buffer_too_short() {
        let data = [0.0_f64; 5];
        let _ = MatrixView::new(&data, 2, 3, 3);
    }
}
