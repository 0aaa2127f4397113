//! # numlab
//!
//! Pure-Rust reference implementations of the LAPACK routines behind the
//! generalized singular value decomposition, a small BLAS layer, and
//! univariate distributions. `no_std` compatible: the in-place routines
//! work on borrowed, row-major, strided views and never allocate.
//!
//! ## Quick start
//!
//! ```
//! use numlab::DenseMatrix;
//!
//! let a = DenseMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! let b = DenseMatrix::from_rows(2, 2, &[1.0_f64, 0.0, 1.0, 1.0]);
//! let g = a.gsvd(&b).unwrap();
//!
//! // Uᵀ·A·Q = D1·[0 R]
//! let lhs = &(&g.u().transpose() * &a) * g.q();
//! let rhs = &g.d1() * &g.zero_r();
//! assert!((&lhs - &rhs).frobenius_norm() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`dense`] — [`MatrixView`] / [`MatrixViewMut`] over caller buffers
//!   (`data[i * stride + j]`), the owning [`DenseMatrix`] (requires
//!   `alloc`), [`lange`] norms and the [`GsvdDecomposition`] wrapper.
//!
//! - [`blas`] — level 1 kernels (`nrm2`, `scal`, `dot`, `axpy`, `rot`) and,
//!   with `complex`, the triangular products `trmv` and `tbmv`.
//!
//! - [`linalg`] — Householder reflectors, QR / RQ / pivoted QR, plane
//!   rotations and 2×2 kernels, and the GSVD pipeline `ggsvp3` → `tgsja`
//!   → `ggsvd3`, also reachable through the [`Gsvd`] trait.
//!
//! - [`stats`] — [`ContinuousDistribution`](stats::ContinuousDistribution)
//!   and the [`Laplace`](stats::Laplace) distribution.
//!
//! - [`traits`] — [`Scalar`], [`FloatScalar`], [`MatrixRef`], [`MatrixMut`].
//!
//! ## Logging
//!
//! Rank decisions, tolerances and Jacobi cycle counts are emitted through
//! the [`log`] facade at `debug`/`trace` level; non-convergence logs a
//! `warn`. Install any `log` backend to see them.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Implies `alloc`. Hardware FPU via system libm |
//! | `alloc`   | via std  | `DenseMatrix`, `GsvdDecomposition`, `Laplace::fit` |
//! | `libm`    | no       | Pure-Rust float math; required for `no_std` builds (without `std`) |
//! | `complex` | no       | `Complex<f32>` / `Complex<f64>` BLAS level 2 via `num-complex` |
//! | `all`     | no       | All features: `std` + `complex` |

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod blas;
pub mod dense;
pub mod linalg;
pub mod stats;
pub mod traits;

#[cfg(feature = "alloc")]
pub use dense::{DenseMatrix, GsvdDecomposition};
pub use dense::{lange, MatrixView, MatrixViewMut, NormType};
pub use linalg::{Gsvd, GsvdJob, LinalgError, Native};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
