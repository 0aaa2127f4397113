//! Univariate probability distributions.
//!
//! Distributions implement [`ContinuousDistribution`] for a consistent API
//! and add distribution-specific extras (fitting, score functions,
//! sampling) as inherent methods.
//!
//! | Distribution | Parameters | Support |
//! |---|---|---|
//! | [`Laplace`] | location μ, scale b | (−∞, ∞) |
//!
//! Construction fails with [`StatsError`]; fitting to data without spread
//! fails with [`DegenerateInputError`].
//!
//! # Example
//!
//! ```
//! use numlab::stats::{ContinuousDistribution, Laplace};
//!
//! let l = Laplace::new(0.0_f64, 1.0).unwrap();
//! assert!((l.cdf(0.0) - 0.5).abs() < 1e-14);
//! assert!((l.variance() - 2.0).abs() < 1e-14);
//! ```

mod laplace;


pub use laplace::Laplace;

/// Errors from distribution construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsError {
    /// A parameter is out of its valid range.
    InvalidParameter,
}

impl core::fmt::Display for StatsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StatsError::InvalidParameter => {
                write!(f, "distribution parameter out of valid range")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StatsError {}

/// Input data whose variance is too small to estimate from stably.
///
/// Carries the offending variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegenerateInputError<T>(pub T);

impl<T: core::fmt::Display> core::fmt::Display for DegenerateInputError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "variance too low: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl<T: core::fmt::Debug + core::fmt::Display> std::error::Error for DegenerateInputError<T> {}

/// Trait for continuous probability distributions.
pub trait ContinuousDistribution<T> {
    /// Probability density function.
    fn pdf(&self, x: T) -> T;
    /// Natural log of the probability density function.
    fn ln_pdf(&self, x: T) -> T;
    /// Cumulative distribution function P(X ≤ x).
    fn cdf(&self, x: T) -> T;
    /// Survival function P(X > x).
    fn survival(&self, x: T) -> T;
    /// Quantile function (inverse CDF). Returns x such that P(X ≤ x) = p.
    fn quantile(&self, p: T) -> T;
    /// Expected value E\[X\].
    fn mean(&self) -> T;
    /// Variance Var(X).
    fn variance(&self) -> T;
}
