use rand::Rng;

use super::{ContinuousDistribution, DegenerateInputError, StatsError};
use crate::FloatScalar;

/// Laplace (double exponential) distribution with location μ and scale b.
///
/// f(x) = exp(−|x − μ| / b) / (2b).
///
/// # Example
///
/// ```
/// use numlab::stats::{ContinuousDistribution, Laplace};
///
/// let l = Laplace::new(1.0_f64, 2.0).unwrap();
/// assert!((l.pdf(1.0) - 0.25).abs() < 1e-15);
/// assert!((l.quantile(l.cdf(3.0)) - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Laplace<T> {
    mu: T,
    scale: T,
}

impl<T: FloatScalar> Laplace<T> {
    /// Create a Laplace distribution. Requires `scale > 0` and a finite `mu`.
    pub fn new(mu: T, scale: T) -> Result<Self, StatsError> {
        if !(scale > T::zero()) || !mu.is_finite() {
            return Err(StatsError::InvalidParameter);
        }
        Ok(Self { mu, scale })
    }

    /// Location μ.
    pub fn mu(&self) -> T {
        self.mu
    }

    /// Scale b.
    pub fn scale(&self) -> T {
        self.scale
    }

    pub fn median(&self) -> T {
        self.mu
    }

    pub fn mode(&self) -> T {
        self.mu
    }

    pub fn std_dev(&self) -> T {
        (T::one() + T::one()).sqrt() * self.scale
    }

    /// Differential entropy in nats, `1 + ln(2b)`.
    pub fn entropy(&self) -> T {
        T::one() + ((T::one() + T::one()) * self.scale).ln()
    }

    pub fn skewness(&self) -> T {
        T::zero()
    }

    /// Excess kurtosis.
    pub fn ex_kurtosis(&self) -> T {
        T::from(3.0).unwrap()
    }

    /// Number of parameters (μ and b).
    pub fn num_parameters(&self) -> usize {
        2
    }

    /// Gradient of `ln_pdf(x)` with respect to `[μ, b]`.
    ///
    /// The density is not differentiable in μ at `x = μ`, where the first
    /// component is NaN.
    pub fn score(&self, x: T) -> [T; 2] {
        let diff = x - self.mu;
        let d_mu = if diff > T::zero() {
            T::one() / self.scale
        } else if diff < T::zero() {
            -T::one() / self.scale
        } else {
            T::nan()
        };
        let d_scale = diff.abs() / (self.scale * self.scale) - T::one() / self.scale;
        [d_mu, d_scale]
    }

    /// Derivative of `ln_pdf(x)` with respect to `x`; NaN at `x = μ`.
    pub fn score_input(&self, x: T) -> T {
        let diff = x - self.mu;
        if diff > T::zero() {
            -T::one() / self.scale
        } else if diff < T::zero() {
            T::one() / self.scale
        } else {
            T::nan()
        }
    }

    /// Draw one sample by inverting the CDF at a uniform variate from `rng`.
    ///
    /// ```
    /// use numlab::stats::Laplace;
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let l = Laplace::new(0.0_f64, 1.0).unwrap();
    /// let mut rng = StdRng::seed_from_u64(7);
    /// assert!(l.sample(&mut rng).is_finite());
    /// ```
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let half = T::from(0.5).unwrap();
        let two = T::one() + T::one();
        let u = T::from(rng.random::<f64>()).unwrap() - half;
        if u < T::zero() {
            self.mu + self.scale * (T::one() + two * u).ln()
        } else {
            self.mu - self.scale * (T::one() - two * u).ln()
        }
    }
}

#[cfg(feature = "alloc")]
impl<T: FloatScalar> Laplace<T> {
    /// Maximum-likelihood fit to (optionally weighted) samples.
    ///
    /// μ is the weighted empirical median, the first sample in sorted order
    /// whose cumulative weight reaches half the total; b is the weighted
    /// mean absolute deviation from μ. A single sample gives `b = 0`, a
    /// degenerate distribution that [`Laplace::new`] would reject.
    ///
    /// Panics if `samples` is empty or `weights` has a different length.
    ///
    /// ```
    /// use numlab::stats::Laplace;
    /// let l = Laplace::fit(&[10.0_f64, 1.0, 1.0], None);
    /// assert_eq!(l.mu(), 1.0);
    /// assert!((l.scale() - 3.0).abs() < 1e-14);
    /// ```
    pub fn fit(samples: &[T], weights: Option<&[T]>) -> Self {
        use alloc::vec::Vec;

        assert!(!samples.is_empty(), "cannot fit a distribution to no samples");
        if let Some(w) = weights {
            assert_eq!(
                w.len(),
                samples.len(),
                "weights length {} does not match samples length {}",
                w.len(),
                samples.len()
            );
        }
        if samples.len() == 1 {
            return Self {
                mu: samples[0],
                scale: T::zero(),
            };
        }

        let weight = |i: usize| weights.map_or(T::one(), |w| w[i]);
        let mut order: Vec<usize> = (0..samples.len()).collect();
        order.sort_by(|&i, &j| {
            samples[i]
                .partial_cmp(&samples[j])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let total = (0..samples.len()).fold(T::zero(), |acc, i| acc + weight(i));
        let half = total * T::from(0.5).unwrap();
        let mut mu = samples[order[order.len() - 1]];
        let mut cumsum = T::zero();
        for &i in &order {
            cumsum = cumsum + weight(i);
            if cumsum >= half {
                mu = samples[i];
                break;
            }
        }

        let abs_error = (0..samples.len()).fold(T::zero(), |acc, i| acc + weight(i) * (mu - samples[i]).abs());
        Self {
            mu,
            scale: abs_error / total,
        }
    }

    /// Like [`Laplace::fit`], but rejects fits whose variance `2b²` is
    /// below the smallest normal number, which includes every fit with
    /// `b = 0`.
    ///
    /// ```
    /// use numlab::stats::{DegenerateInputError, Laplace};
    ///
    /// assert!(Laplace::try_fit(&[1.0_f64, 4.0, 2.0], None).is_ok());
    /// assert_eq!(
    ///     Laplace::try_fit(&[3.0_f64, 3.0], None),
    ///     Err(DegenerateInputError(0.0))
    /// );
    /// ```
    pub fn try_fit(samples: &[T], weights: Option<&[T]>) -> Result<Self, DegenerateInputError<T>> {
        let fitted = Self::fit(samples, weights);
        let variance = fitted.variance();
        if !(variance >= T::safe_min()) {
            return Err(DegenerateInputError(variance));
        }
        Ok(fitted)
    }
}

impl<T: FloatScalar> ContinuousDistribution<T> for Laplace<T> {
    fn pdf(&self, x: T) -> T {
        let two = T::one() + T::one();
        (-(x - self.mu).abs() / self.scale).exp() / (two * self.scale)
    }

    fn ln_pdf(&self, x: T) -> T {
        let two = T::one() + T::one();
        -two.ln() - self.scale.ln() - (x - self.mu).abs() / self.scale
    }

    fn cdf(&self, x: T) -> T {
        let half = T::from(0.5).unwrap();
        let z = (x - self.mu) / self.scale;
        if x < self.mu {
            half * z.exp()
        } else {
            T::one() - half * (-z).exp()
        }
    }

    fn survival(&self, x: T) -> T {
        let half = T::from(0.5).unwrap();
        let z = (x - self.mu) / self.scale;
        if x < self.mu {
            T::one() - half * z.exp()
        } else {
            half * (-z).exp()
        }
    }

    /// Inverse CDF. Returns NaN for `p` outside `[0, 1]`.
    fn quantile(&self, p: T) -> T {
        if !(p >= T::zero() && p <= T::one()) {
            return T::nan();
        }
        let half = T::from(0.5).unwrap();
        let two = T::one() + T::one();
        if p < half {
            self.mu + self.scale * (T::one() + two * (p - half)).ln()
        } else {
            self.mu - self.scale * (T::one() - two * (p - half)).ln()
        }
    }

    fn mean(&self) -> T {
        self.mu
    }

    fn variance(&self) -> T {
        let two = T::one() + T::one();
        two * self.scale * self.scale
    }
}
