use crate::blas::{axpy, dot};
use crate::linalg::householder::larfg;
use crate::traits::FloatScalar;

/// `|a|` carrying the sign of `b` (Fortran `SIGN`). `-0.0` counts as non-negative.
#[inline]
pub(crate) fn sign<T: FloatScalar>(a: T, b: T) -> T {
    if b >= T::zero() {
        a.abs()
    } else {
        -a.abs()
    }
}

/// `sqrt(x² + y²)` without destructive overflow or underflow.
///
/// A NaN argument is returned unchanged.
///
/// ```
/// use numlab::linalg::lapy2;
/// assert_eq!(lapy2(3.0_f64, -4.0), 5.0);
/// let big = lapy2(3e200_f64, 4e200);
/// assert!((big / 5e200 - 1.0).abs() < 1e-15);
/// ```
pub fn lapy2<T: FloatScalar>(x: T, y: T) -> T {
    if x.is_nan() {
        return x;
    }
    if y.is_nan() {
        return y;
    }
    let xa = x.abs();
    let ya = y.abs();
    let w = xa.max(ya);
    let z = xa.min(ya);
    if z == T::zero() || w > T::max_value() {
        w
    } else {
        let q = z / w;
        w * (T::one() + q * q).sqrt()
    }
}

/// Plane rotation with `[c s; -s c] · [f; g] = [r; 0]`.
///
/// `g = 0` gives `c = 1, s = 0, r = f`; `f = 0` gives `c = 0` and
/// `r = |g|`. Otherwise `c > 0` and `r` has the sign of `f`. Intermediate
/// values are scaled to avoid overflow and underflow.
///
/// ```
/// use numlab::linalg::lartg;
/// let (c, s, r) = lartg(3.0_f64, 4.0);
/// assert!((c - 0.6).abs() < 1e-15 && (s - 0.8).abs() < 1e-15 && (r - 5.0).abs() < 1e-15);
/// ```
pub fn lartg<T: FloatScalar>(f: T, g: T) -> (T, T, T) {
    let zero = T::zero();
    let one = T::one();
    let two = one + one;
    let safmin = T::safe_min();
    let safmax = one / safmin;
    let rtmin = safmin.sqrt();
    let rtmax = (safmax / two).sqrt();

    let f1 = f.abs();
    let g1 = g.abs();
    if g == zero {
        (one, zero, f)
    } else if f == zero {
        (zero, sign(one, g), g1)
    } else if f1 > rtmin && f1 < rtmax && g1 > rtmin && g1 < rtmax {
        let d = (f * f + g * g).sqrt();
        let c = f1 / d;
        let r = sign(d, f);
        (c, g / r, r)
    } else {
        let u = safmax.min(safmin.max(f1).max(g1));
        let fs = f / u;
        let gs = g / u;
        let d = (fs * fs + gs * gs).sqrt();
        let c = fs.abs() / d;
        let r = sign(d, f);
        (c, gs / r, r * u)
    }
}

/// Singular values `(ssmin, ssmax)` of the 2×2 upper triangular matrix
/// `[f g; 0 h]`.
pub fn las2<T: FloatScalar>(f: T, g: T, h: T) -> (T, T) {
    let zero = T::zero();
    let one = T::one();
    let two = one + one;

    let fa = f.abs();
    let ga = g.abs();
    let ha = h.abs();
    let fhmn = fa.min(ha);
    let fhmx = fa.max(ha);
    if fhmn == zero {
        let ssmax = if fhmx == zero {
            ga
        } else {
            let big = fhmx.max(ga);
            let q = fhmx.min(ga) / big;
            big * (one + q * q).sqrt()
        };
        return (zero, ssmax);
    }
    if ga < fhmx {
        let as_ = one + fhmn / fhmx;
        let at = (fhmx - fhmn) / fhmx;
        let au = (ga / fhmx) * (ga / fhmx);
        let c = two / ((as_ * as_ + au).sqrt() + (at * at + au).sqrt());
        (fhmn * c, fhmx / c)
    } else {
        let au = fhmx / ga;
        if au == zero {
            // fhmx/ga underflowed; ssmin is tiny and may itself underflow
            ((fhmn * fhmx) / ga, ga)
        } else {
            let as_ = one + fhmn / fhmx;
            let at = (fhmx - fhmn) / fhmx;
            let c = one / ((one + (as_ * au) * (as_ * au)).sqrt() + (one + (at * au) * (at * au)).sqrt());
            let ssmin = (fhmn * c) * au;
            (ssmin + ssmin, ga / (c + c))
        }
    }
}

/// Singular value decomposition of a 2×2 upper triangular matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangularSvd2<T> {
    /// Smaller singular value, signed.
    pub ssmin: T,
    /// Larger singular value, signed.
    pub ssmax: T,
    /// Right rotation `(cos, sin)`.
    pub right: (T, T),
    /// Left rotation `(cos, sin)`.
    pub left: (T, T),
}

/// SVD of `[f g; 0 h]`:
///
/// ```text
/// [ csl  snl ] [ f  g ] [ csr -snr ]   [ ssmax   0   ]
/// [-snl  csl ] [ 0  h ] [ snr  csr ] = [   0   ssmin ]
/// ```
///
/// `|ssmax|` is the larger singular value. Accurate to a few ulps barring
/// over/underflow.
///
/// ```
/// use numlab::linalg::lasv2;
/// let svd = lasv2(3.0_f64, 0.0, -2.0);
/// assert_eq!(svd.ssmax.abs(), 3.0);
/// assert_eq!(svd.ssmin.abs(), 2.0);
/// ```
pub fn lasv2<T: FloatScalar>(f: T, g: T, h: T) -> TriangularSvd2<T> {
    let zero = T::zero();
    let one = T::one();
    let two = one + one;
    let four = two + two;
    let half = one / two;
    let eps = T::unit_roundoff();

    let mut ft = f;
    let mut fa = ft.abs();
    let mut ht = h;
    let mut ha = h.abs();

    // pmax points to the element of largest magnitude: 1 = f, 2 = g, 3 = h
    let mut pmax = 1;
    let swap = ha > fa;
    if swap {
        pmax = 3;
        core::mem::swap(&mut ft, &mut ht);
        core::mem::swap(&mut fa, &mut ha);
    }
    let gt = g;
    let ga = gt.abs();

    let mut ssmin;
    let mut ssmax;
    let clt;
    let slt;
    let crt;
    let srt;
    if ga == zero {
        // diagonal matrix
        ssmin = ha;
        ssmax = fa;
        clt = one;
        crt = one;
        slt = zero;
        srt = zero;
    } else if ga > fa && fa / ga < eps {
        // g dominates to working precision
        pmax = 2;
        ssmax = ga;
        ssmin = if ha > one { fa / (ga / ha) } else { (fa / ga) * ha };
        clt = one;
        slt = ht / gt;
        srt = one;
        crt = ft / gt;
    } else {
        if ga > fa {
            pmax = 2;
        }
        let d = fa - ha;
        let mut l = if d == fa { one } else { d / fa };
        let m = gt / ft;
        let mut t = two - l;
        let mm = m * m;
        let tt = t * t;
        let s = (tt + mm).sqrt();
        let r = if l == zero { m.abs() } else { (l * l + mm).sqrt() };
        let a = half * (s + r);
        ssmin = ha / a;
        ssmax = fa * a;
        if mm == zero {
            t = if l == zero {
                sign(two, ft) * sign(one, gt)
            } else {
                gt / sign(d, ft) + m / t
            };
        } else {
            t = (m / (s + t) + m / (r + l)) * (one + a);
        }
        l = (t * t + four).sqrt();
        crt = two / l;
        srt = t / l;
        clt = (crt + srt * m) / a;
        slt = (ht / ft) * srt / a;
    }

    let (csl, snl, csr, snr) = if swap {
        (srt, crt, slt, clt)
    } else {
        (clt, slt, crt, srt)
    };

    // fix signs so that ssmax, ssmin reproduce the input triangle
    let tsign = match pmax {
        1 => sign(one, csr) * sign(one, csl) * sign(one, f),
        2 => sign(one, snr) * sign(one, csl) * sign(one, g),
        _ => sign(one, snr) * sign(one, snl) * sign(one, h),
    };
    ssmax = sign(ssmax, tsign);
    ssmin = sign(ssmin, tsign * sign(one, f) * sign(one, h));

    TriangularSvd2 {
        ssmin,
        ssmax,
        right: (csr, snr),
        left: (csl, snl),
    }
}

/// Rotations `U`, `V`, `Q` produced by [`lags2`]. Each pair `(c, s)`
/// describes the orthogonal matrix `[c s; -s c]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairRotation<T> {
    pub u: (T, T),
    pub v: (T, T),
    pub q: (T, T),
}

/// Choose the rotation that zeroes the same entry of `Uᵀ·A·Q` and `Vᵀ·B·Q`,
/// preferring whichever of the two rows is computed more accurately.
#[inline]
fn pick_q<T: FloatScalar>(
    ua: (T, T),
    aua: T,
    vb: (T, T),
    avb: T,
    upper: bool,
) -> (T, T) {
    let rot = |(x, y): (T, T)| {
        let (c, s, _) = if upper { lartg(-x, y) } else { lartg(x, y) };
        (c, s)
    };
    let ua_abs = ua.0.abs() + ua.1.abs();
    let vb_abs = vb.0.abs() + vb.1.abs();
    if ua_abs != T::zero() && aua / ua_abs <= avb / vb_abs {
        rot(ua)
    } else {
        rot(vb)
    }
}

/// 2×2 Kogbetliantz step for a pair of triangular blocks.
///
/// With `upper`, `A = [a1 a2; 0 a3]` and `B = [b1 b2; 0 b3]`; the returned
/// rotations make `Uᵀ·A·Q` and `Vᵀ·B·Q` lower triangular (zero at `(0, 1)`).
/// Otherwise `A = [a1 0; a2 a3]`, `B = [b1 0; b2 b3]`, and both products
/// become upper triangular (zero at `(1, 0)`).
///
/// The rows of `A·adj(B)` drive the choice. Zero pivots fall back to
/// identity-like rotations through [`lartg`].
pub fn lags2<T: FloatScalar>(
    upper: bool,
    a1: T,
    a2: T,
    a3: T,
    b1: T,
    b2: T,
    b3: T,
) -> PairRotation<T> {
    if upper {
        // C = A·adj(B) = [a b; 0 d]
        let a = a1 * b3;
        let d = a3 * b1;
        let b = a2 * b1 - a1 * b2;
        let svd = lasv2(a, b, d);
        let (csl, snl) = svd.left;
        let (csr, snr) = svd.right;

        if csl.abs() >= snl.abs() || csr.abs() >= snr.abs() {
            // first rows of Uᵀ·A and Vᵀ·B
            let ua11r = csl * a1;
            let ua12 = csl * a2 + snl * a3;
            let vb11r = csr * b1;
            let vb12 = csr * b2 + snr * b3;
            let aua12 = csl.abs() * a2.abs() + snl.abs() * a3.abs();
            let avb12 = csr.abs() * b2.abs() + snr.abs() * b3.abs();
            let q = pick_q((ua11r, ua12), aua12, (vb11r, vb12), avb12, true);
            PairRotation {
                u: (csl, -snl),
                v: (csr, -snr),
                q,
            }
        } else {
            // second rows, then swap
            let ua21 = -snl * a1;
            let ua22 = -snl * a2 + csl * a3;
            let vb21 = -snr * b1;
            let vb22 = -snr * b2 + csr * b3;
            let aua22 = snl.abs() * a2.abs() + csl.abs() * a3.abs();
            let avb22 = snr.abs() * b2.abs() + csr.abs() * b3.abs();
            let q = pick_q((ua21, ua22), aua22, (vb21, vb22), avb22, true);
            PairRotation {
                u: (snl, csl),
                v: (snr, csr),
                q,
            }
        }
    } else {
        // C = A·adj(B) = [a 0; c d]
        let a = a1 * b3;
        let d = a3 * b1;
        let c = a2 * b3 - a3 * b2;
        // lower triangular C: SVD of Cᵀ swaps the roles of the rotations
        let svd = lasv2(a, c, d);
        let (csl, snl) = svd.left;
        let (csr, snr) = svd.right;

        if csr.abs() >= snr.abs() || csl.abs() >= snl.abs() {
            // second rows of Uᵀ·A and Vᵀ·B
            let ua21 = -snr * a1 + csr * a2;
            let ua22r = csr * a3;
            let vb21 = -snl * b1 + csl * b2;
            let vb22r = csl * b3;
            let aua21 = snr.abs() * a1.abs() + csr.abs() * a2.abs();
            let avb21 = snl.abs() * b1.abs() + csl.abs() * b2.abs();
            let q = pick_q((ua22r, ua21), aua21, (vb22r, vb21), avb21, false);
            PairRotation {
                u: (csr, -snr),
                v: (csl, -snl),
                q,
            }
        } else {
            // first rows, then swap
            let ua11 = csr * a1 + snr * a2;
            let ua12 = snr * a3;
            let vb11 = csl * b1 + snl * b2;
            let vb12 = snl * b3;
            let aua11 = csr.abs() * a1.abs() + snr.abs() * a2.abs();
            let avb11 = csl.abs() * b1.abs() + snl.abs() * b2.abs();
            let q = pick_q((ua12, ua11), aua11, (vb12, vb11), avb11, false);
            PairRotation {
                u: (snr, csr),
                v: (snl, csl),
                q,
            }
        }
    }
}

/// Smallest singular value of the `n×2` matrix `[x y]`, a measure of how
/// close `x` and `y` are to parallel. Both vectors are overwritten.
pub fn lapll<T: FloatScalar>(n: usize, x: &mut [T], incx: usize, y: &mut [T], incy: usize) -> T {
    if n <= 1 {
        return T::zero();
    }

    // QR of [x y]
    let (beta, tau) = larfg(n, x[0], &mut x[incx..], incx);
    let a11 = beta;
    x[0] = T::one();
    let c = -tau * dot(n, x, incx, y, incy);
    axpy(n, c, x, incx, y, incy);

    let tail = (2 * incy).min(y.len());
    let (beta, _) = larfg(n - 1, y[incy], &mut y[tail..], incy);
    let a12 = y[0];
    let a22 = beta;

    las2(a11, a12, a22).0
}
