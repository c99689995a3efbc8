//! Globally-adaptive numerical quadrature for smooth integrands on finite
//! intervals, with typed failure instead of a silent fallback value.

use crate::error::RabinsError;

/// Hard cap on the number of live subintervals. The integrands used by the
/// harmonic field solution are smooth, so hitting this limit indicates a
/// genuinely pathological integrand rather than slow convergence.
const MAX_INTERVALS: usize = 2048;

struct Interval {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Simpson's rule over a single panel.
#[inline]
fn simpson<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> f64 {
    let m = 0.5 * (a + b);
    (b - a) / 6.0 * (f(a) + 4.0 * f(m) + f(b))
}

/// One refined subinterval: compares a whole-panel Simpson estimate against
/// the two-half estimate, keeps the Richardson-extrapolated value, and uses
/// the difference as the local error estimate.
fn refine<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Interval {
    let whole = simpson(f, a, b);
    let m = 0.5 * (a + b);
    let halves = simpson(f, a, m) + simpson(f, m, b);
    let correction = (halves - whole) / 15.0;
    Interval {
        a,
        b,
        value: halves + correction,
        error: correction.abs(),
    }
}

/// Integrate `f` over `[a, b]`, bisecting the worst subinterval until the
/// summed error estimate satisfies `max(epsabs, epsrel * |result|)`.
///
/// # Errors
///
/// Returns [`RabinsError::NumericalFailure`] if the interval budget is
/// exhausted, a subinterval collapses to floating-point resolution, or the
/// running estimate becomes non-finite.
pub fn integrate<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    epsabs: f64,
    epsrel: f64,
) -> Result<f64, RabinsError> {
    let mut intervals = Vec::with_capacity(64);
    intervals.push(refine(&f, a, b));

    loop {
        let total: f64 = intervals.iter().map(|iv| iv.value).sum();
        let err: f64 = intervals.iter().map(|iv| iv.error).sum();

        if !total.is_finite() || !err.is_finite() {
            return Err(RabinsError::NumericalFailure {
                intervals: intervals.len(),
                abs_err: f64::INFINITY,
            });
        }
        if err <= epsabs.max(epsrel * total.abs()) {
            return Ok(total);
        }
        if intervals.len() >= MAX_INTERVALS {
            return Err(RabinsError::NumericalFailure {
                intervals: intervals.len(),
                abs_err: err,
            });
        }

        // Bisect the subinterval with the largest error estimate
        let worst = intervals
            .iter()
            .enumerate()
            .max_by(|(_, p), (_, q)| p.error.total_cmp(&q.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let iv = intervals.swap_remove(worst);
        let m = 0.5 * (iv.a + iv.b);
        if m <= iv.a || m >= iv.b {
            return Err(RabinsError::NumericalFailure {
                intervals: intervals.len(),
                abs_err: err,
            });
        }
        intervals.push(refine(&f, iv.a, m));
        intervals.push(refine(&f, m, iv.b));
    }
}
