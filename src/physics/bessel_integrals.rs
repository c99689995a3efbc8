//! Auxiliary integral functions for the per-harmonic boundary-value solution
//! of the field inside a core window.
//!
//! `M0` and `M1` are the auxiliary functions
//! `M0(x) = (2/pi) integral(exp(-x cos t), t = 0..pi/2)` and
//! `M1(x) = (2/pi) (1 - integral(exp(-x cos t) cos t, t = 0..pi/2))`,
//! related to the modified Struve functions by `L0 = I0 - M0`, `L1 = I1 - M1`.
//! The integrals of `t*I1(t)`, `t*K1(t)` and `t*L1(t)` over an interval have
//! closed forms in terms of `M0`, `M1` and the scaled modified Bessel
//! functions; each is provided raw and with its dominant exponential factor
//! divided out so it stays representable at large arguments.
//!
//! # References
//!
//!   \[1\] R. M. Del Vecchio et al., *Transformer Design Principles*,
//!         2nd ed. CRC Press, 2010, ch. 9-10.
//!
//!   \[2\] L. Rabins, "Transformer reactance calculations with digital computers,"
//!         Transactions of the AIEE, Part I, vol. 75, pp. 261-267, 1956,
//!         doi: [10.1109/TCE.1956.6372540](https://doi.org/10.1109/TCE.1956.6372540).

use core::f64::consts::PI;

use libm::{cos, exp, expm1};

use crate::error::RabinsError;
use crate::math::{bessel_i0_scaled, bessel_i1_scaled, bessel_k0_scaled, bessel_k1_scaled};
use crate::quadrature::integrate;

/// Largest argument accepted by the unscaled integral functions; beyond this
/// their exponential factor overflows 64-bit floats.
pub const MAX_UNSCALED_ARGUMENT: f64 = 700.0;

// Quadrature tolerance targets for the M-function integrands
const EPS_ABS: f64 = 1e-10;
const EPS_REL: f64 = 1e-8;

#[inline]
pub(crate) fn check_unscaled(argument: f64) -> Result<(), RabinsError> {
    if argument > MAX_UNSCALED_ARGUMENT {
        return Err(RabinsError::UnsafeArgument {
            argument,
            limit: MAX_UNSCALED_ARGUMENT,
        });
    }
    Ok(())
}

/// Auxiliary function `M0(x)`, evaluated by adaptive quadrature.
///
/// Decays from `M0(0) = 1` like `2/(pi x)` for large `x`. Pure function;
/// safe to call concurrently from independent harmonic evaluations.
pub fn m0(x: f64) -> Result<f64, RabinsError> {
    let v = integrate(|theta| exp(-x * cos(theta)), 0.0, PI / 2.0, EPS_ABS, EPS_REL)?;
    Ok(v * 2.0 / PI)
}

/// Auxiliary function `M1(x)`, evaluated by adaptive quadrature.
///
/// Grows from `M1(0) = 0` toward `2/pi` for large `x`. Pure function;
/// safe to call concurrently from independent harmonic evaluations.
pub fn m1(x: f64) -> Result<f64, RabinsError> {
    let v = integrate(
        |theta| exp(-x * cos(theta)) * cos(theta),
        0.0,
        PI / 2.0,
        EPS_ABS,
        EPS_REL,
    )?;
    Ok((1.0 - v) * 2.0 / PI)
}

/// `integral(M0(t), t = 0..b)`, evaluated by adaptive quadrature after
/// exchanging the order of integration:
/// `(2/pi) integral((1 - exp(-b cos t)) / cos t, t = 0..pi/2)`.
///
/// The integrand is evaluated through `expm1` so the removable singularity
/// at `t = pi/2` stays well-conditioned.
pub fn integral_of_m0(b: f64) -> Result<f64, RabinsError> {
    let v = integrate(
        |theta| {
            let c = cos(theta);
            -expm1(-b * c) / c
        },
        0.0,
        PI / 2.0,
        EPS_ABS,
        EPS_REL,
    )?;
    Ok(v * 2.0 / PI)
}

/// Mantissa of the scaled `integral(t*I1(t), t = 0..b)`:
/// the raw integral equals `exp(b)` times this value.
///
/// Closed form `(pi/2) b (M1(b) I0s(b) - M0(b) I1s(b))` where `I0s`, `I1s`
/// are the exponentially-scaled Bessel functions.
pub fn integral_of_t_i1_scaled(b: f64) -> Result<f64, RabinsError> {
    if b == 0.0 {
        return Ok(0.0);
    }
    Ok(scaled_t_i1(b, m0(b)?, m1(b)?))
}

/// `integral(t*I1(t), t = 0..b)`.
///
/// # Errors
///
/// [`RabinsError::UnsafeArgument`] for `b` beyond the overflow limit; use
/// [`integral_of_t_i1_scaled`] there instead.
pub fn integral_of_t_i1(b: f64) -> Result<f64, RabinsError> {
    check_unscaled(b)?;
    Ok(exp(b) * integral_of_t_i1_scaled(b)?)
}

/// `integral(t*I1(t), t = a..b)` as the difference of the endpoint values.
pub fn integral_of_t_i1_between(a: f64, b: f64) -> Result<f64, RabinsError> {
    Ok(integral_of_t_i1(b)? - integral_of_t_i1(a)?)
}

/// Scaled `integral(t*I1(t), t = a..b)`: the raw integral equals `exp(a)`
/// times this value. The endpoint scale factors are combined algebraically
/// (`exp(b - a)` on the upper endpoint's mantissa) rather than by
/// subtracting two raw values, so the result stays finite when both
/// endpoints are large.
pub fn integral_of_t_i1_between_scaled(a: f64, b: f64) -> Result<f64, RabinsError> {
    check_unscaled(b - a)?;
    Ok(exp(b - a) * integral_of_t_i1_scaled(b)? - integral_of_t_i1_scaled(a)?)
}

/// Decaying tail `T(b)` of the scaled `integral(t*K1(t), t = 0..b)`:
/// the raw integral equals `pi/2 - exp(-b) T(b)`.
///
/// Closed form `(pi/2) b (M1(b) K0s(b) + M0(b) K1s(b))` where `K0s`, `K1s`
/// are the exponentially-scaled Bessel functions. `T(0) = pi/2` by the
/// limit of `b K1(b)`.
pub fn integral_of_t_k1_scaled(b: f64) -> Result<f64, RabinsError> {
    if b == 0.0 {
        return Ok(PI / 2.0);
    }
    Ok(scaled_t_k1_tail(b, m0(b)?, m1(b)?))
}

/// `integral(t*K1(t), t = 0..b)`. Approaches `pi/2` from below as `b` grows.
pub fn integral_of_t_k1(b: f64) -> Result<f64, RabinsError> {
    Ok(PI / 2.0 - exp(-b) * integral_of_t_k1_scaled(b)?)
}

/// `integral(t*K1(t), t = a..b)`, evaluated from the endpoint tails so the
/// `pi/2` plateaus cancel analytically instead of numerically.
pub fn integral_of_t_k1_between(a: f64, b: f64) -> Result<f64, RabinsError> {
    Ok(exp(-a) * integral_of_t_k1_scaled(a)? - exp(-b) * integral_of_t_k1_scaled(b)?)
}

/// Scaled `integral(t*K1(t), t = a..b)`: the raw integral equals `exp(-a)`
/// times this value. The endpoint scale factors are combined algebraically
/// (`exp(a - b)` on the upper endpoint's tail) to preserve precision when
/// both endpoints are large.
pub fn integral_of_t_k1_between_scaled(a: f64, b: f64) -> Result<f64, RabinsError> {
    Ok(integral_of_t_k1_scaled(a)? - exp(a - b) * integral_of_t_k1_scaled(b)?)
}

/// `integral(t*L1(t), t = 0..b)` where `L1` is the modified Struve function,
/// via `-b M0(b) - b^2/pi + integral(M0, 0..b) + integral(t*I1, 0..b)`.
///
/// # Errors
///
/// [`RabinsError::UnsafeArgument`] for `b` beyond the overflow limit, since
/// the `t*I1` contribution carries an `exp(b)` factor.
pub fn integral_of_t_l1(b: f64) -> Result<f64, RabinsError> {
    check_unscaled(b)?;
    Ok(-b * m0(b)? - b * b / PI + integral_of_m0(b)? + integral_of_t_i1(b)?)
}

/// `integral(t*L1(t), t = a..b)` as the difference of the endpoint values.
pub fn integral_of_t_l1_between(a: f64, b: f64) -> Result<f64, RabinsError> {
    Ok(integral_of_t_l1(b)? - integral_of_t_l1(a)?)
}

/// Mantissa of the scaled `t*I1` integral with the `M` values precomputed,
/// for callers that evaluate several integrals at the same argument.
#[inline]
pub(crate) fn scaled_t_i1(b: f64, m0b: f64, m1b: f64) -> f64 {
    PI / 2.0 * b * (m1b * bessel_i0_scaled(b) - m0b * bessel_i1_scaled(b))
}

/// Tail of the scaled `t*K1` integral with the `M` values precomputed.
#[inline]
pub(crate) fn scaled_t_k1_tail(b: f64, m0b: f64, m1b: f64) -> f64 {
    if b == 0.0 {
        return PI / 2.0;
    }
    PI / 2.0 * b * (m1b * bessel_k0_scaled(b) + m0b * bessel_k1_scaled(b))
}
