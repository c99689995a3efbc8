//! Per-harmonic coefficients of the boundary-value field solution, and the
//! per-coil cache of the ones that depend only on radial geometry.
//!
//! For spatial harmonic `n` the radial coordinates are scaled by
//! `m = n pi / (wind_ht_factor * window_height)`, giving `x1 = m r_inner`,
//! `x2 = m r_outer` and `xc = m r_core`. The coefficient family `C..G`
//! matches the field solution's boundary-matching constants; each is
//! provided raw, with a fixed exponential factor divided out ("scaled"), and
//! as a `(mantissa, exponent)` pair for callers that combine exponents
//! across sections before exponentiating.
//!
//! # References
//!
//!   \[1\] R. M. Del Vecchio et al., *Transformer Design Principles*,
//!         2nd ed. CRC Press, 2010, ch. 9-10.

use core::f64::consts::PI;

use libm::exp;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RabinsError;
use crate::math::{bessel_i0_scaled, bessel_k0_scaled};
use crate::physics::bessel_integrals::{
    check_unscaled, integral_of_m0, integral_of_t_i1, integral_of_t_i1_between,
    integral_of_t_i1_between_scaled, integral_of_t_i1_scaled, integral_of_t_k1,
    integral_of_t_k1_between, integral_of_t_k1_between_scaled, integral_of_t_k1_scaled, m0, m1,
    scaled_t_i1, scaled_t_k1_tail,
};
use crate::physics::disk_section::DiskSection;

/// (1/m) radial scale factor of harmonic `n` in the extended window.
#[inline]
pub fn scale_factor(n: usize, wind_ht_factor: f64, window_height: f64) -> f64 {
    n as f64 * PI / (wind_ht_factor * window_height)
}

/// Scaled radial bounds `(x1, x2, xc)` of a section at harmonic `n`.
#[inline]
fn scaled_bounds(section: &DiskSection, n: usize, wind_ht_factor: f64) -> (f64, f64, f64) {
    let m = scale_factor(n, wind_ht_factor, section.window_height());
    (
        m * section.inner_radius(),
        m * section.outer_radius(),
        m * section.core_radius(),
    )
}

/// Ratio of scaled I0 to scaled K0 at the core's scaled radius. Encodes the
/// requirement that the field solution stay finite at the core surface; zero
/// when there is no core, since K0 diverges at the origin.
#[inline]
fn core_ratio(xc: f64) -> f64 {
    if xc == 0.0 {
        0.0
    } else {
        bessel_i0_scaled(xc) / bessel_k0_scaled(xc)
    }
}

/// Coefficient `C(n)`: `integral(t*K1(t))` between the section's scaled
/// radial bounds.
pub fn c_n(section: &DiskSection, n: usize, wind_ht_factor: f64) -> Result<f64, RabinsError> {
    let (x1, x2, _) = scaled_bounds(section, n, wind_ht_factor);
    integral_of_t_k1_between(x1, x2)
}

/// Scaled `C(n)`: the raw coefficient equals `exp(-x1)` times this value.
pub fn c_n_scaled(
    section: &DiskSection,
    n: usize,
    wind_ht_factor: f64,
) -> Result<f64, RabinsError> {
    let (x1, x2, _) = scaled_bounds(section, n, wind_ht_factor);
    integral_of_t_k1_between_scaled(x1, x2)
}

/// Coefficient `D(n)`: `C(n)` reflected off the core surface through the
/// scaled-Bessel ratio and the factor `exp(2 xc)`.
///
/// # Errors
///
/// [`RabinsError::UnsafeArgument`] when `exp(2 xc)` would overflow; use
/// [`d_n_scaled`] or [`d_n_parts`] there instead.
pub fn d_n(section: &DiskSection, n: usize, wind_ht_factor: f64) -> Result<f64, RabinsError> {
    let (_, _, xc) = scaled_bounds(section, n, wind_ht_factor);
    check_unscaled(2.0 * xc)?;
    Ok(exp(2.0 * xc) * core_ratio(xc) * c_n(section, n, wind_ht_factor)?)
}

/// Scaled `D(n)`: the raw coefficient equals `exp(2 xc - x1)` times this
/// value. No exponential is evaluated at all; the factor is carried
/// symbolically.
pub fn d_n_scaled(
    section: &DiskSection,
    n: usize,
    wind_ht_factor: f64,
) -> Result<f64, RabinsError> {
    let (_, _, xc) = scaled_bounds(section, n, wind_ht_factor);
    Ok(core_ratio(xc) * c_n_scaled(section, n, wind_ht_factor)?)
}

/// `D(n)` as a `(mantissa, exponent)` pair with
/// `D(n) = mantissa * exp(exponent)`.
pub fn d_n_parts(
    section: &DiskSection,
    n: usize,
    wind_ht_factor: f64,
) -> Result<(f64, f64), RabinsError> {
    let (x1, _, xc) = scaled_bounds(section, n, wind_ht_factor);
    Ok((d_n_scaled(section, n, wind_ht_factor)?, 2.0 * xc - x1))
}

/// Coefficient `E(n)`: `integral(t*K1(t))` from zero to the section's scaled
/// outer radius. Bounded by `pi/2`.
pub fn e_n(section: &DiskSection, n: usize, wind_ht_factor: f64) -> Result<f64, RabinsError> {
    let (_, x2, _) = scaled_bounds(section, n, wind_ht_factor);
    integral_of_t_k1(x2)
}

/// Scaled `E(n)`: the decaying tail `T(x2)`, with
/// `E(n) = pi/2 - exp(-x2) * T(x2)`.
pub fn e_n_scaled(
    section: &DiskSection,
    n: usize,
    wind_ht_factor: f64,
) -> Result<f64, RabinsError> {
    let (_, x2, _) = scaled_bounds(section, n, wind_ht_factor);
    integral_of_t_k1_scaled(x2)
}

/// Coefficient `F(n)`: the `D`-like core-reflection term minus the
/// `integral(t*I1(t))` from zero to the scaled inner radius.
///
/// # Errors
///
/// [`RabinsError::UnsafeArgument`] when either exponential factor would
/// overflow; use [`f_n_scaled`] or [`f_n_parts`] there instead.
pub fn f_n(section: &DiskSection, n: usize, wind_ht_factor: f64) -> Result<f64, RabinsError> {
    let (x1, _, xc) = scaled_bounds(section, n, wind_ht_factor);
    check_unscaled(2.0 * xc)?;
    Ok(exp(2.0 * xc) * core_ratio(xc) * c_n(section, n, wind_ht_factor)?
        - integral_of_t_i1(x1)?)
}

/// Scaled `F(n)`: the raw coefficient equals `exp(x1)` times this value.
/// The two contributions' dominant exponentials cancel analytically before
/// evaluation, so the result stays representable for all harmonics.
pub fn f_n_scaled(
    section: &DiskSection,
    n: usize,
    wind_ht_factor: f64,
) -> Result<f64, RabinsError> {
    let (x1, _, xc) = scaled_bounds(section, n, wind_ht_factor);
    Ok(exp(2.0 * (xc - x1)) * core_ratio(xc) * c_n_scaled(section, n, wind_ht_factor)?
        - integral_of_t_i1_scaled(x1)?)
}

/// `F(n)` as a `(mantissa, exponent)` pair with
/// `F(n) = mantissa * exp(exponent)`.
pub fn f_n_parts(
    section: &DiskSection,
    n: usize,
    wind_ht_factor: f64,
) -> Result<(f64, f64), RabinsError> {
    let (x1, _, _) = scaled_bounds(section, n, wind_ht_factor);
    Ok((f_n_scaled(section, n, wind_ht_factor)?, x1))
}

/// Coefficient `G(n)`: the core-reflection term plus (rather than minus) the
/// `integral(t*I1(t))` between the section's scaled radial bounds.
///
/// # Errors
///
/// [`RabinsError::UnsafeArgument`] when either exponential factor would
/// overflow; use [`g_n_scaled`] there instead.
pub fn g_n(section: &DiskSection, n: usize, wind_ht_factor: f64) -> Result<f64, RabinsError> {
    let (x1, x2, xc) = scaled_bounds(section, n, wind_ht_factor);
    check_unscaled(2.0 * xc)?;
    Ok(exp(2.0 * xc) * core_ratio(xc) * c_n(section, n, wind_ht_factor)?
        + integral_of_t_i1_between(x1, x2)?)
}

/// Scaled `G(n)`: the raw coefficient equals `exp(x2)` times this value.
pub fn g_n_scaled(
    section: &DiskSection,
    n: usize,
    wind_ht_factor: f64,
) -> Result<f64, RabinsError> {
    let (x1, x2, xc) = scaled_bounds(section, n, wind_ht_factor);
    Ok(exp(2.0 * xc - x1 - x2) * core_ratio(xc) * c_n_scaled(section, n, wind_ht_factor)?
        + exp(x1 - x2) * integral_of_t_i1_between_scaled(x1, x2)?)
}

/// Per-coil table of the per-harmonic quantities that depend only on radial
/// geometry (inner/outer radius, core radius, window height). Built once for
/// the first section seen of a coil and shared across all of its sections
/// and every pairwise mutual-inductance evaluation.
#[derive(Clone, Debug)]
pub struct RadialConstants {
    inner_radius: f64,
    outer_radius: f64,
    core_radius: f64,
    window_height: f64,
    /// `exp(x1) * integral(t*K1, x1..x2)` per harmonic
    pub scaled_c: Vec<f64>,
    /// `exp(x1 - 2 xc) * D(n)` per harmonic
    pub scaled_d: Vec<f64>,
    /// Tail `T(x2)` with `E(n) = pi/2 - exp(-x2) T(x2)` per harmonic
    pub scaled_e: Vec<f64>,
    /// `exp(-x1) * F(n)` per harmonic
    pub scaled_f: Vec<f64>,
    /// The self-inductance bracket
    /// `E * int(t*I1) + F * int(t*K1) - pi/2 * int(t*L1)` over the section's
    /// radial bounds, assembled with all exponents cancelled analytically
    pub partial_self: Vec<f64>,
    /// `exp(-x1) * integral(t*I1, x1..x2)` per harmonic
    pub scaled_int_i1: Vec<f64>,
}

struct Row {
    scaled_c: f64,
    scaled_d: f64,
    scaled_e: f64,
    scaled_f: f64,
    partial_self: f64,
    scaled_int_i1: f64,
}

impl Row {
    fn build(
        n: usize,
        r1: f64,
        r2: f64,
        rc: f64,
        window_height: f64,
        wind_ht_factor: f64,
    ) -> Result<Self, RabinsError> {
        let m = scale_factor(n, wind_ht_factor, window_height);
        let (x1, x2, xc) = (m * r1, m * r2, m * rc);
        check_unscaled(x2 - x1)?;

        // Each harmonic needs the M functions and the integral of M0 at both
        // radial bounds; evaluate the quadratures once and assemble every
        // table entry from them.
        let m0x1 = m0(x1)?;
        let m1x1 = m1(x1)?;
        let m0x2 = m0(x2)?;
        let m1x2 = m1(x2)?;
        let im0x1 = integral_of_m0(x1)?;
        let im0x2 = integral_of_m0(x2)?;

        let ip1 = scaled_t_i1(x1, m0x1, m1x1);
        let ip2 = scaled_t_i1(x2, m0x2, m1x2);
        let t1 = scaled_t_k1_tail(x1, m0x1, m1x1);
        let t2 = scaled_t_k1_tail(x2, m0x2, m1x2);

        let scaled_c = t1 - exp(x1 - x2) * t2;
        let scaled_int_i1 = exp(x2 - x1) * ip2 - ip1;
        let scaled_d = core_ratio(xc) * scaled_c;
        let scaled_f = exp(2.0 * (xc - x1)) * scaled_d - ip1;
        let scaled_e = t2;

        // int(t*L1) - int(t*I1) over the bounds; every term here is bounded
        let l1_less_i1 = (x1 * m0x1 + x1 * x1 / PI - im0x1) - (x2 * m0x2 + x2 * x2 / PI - im0x2);

        // E*int(t*I1) + F*int(t*K1) - pi/2*int(t*L1) with the exponential
        // factors of every product cancelled before any exp() call:
        // the E term's pi/2 plateau merges with the t*L1 contribution
        let partial_self = scaled_f * scaled_c - exp(x1 - x2) * t2 * scaled_int_i1
            - PI / 2.0 * l1_less_i1;

        Ok(Self {
            scaled_c,
            scaled_d,
            scaled_e,
            scaled_f,
            partial_self,
            scaled_int_i1,
        })
    }
}

impl RadialConstants {
    /// Build the table for `section`'s coil geometry, evaluating all
    /// harmonics in parallel.
    pub fn new(
        section: &DiskSection,
        harmonics: usize,
        wind_ht_factor: f64,
    ) -> Result<Self, RabinsError> {
        let (r1, r2) = (section.inner_radius(), section.outer_radius());
        let (rc, wh) = (section.core_radius(), section.window_height());

        let rows: Vec<Row> = (1..=harmonics)
            .into_par_iter()
            .map(|n| Row::build(n, r1, r2, rc, wh, wind_ht_factor))
            .collect::<Result<_, _>>()?;

        let mut table = Self {
            inner_radius: r1,
            outer_radius: r2,
            core_radius: rc,
            window_height: wh,
            scaled_c: Vec::with_capacity(harmonics),
            scaled_d: Vec::with_capacity(harmonics),
            scaled_e: Vec::with_capacity(harmonics),
            scaled_f: Vec::with_capacity(harmonics),
            partial_self: Vec::with_capacity(harmonics),
            scaled_int_i1: Vec::with_capacity(harmonics),
        };
        for row in rows {
            table.scaled_c.push(row.scaled_c);
            table.scaled_d.push(row.scaled_d);
            table.scaled_e.push(row.scaled_e);
            table.scaled_f.push(row.scaled_f);
            table.partial_self.push(row.partial_self);
            table.scaled_int_i1.push(row.scaled_int_i1);
        }
        Ok(table)
    }

    /// Number of harmonics in the table.
    pub fn harmonics(&self) -> usize {
        self.partial_self.len()
    }

    /// Whether a section's radial geometry matches the geometry this table
    /// was built from. Sections of one coil are built from the same numbers,
    /// so the comparison is exact.
    pub fn matches(&self, section: &DiskSection) -> bool {
        self.inner_radius == section.inner_radius()
            && self.outer_radius == section.outer_radius()
            && self.core_radius == section.core_radius()
            && self.window_height == section.window_height()
    }
}
