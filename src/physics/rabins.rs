//! Rabins'-method self- and mutual-inductance of disk winding sections.
//!
//! Each inductance is a closed-form leading term plus a correction summed
//! over a fixed number of spatial harmonics of the axial current
//! distribution. Harmonic terms are evaluated as a parallel map over the
//! harmonic index and reduced with a deterministic sequential sum, so
//! repeated evaluations are bit-identical.
//!
//! # References
//!
//!   \[1\] L. Rabins, "Transformer reactance calculations with digital computers,"
//!         Transactions of the AIEE, Part I, vol. 75, pp. 261-267, 1956,
//!         doi: [10.1109/TCE.1956.6372540](https://doi.org/10.1109/TCE.1956.6372540).
//!
//!   \[2\] R. M. Del Vecchio et al., *Transformer Design Principles*,
//!         2nd ed. CRC Press, 2010, ch. 9-10.

use core::f64::consts::PI;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use libm::exp;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RabinsError;
use crate::physics::disk_section::{DiskSection, Section};
use crate::physics::harmonics::{scale_factor, RadialConstants};
use crate::MU_0;

/// Tunable parameters of the harmonic expansion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RabinsConfig {
    /// Multiplier applied to the core window height to form the period of
    /// the axial harmonic expansion. Del Vecchio recommends 3.0; comparisons
    /// against Andersen's field solver reportedly favour values closer to
    /// 1.0 for some geometries. An empirical modelling constant, not a
    /// derived physical quantity.
    pub wind_ht_factor: f64,
    /// Number of terms in the harmonic series. The series is summed to this
    /// fixed length rather than to a convergence criterion.
    pub harmonics: usize,
    /// (m) two sections whose inner radii differ by no more than this are
    /// treated as occupying the same radial position.
    pub radial_tolerance: f64,
}

impl Default for RabinsConfig {
    fn default() -> Self {
        Self {
            wind_ht_factor: 3.0,
            harmonics: 300,
            radial_tolerance: 1e-3,
        }
    }
}

/// Inductance engine: owns the expansion parameters and a per-coil cache of
/// the radial constant tables.
///
/// The cache is populated lazily, compute-if-absent under a lock, on the
/// first query touching each coil; all later sections of that coil reuse the
/// table. A section whose radial geometry disagrees with its coil's cached
/// geometry is rejected rather than silently mixed in.
pub struct InductanceCalculator {
    config: RabinsConfig,
    cache: Mutex<HashMap<usize, Arc<RadialConstants>>>,
}

impl Default for InductanceCalculator {
    fn default() -> Self {
        Self::new(RabinsConfig::default())
    }
}

impl InductanceCalculator {
    pub fn new(config: RabinsConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RabinsConfig {
        &self.config
    }

    /// Drop all cached radial constant tables. Subsequent queries rebuild
    /// them from the sections they see.
    pub fn reset_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Fetch or build the radial constants for a section's coil.
    fn radial_constants(&self, section: &DiskSection) -> Result<Arc<RadialConstants>, RabinsError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = cache.get(&section.coil()) {
            if !table.matches(section) {
                return Err(RabinsError::InvalidGeometry(format!(
                    "section radial geometry disagrees with the cached geometry of coil {}",
                    section.coil()
                )));
            }
            return Ok(Arc::clone(table));
        }
        // Built while holding the lock: one writer per coil, no duplicate
        // construction when sections of a new coil arrive concurrently
        let table = Arc::new(RadialConstants::new(
            section,
            self.config.harmonics,
            self.config.wind_ht_factor,
        )?);
        cache.insert(section.coil(), Arc::clone(&table));
        Ok(table)
    }

    /// (H) self-inductance of one disk section.
    ///
    /// Closed-form leading term plus the harmonic correction; always
    /// strictly positive and independent of the sign of the current density.
    pub fn self_inductance(&self, section: &DiskSection) -> Result<f64, RabinsError> {
        let table = self.radial_constants(section)?;
        let extended = self.config.wind_ht_factor * section.window_height();
        let (r1, r2) = (section.inner_radius(), section.outer_radius());
        let turns = section.turns();
        let current = section.current();

        let leading = PI * MU_0 * turns * turns / (6.0 * extended)
            * ((r2 + r1) * (r2 + r1) + 2.0 * r1 * r1);
        let multiplier = PI * MU_0 * extended / (current * current);

        let terms = self.aligned_harmonic_terms(section, section, &table);
        Ok(leading + multiplier * terms.iter().sum::<f64>())
    }

    /// (H) magnitude of the mutual inductance between two disk sections.
    ///
    /// The sections are ordered inner-first by geometry, which makes the
    /// operation symmetric under argument swap. Within the radial tolerance
    /// the two sections share the self-inductance formula's bracket; beyond
    /// it the outer section's scaled C/D coefficients combine with the inner
    /// section's scaled `t*I1` integral, with the radial exponents of the
    /// two sections subtracted before any exponential is evaluated.
    pub fn mutual_inductance(
        &self,
        a: &DiskSection,
        b: &DiskSection,
    ) -> Result<f64, RabinsError> {
        if a.window_height() != b.window_height() || a.core_radius() != b.core_radius() {
            return Err(RabinsError::InvalidGeometry(
                "sections must share a core window and core radius".to_string(),
            ));
        }

        let (inner, outer) = if a.inner_radius() <= b.inner_radius() {
            (a, b)
        } else {
            (b, a)
        };
        let same_radial = inner.same_radial_position(outer, self.config.radial_tolerance);

        let extended = self.config.wind_ht_factor * inner.window_height();
        let (r1, r2) = (inner.inner_radius(), inner.outer_radius());
        let turns_product = inner.turns() * outer.turns();

        let leading = if same_radial {
            PI * MU_0 * turns_product / (6.0 * extended)
                * ((r2 + r1) * (r2 + r1) + 2.0 * r1 * r1)
        } else {
            PI * MU_0 * turns_product / (3.0 * extended) * (r1 * r1 + r1 * r2 + r2 * r2)
        };
        let multiplier = PI * MU_0 * extended / (inner.current() * outer.current());

        let correction: f64 = if same_radial {
            let table = self.radial_constants(inner)?;
            self.aligned_harmonic_terms(inner, outer, &table).iter().sum()
        } else {
            let inner_table = self.radial_constants(inner)?;
            let outer_table = self.radial_constants(outer)?;
            self.crossed_harmonic_terms(inner, outer, &inner_table, &outer_table)
                .iter()
                .sum()
        };

        Ok((leading + multiplier * correction).abs())
    }

    /// Section-level self-inductance; the grounded core/tank carries no
    /// winding and contributes zero.
    pub fn section_self_inductance(&self, section: &Section) -> Result<f64, RabinsError> {
        match section {
            Section::Ground => Ok(0.0),
            Section::Disk(d) => self.self_inductance(d),
        }
    }

    /// Section-level mutual inductance; any pairing with the grounded
    /// core/tank contributes zero.
    pub fn section_mutual_inductance(
        &self,
        a: &Section,
        b: &Section,
    ) -> Result<f64, RabinsError> {
        match (a.disk(), b.disk()) {
            (Some(da), Some(db)) => self.mutual_inductance(da, db),
            _ => Ok(0.0),
        }
    }

    /// Harmonic terms for two sections sharing one radial geometry (the
    /// self-inductance case, and the same-radial-position mutual branch).
    /// Terms are independent; they are mapped in parallel and returned in
    /// index order for a deterministic reduction.
    pub(crate) fn aligned_harmonic_terms(
        &self,
        a: &DiskSection,
        b: &DiskSection,
        table: &RadialConstants,
    ) -> Vec<f64> {
        let factor = self.config.wind_ht_factor;
        (1..=self.config.harmonics)
            .into_par_iter()
            .map(|n| {
                let m = scale_factor(n, factor, a.window_height());
                let jj = a.harmonic_current_density(n, factor)
                    * b.harmonic_current_density(n, factor);
                jj / m.powi(4) * table.partial_self[n - 1]
            })
            .collect()
    }

    /// Harmonic terms for two sections at different radial positions. The
    /// outer section contributes its scaled C/D coefficients, the inner its
    /// scaled `t*I1` and `t*K1` integrals; the exponents `x1 - x3` and
    /// `2 xc - x1 - x3` are both non-positive, so each term is evaluated
    /// through decaying exponentials only.
    pub(crate) fn crossed_harmonic_terms(
        &self,
        inner: &DiskSection,
        outer: &DiskSection,
        inner_table: &RadialConstants,
        outer_table: &RadialConstants,
    ) -> Vec<f64> {
        let factor = self.config.wind_ht_factor;
        (1..=self.config.harmonics)
            .into_par_iter()
            .map(|n| {
                let m = scale_factor(n, factor, inner.window_height());
                let x1 = m * inner.inner_radius();
                let x3 = m * outer.inner_radius();
                let xc = m * inner.core_radius();
                let jj = inner.harmonic_current_density(n, factor)
                    * outer.harmonic_current_density(n, factor);

                let i = n - 1;
                let bracket = exp(x1 - x3) * outer_table.scaled_c[i] * inner_table.scaled_int_i1[i]
                    + exp(2.0 * xc - x1 - x3) * outer_table.scaled_d[i] * inner_table.scaled_c[i];
                jj / m.powi(4) * bracket
            })
            .collect()
    }
}

/// (H) leakage inductance of a two-winding pair referred to winding 1:
/// `L1 + (N1/N2)^2 L2 - 2 (N1/N2) M`.
pub fn leakage_inductance(l1: f64, l2: f64, m: f64, n1: f64, n2: f64) -> f64 {
    let ratio = n1 / n2;
    ratio.mul_add(ratio * l2, l1) - 2.0 * ratio * m
}

/// Coupling coefficient `k = M / sqrt(L1 L2)`; in `[0, 1]` for physically
/// valid inductances. Callers are expected to check this as a post-condition
/// on computed mutual inductances.
pub fn coupling_coefficient(l1: f64, l2: f64, m: f64) -> f64 {
    m / (l1 * l2).sqrt()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::physics::bessel_integrals::{integral_of_t_i1_between, integral_of_t_k1_between};
    use crate::physics::harmonics::{c_n, d_n};
    use crate::testing::{approx, example_hv_section, example_lv_section};

    /// Self-inductance is strictly positive and invariant to the sign of the
    /// current density: it depends on J^2 and N, not on current direction.
    #[test]
    fn test_self_inductance_positive_and_sign_invariant() {
        let calc = InductanceCalculator::default();
        let lv = example_lv_section();
        let l = calc.self_inductance(&lv).unwrap();
        assert!(l > 0.0);

        let reversed = DiskSection::new(
            2,
            lv.inner_radius(),
            lv.radial_width(),
            lv.axial_position(),
            lv.axial_height(),
            lv.turns(),
            -lv.current_density(),
            lv.window_height(),
            lv.core_radius(),
        )
        .unwrap();
        let l_reversed = calc.self_inductance(&reversed).unwrap();
        assert!(approx(l, l_reversed, 1e-12, 0.0));
    }

    /// Mutual inductance is symmetric under argument swap, in both the
    /// same-radial and different-radial branches.
    #[test]
    fn test_mutual_symmetry() {
        let calc = InductanceCalculator::default();
        let lv = example_lv_section();
        let hv = example_hv_section();
        assert_eq!(
            calc.mutual_inductance(&lv, &hv).unwrap(),
            calc.mutual_inductance(&hv, &lv).unwrap()
        );

        // Same-radial branch: two axially-stacked sections of one coil
        let low = DiskSection::new(
            3, 0.2, 0.02, 0.1, 0.3, 40.0, 2e6, 1.1, 0.141,
        )
        .unwrap();
        let high = DiskSection::new(
            3, 0.2, 0.02, 0.5, 0.3, 40.0, 2e6, 1.1, 0.141,
        )
        .unwrap();
        assert_eq!(
            calc.mutual_inductance(&low, &high).unwrap(),
            calc.mutual_inductance(&high, &low).unwrap()
        );
    }

    /// Two-winding scenario: LV 16 turns, HV 3200 turns, shared window and
    /// core. The coupling coefficient lies inside the physical [0, 1] bound,
    /// the LV-referred leakage inductance is positive, and the HV-referred
    /// value is the turns-ratio-squared multiple of the LV-referred one.
    #[test]
    fn test_two_winding_leakage_scenario() {
        let calc = InductanceCalculator::default();
        let lv = example_lv_section();
        let hv = example_hv_section();

        let l1 = calc.self_inductance(&lv).unwrap();
        let l2 = calc.self_inductance(&hv).unwrap();
        let m = calc.mutual_inductance(&lv, &hv).unwrap();
        assert!(l1 > 0.0 && l2 > 0.0 && m > 0.0);

        let k = coupling_coefficient(l1, l2, m);
        assert!(k > 0.0 && k < 1.0, "coupling coefficient {k} out of [0, 1]");

        let (n1, n2) = (lv.turns(), hv.turns());
        let lk_lv = leakage_inductance(l1, l2, m, n1, n2);
        assert!(lk_lv > 0.0);

        let lk_hv = leakage_inductance(l2, l1, m, n2, n1);
        let ratio = n2 / n1;
        assert!(approx(ratio * ratio * lk_lv, lk_hv, 1e-9, 0.0));
    }

    /// Same-radial and different-radial branches agree where they meet:
    /// nudging a thin section across the 1 mm tolerance boundary changes the
    /// mutual inductance only slightly. Thin sections keep both sides of the
    /// boundary inside each branch's validity domain (no radial overlap).
    #[test]
    fn test_branch_continuity_across_tolerance() {
        let calc = InductanceCalculator::default();
        let width = 0.5e-3;
        let base = DiskSection::new(
            0, 0.25, width, 0.2, 0.25, 60.0, 1.5e6, 1.1, 0.141,
        )
        .unwrap();
        let just_inside = DiskSection::new(
            1, 0.25 + 0.9e-3, width, 0.6, 0.25, 60.0, 1.5e6, 1.1, 0.141,
        )
        .unwrap();
        let just_outside = DiskSection::new(
            2, 0.25 + 1.1e-3, width, 0.6, 0.25, 60.0, 1.5e6, 1.1, 0.141,
        )
        .unwrap();

        let m_same = calc.mutual_inductance(&base, &just_inside).unwrap();
        let m_crossed = calc.mutual_inductance(&base, &just_outside).unwrap();
        assert!(m_same > 0.0 && m_crossed > 0.0);
        assert!(approx(m_same, m_crossed, 2e-2, 0.0));
    }

    /// The exponent-subtracted different-radial harmonic terms match the raw
    /// C/D assembly at harmonics where the raw coefficients are
    /// representable.
    #[test]
    fn test_crossed_terms_match_raw_assembly() {
        let calc = InductanceCalculator::new(RabinsConfig {
            harmonics: 10,
            ..RabinsConfig::default()
        });
        let lv = example_lv_section();
        let hv = example_hv_section();
        let inner_table = calc.radial_constants(&lv).unwrap();
        let outer_table = calc.radial_constants(&hv).unwrap();
        let terms = calc.crossed_harmonic_terms(&lv, &hv, &inner_table, &outer_table);

        let factor = calc.config().wind_ht_factor;
        for n in [1usize, 5, 10] {
            let m = scale_factor(n, factor, lv.window_height());
            let x1 = m * lv.inner_radius();
            let x2 = m * lv.outer_radius();
            let jj = lv.harmonic_current_density(n, factor)
                * hv.harmonic_current_density(n, factor);
            let raw = jj / m.powi(4)
                * (c_n(&hv, n, factor).unwrap()
                    * integral_of_t_i1_between(x1, x2).unwrap()
                    + d_n(&hv, n, factor).unwrap()
                        * integral_of_t_k1_between(x1, x2).unwrap());
            assert!(approx(raw, terms[n - 1], 1e-8, 1e-300));
        }
    }

    /// Discretization consistency: splitting one disk into k equal axial
    /// sub-sections (turns/k each, same current density) and summing all
    /// pairwise self and mutual contributions reproduces the whole disk's
    /// self-inductance.
    #[test]
    fn test_split_disk_reassembles() {
        let calc = InductanceCalculator::default();
        let whole = example_lv_section();
        let l_whole = calc.self_inductance(&whole).unwrap();

        let k = 4;
        let sub_height = whole.axial_height() / k as f64;
        let parts: Vec<DiskSection> = (0..k)
            .map(|i| {
                DiskSection::new(
                    whole.coil(),
                    whole.inner_radius(),
                    whole.radial_width(),
                    whole.axial_position() + i as f64 * sub_height,
                    sub_height,
                    whole.turns() / k as f64,
                    whole.current_density(),
                    whole.window_height(),
                    whole.core_radius(),
                )
                .unwrap()
            })
            .collect();

        let mut total = 0.0;
        for i in 0..k {
            total += calc.self_inductance(&parts[i]).unwrap();
            for j in (i + 1)..k {
                total += 2.0 * calc.mutual_inductance(&parts[i], &parts[j]).unwrap();
            }
        }
        assert!(approx(l_whole, total, 1e-8, 0.0));
    }

    /// The harmonic sum is reduced in index order: summing the same terms in
    /// reverse changes the result only at roundoff level, and repeated
    /// evaluation is bit-identical.
    #[test]
    fn test_summation_order_stability() {
        let calc = InductanceCalculator::default();
        let lv = example_lv_section();

        let table = calc.radial_constants(&lv).unwrap();
        let terms = calc.aligned_harmonic_terms(&lv, &lv, &table);
        assert_eq!(calc.config().harmonics, terms.len());

        let forward: f64 = terms.iter().sum();
        let reversed: f64 = terms.iter().rev().sum();
        let roundoff = f64::EPSILON * terms.len() as f64 * terms.iter().map(|t| t.abs()).sum::<f64>();
        assert!(approx(forward, reversed, 1e-10, roundoff));

        assert_eq!(
            calc.self_inductance(&lv).unwrap(),
            calc.self_inductance(&lv).unwrap()
        );
    }

    /// A section whose radial geometry disagrees with its coil's cached
    /// geometry is rejected instead of silently reusing the wrong table.
    #[test]
    fn test_coil_geometry_mismatch_rejected() {
        let calc = InductanceCalculator::default();
        let lv = example_lv_section();
        calc.self_inductance(&lv).unwrap();

        let mismatched = DiskSection::new(
            lv.coil(),
            lv.inner_radius() + 0.05,
            lv.radial_width(),
            lv.axial_position(),
            lv.axial_height(),
            lv.turns(),
            lv.current_density(),
            lv.window_height(),
            lv.core_radius(),
        )
        .unwrap();
        assert!(matches!(
            calc.self_inductance(&mismatched),
            Err(RabinsError::InvalidGeometry(_))
        ));

        // After a cache reset the mismatched section becomes the coil's
        // reference geometry and evaluates cleanly
        calc.reset_cache();
        assert!(calc.self_inductance(&mismatched).is_ok());
    }

    /// Sections in different core windows cannot be paired.
    #[test]
    fn test_mismatched_windows_rejected() {
        let calc = InductanceCalculator::default();
        let lv = example_lv_section();
        let other_window = DiskSection::new(
            7, 0.4, 0.02, 0.1, 0.5, 100.0, 1e6, 1.3, 0.141,
        )
        .unwrap();
        assert!(matches!(
            calc.mutual_inductance(&lv, &other_window),
            Err(RabinsError::InvalidGeometry(_))
        ));
    }

    /// The grounded core/tank contributes no inductance.
    #[test]
    fn test_ground_section_contributes_nothing() {
        let calc = InductanceCalculator::default();
        let ground = Section::Ground;
        let disk = Section::Disk(example_lv_section());

        assert_eq!(0.0, calc.section_self_inductance(&ground).unwrap());
        assert_eq!(0.0, calc.section_mutual_inductance(&ground, &disk).unwrap());
        assert_eq!(0.0, calc.section_mutual_inductance(&disk, &ground).unwrap());
        assert!(calc.section_self_inductance(&disk).unwrap() > 0.0);
    }

    /// Fewer harmonics changes the correction, not the leading term; the
    /// configurable series length converges toward the 300-term default.
    #[test]
    fn test_harmonic_count_convergence() {
        let lv = example_lv_section();

        let coarse = InductanceCalculator::new(RabinsConfig {
            harmonics: 100,
            ..RabinsConfig::default()
        });
        let fine = InductanceCalculator::default();

        let l_coarse = coarse.self_inductance(&lv).unwrap();
        let l_fine = fine.self_inductance(&lv).unwrap();
        assert!(approx(l_fine, l_coarse, 1e-3, 0.0));
    }
}
