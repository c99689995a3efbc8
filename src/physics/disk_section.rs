//! Disk-section geometry and current data for winding inductance
//! calculations.

use core::f64::consts::PI;

use libm::sin;

use crate::error::RabinsError;

/// An annular, axially-bounded region of winding carrying uniform current
/// density: the basic unit of a disk-winding model.
///
/// The four geometric fields define a rectangle in the (radius,
/// axial-position) plane. All sections sharing a `coil` identifier must have
/// identical radial geometry; the engine rejects sections that disagree with
/// their coil group's cached geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct DiskSection {
    coil: usize,
    inner_radius: f64,
    radial_width: f64,
    axial_position: f64,
    axial_height: f64,
    turns: f64,
    current_density: f64,
    window_height: f64,
    core_radius: f64,
}

impl DiskSection {
    /// Build a validated disk section.
    ///
    /// # Arguments
    ///
    /// * `coil`:            identifier of the physical winding this section belongs to
    /// * `inner_radius`:    (m) inner radius of the section
    /// * `radial_width`:    (m) radial build; outer radius is `inner_radius + radial_width`
    /// * `axial_position`:  (m) bottom of the section, measured from the window bottom
    /// * `axial_height`:    (m) axial height of the section
    /// * `turns`:           number of turns; fractional when a physical disk is split
    /// * `current_density`: (A/m^2) uniform current density; sign encodes direction
    /// * `window_height`:   (m) axial height of the core window holding the section
    /// * `core_radius`:     (m) core radius
    ///
    /// # Errors
    ///
    /// [`RabinsError::InvalidGeometry`] on non-positive width, height, window
    /// height or turns, a negative inner or core radius, or a zero or
    /// non-finite current density.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        coil: usize,
        inner_radius: f64,
        radial_width: f64,
        axial_position: f64,
        axial_height: f64,
        turns: f64,
        current_density: f64,
        window_height: f64,
        core_radius: f64,
    ) -> Result<Self, RabinsError> {
        let reject = |message: &str| Err(RabinsError::InvalidGeometry(message.to_string()));
        if !(radial_width > 0.0) {
            return reject("radial width must be positive");
        }
        if !(axial_height > 0.0) {
            return reject("axial height must be positive");
        }
        if !(window_height > 0.0) {
            return reject("window height must be positive");
        }
        if !(turns > 0.0) {
            return reject("turns must be positive");
        }
        if !(inner_radius >= 0.0) {
            return reject("inner radius must be non-negative");
        }
        if !(core_radius >= 0.0) {
            return reject("core radius must be non-negative");
        }
        if !current_density.is_finite() || current_density == 0.0 {
            return reject("current density must be finite and non-zero");
        }
        Ok(Self {
            coil,
            inner_radius,
            radial_width,
            axial_position,
            axial_height,
            turns,
            current_density,
            window_height,
            core_radius,
        })
    }

    pub fn coil(&self) -> usize {
        self.coil
    }

    /// (m) inner radius
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// (m) outer radius
    pub fn outer_radius(&self) -> f64 {
        self.inner_radius + self.radial_width
    }

    /// (m) radial build
    pub fn radial_width(&self) -> f64 {
        self.radial_width
    }

    /// (m) bottom of the section, from the window bottom
    pub fn axial_position(&self) -> f64 {
        self.axial_position
    }

    /// (m) axial height
    pub fn axial_height(&self) -> f64 {
        self.axial_height
    }

    pub fn turns(&self) -> f64 {
        self.turns
    }

    /// (A/m^2) signed uniform current density
    pub fn current_density(&self) -> f64 {
        self.current_density
    }

    /// (m) core window height
    pub fn window_height(&self) -> f64 {
        self.window_height
    }

    /// (m) core radius
    pub fn core_radius(&self) -> f64 {
        self.core_radius
    }

    /// (m^2) cross-section area in the (r, z) plane
    pub fn area(&self) -> f64 {
        self.radial_width * self.axial_height
    }

    /// (A) physical current through one turn, back-derived from the current
    /// density and turn count. Signed.
    pub fn current(&self) -> f64 {
        self.current_density * self.area() / self.turns
    }

    /// Mean (zeroth) coefficient of the axial current-density expansion over
    /// the extended window of height `wind_ht_factor * window_height`.
    pub fn mean_current_density(&self, wind_ht_factor: f64) -> f64 {
        self.current_density * self.axial_height / (wind_ht_factor * self.window_height)
    }

    /// Fourier sine-series coefficient `J(n)` of the section's axial current
    /// density, expanded over the extended window of height
    /// `wind_ht_factor * window_height`. The section's own axial origin is
    /// used directly, without re-centring in the extended window.
    pub fn harmonic_current_density(&self, n: usize, wind_ht_factor: f64) -> f64 {
        let extended = wind_ht_factor * self.window_height;
        let npi = n as f64 * PI;
        let z0 = self.axial_position;
        let z1 = self.axial_position + self.axial_height;
        (2.0 * self.current_density / npi) * (sin(npi * z1 / extended) - sin(npi * z0 / extended))
    }

    /// Whether two sections sit at the same radial position, within the
    /// given tolerance on their inner radii.
    pub fn same_radial_position(&self, other: &DiskSection, tolerance: f64) -> bool {
        (self.inner_radius - other.inner_radius).abs() <= tolerance
    }
}

/// A section of the winding model: either a real disk of conductor or the
/// grounded core/tank, which carries no winding and contributes no
/// inductance.
#[derive(Clone, Debug, PartialEq)]
pub enum Section {
    /// The grounded core/tank terminal of the ladder network.
    Ground,
    /// A physical disk section.
    Disk(DiskSection),
}

impl Section {
    pub fn disk(&self) -> Option<&DiskSection> {
        match self {
            Section::Ground => None,
            Section::Disk(d) => Some(d),
        }
    }

    pub fn is_ground(&self) -> bool {
        matches!(self, Section::Ground)
    }
}
