//! Test utilities

use crate::physics::disk_section::DiskSection;

/// Divide-by-zero-resistant approximate comparison
pub(crate) fn approx(truth: f64, val: f64, rtol: f64, atol: f64) -> bool {
    let abs_err = (val - truth).abs();
    let lim = rtol * truth.abs() + atol;
    abs_err < lim
}

/// LV winding of a two-winding distribution transformer: a single full-height
/// disk section closest to the core. Dimensions in inches converted to
/// metres.
pub(crate) fn example_lv_section() -> DiskSection {
    let inner_radius = 14.1 / 2.0 * 25.4 / 1000.0; // [m]
    let radial_width = 0.296 * 25.4 / 1000.0; // [m]
    let axial_position = 2.965 * 25.4 / 1000.0; // [m]
    let axial_height = 32.065 * 25.4 / 1000.0; // [m]
    let turns = 16.0;
    // 481.13 A rms winding current, opposite direction to the HV winding
    let current_density = -turns * 481.13 / (radial_width * axial_height); // [A/m^2]

    DiskSection::new(
        0,
        inner_radius,
        radial_width,
        axial_position,
        axial_height,
        turns,
        current_density,
        1.1,
        0.141,
    )
    .unwrap()
}

/// HV winding of the same transformer, radially outside the LV winding.
pub(crate) fn example_hv_section() -> DiskSection {
    let inner_radius = 25.411 / 2.0 * 25.4 / 1000.0; // [m]
    let radial_width = 5.148 * 25.4 / 1000.0; // [m]
    let axial_position = 2.75 * 25.4 / 1000.0; // [m]
    let axial_height = 32.495 * 25.4 / 1000.0; // [m]
    let turns = 3200.0;
    let current_density = turns * 2.4056 / (radial_width * axial_height); // [A/m^2]

    DiskSection::new(
        1,
        inner_radius,
        radial_width,
        axial_position,
        axial_height,
        turns,
        current_density,
        1.1,
        0.141,
    )
    .unwrap()
}
