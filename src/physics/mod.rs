//! Electromagnetics calculations.
pub mod bessel_integrals;
pub mod disk_section;
pub mod harmonics;
pub mod rabins;

pub use disk_section::{DiskSection, Section};
pub use rabins::{coupling_coefficient, leakage_inductance, InductanceCalculator, RabinsConfig};
