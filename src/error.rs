//! Error types for geometry validation and numerical evaluation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RabinsError {
    /// A section was constructed with a non-positive dimension, or a section's
    /// radial geometry disagrees with the cached geometry of its coil group.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Adaptive quadrature ran out of interval budget, or produced a
    /// non-finite estimate, before reaching its tolerance targets.
    #[error("quadrature failed to converge after {intervals} subdivisions (error estimate {abs_err:.3e})")]
    NumericalFailure { intervals: usize, abs_err: f64 },

    /// An unscaled integral function was invoked with an argument large enough
    /// that its exponential factor overflows 64-bit floats. The scaled
    /// variants remain finite for all arguments and should be used instead.
    #[error("argument {argument:.3e} overflows the unscaled evaluation (limit {limit:.1})")]
    UnsafeArgument { argument: f64, limit: f64 },
}

pub type RabinsResult<T> = Result<T, RabinsError>;
