//! Error type shared by the physics and marching modules.
//!
//! Shock formation and parallel characteristics are outcomes, not errors;
//! they never appear here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MocError {
    #[error("invalid Mach number: {0:.6e}")]
    InvalidMach(f64),

    #[error("ratio of specific heats must exceed 1, got {0}")]
    InvalidGamma(f64),

    #[error("Prandtl-Meyer angle {angle:.6e} outside [0, {max:.6e})")]
    AngleOutOfRange { angle: f64, max: f64 },

    #[error("Mach inversion failed to converge for nu = {angle:.6e} after {iterations} iterations")]
    NoConvergence { angle: f64, iterations: usize },

    #[error("unknown characteristic family tag {0}")]
    InvalidFamily(i8),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MocError>;
