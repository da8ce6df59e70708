//! Error types for strand construction and simulation.

use core::fmt;

/// Errors reported by the strand simulation.
///
/// Out-of-range particle indices are not represented here: strand lengths
/// are fixed at construction, so a bad index is a caller bug and panics.
#[derive(Debug, Clone, PartialEq)]
pub enum StrandError {
    /// A strand needs a root plus at least one free particle.
    InvalidParticleCount { count: usize },
    /// Rest length must be positive and finite.
    InvalidRestLength,
    /// Damping must be in (0, 1].
    InvalidDamping,
    /// At least one constraint iteration is required.
    InvalidIterations,
    /// Time step must be positive and finite.
    InvalidTimeStep,
    /// Layout cannot produce rest-length spacing (zero axis, helix too wide).
    InvalidLayout,
    /// Sphere radius must be non-negative and finite.
    InvalidCollider,
    /// A tick produced non-finite state and was rolled back.
    NonFinite { strand: usize },
}

impl fmt::Display for StrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrandError::InvalidParticleCount { count } => {
                write!(f, "strand needs at least 2 particles (got {})", count)
            }
            StrandError::InvalidRestLength => write!(f, "rest length must be positive and finite"),
            StrandError::InvalidDamping => write!(f, "damping must be in (0, 1]"),
            StrandError::InvalidIterations => write!(f, "constraint iterations must be at least 1"),
            StrandError::InvalidTimeStep => write!(f, "time step must be positive and finite"),
            StrandError::InvalidLayout => write!(f, "layout cannot place particles at the rest length"),
            StrandError::InvalidCollider => write!(f, "collider radius must be non-negative and finite"),
            StrandError::NonFinite { strand } => {
                write!(f, "strand {} produced non-finite state; tick rejected", strand)
            }
        }
    }
}

impl core::error::Error for StrandError {}
