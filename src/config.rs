//! Configuration for strands and for pointer grabbing.

use crate::error::StrandError;
use crate::float::Float;
use crate::vec::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical parameters shared by every strand in a pool.
///
/// # Builder Pattern
/// ```
/// use strands::config::StrandConfig;
/// use strands::vec::Vec3;
///
/// let config: StrandConfig<f32> = StrandConfig::new()
///     .with_particle_count(5)
///     .with_rest_length(2.0)
///     .with_gravity(Vec3::new(0.0, -9.8, 0.0))
///     .with_damping(0.99)
///     .with_iterations(10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrandConfig<F: Float> {
    /// Particles per strand, root included. Default: 16.
    pub particle_count: usize,
    /// Target distance between consecutive particles. Default: 3.
    pub rest_length: F,
    /// Gravity acceleration. Default: (0, -9.8, 0).
    pub gravity: Vec3<F>,
    /// Velocity damping in (0, 1]. 1.0 = no damping. Default: 0.99.
    pub damping: F,
    /// Constraint sweeps per tick. Default: 15.
    pub iterations: usize,
}

impl<F: Float> StrandConfig<F> {
    pub fn new() -> Self {
        StrandConfig {
            particle_count: 16,
            rest_length: F::from_f32(3.0),
            gravity: Vec3::new(F::zero(), F::from_f32(-9.8), F::zero()),
            damping: F::from_f32(0.99),
            iterations: 15,
        }
    }

    pub fn with_particle_count(mut self, particle_count: usize) -> Self {
        self.particle_count = particle_count;
        self
    }

    pub fn with_rest_length(mut self, rest_length: F) -> Self {
        self.rest_length = rest_length;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<(), StrandError> {
        if self.particle_count < 2 {
            return Err(StrandError::InvalidParticleCount { count: self.particle_count });
        }
        if !self.rest_length.is_finite() || self.rest_length <= F::zero() {
            return Err(StrandError::InvalidRestLength);
        }
        if !self.damping.is_finite() || self.damping <= F::zero() || self.damping > F::one() {
            return Err(StrandError::InvalidDamping);
        }
        if self.iterations == 0 {
            return Err(StrandError::InvalidIterations);
        }
        Ok(())
    }
}

impl<F: Float> Default for StrandConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tuning for pointer-driven grabbing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrabConfig<F: Float> {
    /// Non-root particles this close to the pick point are grabbed along with
    /// the closest one. Default: 0.5.
    pub nearby_radius: F,
    /// A pick farther than this from every particle grabs nothing. Default: 2.
    pub pick_tolerance: F,
}

impl<F: Float> GrabConfig<F> {
    pub fn new() -> Self {
        GrabConfig {
            nearby_radius: F::half(),
            pick_tolerance: F::from_f32(2.0),
        }
    }

    pub fn with_nearby_radius(mut self, nearby_radius: F) -> Self {
        self.nearby_radius = nearby_radius.max(F::zero());
        self
    }

    pub fn with_pick_tolerance(mut self, pick_tolerance: F) -> Self {
        self.pick_tolerance = pick_tolerance.max(F::zero());
        self
    }
}

impl<F: Float> Default for GrabConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(StrandConfig::<f32>::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_single_particle() {
        let c = StrandConfig::<f32>::new().with_particle_count(1);
        assert_eq!(c.validate(), Err(StrandError::InvalidParticleCount { count: 1 }));
    }

    #[test]
    fn rejects_bad_damping_and_rest_length() {
        assert_eq!(StrandConfig::<f64>::new().with_damping(0.0).validate(), Err(StrandError::InvalidDamping));
        assert_eq!(StrandConfig::<f64>::new().with_damping(1.5).validate(), Err(StrandError::InvalidDamping));
        assert_eq!(StrandConfig::<f64>::new().with_rest_length(f64::NAN).validate(), Err(StrandError::InvalidRestLength));
        assert_eq!(StrandConfig::<f64>::new().with_iterations(0).validate(), Err(StrandError::InvalidIterations));
    }

    #[test]
    fn grab_radius_is_never_negative() {
        let g = GrabConfig::<f32>::new().with_nearby_radius(-1.0);
        assert_eq!(g.nearby_radius, 0.0);
    }
}
