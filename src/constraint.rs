//! Strand constraints: Follow-The-Leader distance and position pins.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec3;

/// Below this separation two particles are treated as coincident.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Keeps consecutive particles of a strand `rest_length` apart.
///
/// One [`sweep`](Self::sweep) walks the chain from the root outwards. Every
/// pair `(i - 1, i)` is corrected symmetrically: each particle moves by half of
/// the error. The displacement applied to particle `i` is recorded in its
/// predictor so the integrator can derive a damped reaction velocity from it.
///
/// Inverse mass is not consulted. Pinned particles move with the sweep and
/// are put back by [`PinConstraint`]s afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceConstraint<F: Float> {
    pub rest_length: F,
    /// Used as `normalize(leader - follower)` when the two coincide.
    pub fallback_direction: Vec3<F>,
}

impl<F: Float> DistanceConstraint<F> {
    pub fn new(rest_length: F, fallback_direction: Vec3<F>) -> Self {
        DistanceConstraint { rest_length, fallback_direction }
    }

    /// Corrects the pair `(index - 1, index)` once.
    pub fn solve_pair(&self, particles: &mut [Particle<F>], index: usize) {
        let leader = particles[index - 1].predictor.predicted;
        let follower = particles[index].predictor.predicted;

        let delta = leader - follower;
        let dist = delta.length();
        let direction = if dist.is_near_zero(F::from_f32(DEGENERATE_EPSILON)) {
            self.fallback_direction
        } else {
            delta.scale(F::one() / dist)
        };

        let correction = direction.scale((dist - self.rest_length) * F::half());
        particles[index].predictor.correction = correction;
        particles[index].predictor.predicted += correction;
        particles[index - 1].predictor.predicted -= correction;
    }

    /// One full pass over every adjacent pair, root outwards.
    pub fn sweep(&self, particles: &mut [Particle<F>]) {
        for i in 1..particles.len() {
            self.solve_pair(particles, i);
        }
    }
}

/// Why a particle is held in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinSource {
    Root,
    Grab,
    Anchor,
}

/// Forces one particle's predicted position to a target.
///
/// Pins run after every distance sweep, in order, so a later pin on the same
/// particle wins. The integrator assigns `velocity` to the pinned particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinConstraint<F: Float> {
    pub particle: usize,
    pub position: Vec3<F>,
    pub velocity: Vec3<F>,
    pub source: PinSource,
}

impl<F: Float> PinConstraint<F> {
    pub fn new(particle: usize, position: Vec3<F>, source: PinSource) -> Self {
        PinConstraint { particle, position, velocity: Vec3::zero(), source }
    }

    pub fn with_velocity(mut self, velocity: Vec3<F>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn solve(&self, particles: &mut [Particle<F>]) {
        particles[self.particle].predictor.predicted = self.position;
    }
}
