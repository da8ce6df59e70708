//! Strand particles, split into committed and predicted state.

use crate::float::Float;
use crate::vec::Vec3;

/// State that is authoritative at tick boundaries and read by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Committed<F: Float> {
    pub position: Vec3<F>,
    pub velocity: Vec3<F>,
}

/// Working state of a particle while constraints are being solved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Predictor<F: Float> {
    pub predicted: Vec3<F>,
    /// Last displacement the distance constraint applied to this particle.
    pub correction: Vec3<F>,
}

/// A strand particle. Owned by exactly one [`Strand`](crate::Strand) and
/// addressed by index.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle<F: Float> {
    pub committed: Committed<F>,
    pub predictor: Predictor<F>,
    /// 0 for pinned particles (root, grabbed, anchored), 1 for free ones.
    pub inv_mass: F,
}

impl<F: Float> Particle<F> {
    pub fn new(position: Vec3<F>) -> Self {
        Particle {
            committed: Committed { position, velocity: Vec3::zero() },
            predictor: Predictor { predicted: position, correction: Vec3::zero() },
            inv_mass: F::one(),
        }
    }

    pub fn pinned(position: Vec3<F>) -> Self {
        let mut p = Self::new(position);
        p.inv_mass = F::zero();
        p
    }

    pub fn is_pinned(&self) -> bool {
        self.inv_mass == F::zero()
    }

    pub fn pin(&mut self) {
        self.inv_mass = F::zero();
    }

    pub fn unpin(&mut self) {
        self.inv_mass = F::one();
    }

    pub fn position(&self) -> Vec3<F> {
        self.committed.position
    }

    pub fn velocity(&self) -> Vec3<F> {
        self.committed.velocity
    }

    pub fn predicted(&self) -> Vec3<F> {
        self.predictor.predicted
    }

    /// Teleport both phases to `pos`, leaving velocity untouched.
    pub fn reset_to(&mut self, pos: Vec3<F>) {
        self.committed.position = pos;
        self.predictor.predicted = pos;
    }

    /// Ends a tick: the predicted position becomes authoritative.
    pub fn commit(&mut self, velocity: Vec3<F>) {
        self.committed.position = self.predictor.predicted;
        self.committed.velocity = velocity;
    }

    /// Throws away the working state of a rejected tick.
    pub fn rollback(&mut self) {
        self.predictor.predicted = self.committed.position;
        self.predictor.correction = Vec3::zero();
        self.committed.velocity = Vec3::zero();
    }
}

/// Cross-strand address of a particle: which strand, which index inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleRef {
    pub strand: usize,
    pub particle: usize,
}

impl ParticleRef {
    pub fn new(strand: usize, particle: usize) -> Self {
        ParticleRef { strand, particle }
    }

    pub fn is_root(&self) -> bool {
        self.particle == 0
    }
}
