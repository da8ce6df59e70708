//! Permanent pins created by releasing a grab with the anchor modifier held.

use crate::constraint::{PinConstraint, PinSource};
use crate::float::Float;
use crate::particle::ParticleRef;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A particle held at a world position for the rest of the session.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anchor<F: Float> {
    pub target: ParticleRef,
    pub position: Vec3<F>,
}

/// Append-only set of anchors across all strands of a pool.
#[derive(Clone, Debug, Default)]
pub struct AnchorSet<F: Float> {
    anchors: AllocVec<Anchor<F>>,
}

impl<F: Float> AnchorSet<F> {
    pub fn new() -> Self {
        AnchorSet { anchors: AllocVec::new() }
    }

    /// Adds an anchor. A particle that is already anchored keeps its original
    /// anchor; returns whether a new one was added.
    pub fn insert(&mut self, target: ParticleRef, position: Vec3<F>) -> bool {
        if self.contains(target) {
            return false;
        }
        self.anchors.push(Anchor { target, position });
        true
    }

    pub fn contains(&self, target: ParticleRef) -> bool {
        self.anchors.iter().any(|a| a.target == target)
    }

    /// Anchors that belong to `strand`.
    pub fn for_strand(&self, strand: usize) -> impl Iterator<Item = &Anchor<F>> + '_ {
        self.anchors.iter().filter(move |a| a.target.strand == strand)
    }

    /// Pins enforcing this strand's anchors, zero velocity.
    pub fn pins_for(&self, strand: usize) -> impl Iterator<Item = PinConstraint<F>> + '_ {
        self.for_strand(strand)
            .map(|a| PinConstraint::new(a.target.particle, a.position, PinSource::Anchor))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor<F>> + '_ {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_are_filtered_by_strand() {
        let mut set = AnchorSet::<f32>::new();
        set.insert(ParticleRef::new(0, 3), Vec3::new(1.0, 2.0, 3.0));
        set.insert(ParticleRef::new(1, 2), Vec3::zero());
        set.insert(ParticleRef::new(0, 5), Vec3::zero());

        let pins: alloc::vec::Vec<_> = set.pins_for(0).collect();
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].particle, 3);
        assert_eq!(pins[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pins[0].source, PinSource::Anchor);
    }

    #[test]
    fn anchoring_twice_keeps_first_position() {
        let mut set = AnchorSet::<f64>::new();
        assert!(set.insert(ParticleRef::new(2, 1), Vec3::unit_x()));
        assert!(!set.insert(ParticleRef::new(2, 1), Vec3::unit_y()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().position, Vec3::unit_x());
    }
}
