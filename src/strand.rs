//! A single strand: a fixed-length chain of particles hanging from a root.

use crate::collision::{resolve_segments, SphereCollider};
use crate::config::StrandConfig;
use crate::constraint::{DistanceConstraint, PinConstraint, PinSource};
use crate::error::StrandError;
use crate::float::Float;
use crate::integrator::integrate;
use crate::layout::StrandLayout;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::solver::ConstraintSolver;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// One simulated strand (hair, rope).
///
/// Particle 0 is the root and is always pinned. The particle count is fixed at
/// construction; indexing past it panics.
#[derive(Clone, Debug)]
pub struct Strand<F: Float> {
    particles: AllocVec<Particle<F>>,
    solver: ConstraintSolver<F>,
    gravity: Vec3<F>,
    damping: F,
}

impl<F: Float> Strand<F> {
    pub fn new(root: Vec3<F>, config: &StrandConfig<F>, layout: &StrandLayout<F>) -> Result<Self, StrandError> {
        config.validate()?;
        let axis = layout.axis()?;
        let positions = layout.place(root, config.particle_count, config.rest_length)?;

        let mut particles: AllocVec<Particle<F>> = positions.into_iter().map(Particle::new).collect();
        particles[0].pin();

        // Coincident particles are pushed apart along the growth axis.
        let distance = DistanceConstraint::new(config.rest_length, -axis);

        Ok(Strand {
            particles,
            solver: ConstraintSolver::new(distance, config.iterations),
            gravity: config.gravity,
            damping: config.damping,
        })
    }

    /// Advances the strand by `dt`.
    ///
    /// `pins` are applied after the root pin, in order, after every sweep.
    /// When `collider` is given, penetrating segments are pushed out after the
    /// commit. On non-finite state the strand is rolled back and the error
    /// names `index`.
    pub fn step<O: StepObserver>(
        &mut self,
        index: usize,
        dt: F,
        collider: Option<&SphereCollider<F>>,
        pins: &[PinConstraint<F>],
        observer: &mut O,
    ) -> Result<(), StrandError> {
        self.apply_external_forces(dt);
        observer.on_external_forces(index);

        let mut all_pins = AllocVec::with_capacity(pins.len() + 1);
        all_pins.push(self.root_pin());
        all_pins.extend_from_slice(pins);

        self.solver.solve(index, &mut self.particles, &all_pins, observer);

        if let Err(err) = integrate(index, &mut self.particles, &all_pins, dt, self.damping) {
            observer.on_tick_rejected(index);
            return Err(err);
        }
        observer.on_integrate(index);

        if let Some(sphere) = collider {
            let contacts = resolve_segments(&mut self.particles, sphere);
            observer.on_collision(index, contacts);
        }

        Ok(())
    }

    /// Gravity into velocity, velocity into prediction. Pinned particles are
    /// skipped entirely.
    pub fn apply_external_forces(&mut self, dt: F) {
        let dv = self.gravity.scale(dt);
        for p in self.particles.iter_mut().filter(|p| !p.is_pinned()) {
            p.committed.velocity += dv;
            p.predictor.predicted += p.committed.velocity.scale(dt);
        }
    }

    /// Pin holding the root at its committed position.
    pub fn root_pin(&self) -> PinConstraint<F> {
        PinConstraint::new(0, self.particles[0].committed.position, PinSource::Root)
    }

    pub fn root(&self) -> Vec3<F> {
        self.particles[0].committed.position
    }

    /// Moves the root. Takes effect from the next sweep.
    pub fn set_root(&mut self, root: Vec3<F>) {
        self.particles[0].reset_to(root);
    }

    /// Committed positions, root first. This is what a renderer draws.
    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.particles.iter().map(|p| p.committed.position).collect()
    }

    pub fn position(&self, index: usize) -> Vec3<F> {
        self.particles[index].committed.position
    }

    pub fn particles(&self) -> &[Particle<F>] {
        &self.particles
    }

    pub fn particle(&self, index: usize) -> &Particle<F> {
        &self.particles[index]
    }

    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<F> {
        &mut self.particles[index]
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false; a strand has at least a root and one free particle.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn rest_length(&self) -> F {
        self.solver.distance.rest_length
    }

    pub fn iterations(&self) -> usize {
        self.solver.iterations
    }

    pub fn damping(&self) -> F {
        self.damping
    }

    pub fn gravity(&self) -> Vec3<F> {
        self.gravity
    }
}
