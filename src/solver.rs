//! Iterative Gauss-Seidel relaxation of one strand's constraints.

use crate::constraint::{DistanceConstraint, PinConstraint};
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;

/// Runs a fixed number of distance sweeps, re-applying pins after each one.
///
/// The result only approaches inextensibility; more iterations buy stiffness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintSolver<F: Float> {
    pub distance: DistanceConstraint<F>,
    pub iterations: usize,
}

impl<F: Float> ConstraintSolver<F> {
    pub fn new(distance: DistanceConstraint<F>, iterations: usize) -> Self {
        ConstraintSolver { distance, iterations }
    }

    /// `pins` must start with the root pin; later entries override earlier ones.
    pub fn solve<O: StepObserver>(
        &self,
        strand: usize,
        particles: &mut [Particle<F>],
        pins: &[PinConstraint<F>],
        observer: &mut O,
    ) {
        for i in 0..self.iterations {
            self.distance.sweep(particles);
            for pin in pins {
                pin.solve(particles);
            }
            observer.on_constraint_iteration(strand, i);
        }
    }
}
