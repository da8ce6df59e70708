//! Turns solved predictions back into velocities and commits them.

use crate::constraint::PinConstraint;
use crate::error::StrandError;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Commits one strand's predicted positions.
///
/// Free particles get `velocity = (predicted - position) / dt`, plus a damped
/// reaction `-damping / dt * correction[i + 1]` taken from the next particle.
/// The last particle has no successor, so its velocity is scaled by `damping`
/// instead. Pinned particles snap to their prediction and take the velocity of
/// the last pin naming them, or zero.
///
/// If any prediction or resulting velocity is non-finite nothing is
/// committed: the whole strand is rolled back to its previous committed state
/// with zero velocity.
pub fn integrate<F: Float>(
    strand: usize,
    particles: &mut [Particle<F>],
    pins: &[PinConstraint<F>],
    dt: F,
    damping: F,
) -> Result<(), StrandError> {
    let velocities = particles
        .iter()
        .all(|p| p.predictor.predicted.is_finite())
        .then(|| reconstruct_velocities(particles, pins, dt, damping))
        .filter(|vs| vs.iter().all(|v| v.is_finite()));

    let Some(velocities) = velocities else {
        for p in particles.iter_mut() {
            p.rollback();
        }
        return Err(StrandError::NonFinite { strand });
    };

    for (p, v) in particles.iter_mut().zip(velocities) {
        p.commit(v);
    }
    Ok(())
}

fn reconstruct_velocities<F: Float>(particles: &[Particle<F>], pins: &[PinConstraint<F>], dt: F, damping: F) -> AllocVec<Vec3<F>> {
    let inv_dt = F::one() / dt;
    let last = particles.len() - 1;

    particles
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if p.is_pinned() {
                return pins
                    .iter()
                    .rev()
                    .find(|pin| pin.particle == i)
                    .map_or(Vec3::zero(), |pin| pin.velocity);
            }

            let velocity = (p.predictor.predicted - p.committed.position).scale(inv_dt);
            if i < last {
                velocity + particles[i + 1].predictor.correction.scale(-damping * inv_dt)
            } else {
                velocity.scale(damping)
            }
        })
        .collect()
}
