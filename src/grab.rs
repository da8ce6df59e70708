//! Pointer-driven grabbing and anchoring of particles across strands.
//!
//! The controller is a two-state machine. `grab` picks the particle closest to
//! the pick point (plus every non-root particle near it) and pins them; `move_to`
//! drags them along a new pointer ray; `release` either frees them again or,
//! with the anchor modifier, turns them into permanent [`Anchor`](crate::Anchor)s.
//!
//! The controller never owns particles. Pinning is expressed through
//! `inv_mass` and the [`PinConstraint`]s it hands to the solver each tick.

use crate::anchor::AnchorSet;
use crate::config::GrabConfig;
use crate::constraint::{PinConstraint, PinSource};
use crate::float::Float;
use crate::particle::ParticleRef;
use crate::strand::Strand;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Pointer ray supplied by the host's camera service.
///
/// `direction` is expected to be unit length so that distances along the ray
/// are world distances.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray<F: Float> {
    pub origin: Vec3<F>,
    pub direction: Vec3<F>,
}

impl<F: Float> Ray<F> {
    pub fn new(origin: Vec3<F>, direction: Vec3<F>) -> Self {
        Ray { origin, direction }
    }

    /// Point `distance` along the ray.
    pub fn at(&self, distance: F) -> Vec3<F> {
        self.origin + self.direction.scale(distance)
    }

    /// Distance along the ray of the projection of `point`.
    pub fn project(&self, point: Vec3<F>) -> F {
        (point - self.origin).dot(self.direction)
    }
}

/// A grabbed particle and where it sits relative to the pick point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrabMember<F: Float> {
    pub target: ParticleRef,
    pub offset: Vec3<F>,
}

/// An active drag.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveGrab<F: Float> {
    primary: ParticleRef,
    members: AllocVec<GrabMember<F>>,
    pick_distance: F,
    pick: Vec3<F>,
    velocity: Vec3<F>,
    elapsed: F,
}

impl<F: Float> ActiveGrab<F> {
    pub fn primary(&self) -> ParticleRef {
        self.primary
    }

    /// Every grabbed particle, primary first.
    pub fn members(&self) -> &[GrabMember<F>] {
        &self.members
    }

    pub fn pick(&self) -> Vec3<F> {
        self.pick
    }

    pub fn velocity(&self) -> Vec3<F> {
        self.velocity
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GrabState<F: Float> {
    Idle,
    Grabbing(ActiveGrab<F>),
}

/// What a release did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// No grab was active.
    Nothing,
    /// `count` particles were handed back to the simulation.
    Released { count: usize },
    /// `count` particles became permanent anchors.
    Anchored { count: usize },
}

/// Grab/anchor state machine shared by all strands of a pool.
#[derive(Clone, Debug)]
pub struct GrabController<F: Float> {
    config: GrabConfig<F>,
    state: GrabState<F>,
}

impl<F: Float> GrabController<F> {
    pub fn new(config: GrabConfig<F>) -> Self {
        GrabController { config, state: GrabState::Idle }
    }

    pub fn config(&self) -> &GrabConfig<F> {
        &self.config
    }

    pub fn state(&self) -> &GrabState<F> {
        &self.state
    }

    pub fn is_grabbing(&self) -> bool {
        matches!(self.state, GrabState::Grabbing(_))
    }

    /// The particle the pointer holds, if any.
    pub fn grabbed(&self) -> Option<ParticleRef> {
        match &self.state {
            GrabState::Grabbing(active) => Some(active.primary),
            GrabState::Idle => None,
        }
    }

    /// Pointer down. Picks the particle closest to `ray.at(pick_distance)`
    /// across all strands and pins it there, together with every non-root
    /// particle within the nearby radius.
    ///
    /// Returns `None` (and stays idle) when no particle lies within the pick
    /// tolerance. A grab that is still active is released first.
    pub fn grab(
        &mut self,
        strands: &mut [Strand<F>],
        anchors: &AnchorSet<F>,
        ray: Ray<F>,
        pick_distance: F,
    ) -> Option<ParticleRef> {
        if let GrabState::Grabbing(previous) = core::mem::replace(&mut self.state, GrabState::Idle) {
            free_members(&previous, strands, anchors);
        }

        let pick = ray.at(pick_distance);
        let primary = closest_particle(strands, pick)?;
        let primary_pos = strands[primary.strand].position(primary.particle);
        if primary_pos.distance(pick) > self.config.pick_tolerance {
            log::debug!("pick missed every strand (closest {:?})", primary);
            return None;
        }

        let mut members = AllocVec::new();
        members.push(GrabMember { target: primary, offset: Vec3::zero() });

        let radius_sq = self.config.nearby_radius * self.config.nearby_radius;
        for (s, strand) in strands.iter().enumerate() {
            for (i, p) in strand.particles().iter().enumerate().skip(1) {
                let target = ParticleRef::new(s, i);
                if target == primary {
                    continue;
                }
                let offset = p.position() - pick;
                if offset.length_sq() <= radius_sq {
                    members.push(GrabMember { target, offset });
                }
            }
        }

        for m in &members {
            let p = strands[m.target.strand].particle_mut(m.target.particle);
            p.pin();
            p.predictor.predicted = pick + m.offset;
            p.committed.velocity = Vec3::zero();
        }

        log::debug!(
            "grabbed {:?} with {} nearby particle(s){}",
            primary,
            members.len() - 1,
            if anchors.contains(primary) { " (anchored)" } else { "" }
        );

        self.state = GrabState::Grabbing(ActiveGrab {
            primary,
            members,
            pick_distance,
            pick,
            velocity: Vec3::zero(),
            elapsed: F::zero(),
        });
        Some(primary)
    }

    /// Pointer move. Re-picks at the original distance along `ray`, estimates
    /// the drag velocity from the time since the previous move, and writes
    /// target and velocity to every grabbed particle. Returns false when idle.
    pub fn move_to(&mut self, strands: &mut [Strand<F>], ray: Ray<F>) -> bool {
        let GrabState::Grabbing(active) = &mut self.state else { return false };

        let pick = ray.at(active.pick_distance);
        if active.elapsed > F::zero() {
            active.velocity = (pick - active.pick).scale(F::one() / active.elapsed);
            active.elapsed = F::zero();
        }
        active.pick = pick;

        for m in &active.members {
            let p = strands[m.target.strand].particle_mut(m.target.particle);
            p.predictor.predicted = pick + m.offset;
            p.committed.velocity = active.velocity;
        }
        true
    }

    /// Accumulates simulated time for the velocity estimate.
    pub fn advance(&mut self, dt: F) {
        if let GrabState::Grabbing(active) = &mut self.state {
            active.elapsed = active.elapsed + dt;
        }
    }

    /// Pins holding this strand's grabbed particles at their drag targets.
    pub fn pins_for(&self, strand: usize) -> impl Iterator<Item = PinConstraint<F>> + '_ {
        let active = match &self.state {
            GrabState::Grabbing(active) => Some(active),
            GrabState::Idle => None,
        };
        active.into_iter().flat_map(move |a| {
            a.members
                .iter()
                .filter(move |m| m.target.strand == strand)
                .map(move |m| {
                    PinConstraint::new(m.target.particle, a.pick + m.offset, PinSource::Grab)
                        .with_velocity(a.velocity)
                })
        })
    }

    /// Pointer up. `anchor` is the modifier state sampled now: when set, every
    /// grabbed particle is anchored where it is held; otherwise non-root,
    /// non-anchored particles get their inverse mass back.
    pub fn release(&mut self, strands: &mut [Strand<F>], anchors: &mut AnchorSet<F>, anchor: bool) -> Release {
        let GrabState::Grabbing(active) = core::mem::replace(&mut self.state, GrabState::Idle) else {
            return Release::Nothing;
        };
        let count = active.members.len();

        if anchor {
            for m in &active.members {
                anchors.insert(m.target, active.pick + m.offset);
            }
            log::debug!("anchored {} particle(s); {} anchor(s) total", count, anchors.len());
            Release::Anchored { count }
        } else {
            free_members(&active, strands, anchors);
            log::debug!("released {} particle(s)", count);
            Release::Released { count }
        }
    }
}

fn free_members<F: Float>(active: &ActiveGrab<F>, strands: &mut [Strand<F>], anchors: &AnchorSet<F>) {
    for m in &active.members {
        let p = strands[m.target.strand].particle_mut(m.target.particle);
        if m.target.is_root() {
            // The root stays where it was dropped.
            p.reset_to(active.pick + m.offset);
            p.committed.velocity = Vec3::zero();
        } else if !anchors.contains(m.target) {
            p.unpin();
        }
    }
}

/// Closest particle to `point` over every strand, by squared distance.
pub fn closest_particle<F: Float>(strands: &[Strand<F>], point: Vec3<F>) -> Option<ParticleRef> {
    let mut best: Option<(ParticleRef, F)> = None;
    for (s, strand) in strands.iter().enumerate() {
        for (i, p) in strand.particles().iter().enumerate() {
            let d = p.position().distance_sq(point);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((ParticleRef::new(s, i), d));
            }
        }
    }
    best.map(|(r, _)| r)
}
