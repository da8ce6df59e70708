//! Segment-versus-sphere collision for strands.
//!
//! Resolution runs once per tick after the commit and pushes predicted
//! positions, so it takes effect through the next tick's velocity. Fast strands
//! or large steps can tunnel through a thin sphere; that is a known limit of
//! the single pass.
//!
//! Segments are visited root outwards and each push moves the endpoint shared
//! with the previous segment, which can put that earlier segment back inside
//! the sphere. Only the last segment that was pushed, if both its endpoints are
//! free, is guaranteed to end up outside; the remaining depth is worked off
//! over the following ticks.

use crate::error::StrandError;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The single spherical obstacle shared by every strand.
///
/// Center and radius are finite and the radius is non-negative. Outside of
/// deserialization, [`SphereCollider::new`] is the only way to build one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SphereCollider<F: Float> {
    center: Vec3<F>,
    radius: F,
}

impl<F: Float> SphereCollider<F> {
    pub fn new(center: Vec3<F>, radius: F) -> Result<Self, StrandError> {
        let sphere = SphereCollider { center, radius };
        sphere.validate()?;
        Ok(sphere)
    }

    /// Rejects a non-finite center or a negative or non-finite radius.
    pub fn validate(&self) -> Result<(), StrandError> {
        if !self.center.is_finite() || !self.radius.is_finite() || self.radius < F::zero() {
            return Err(StrandError::InvalidCollider);
        }
        Ok(())
    }

    pub fn center(&self) -> Vec3<F> {
        self.center
    }

    pub fn radius(&self) -> F {
        self.radius
    }

    /// Signed distance from the segment `a..b` to the sphere surface, and the
    /// closest point on the segment.
    pub fn segment_distance(&self, a: Vec3<F>, b: Vec3<F>) -> (F, Vec3<F>) {
        let closest = closest_point_on_segment(a, b, self.center);
        (closest.distance(self.center) - self.radius, closest)
    }

    /// Displacement that moves the segment `a..b` out of the sphere, if it
    /// penetrates.
    pub fn penetration(&self, a: Vec3<F>, b: Vec3<F>) -> Option<Vec3<F>> {
        let closest = closest_point_on_segment(a, b, self.center);
        let offset = closest - self.center;
        let dist = offset.length();
        if dist >= self.radius {
            return None;
        }
        let normal = offset.normalize_or(Vec3::unit_y(), F::from_f32(1e-9));
        Some(normal.scale(self.radius - dist))
    }
}

/// Projects `point` onto the line through `a` and `b`, clamped to the segment.
pub fn closest_point_on_segment<F: Float>(a: Vec3<F>, b: Vec3<F>, point: Vec3<F>) -> Vec3<F> {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq.is_near_zero(F::from_f32(1e-12)) {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(F::zero(), F::one());
    a + ab.scale(t)
}

/// Pushes every penetrating segment of a strand out of `sphere`.
///
/// The full penetration vector goes to both endpoints; pinned endpoints stay
/// put. Returns the number of segments that were corrected.
pub fn resolve_segments<F: Float>(particles: &mut [Particle<F>], sphere: &SphereCollider<F>) -> usize {
    let mut contacts = 0;
    for i in 0..particles.len().saturating_sub(1) {
        let a = particles[i].predictor.predicted;
        let b = particles[i + 1].predictor.predicted;
        let Some(push) = sphere.penetration(a, b) else { continue };

        contacts += 1;
        for p in &mut particles[i..=i + 1] {
            if !p.is_pinned() {
                p.predictor.predicted += push;
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let a = Vec3::new(0.0f32, 0.0, 0.0);
        let b = Vec3::new(1.0f32, 0.0, 0.0);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(-3.0, 1.0, 0.0)), a);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(4.0, 1.0, 0.0)), b);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(0.5, 2.0, 0.0)), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn segment_outside_sphere_is_untouched() {
        let sphere = SphereCollider::new(Vec3::zero(), 1.0f32).unwrap();
        assert_eq!(sphere.penetration(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 0.0)), None);
    }

    #[test]
    fn penetrating_segment_is_pushed_to_surface() {
        let sphere = SphereCollider::new(Vec3::zero(), 1.0f64).unwrap();
        let mut ps = [
            Particle::new(Vec3::new(-2.0, 0.5, 0.0)),
            Particle::new(Vec3::new(2.0, 0.5, 0.0)),
        ];
        assert_eq!(resolve_segments(&mut ps, &sphere), 1);
        assert!((ps[0].predicted().y - 1.0).abs() < 1e-12);
        assert!((ps[1].predicted().y - 1.0).abs() < 1e-12);
        let (gap, _) = sphere.segment_distance(ps[0].predicted(), ps[1].predicted());
        assert!(gap >= -1e-9);
    }

    #[test]
    fn pinned_endpoint_is_not_pushed() {
        let sphere = SphereCollider::new(Vec3::zero(), 1.0f64).unwrap();
        let mut ps = [
            Particle::pinned(Vec3::new(0.0, 0.5, 0.0)),
            Particle::new(Vec3::new(0.0, -0.5, 0.5)),
        ];
        resolve_segments(&mut ps, &sphere);
        assert_eq!(ps[0].predicted(), Vec3::new(0.0, 0.5, 0.0));
        assert_ne!(ps[1].predicted(), Vec3::new(0.0, -0.5, 0.5));
    }

    #[test]
    fn negative_radius_is_rejected() {
        assert_eq!(SphereCollider::new(Vec3::<f32>::zero(), -1.0), Err(StrandError::InvalidCollider));
    }

    #[test]
    fn constructed_collider_validates() {
        let sphere = SphereCollider::new(Vec3::new(1.0f32, 2.0, 3.0), 0.0).unwrap();
        assert_eq!(sphere.validate(), Ok(()));
        assert_eq!(sphere.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.radius(), 0.0);
    }
}
