//! Initial particle placement for a strand.
//!
//! A layout only decides where particles start. The solver never looks at it
//! again, except for the growth axis used as the fallback direction when two
//! particles collapse onto each other.

use crate::error::StrandError;
use crate::float::Float;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Generation policy for the rest shape of a strand.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StrandLayout<F: Float> {
    /// Particles on a straight line from the root along `direction`.
    Straight { direction: Vec3<F> },
    /// Particles on a helix winding around `axis`, starting at the root.
    ///
    /// `radius` must satisfy `2 * radius * sin(pi / points_per_turn) < rest_length`
    /// so consecutive particles can sit exactly one rest length apart.
    Helical { axis: Vec3<F>, radius: F, points_per_turn: usize },
}

impl<F: Float> Default for StrandLayout<F> {
    fn default() -> Self {
        StrandLayout::Straight { direction: Vec3::down() }
    }
}

const AXIS_EPSILON: f32 = 1e-9;

impl<F: Float> StrandLayout<F> {
    /// Unit growth direction of the strand.
    pub fn axis(&self) -> Result<Vec3<F>, StrandError> {
        let raw = match *self {
            StrandLayout::Straight { direction } => direction,
            StrandLayout::Helical { axis, .. } => axis,
        };
        let len = raw.length();
        if !len.is_finite() || len.is_near_zero(F::from_f32(AXIS_EPSILON)) {
            return Err(StrandError::InvalidLayout);
        }
        Ok(raw.scale(F::one() / len))
    }

    /// Positions of `count` particles spaced exactly `rest_length` apart,
    /// the first one at `root`.
    pub fn place(&self, root: Vec3<F>, count: usize, rest_length: F) -> Result<AllocVec<Vec3<F>>, StrandError> {
        let axis = self.axis()?;
        let mut points = AllocVec::with_capacity(count);

        match *self {
            StrandLayout::Straight { .. } => {
                for i in 0..count {
                    points.push(root + axis.scale(rest_length * F::from_usize(i)));
                }
            }
            StrandLayout::Helical { radius, points_per_turn, .. } => {
                if points_per_turn < 2 || !radius.is_finite() || radius < F::zero() {
                    return Err(StrandError::InvalidLayout);
                }
                let two = F::one() + F::one();
                let step = two * F::pi() / F::from_usize(points_per_turn);
                // Chord in the plane perpendicular to the axis between neighbours.
                let chord = two * radius * (step * F::half()).sin();
                if chord >= rest_length {
                    return Err(StrandError::InvalidLayout);
                }
                let rise = (rest_length * rest_length - chord * chord).sqrt();

                let u = axis.any_orthonormal();
                let v = axis.cross(u);
                for i in 0..count {
                    let angle = step * F::from_usize(i);
                    let around = u.scale(angle.cos()) + v.scale(angle.sin()) - u;
                    points.push(root + axis.scale(rise * F::from_usize(i)) + around.scale(radius));
                }
            }
        }

        Ok(points)
    }
}

/// A strand root together with the direction the strand grows in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootPlacement<F: Float> {
    pub root: Vec3<F>,
    pub normal: Vec3<F>,
}

/// Spreads `count` roots over the spherical cap of `center`/`radius` whose
/// polar angle from +Y is at most `max_polar_angle` (radians).
///
/// Uses a Fibonacci spiral so the result is deterministic and roughly uniform.
pub fn scalp_roots<F: Float>(center: Vec3<F>, radius: F, count: usize, max_polar_angle: F) -> AllocVec<RootPlacement<F>> {
    let mut roots = AllocVec::with_capacity(count);
    if count == 0 {
        return roots;
    }

    // Golden angle, pi * (3 - sqrt(5)).
    let golden = F::pi() * (F::from_f32(3.0) - F::from_f32(5.0).sqrt());
    let min_cos = max_polar_angle.cos();
    let n = F::from_usize(count);

    for i in 0..count {
        // Uniform in cos(theta) over [min_cos, 1] gives uniform area on the cap.
        let t = (F::from_usize(i) + F::half()) / n;
        let cos_theta = F::one() - t * (F::one() - min_cos);
        let sin_theta = (F::one() - cos_theta * cos_theta).max(F::zero()).sqrt();
        let phi = golden * F::from_usize(i);
        let normal = Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin());
        roots.push(RootPlacement { root: center + normal.scale(radius), normal });
    }

    roots
}
