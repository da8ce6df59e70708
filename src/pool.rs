//! A pool of strands sharing one collider, one anchor set and one pointer.

use crate::anchor::AnchorSet;
use crate::collision::SphereCollider;
use crate::config::{GrabConfig, StrandConfig};
use crate::error::StrandError;
use crate::float::Float;
use crate::grab::{GrabController, Ray, Release};
use crate::layout::StrandLayout;
use crate::observer::StepObserver;
use crate::particle::ParticleRef;
use crate::strand::Strand;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Builds a [`StrandPool`]. All strands share the same [`StrandConfig`].
///
/// ```
/// use strands::{PoolBuilder, StrandConfig, StrandLayout, SphereCollider, Vec3, NoOpStepObserver};
///
/// let mut pool = PoolBuilder::new(StrandConfig::<f32>::new().with_particle_count(8))
///     .with_collider(SphereCollider::new(Vec3::new(0.0, -10.0, 0.0), 4.0).unwrap())
///     .with_strand(Vec3::new(0.0, 0.0, 0.0), StrandLayout::default())
///     .with_strand(Vec3::new(1.0, 0.0, 0.0), StrandLayout::default())
///     .build()
///     .unwrap();
///
/// let report = pool.tick(1.0 / 60.0, &mut NoOpStepObserver).unwrap();
/// assert_eq!(report.committed, 2);
/// ```
#[derive(Clone, Debug)]
pub struct PoolBuilder<F: Float> {
    config: StrandConfig<F>,
    grab: GrabConfig<F>,
    collider: Option<SphereCollider<F>>,
    strands: AllocVec<(Vec3<F>, StrandLayout<F>)>,
}

impl<F: Float> PoolBuilder<F> {
    pub fn new(config: StrandConfig<F>) -> Self {
        PoolBuilder {
            config,
            grab: GrabConfig::default(),
            collider: None,
            strands: AllocVec::new(),
        }
    }

    pub fn with_grab_config(mut self, grab: GrabConfig<F>) -> Self {
        self.grab = grab;
        self
    }

    pub fn with_collider(mut self, collider: SphereCollider<F>) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_strand(mut self, root: Vec3<F>, layout: StrandLayout<F>) -> Self {
        self.strands.push((root, layout));
        self
    }

    pub fn with_strands<I>(mut self, strands: I) -> Self
    where
        I: IntoIterator<Item = (Vec3<F>, StrandLayout<F>)>,
    {
        self.strands.extend(strands);
        self
    }

    pub fn build(self) -> Result<StrandPool<F>, StrandError> {
        let strands = self
            .strands
            .iter()
            .map(|(root, layout)| Strand::new(*root, &self.config, layout))
            .collect::<Result<AllocVec<_>, _>>()?;

        log::debug!(
            "built strand pool: {} strand(s) x {} particle(s), collider: {}",
            strands.len(),
            self.config.particle_count,
            self.collider.is_some()
        );

        Ok(StrandPool {
            strands,
            collider: self.collider,
            anchors: AnchorSet::new(),
            grab: GrabController::new(self.grab),
        })
    }
}

/// Outcome of one [`StrandPool::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Strands that advanced normally.
    pub committed: usize,
    /// Strands rolled back because they produced non-finite state.
    pub rejected: AllocVec<usize>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Owns every strand and advances them together, once per rendered frame.
#[derive(Clone, Debug)]
pub struct StrandPool<F: Float> {
    strands: AllocVec<Strand<F>>,
    collider: Option<SphereCollider<F>>,
    anchors: AnchorSet<F>,
    grab: GrabController<F>,
}

impl<F: Float> StrandPool<F> {
    /// Advances every strand by `dt`.
    ///
    /// Per strand: external forces, constraint sweeps with root, grab and
    /// anchor pins, commit, collision. A strand that blows up is rolled back
    /// and listed in the report; the others still advance.
    pub fn tick<O: StepObserver>(&mut self, dt: F, observer: &mut O) -> Result<TickReport, StrandError> {
        // A sub-normal step would overflow `1 / dt` during velocity reconstruction.
        if !dt.is_finite() || dt <= F::zero() || !(F::one() / dt).is_finite() {
            return Err(StrandError::InvalidTimeStep);
        }
        if let Some(sphere) = &self.collider {
            sphere.validate()?;
        }

        self.grab.advance(dt);

        let mut report = TickReport::default();
        for (i, strand) in self.strands.iter_mut().enumerate() {
            let pins: AllocVec<_> = self.grab.pins_for(i).chain(self.anchors.pins_for(i)).collect();
            match strand.step(i, dt, self.collider.as_ref(), &pins, observer) {
                Ok(()) => report.committed += 1,
                Err(err) => {
                    log::warn!("{}", err);
                    report.rejected.push(i);
                }
            }
        }

        observer.on_tick_complete();
        Ok(report)
    }

    /// Pointer down. See [`GrabController::grab`].
    pub fn grab(&mut self, ray: Ray<F>, pick_distance: F) -> Option<ParticleRef> {
        self.grab.grab(&mut self.strands, &self.anchors, ray, pick_distance)
    }

    /// Pointer move. See [`GrabController::move_to`].
    pub fn move_grab(&mut self, ray: Ray<F>) -> bool {
        self.grab.move_to(&mut self.strands, ray)
    }

    /// Pointer up; `anchor` is the modifier-key state at this moment.
    pub fn release(&mut self, anchor: bool) -> Release {
        self.grab.release(&mut self.strands, &mut self.anchors, anchor)
    }

    /// Moves the root of one strand.
    pub fn move_root(&mut self, strand: usize, root: Vec3<F>) {
        self.strands[strand].set_root(root);
    }

    pub fn collider(&self) -> Option<&SphereCollider<F>> {
        self.collider.as_ref()
    }

    /// Replaces (or removes) the collider; read again on the next tick.
    pub fn set_collider(&mut self, collider: Option<SphereCollider<F>>) {
        self.collider = collider;
    }

    pub fn strands(&self) -> &[Strand<F>] {
        &self.strands
    }

    pub fn strand(&self, index: usize) -> &Strand<F> {
        &self.strands[index]
    }

    /// Committed positions of every strand, for the renderer.
    pub fn positions(&self) -> AllocVec<AllocVec<Vec3<F>>> {
        self.strands.iter().map(Strand::positions).collect()
    }

    pub fn anchors(&self) -> &AnchorSet<F> {
        &self.anchors
    }

    pub fn grab_controller(&self) -> &GrabController<F> {
        &self.grab
    }

    pub fn len(&self) -> usize {
        self.strands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }
}
