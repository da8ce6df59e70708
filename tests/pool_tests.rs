use strands::{
    scalp_roots, LogObserver, NoOpStepObserver, PoolBuilder, SphereCollider, StepObserver, StrandConfig, StrandError,
    StrandLayout, Vec3,
};

#[derive(Default)]
struct CountingObserver {
    external_forces: usize,
    sweeps: usize,
    integrated: usize,
    collisions: usize,
    rejected: usize,
    ticks: usize,
}

impl StepObserver for CountingObserver {
    fn on_external_forces(&mut self, _strand: usize) {
        self.external_forces += 1;
    }

    fn on_constraint_iteration(&mut self, _strand: usize, _iteration: usize) {
        self.sweeps += 1;
    }

    fn on_integrate(&mut self, _strand: usize) {
        self.integrated += 1;
    }

    fn on_collision(&mut self, _strand: usize, _contacts: usize) {
        self.collisions += 1;
    }

    fn on_tick_rejected(&mut self, _strand: usize) {
        self.rejected += 1;
    }

    fn on_tick_complete(&mut self) {
        self.ticks += 1;
    }
}

fn three_strands(config: StrandConfig<f32>) -> PoolBuilder<f32> {
    PoolBuilder::new(config).with_strands((0..3).map(|i| (Vec3::new(i as f32, 0.0, 0.0), StrandLayout::default())))
}

#[test]
fn invalid_time_step_is_rejected_without_touching_state() {
    let mut pool = three_strands(StrandConfig::new()).build().unwrap();
    let before = pool.positions();

    assert_eq!(pool.tick(0.0, &mut NoOpStepObserver), Err(StrandError::InvalidTimeStep));
    assert_eq!(pool.tick(-0.1, &mut NoOpStepObserver), Err(StrandError::InvalidTimeStep));
    assert_eq!(pool.tick(f32::INFINITY, &mut NoOpStepObserver), Err(StrandError::InvalidTimeStep));
    assert_eq!(pool.tick(f32::NAN, &mut NoOpStepObserver), Err(StrandError::InvalidTimeStep));
    assert_eq!(pool.positions(), before);
}

#[test]
fn invalid_config_fails_the_build() {
    let err = three_strands(StrandConfig::new().with_damping(1.5)).build().unwrap_err();
    assert_eq!(err, StrandError::InvalidDamping);

    let err = three_strands(StrandConfig::new().with_iterations(0)).build().unwrap_err();
    assert_eq!(err, StrandError::InvalidIterations);

    let wide_helix = StrandLayout::Helical { axis: Vec3::down(), radius: 10.0, points_per_turn: 4 };
    let err = PoolBuilder::new(StrandConfig::<f32>::new())
        .with_strand(Vec3::zero(), wide_helix)
        .build()
        .unwrap_err();
    assert_eq!(err, StrandError::InvalidLayout);
}

#[test]
fn blown_up_strands_are_reported_and_rolled_back() {
    let config = StrandConfig::new().with_gravity(Vec3::new(0.0, f32::NAN, 0.0));
    let mut pool = three_strands(config).build().unwrap();
    let before = pool.positions();
    let mut observer = CountingObserver::default();

    let report = pool.tick(1.0 / 60.0, &mut observer).unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.committed, 0);
    assert_eq!(report.rejected, vec![0, 1, 2]);
    assert_eq!(observer.rejected, 3);
    assert_eq!(observer.integrated, 0);
    assert_eq!(observer.ticks, 1);
    assert_eq!(pool.positions(), before);
}

#[test]
fn observer_sees_every_phase() {
    let config = StrandConfig::new().with_iterations(7);
    let mut pool = three_strands(config)
        .with_collider(SphereCollider::new(Vec3::new(0.0, -30.0, 0.0), 1.0).unwrap())
        .build()
        .unwrap();
    let mut observer = CountingObserver::default();

    for _ in 0..4 {
        let report = pool.tick(1.0 / 60.0, &mut observer).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.committed, 3);
    }

    assert_eq!(observer.external_forces, 3 * 4);
    assert_eq!(observer.sweeps, 7 * 3 * 4);
    assert_eq!(observer.integrated, 3 * 4);
    assert_eq!(observer.collisions, 3 * 4);
    assert_eq!(observer.rejected, 0);
    assert_eq!(observer.ticks, 4);
}

#[test]
fn collision_hook_is_skipped_without_a_collider() {
    let mut pool = three_strands(StrandConfig::new()).build().unwrap();
    let mut observer = CountingObserver::default();
    pool.tick(1.0 / 60.0, &mut observer).unwrap();
    assert_eq!(observer.collisions, 0);
    assert_eq!(observer.integrated, 3);
}

#[test]
fn positions_are_exposed_per_strand_root_first() {
    let config = StrandConfig::new().with_particle_count(6).with_rest_length(0.25);
    let mut pool = three_strands(config).build().unwrap();
    pool.tick(1.0 / 60.0, &mut LogObserver).unwrap();

    let positions = pool.positions();
    assert_eq!(positions.len(), 3);
    assert_eq!(pool.len(), 3);
    for (i, strand) in positions.iter().enumerate() {
        assert_eq!(strand.len(), 6);
        assert_eq!(strand[0], Vec3::new(i as f32, 0.0, 0.0));
        assert_eq!(strand, &pool.strand(i).positions());
    }
}

#[test]
fn moving_a_root_only_affects_its_strand() {
    let mut pool = three_strands(StrandConfig::new()).build().unwrap();
    let untouched = pool.strand(2).positions();

    pool.move_root(1, Vec3::new(1.0, 2.0, 0.0));
    pool.tick(1.0 / 60.0, &mut NoOpStepObserver).unwrap();

    assert_eq!(pool.strand(1).root(), Vec3::new(1.0, 2.0, 0.0));
    assert_eq!(pool.strand(0).root(), Vec3::zero());
    // A strand hanging straight down is already at rest.
    for (a, b) in pool.strand(2).positions().iter().zip(&untouched) {
        assert!(a.distance(*b) < 1e-2);
    }
}

#[test]
fn collider_can_be_replaced_between_ticks() {
    let mut pool = three_strands(StrandConfig::new())
        .with_collider(SphereCollider::new(Vec3::new(0.0, -100.0, 0.0), 1.0).unwrap())
        .build()
        .unwrap();

    pool.set_collider(Some(SphereCollider::new(Vec3::new(1.0, -6.0, 0.0), 2.0).unwrap()));
    let report = pool.tick(1.0 / 60.0, &mut NoOpStepObserver).unwrap();
    assert!(report.is_clean());
    let sphere = pool.collider().copied().unwrap();
    assert_eq!(sphere.center(), Vec3::new(1.0, -6.0, 0.0));
    assert_eq!(sphere.radius(), 2.0);
}

#[test]
fn sub_normal_time_step_is_rejected_before_anything_moves() {
    let config = StrandConfig::new().with_particle_count(5);
    let mut pool = three_strands(config).build().unwrap();
    let before = pool.positions();

    assert_eq!(pool.tick(1e-39, &mut NoOpStepObserver), Err(StrandError::InvalidTimeStep));
    assert_eq!(pool.positions(), before);
    for strand in pool.strands() {
        assert!(strand.particles().iter().all(|p| p.velocity().is_finite()));
    }

    let report = pool.tick(1.0 / 60.0, &mut NoOpStepObserver).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.committed, 3);
}

#[test]
fn f64_pool_accepts_steps_below_f32_range() {
    let mut pool = PoolBuilder::new(StrandConfig::<f64>::new().with_particle_count(5))
        .with_strand(Vec3::zero(), StrandLayout::default())
        .build()
        .unwrap();
    let report = pool.tick(1e-39, &mut NoOpStepObserver).unwrap();
    assert!(report.is_clean());
    assert!(pool.strand(0).particles().iter().all(|p| p.velocity().is_finite()));
}

#[test]
fn scalp_layout_builds_a_clean_pool() {
    let center = Vec3::new(0.0f32, 0.0, 0.0);
    let roots = scalp_roots(center, 2.0, 64, 1.2);
    assert_eq!(roots.len(), 64);

    let mut pool = PoolBuilder::new(StrandConfig::new().with_particle_count(8).with_rest_length(0.3))
        .with_collider(SphereCollider::new(center, 2.0).unwrap())
        .with_strands(roots.iter().map(|r| (r.root, StrandLayout::Straight { direction: r.normal })))
        .build()
        .unwrap();

    for _ in 0..120 {
        let report = pool.tick(1.0 / 60.0, &mut NoOpStepObserver).unwrap();
        assert!(report.is_clean());
    }
    for (strand, root) in pool.strands().iter().zip(&roots) {
        assert_eq!(strand.root(), root.root);
        assert!(strand.positions().iter().all(|p| p.is_finite()));
    }
}

#[test]
fn empty_pool_ticks() {
    let mut pool = PoolBuilder::new(StrandConfig::<f64>::new()).build().unwrap();
    assert!(pool.is_empty());
    let report = pool.tick(1.0 / 60.0, &mut NoOpStepObserver).unwrap();
    assert_eq!(report.committed, 0);
    assert!(report.is_clean());
    assert!(pool.positions().is_empty());
}
