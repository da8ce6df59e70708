//! Follow-The-Leader strand simulation for hair and ropes.
//!
//! `strands` advances many independent particle chains hanging from roots,
//! under gravity and damping, against one spherical collider, with pointer
//! grabbing and permanent anchoring. It is the simulation core only: the host
//! renders committed positions and turns pointer input into rays.
//!
//! # Per tick, per strand
//!
//! 1. **External forces**: gravity into velocity, velocity into prediction
//! 2. **Constraint sweeps**: Follow-The-Leader distance relaxation, then root,
//!    grab and anchor pins, repeated `iterations` times
//! 3. **Integration**: velocity from the position delta plus a damped reaction
//!    term, commit, non-finite ticks rolled back
//! 4. **Collision**: segments pushed out of the sphere
//!
//! # Features
//!
//! - **Generic scalar**: `f32` or `f64` through the [`Float`] trait
//! - **Layouts**: straight and helical rest shapes, scalp root placement
//! - **Grabbing**: closest-particle pick, tuft capture, drag velocity estimate
//! - **Anchors**: permanent pins created on release
//! - **Observable**: per-phase hooks via [`StepObserver`], `log` integration
//! - **`no_std` compatible**: needs only `alloc`

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod layout;
pub mod constraint;
pub mod solver;
pub mod integrator;
pub mod collision;
pub mod strand;
pub mod anchor;
pub mod grab;
pub mod pool;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use particle::{Committed, Particle, ParticleRef, Predictor};
pub use layout::{scalp_roots, RootPlacement, StrandLayout};
pub use constraint::{DistanceConstraint, PinConstraint, PinSource};
pub use solver::ConstraintSolver;
pub use collision::SphereCollider;
pub use strand::Strand;
pub use anchor::{Anchor, AnchorSet};
pub use grab::{GrabController, GrabState, Ray, Release};
pub use pool::{PoolBuilder, StrandPool, TickReport};
pub use config::{GrabConfig, StrandConfig};
pub use observer::{LogObserver, NoOpStepObserver, StepObserver};
pub use error::StrandError;
