//! Rapier-based collision/dynamics backend.
//!
//! Owns every Rapier structure needed to simulate the registered bodies: body/collider sets,
//! broad-phase BVH, narrow-phase contact graph, island manager, joint sets and the CCD
//! solver. The synchronization engine only ever talks to Rapier through this type.
//!
//! Design notes
//! - Configured once: gravity, speculative contacts and the material combine rule are fixed
//!   at construction.
//! - Single-threaded: the crate does not enable Rapier's `parallel` feature, so a step runs
//!   entirely on the calling thread.

// Re-export Rapier so downstream crates can build shapes/queries without depending on
// `rapier3d` directly.
pub use rapier3d;

use rapier3d::prelude::*;

use crate::body::{BodyDef, collider_from_def, rigid_body_from_def};
use crate::constants::GRAVITY_MPS2;
use crate::types::{Quat, Vec3, WorldPose};

/// Construction-time backend settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// World-space gravity acceleration (m/s^2).
    pub gravity: Vec3,
    /// Generate contacts slightly before shapes touch so fast bodies don't tunnel as easily.
    /// Disabling it sets the prediction distance to zero.
    pub speculative_contacts: bool,
    /// How friction/restitution of two touching colliders are mixed.
    pub combine_rule: CoefficientCombineRule,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -GRAVITY_MPS2, 0.0),
            speculative_contacts: true,
            combine_rule: CoefficientCombineRule::Min,
        }
    }
}

/// In-memory Rapier world stepped once per frame by the synchronization engine.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        if !config.speculative_contacts {
            integration_parameters.normalized_prediction_distance = 0.0;
        }

        Self {
            config,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Insert a body built from `def` at `pose`, with its collider attached.
    pub fn insert_body(&mut self, def: &BodyDef, pose: &WorldPose) -> RigidBodyHandle {
        let handle = self.bodies.insert(rigid_body_from_def(def, pose));
        let collider = collider_from_def(def, self.config.combine_rule);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Remove a body and every collider attached to it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        )
    }

    /// Current world pose of a body, `None` if the handle is stale.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<WorldPose> {
        self.bodies
            .get(handle)
            .map(|rb| WorldPose::new(*rb.translation(), *rb.rotation()))
    }

    /// Hard-overwrite a body's world translation.
    pub fn set_body_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_translation(position, true);
        }
    }

    /// Hard-overwrite a body's world rotation.
    pub fn set_body_rotation(&mut self, handle: RigidBodyHandle, rotation: Quat) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_rotation(rotation, true);
        }
    }

    /// Static or inactive: fixed bodies and bodies the island manager put to sleep.
    pub fn is_body_inactive(&self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .get(handle)
            .is_some_and(|rb| rb.is_fixed() || rb.is_sleeping())
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    /// Advance the simulation by exactly one step of `dt` seconds.
    ///
    /// This is a blocking call with no cancellation. Callers that want to survive frame
    /// hitches must clamp `dt` themselves.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        // Using default hooks/events (none).
        let hooks = ();
        let events = ();

        self.pipeline.step(
            &self.config.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &hooks,
            &events,
        );
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
