//! Per-frame synchronization between transform owners and the Rapier world.
//!
//! Each [`SyncEngine::advance_frame`] runs three phases in a fixed order on the calling
//! thread:
//!
//! 1. reconcile: detect external pose changes against the pose cache and push them into
//!    the bodies, then clear the cache;
//! 2. step: one blocking simulation step of `elapsed_seconds`;
//! 3. reproject: fold each body's world motion back into its owner's local transform and
//!    refill the cache with the post-step poses.
//!
//! The engine exclusively owns its registry, pose cache and backend. Nothing else may
//! mutate them except through registration.

use rapier3d::prelude::RigidBody;

use crate::backend::{PhysicsConfig, PhysicsWorld};
use crate::body::BodyDef;
use crate::debug::{
    BodyStyles, DebugDrawer, LineStyle, RenderContext, WorldTransformGuard, collider_pipeline,
};
use crate::error::SyncError;
use crate::owner::{OwnerId, TransformOwner};
use crate::pose_cache::{PoseCache, position_overridden, rotation_overridden};
use crate::registry::{BodyId, BodyRegistry, Mapping};
use crate::reproject::reproject;
use crate::types::WorldPose;

/// What happened during one [`SyncEngine::advance_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Number of mappings processed.
    pub bodies: usize,
    /// Bodies whose position was hard-overwritten from their owner before stepping.
    pub position_overrides: usize,
    /// Bodies whose rotation was hard-overwritten from their owner before stepping.
    pub rotation_overrides: usize,
}

pub struct SyncEngine<O: TransformOwner> {
    world: PhysicsWorld,
    registry: BodyRegistry<O>,
    cache: PoseCache,
    /// Owner world poses captured during reconciliation, indexed like the registry.
    originals: Vec<WorldPose>,
}

impl<O: TransformOwner> SyncEngine<O> {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            world: PhysicsWorld::new(config),
            registry: BodyRegistry::new(),
            cache: PoseCache::new(),
            originals: Vec::new(),
        }
    }

    /// Pair a new body built from `def` with `owner`.
    ///
    /// The body is created at the owner's current world pose and inserted into the
    /// simulation right away. The pose cache has no entry for it yet, so the next frame
    /// overrides it from the owner unconditionally.
    pub fn register(&mut self, def: &BodyDef, owner: O) -> Result<BodyId, SyncError> {
        let owner_id = owner.owner_id();
        self.registry.ensure_unregistered(owner_id)?;

        let handle = self.world.insert_body(def, &owner.world_pose());
        let id = self.registry.insert(handle, owner);
        log::debug!("registered owner {owner_id} as body {id:?} ({:?})", def.kind);
        Ok(id)
    }

    /// Remove the pairing of `owner_id`, its cached pose and its body (with colliders).
    ///
    /// Returns the owner handle that was held by the registry.
    pub fn unregister(&mut self, owner_id: OwnerId) -> Result<O, SyncError> {
        let Mapping { id, handle, owner, .. } = self.registry.remove(owner_id)?;
        self.cache.remove(id);
        if self.world.remove_body(handle).is_none() {
            log::warn!("body {id:?} of owner {owner_id} was already gone from the world");
        }
        log::debug!("unregistered owner {owner_id} (body {id:?})");
        Ok(owner)
    }

    /// Run one full frame: reconcile, step by `elapsed_seconds`, reproject.
    ///
    /// `elapsed_seconds` must be finite and non-negative; it is used as-is, with no clamping
    /// or sub-stepping.
    pub fn advance_frame(&mut self, elapsed_seconds: f32) -> Result<FrameReport, SyncError> {
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return Err(SyncError::InvalidTimeStep(elapsed_seconds));
        }

        let report = self.reconcile();
        self.world.step(elapsed_seconds);
        self.reproject_all();
        Ok(report)
    }

    /// Pre-step reconciliation: push external owner moves into the bodies.
    pub(crate) fn reconcile(&mut self) -> FrameReport {
        let mut report = FrameReport {
            bodies: self.registry.len(),
            ..FrameReport::default()
        };

        self.originals.clear();
        for mapping in self.registry.iter() {
            let current = mapping.owner.world_pose();
            self.originals.push(current);

            let cached = self.cache.get(mapping.id);

            if position_overridden(cached.map(|p| &p.position), &current.position) {
                log::trace!("body {:?}: position override", mapping.id);
                self.world.set_body_translation(mapping.handle, current.position);
                report.position_overrides += 1;
            }

            if rotation_overridden(cached.map(|p| &p.rotation), &current.rotation) {
                log::trace!("body {:?}: rotation override", mapping.id);
                self.world.set_body_rotation(mapping.handle, current.rotation);
                report.rotation_overrides += 1;
            }
        }

        self.cache.clear();
        report
    }

    /// Post-step reprojection: write body motion back into owners, refill the cache.
    pub(crate) fn reproject_all(&mut self) {
        for (mapping, original) in self.registry.iter_mut().zip(&self.originals) {
            let Some(new_pose) = self.world.body_pose(mapping.handle) else {
                continue;
            };

            let local = reproject(
                &mapping.owner.local_transform(),
                &original.rotation,
                &original.position,
                &new_pose.rotation,
                &new_pose.position,
            );
            mapping.owner.set_local_transform(local);

            self.cache.insert(mapping.id, new_pose);
        }
    }

    /// Draw every registered body's colliders if `ctx` is in the physics-debug pass.
    ///
    /// Returns the number of bodies drawn (summed over shader passes). Outside the debug pass
    /// this is a no-op: no geometry, no flag change, no world-transform change.
    pub fn render_debug<C: RenderContext + ?Sized>(&mut self, ctx: &mut C) -> usize {
        if !ctx.is_physics_debug_pass() {
            return 0;
        }

        let mut styles = BodyStyles::with_capacity(self.registry.len());
        for mapping in self.registry.iter_mut() {
            if !mapping.debug_draw {
                mapping.debug_draw = true;
                log::debug!("debug drawing enabled for body {:?}", mapping.id);
            }
            let inactive = self.world.is_body_inactive(mapping.handle);
            styles.insert(mapping.handle, LineStyle::from_inactive(inactive));
        }

        let mut guard = WorldTransformGuard::identity(ctx);
        let mut pipeline = collider_pipeline();
        let passes = guard.pass_count();

        for pass in 0..passes {
            guard.apply_pass(pass);
            let mut drawer = DebugDrawer::new(&mut *guard, &styles);
            pipeline.render_colliders(&mut drawer, self.world.bodies(), self.world.colliders());
        }

        passes * styles.len()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Mappings in registration order.
    pub fn mappings(&self) -> impl Iterator<Item = &Mapping<O>> {
        self.registry.iter()
    }

    pub fn mapping(&self, id: BodyId) -> Option<&Mapping<O>> {
        self.registry.get(id)
    }

    /// Current simulated world pose of a registered body.
    pub fn body_pose(&self, id: BodyId) -> Option<WorldPose> {
        self.registry
            .get(id)
            .and_then(|m| self.world.body_pose(m.handle))
    }

    /// Mutable access to a registered body, e.g. to set velocities or apply impulses.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let handle = self.registry.get(id)?.handle;
        self.world.body_mut(handle)
    }

    /// Pose committed for `id` at the end of the last frame.
    pub fn cached_pose(&self, id: BodyId) -> Option<&WorldPose> {
        self.cache.get(id)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn config(&self) -> &PhysicsConfig {
        self.world.config()
    }
}

impl<O: TransformOwner> Default for SyncEngine<O> {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
