use rapier3d::prelude::*;

use crate::constants::DEFAULT_DENSITY;
use crate::types::{Vec3, WorldPose};

/// How the solver treats a registered body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Fully simulated: gravity, contacts and the external override path all apply.
    Dynamic,
    /// Never moved by the solver. Only an external override moves it.
    Fixed,
    /// Moved by the game, not by forces. Pushes dynamic bodies out of its way.
    KinematicPositionBased,
}

/// Canonical, schema-agnostic definition of a body to register.
///
/// The world pose is not part of the definition: the body is created at the owner's world
/// pose at registration time.
#[derive(Clone, Debug)]
pub struct BodyDef {
    pub kind: BodyKind,
    /// Collider shape parameters. The collider is attached with identity local transform.
    pub shape: ColliderShapeDef,
    /// Collider density (kg/m^3). Dynamic bodies need a non-zero mass to fall.
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl BodyDef {
    pub fn new(kind: BodyKind, shape: ColliderShapeDef) -> Self {
        Self {
            kind,
            shape,
            density: DEFAULT_DENSITY,
            friction: 0.5,
            restitution: 0.0,
        }
    }

    pub fn dynamic(shape: ColliderShapeDef) -> Self {
        Self::new(BodyKind::Dynamic, shape)
    }

    pub fn fixed(shape: ColliderShapeDef) -> Self {
        Self::new(BodyKind::Fixed, shape)
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

/// Supported collider shapes, expressed in the body's local frame.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) with local normal `+Y`.
    ///
    /// In Rapier a half-space is infinite; any "X/Z size" is purely a rendering concern.
    /// Only meaningful on fixed bodies.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },

    /// Y-aligned cone (meters).
    ConeY { radius: f32, half_height: f32 },

    /// Rounded cuboid (meters).
    ///
    /// `border_radius` rounds all edges/corners.
    RoundCuboid {
        half_extents: Vec3,
        border_radius: f32,
    },
}

/// Build the Rapier rigid body for `def`, placed at `pose`.
pub fn rigid_body_from_def(def: &BodyDef, pose: &WorldPose) -> RigidBody {
    let builder = match def.kind {
        BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        BodyKind::Fixed => RigidBodyBuilder::fixed(),
        BodyKind::KinematicPositionBased => RigidBodyBuilder::kinematic_position_based(),
    };
    builder.pose(pose.iso()).build()
}

/// Build the Rapier collider for `def`.
///
/// Friction and restitution are mixed with `combine_rule` against whatever they touch.
/// Rapier resolves a pair with the higher-priority rule of the two colliders, so every
/// collider of the world must carry the same rule for it to take effect.
pub fn collider_from_def(def: &BodyDef, combine_rule: CoefficientCombineRule) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => ColliderBuilder::halfspace(Vec3::y_axis())
            .translation(Vec3::y() * *offset_along_normal),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),

        ColliderShapeDef::ConeY {
            radius,
            half_height,
        } => ColliderBuilder::cone(*half_height, *radius),

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        ),
    };

    builder
        .density(def.density)
        .friction(def.friction)
        .restitution(def.restitution)
        .friction_combine_rule(combine_rule)
        .restitution_combine_rule(combine_rule)
        .build()
}
