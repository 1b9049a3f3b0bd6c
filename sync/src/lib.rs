pub mod backend;
pub mod body;
pub mod constants;
pub mod debug;
pub mod engine;
pub mod error;
pub mod owner;
pub mod pose_cache;
pub mod registry;
pub mod reproject;
pub mod scene;
pub mod types;

pub use backend::{PhysicsConfig, PhysicsWorld, rapier3d};
pub use body::{BodyDef, BodyKind, ColliderShapeDef, collider_from_def, rigid_body_from_def};
pub use constants::{DEFAULT_DENSITY, GRAVITY_MPS2, OVERRIDE_EPSILON};
pub use debug::{BodyStyles, DebugColor, LineStyle, RenderContext, WorldTransformGuard};
pub use engine::{FrameReport, SyncEngine};
pub use error::SyncError;
pub use owner::{OwnerId, TransformOwner};
pub use pose_cache::{
    position_overridden, rotation_closeness, rotation_overridden, same_hemisphere,
};
pub use registry::{BodyId, Mapping};
pub use reproject::reproject;
pub use scene::SceneNode;
pub use types::{Iso, Mat4, Quat, Vec3, WorldPose, compose_local};
