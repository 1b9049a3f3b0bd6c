use crate::types::{Mat4, WorldPose};

/// Globally-unique identifier of a transform owner (an entity with a scene transform).
///
/// The registry uses it to enforce that an owner is paired with at most one body, and
/// [`SyncEngine::unregister`](crate::SyncEngine::unregister) takes it to find the pairing.
pub type OwnerId = u64;

/// Capability exposed by an entity whose transform is driven by a rigid body.
///
/// The engine never owns the entity itself: implementors are expected to be handles
/// (shared pointers, ECS entity references, ...) so the rest of the game keeps seeing the
/// writes made through [`set_local_transform`](TransformOwner::set_local_transform).
///
/// # Contract
/// - `world_pose()` is the pose of the fully composed (final) transform, i.e. the local
///   matrix composed with every parent up the hierarchy.
/// - The rotation returned by `world_pose()` must be finite and normalized.
/// - `owner_id()` must be stable for the lifetime of the registration.
pub trait TransformOwner {
    fn owner_id(&self) -> OwnerId;

    /// Current world (final) position and rotation.
    fn world_pose(&self) -> WorldPose;

    /// Current parent-relative transform.
    fn local_transform(&self) -> Mat4;

    /// Replace the parent-relative transform. This is the only mutation the engine performs
    /// on game-side state.
    fn set_local_transform(&mut self, local: Mat4);
}
