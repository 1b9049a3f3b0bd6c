use rapier3d::prelude::RigidBodyHandle;

use crate::error::SyncError;
use crate::owner::{OwnerId, TransformOwner};

/// Stable identity of a registered body, assigned at registration.
///
/// Ids increase monotonically and are never reused by the same registry, so a stale id can
/// never alias a newer body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// One body paired with exactly one transform owner.
pub struct Mapping<O> {
    pub id: BodyId,
    pub handle: RigidBodyHandle,
    pub owner: O,
    /// Set the first time the debug visualizer draws this body; never cleared.
    pub debug_draw: bool,
}

/// Insertion-ordered set of body/owner pairings.
///
/// Order only affects iteration determinism. Lookups are linear: the registry is expected
/// to hold at most a few thousand bodies and is iterated in full every frame anyway.
pub struct BodyRegistry<O> {
    mappings: Vec<Mapping<O>>,
    next_id: u32,
}

impl<O> Default for BodyRegistry<O> {
    fn default() -> Self {
        Self {
            mappings: Vec::new(),
            next_id: 0,
        }
    }
}

impl<O: TransformOwner> BodyRegistry<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail if `owner_id` is already paired with a body.
    pub fn ensure_unregistered(&self, owner_id: OwnerId) -> Result<(), SyncError> {
        if self.position_of(owner_id).is_some() {
            return Err(SyncError::DuplicateOwner(owner_id));
        }
        Ok(())
    }

    /// Append a mapping for a body already inserted into the backend.
    ///
    /// The caller checks [`ensure_unregistered`](Self::ensure_unregistered) before creating
    /// the body, so this cannot fail halfway through a registration.
    pub fn insert(&mut self, handle: RigidBodyHandle, owner: O) -> BodyId {
        debug_assert!(self.position_of(owner.owner_id()).is_none());

        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.mappings.push(Mapping {
            id,
            handle,
            owner,
            debug_draw: false,
        });
        id
    }

    /// Remove the mapping of `owner_id`, keeping the order of the remaining mappings.
    pub fn remove(&mut self, owner_id: OwnerId) -> Result<Mapping<O>, SyncError> {
        let index = self
            .position_of(owner_id)
            .ok_or(SyncError::UnknownOwner(owner_id))?;
        Ok(self.mappings.remove(index))
    }

    pub fn get(&self, id: BodyId) -> Option<&Mapping<O>> {
        self.mappings.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping<O>> {
        self.mappings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Mapping<O>> {
        self.mappings.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn position_of(&self, owner_id: OwnerId) -> Option<usize> {
        self.mappings
            .iter()
            .position(|m| m.owner.owner_id() == owner_id)
    }
}
