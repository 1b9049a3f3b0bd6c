//! Minimal hierarchical scene node implementing [`TransformOwner`].
//!
//! A `SceneNode` is a cheap, clonable handle (`Rc<RefCell<..>>`): the engine keeps one clone
//! in its registry while the game keeps others, and both observe the same local matrix.
//! World (final) transforms are composed on demand by walking the parent chain, so a
//! parent moved by gameplay is immediately visible in its children's world pose.

use std::cell::RefCell;
use std::rc::Rc;

use crate::owner::{OwnerId, TransformOwner};
use crate::types::{Mat4, WorldPose};

struct NodeData {
    id: OwnerId,
    local: Mat4,
    parent: Option<SceneNode>,
}

#[derive(Clone)]
pub struct SceneNode(Rc<RefCell<NodeData>>);

impl SceneNode {
    /// Create a root node.
    pub fn new(id: OwnerId, local: Mat4) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            id,
            local,
            parent: None,
        })))
    }

    /// Create a node whose local transform is relative to `parent`.
    pub fn with_parent(id: OwnerId, local: Mat4, parent: &SceneNode) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            id,
            local,
            parent: Some(parent.clone()),
        })))
    }

    pub fn id(&self) -> OwnerId {
        self.0.borrow().id
    }

    pub fn local(&self) -> Mat4 {
        self.0.borrow().local
    }

    pub fn set_local(&self, local: Mat4) {
        self.0.borrow_mut().local = local;
    }

    pub fn parent(&self) -> Option<SceneNode> {
        self.0.borrow().parent.clone()
    }

    /// Fully composed transform: `parent_world * local`.
    pub fn world_matrix(&self) -> Mat4 {
        let node = self.0.borrow();
        match &node.parent {
            Some(parent) => parent.world_matrix() * node.local,
            None => node.local,
        }
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("SceneNode")
            .field("id", &node.id)
            .field("local", &node.local)
            .field("has_parent", &node.parent.is_some())
            .finish()
    }
}

impl TransformOwner for SceneNode {
    fn owner_id(&self) -> OwnerId {
        self.id()
    }

    fn world_pose(&self) -> WorldPose {
        WorldPose::from_matrix(&self.world_matrix())
    }

    fn local_transform(&self) -> Mat4 {
        self.local()
    }

    fn set_local_transform(&mut self, local: Mat4) {
        self.set_local(local);
    }
}
