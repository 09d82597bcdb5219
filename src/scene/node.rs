use glam::Affine3A;
use smallvec::SmallVec;

use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeHandle};

/// A scene node.
///
/// Keeps the data traversed every frame (hierarchy and transform) plus an
/// optional mesh component. Names are what animation tracks and the panel
/// binder resolve against, so every node has one.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: SmallVec<[NodeHandle; 4]>,

    pub transform: Transform,
    pub mesh: Option<MeshKey>,
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: SmallVec::new(),
            transform: Transform::new(),
            mesh: None,
            visible: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}
