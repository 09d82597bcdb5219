use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::environment::Environment;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::{LightKey, MeshKey, NodeHandle};

/// Scene graph.
///
/// Pure data layer: node hierarchy, mesh and light components, and the
/// environment description handed to the render backend.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, Mesh>,
    pub lights: SlotMap<LightKey, Light>,

    pub environment: Environment,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            environment: Environment::default(),
        }
    }

    // ========================================================================
    // Node management
    // ========================================================================

    /// Inserts a detached node (not a root, no parent).
    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.nodes.insert(Node::new(name))
    }

    /// Adds a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Re-parents `child` under `parent`, detaching it from wherever it was.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || !self.nodes.contains_key(parent) {
            return;
        }
        let Some(old_parent) = self.nodes.get(child).map(Node::parent) else {
            return;
        };

        if let Some(old) = old_parent {
            if let Some(p) = self.nodes.get_mut(old) {
                p.children.retain(|c| *c != child);
            }
        } else {
            self.root_nodes.retain(|r| *r != child);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Removes a node and its whole subtree, including owned meshes.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let subtree = self.collect_subtree(handle);
        if subtree.is_empty() {
            return;
        }

        let parent = self.nodes.get(handle).and_then(Node::parent);
        match parent {
            Some(p) => {
                if let Some(p) = self.nodes.get_mut(p) {
                    p.children.retain(|c| *c != handle);
                }
            }
            None => self.root_nodes.retain(|r| *r != handle),
        }

        for h in subtree {
            if let Some(node) = self.nodes.remove(h)
                && let Some(mesh) = node.mesh
            {
                self.meshes.remove(mesh);
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    /// Depth-first pre-order list of `root` and all its descendants.
    #[must_use]
    pub fn collect_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            out.push(h);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in depth-first order under `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.collect_subtree(root)
            .into_iter()
            .find(|h| self.nodes.get(*h).is_some_and(|n| n.name == name))
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Attaches a mesh component to a node.
    pub fn set_node_mesh(&mut self, node: NodeHandle, mesh: MeshKey) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.mesh = Some(mesh);
        }
    }

    #[must_use]
    pub fn mesh_of(&self, node: NodeHandle) -> Option<MeshKey> {
        self.nodes.get(node).and_then(|n| n.mesh)
    }

    /// Every `(node, mesh)` pair under `root` whose mesh has morph targets.
    #[must_use]
    pub fn morph_meshes(&self, root: NodeHandle) -> Vec<(NodeHandle, MeshKey)> {
        self.collect_subtree(root)
            .into_iter()
            .filter_map(|h| {
                let key = self.mesh_of(h)?;
                self.meshes
                    .get(key)
                    .filter(|m| m.has_morph_targets())
                    .map(|_| (h, key))
            })
            .collect()
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Recomputes world matrices for every root subtree.
    pub fn update_matrix_world(&mut self) {
        let roots = self.root_nodes.clone();
        for root in roots {
            self.update_subtree_with_parent(root, Affine3A::IDENTITY, false);
        }
    }

    /// Recomputes world matrices below `root`, starting from its parent's
    /// current world matrix.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        let parent_world = self
            .nodes
            .get(root)
            .and_then(Node::parent)
            .and_then(|p| self.nodes.get(p))
            .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);
        self.update_subtree_with_parent(root, parent_world, true);
    }

    fn update_subtree_with_parent(
        &mut self,
        root: NodeHandle,
        parent_world: Affine3A,
        force: bool,
    ) {
        let mut stack = vec![(root, parent_world, force)];
        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * node.transform.local_matrix;
                node.transform.set_world_matrix(world);
            }
            let world = node.transform.world_matrix;
            for child in &node.children {
                stack.push((*child, world, changed));
            }
        }
    }
}
