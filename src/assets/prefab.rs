use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::scene::transform::Transform;
use crate::scene::{Mesh, MorphTargets, Node, NodeHandle, Scene};

/// Mesh data a prefab node carries.
#[derive(Debug, Clone, Default)]
pub struct PrefabMesh {
    pub name: String,
    pub primitive_count: usize,
    pub morph_target_count: usize,
    /// From the mesh's `extras.targetNames`, when present.
    pub morph_target_names: Vec<String>,
    /// Default influences (`mesh.weights`), when present.
    pub morph_weights: Option<Vec<f32>>,
}

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone)]
pub struct PrefabNode {
    pub name: String,
    pub transform: Transform,
    /// Indices into `Prefab::nodes`.
    pub children_indices: Vec<usize>,
    pub mesh: Option<PrefabMesh>,
}

impl PrefabNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            children_indices: Vec::new(),
            mesh: None,
        }
    }
}

/// Prefab: the intermediate result of decoding a model file.
///
/// Thread-safe plain data with no scene handles, so it can be produced on a
/// worker thread and instantiated on the frame thread.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub nodes: Vec<PrefabNode>,
    pub root_indices: Vec<usize>,
    pub animations: Vec<Arc<AnimationClip>>,
}

/// A prefab placed into a scene.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub root: NodeHandle,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clip_names(&self) -> Vec<&str> {
        self.animations.iter().map(|c| c.name.as_str()).collect()
    }

    /// Creates a scene root named `root_name` and the prefab's hierarchy
    /// beneath it.
    pub fn instantiate(&self, scene: &mut Scene, root_name: &str) -> ModelInstance {
        let root = scene.add_node(Node::new(root_name));

        let handles: Vec<NodeHandle> = self
            .nodes
            .iter()
            .map(|prefab_node| {
                let handle = scene.create_node_with_name(&prefab_node.name);
                if let Some(node) = scene.get_node_mut(handle) {
                    node.transform = prefab_node.transform.clone();
                    node.transform.mark_dirty();
                }
                if let Some(mesh) = &prefab_node.mesh {
                    let morph = MorphTargets::new(
                        mesh.morph_target_count,
                        &mesh.morph_target_names,
                        mesh.morph_weights.as_deref(),
                    );
                    let mut engine_mesh = Mesh::new(&mesh.name).with_morph_targets(morph);
                    engine_mesh.primitive_count = mesh.primitive_count;
                    let key = scene.add_mesh(engine_mesh);
                    scene.set_node_mesh(handle, key);
                }
                handle
            })
            .collect();

        for (index, prefab_node) in self.nodes.iter().enumerate() {
            for &child in &prefab_node.children_indices {
                if let Some(&child_handle) = handles.get(child) {
                    scene.attach(child_handle, handles[index]);
                }
            }
        }

        for &index in &self.root_indices {
            if let Some(&handle) = handles.get(index) {
                scene.attach(handle, root);
            }
        }

        // Nodes unreachable from the default scene stay parentless.
        for handle in &handles {
            if scene.get_node(*handle).is_some_and(|n| n.parent().is_none()) {
                scene.remove_node(*handle);
            }
        }

        scene.update_subtree(root);

        ModelInstance {
            root,
            clips: self.animations.clone(),
        }
    }
}
