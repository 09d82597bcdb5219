//! Scene graph module
//!
//! Manages the node hierarchy and its components:
//! - Node: scene node (parent/child links and transform)
//! - Transform: TRS with cached matrices
//! - Scene: container for nodes, meshes and lights
//! - Camera, Light, Environment: what the host draws around the model
//! - Mesh / MorphTargets: per-mesh blend-shape influences

pub mod camera;
pub mod environment;
pub mod light;
pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use camera::{Camera, ProjectionType};
pub use environment::{Environment, Fog, GridHelper, GroundPlane};
pub use light::{Light, LightKind, color_from_hex};
pub use mesh::{MAX_MORPH_TARGETS, Mesh, MorphTargets};
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct LightKey;
}
