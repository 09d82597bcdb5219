use crate::animation::binding::{PropertyBinding, TargetPath};
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node under `root` by name.
    /// Tracks whose node is missing (or whose weights target has no morph
    /// targets) are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let Some(node_handle) = scene.find_node_by_name(root, &track.meta.node_name) else {
                log::debug!(
                    "Clip '{}': no node named '{}', track skipped",
                    clip.name,
                    track.meta.node_name
                );
                continue;
            };

            if track.meta.target == TargetPath::Weights {
                let has_targets = scene
                    .mesh_of(node_handle)
                    .and_then(|key| scene.meshes.get(key))
                    .is_some_and(crate::scene::Mesh::has_morph_targets);
                if !has_targets {
                    continue;
                }
            }

            bindings.push(PropertyBinding {
                track_index,
                node_handle,
                target: track.meta.target,
            });
        }

        bindings
    }
}
