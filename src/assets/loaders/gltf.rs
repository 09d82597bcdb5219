use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::Deserialize;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::animation::values::MorphWeightData;
use crate::assets::io::{AssetReader, decode_data_uri, resolve_relative};
use crate::assets::prefab::{Prefab, PrefabMesh, PrefabNode};
use crate::errors::{MarionetteError, Result};
use crate::scene::MAX_MORPH_TARGETS;
use crate::scene::transform::Transform;

/// Mesh-level `extras` written by common exporters (Blender, three.js).
#[derive(Debug, Default, Deserialize)]
struct MeshExtras {
    #[serde(rename = "targetNames", default)]
    target_names: Vec<String>,
}

/// Decodes glTF 2.0 (`.gltf` or `.glb`) into a [`Prefab`].
///
/// Only what the viewer consumes is decoded: hierarchy, TRS transforms,
/// mesh morph-target metadata and animation clips. Geometry and materials
/// are left to the render backend.
pub struct GltfLoader<'a> {
    reader: &'a dyn AssetReader,
    document_uri: String,
}

impl<'a> GltfLoader<'a> {
    /// Reads `uri` through `reader` and decodes it.
    pub fn load(uri: &str, reader: &'a dyn AssetReader) -> Result<Prefab> {
        let bytes = reader.read_bytes(uri)?;
        Self::load_from_slice(&bytes, uri, reader)
    }

    /// Decodes an in-memory document. External buffers are resolved
    /// relative to `uri` through `reader`.
    pub fn load_from_slice(bytes: &[u8], uri: &str, reader: &'a dyn AssetReader) -> Result<Prefab> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;

        let loader = Self {
            reader,
            document_uri: uri.to_string(),
        };

        let required: Vec<_> = gltf.extensions_required().collect();
        if !required.is_empty() {
            log::warn!("{uri}: requires extensions {required:?}; decoding what is understood");
        }

        let buffers = loader.load_buffers(&gltf)?;

        let mut prefab = Prefab::new();
        prefab.nodes = gltf.nodes().map(|node| Self::load_node(&node)).collect();
        prefab.root_indices = Self::root_indices(&gltf);
        prefab.animations = Self::load_animations(&gltf, &buffers)?
            .into_iter()
            .map(Arc::new)
            .collect();

        log::info!(
            "Decoded {uri}: {} nodes, {} clips",
            prefab.nodes.len(),
            prefab.animations.len()
        );

        Ok(prefab)
    }

    // --- Helpers ---

    fn load_buffers(&self, gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .as_deref()
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| MarionetteError::GltfError("Missing GLB binary chunk".into()))?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
                gltf::buffer::Source::Uri(uri) => self
                    .reader
                    .read_bytes(&resolve_relative(&self.document_uri, uri))?,
            };

            if data.len() < buffer.length() {
                return Err(MarionetteError::GltfError(format!(
                    "Buffer {} is {} bytes, expected at least {}",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                )));
            }
            buffer_data.push(data);
        }
        Ok(buffer_data)
    }

    fn node_name(node: &gltf::Node) -> String {
        node.name()
            .map_or_else(|| format!("Node_{}", node.index()), ToString::to_string)
    }

    fn load_node(node: &gltf::Node) -> PrefabNode {
        let mut prefab_node = PrefabNode::new(Self::node_name(node));

        let (t, r, s) = node.transform().decomposed();
        prefab_node.transform =
            Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s));
        prefab_node.children_indices = node.children().map(|c| c.index()).collect();
        prefab_node.mesh = node.mesh().map(|mesh| Self::load_mesh(&mesh));

        prefab_node
    }

    fn load_mesh(mesh: &gltf::Mesh) -> PrefabMesh {
        let name = mesh
            .name()
            .map_or_else(|| format!("Mesh_{}", mesh.index()), ToString::to_string);

        let primitive_count = mesh.primitives().count();
        let morph_target_count = mesh
            .primitives()
            .map(|p| p.morph_targets().count())
            .max()
            .unwrap_or(0);
        if morph_target_count > MAX_MORPH_TARGETS {
            log::warn!(
                "Mesh '{name}' has {morph_target_count} morph targets; only the first {MAX_MORPH_TARGETS} are used"
            );
        }

        let morph_target_names = match mesh.extras() {
            Some(raw) => match serde_json::from_str::<MeshExtras>(raw.get()) {
                Ok(extras) => extras.target_names,
                Err(e) => {
                    log::warn!("Mesh '{name}': unreadable extras ({e})");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        PrefabMesh {
            name,
            primitive_count,
            morph_target_count,
            morph_target_names,
            morph_weights: mesh.weights().map(<[f32]>::to_vec),
        }
    }

    fn root_indices(gltf: &gltf::Gltf) -> Vec<usize> {
        if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
            return scene.nodes().map(|n| n.index()).collect();
        }

        // No scenes: every node that is nobody's child is a root.
        let mut is_child = vec![false; gltf.nodes().len()];
        for node in gltf.nodes() {
            for child in node.children() {
                if let Some(flag) = is_child.get_mut(child.index()) {
                    *flag = true;
                }
            }
        }
        is_child
            .iter()
            .enumerate()
            .filter_map(|(i, child)| (!child).then_some(i))
            .collect()
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<AnimationClip>> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let clip_name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), ToString::to_string);
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let node_name = Self::node_name(&target.node());

                let Some(inputs) = reader.read_inputs() else {
                    log::warn!("Clip '{clip_name}': channel without input times skipped");
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let Some(outputs) = reader.read_outputs() else {
                    log::warn!("Clip '{clip_name}': channel without output values skipped");
                    continue;
                };

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                use gltf::animation::util::ReadOutputs;
                let (target_path, data) = match outputs {
                    ReadOutputs::Translations(iter) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::Rotations(iter) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::Scales(iter) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::MorphTargetWeights(iter) => {
                        let flat: Vec<f32> = iter.into_f32().collect();
                        let values = Self::split_morph_weights(&flat, times.len(), interpolation);
                        (
                            TargetPath::Weights,
                            TrackData::MorphWeights(KeyframeTrack::new(times, values, interpolation)),
                        )
                    }
                };

                if !data.is_well_formed() {
                    log::warn!(
                        "Clip '{clip_name}': malformed {target_path:?} track for '{node_name}' skipped"
                    );
                    continue;
                }

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            animations.push(AnimationClip::new(clip_name, tracks));
        }

        Ok(animations)
    }

    /// Morph weight outputs are flat: `targets` floats per output element.
    fn split_morph_weights(
        flat: &[f32],
        key_count: usize,
        interpolation: InterpolationMode,
    ) -> Vec<MorphWeightData> {
        let elements = match interpolation {
            InterpolationMode::CubicSpline => key_count * 3,
            _ => key_count,
        };
        if elements == 0 {
            return Vec::new();
        }
        let per_element = flat.len() / elements;
        if per_element == 0 {
            return Vec::new();
        }
        flat.chunks_exact(per_element)
            .take(elements)
            .map(MorphWeightData::from_slice)
            .collect()
    }
}
