use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::animation::action::{ActionEvent, AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::animation::values::{Interpolatable, MorphWeightData};
use crate::errors::{MarionetteError, Result};
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionKey;
}

/// Notifications produced while advancing the mixer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixerEvent {
    Finished { action: ActionKey, clip: String },
    Loop { action: ActionKey, clip: String },
}

impl MixerEvent {
    #[must_use]
    pub fn action(&self) -> ActionKey {
        match self {
            MixerEvent::Finished { action, .. } | MixerEvent::Loop { action, .. } => *action,
        }
    }
}

/// Blended value of one animated property for the current frame.
#[derive(Debug, Clone, Copy)]
enum PropertyValue {
    Vector3(Vec3),
    Quaternion(Quat),
    Weights(MorphWeightData),
}

impl PropertyValue {
    fn from_track(value: TrackValue) -> Self {
        match value {
            TrackValue::Vector3(v) => Self::Vector3(v),
            TrackValue::Quaternion(q) => Self::Quaternion(q),
            TrackValue::MorphWeights(w) => Self::Weights(*w),
        }
    }

    /// Moves `self` towards `other` by `t` (lerp / slerp).
    fn mix(self, other: Self, t: f32) -> Self {
        match (self, other) {
            (Self::Vector3(a), Self::Vector3(b)) => Self::Vector3(a.lerp(b, t)),
            (Self::Quaternion(a), Self::Quaternion(b)) => Self::Quaternion(a.slerp(b, t)),
            (Self::Weights(a), Self::Weights(b)) => {
                Self::Weights(MorphWeightData::interpolate_linear(a, b, t))
            }
            (a, _) => a,
        }
    }
}

/// Running weighted sum of one property.
#[derive(Debug, Clone, Copy)]
struct PropertyAccumulator {
    value: PropertyValue,
    weight: f32,
}

impl PropertyAccumulator {
    fn accumulate(slot: &mut Option<Self>, value: PropertyValue, weight: f32) {
        match slot {
            None => *slot = Some(Self { value, weight }),
            Some(acc) => {
                let total = acc.weight + weight;
                if total > 0.0 {
                    acc.value = acc.value.mix(value, weight / total);
                }
                acc.weight = total;
            }
        }
    }
}

type PropertyKey = (NodeHandle, TargetPath);

/// Blends and advances the actions of one model.
///
/// Holds one action per clip. Each frame every scheduled action advances its
/// weight fade and clock, then the weighted samples of all contributing
/// actions are blended per property and written to the scene. When the
/// total weight of a property is below one, the remainder comes from the
/// pose captured when the property was first bound. A property that no
/// action samples any more is written back to that pose once.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: SlotMap<ActionKey, AnimationAction>,
    order: Vec<ActionKey>,
    by_name: FxHashMap<String, ActionKey>,
    rest_pose: FxHashMap<PropertyKey, PropertyValue>,
    /// Properties written from samples on the previous update.
    live: FxHashSet<PropertyKey>,

    pub time: f32,
    pub time_scale: f32,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: SlotMap::with_key(),
            order: Vec::new(),
            by_name: FxHashMap::default(),
            rest_pose: FxHashMap::default(),
            live: FxHashSet::default(),
            time: 0.0,
            time_scale: 1.0,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Returns the action for `clip`, creating and binding it on first use.
    pub fn clip_action(&mut self, clip: Arc<AnimationClip>, scene: &Scene) -> ActionKey {
        if let Some(&key) = self.by_name.get(&clip.name) {
            return key;
        }

        let mut action = AnimationAction::new(clip);
        action.bindings = Binder::bind(scene, self.root, action.clip());
        for binding in &action.bindings {
            let key = (binding.node_handle, binding.target);
            if self.rest_pose.contains_key(&key) {
                continue;
            }
            if let Some(value) = Self::read_property(scene, key) {
                self.rest_pose.insert(key, value);
            }
        }

        self.add_action(action)
    }

    /// Adds an already-bound action. A clip name already present is
    /// replaced in the name index but the old action stays addressable.
    pub fn add_action(&mut self, action: AnimationAction) -> ActionKey {
        let name = action.name().to_string();
        let key = self.actions.insert(action);
        self.order.push(key);
        self.by_name.insert(name, key);
        key
    }

    #[must_use]
    pub fn action_key(&self, name: &str) -> Option<ActionKey> {
        self.by_name.get(name).copied()
    }

    /// Looks up an action key by clip name, failing with
    /// [`MarionetteError::ClipNotFound`].
    pub fn require(&self, name: &str) -> Result<ActionKey> {
        self.action_key(name)
            .ok_or_else(|| MarionetteError::ClipNotFound(name.to_string()))
    }

    #[must_use]
    pub fn action(&self, key: ActionKey) -> Option<&AnimationAction> {
        self.actions.get(key)
    }

    pub fn action_mut(&mut self, key: ActionKey) -> Option<&mut AnimationAction> {
        self.actions.get_mut(key)
    }

    #[must_use]
    pub fn action_by_name(&self, name: &str) -> Option<&AnimationAction> {
        self.action_key(name).and_then(|k| self.actions.get(k))
    }

    pub fn action_by_name_mut(&mut self, name: &str) -> Option<&mut AnimationAction> {
        let key = self.action_key(name)?;
        self.actions.get_mut(key)
    }

    /// Clip names in load order.
    #[must_use]
    pub fn list_animations(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|k| self.actions.get(*k))
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Actions currently contributing a non-zero weight.
    #[must_use]
    pub fn contributing_actions(&self) -> Vec<ActionKey> {
        self.order
            .iter()
            .copied()
            .filter(|k| self.actions.get(*k).is_some_and(|a| a.effective_weight() > 0.0))
            .collect()
    }

    /// Resets and plays the named clip at full weight.
    pub fn play(&mut self, name: &str) -> Result<ActionKey> {
        let key = self.require(name)?;
        if let Some(action) = self.actions.get_mut(key) {
            action.reset().set_effective_weight(1.0).play();
        }
        Ok(key)
    }

    pub fn stop_all(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Advances all scheduled actions by `dt` seconds and writes the blended
    /// pose into `scene`. Returns the events raised during this step.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) -> SmallVec<[MixerEvent; 2]> {
        let dt = dt * self.time_scale;
        self.time += dt;

        let mut events = SmallVec::new();
        let mut blend: FxHashMap<PropertyKey, Option<PropertyAccumulator>> = FxHashMap::default();

        for &key in &self.order {
            let Some(action) = self.actions.get_mut(key) else {
                continue;
            };
            if !action.is_scheduled() {
                continue;
            }

            action.update_weight(dt);
            if let Some(event) = action.update_time(dt) {
                let clip = action.name().to_string();
                events.push(match event {
                    ActionEvent::Finished => MixerEvent::Finished { action: key, clip },
                    ActionEvent::Loop => MixerEvent::Loop { action: key, clip },
                });
            }

            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let binding = &action.bindings[i];
                let property = (binding.node_handle, binding.target);
                let track_index = binding.track_index;
                let Some(value) = action.sample_track(track_index).map(PropertyValue::from_track) else {
                    continue;
                };
                PropertyAccumulator::accumulate(blend.entry(property).or_default(), value, weight);
            }
        }

        let mut live = FxHashSet::default();
        for (property, acc) in blend {
            let Some(mut acc) = acc else {
                continue;
            };
            if acc.weight < 1.0
                && let Some(rest) = self.rest_pose.get(&property)
            {
                acc.value = acc.value.mix(*rest, 1.0 - acc.weight);
            }
            Self::write_property(scene, property, acc.value);
            live.insert(property);
        }

        for property in self.live.difference(&live) {
            if let Some(rest) = self.rest_pose.get(property) {
                Self::write_property(scene, *property, *rest);
            }
        }
        self.live = live;

        events
    }

    fn read_property(scene: &Scene, (node, target): PropertyKey) -> Option<PropertyValue> {
        let n = scene.get_node(node)?;
        Some(match target {
            TargetPath::Translation => PropertyValue::Vector3(n.transform.position),
            TargetPath::Rotation => PropertyValue::Quaternion(n.transform.rotation),
            TargetPath::Scale => PropertyValue::Vector3(n.transform.scale),
            TargetPath::Weights => {
                let mesh = scene.meshes.get(n.mesh?)?;
                PropertyValue::Weights(mesh.morph_targets.to_weights())
            }
        })
    }

    fn write_property(scene: &mut Scene, (node, target): PropertyKey, value: PropertyValue) {
        match (target, value) {
            (TargetPath::Translation, PropertyValue::Vector3(v)) => {
                if let Some(n) = scene.get_node_mut(node) {
                    n.transform.position = v;
                }
            }
            (TargetPath::Scale, PropertyValue::Vector3(v)) => {
                if let Some(n) = scene.get_node_mut(node) {
                    n.transform.scale = v;
                }
            }
            (TargetPath::Rotation, PropertyValue::Quaternion(q)) => {
                if let Some(n) = scene.get_node_mut(node) {
                    n.transform.rotation = q.normalize();
                }
            }
            (TargetPath::Weights, PropertyValue::Weights(w)) => {
                if let Some(key) = scene.mesh_of(node)
                    && let Some(mesh) = scene.meshes.get_mut(key)
                {
                    mesh.morph_targets.set_from_weights(&w);
                }
            }
            _ => {}
        }
    }
}
