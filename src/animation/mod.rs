//! Animation module
//!
//! Keyframe tracks and clips decoded from glTF, actions wrapping a clip with
//! playback state, and the mixer that advances, crossfades and blends them
//! into the scene.

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{ActionEvent, AnimationAction, LoopMode, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{ActionKey, AnimationMixer, MixerEvent};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::{Interpolatable, MorphWeightData};
