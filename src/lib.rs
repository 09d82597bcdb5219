#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod host;
pub mod panel;
pub mod scene;
pub mod viewer;

pub use animation::{
    ActionKey, AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode, MixerEvent,
};
pub use assets::{AssetLoader, AssetReader, FileAssetReader, GltfLoader, MemoryAssetReader, Prefab};
pub use errors::{MarionetteError, Result};
pub use host::{HeadlessBackend, OrbitControls, RenderBackend, SceneHost, Viewport};
pub use panel::DebugPanel;
pub use scene::{Camera, Light, Mesh, MorphTargets, Node, NodeHandle, Scene};
pub use viewer::{AnimationController, LoadStatus, Viewer, ViewerCommand, ViewerConfig, ViewerState};
