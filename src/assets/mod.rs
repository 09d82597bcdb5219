//! Asset loading
//!
//! - [`AssetReader`]: where bytes come from (disk directory or memory)
//! - [`GltfLoader`]: glTF/GLB decoding into a [`Prefab`]
//! - [`AssetLoader`]: synchronous and background loading
//! - [`Prefab`]: thread-safe model data, instantiated into a scene

pub mod io;
pub mod loader;
pub mod loaders;
pub mod prefab;

pub use io::{AssetReader, FileAssetReader, MemoryAssetReader, decode_data_uri, resolve_relative};
pub use loader::{AssetLoader, LoadTicket};
pub use loaders::GltfLoader;
pub use prefab::{ModelInstance, Prefab, PrefabMesh, PrefabNode};
