use std::path::{Path, PathBuf};

use base64::Engine;
use rustc_hash::FxHashMap;

use crate::errors::{MarionetteError, Result};

/// Source of raw asset bytes.
///
/// Viewers request assets by web-style paths (`/RobotExpressive.glb`); a
/// reader maps those onto wherever the files actually live.
pub trait AssetReader: Send + Sync {
    fn read_bytes(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// A file path uses its parent directory as the root.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Maps `/like.glb` and `like.glb` alike onto `<root>/like.glb`.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> PathBuf {
        self.root_path.join(uri.trim_start_matches(['/', '\\']))
    }
}

impl AssetReader for FileAssetReader {
    fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.resolve(uri);
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                MarionetteError::AssetNotFound(path.display().to_string())
            }
            _ => MarionetteError::IoError(e),
        })
    }
}

/// Serves assets from memory, keyed by their path with any leading `/`
/// removed.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetReader {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: &str, bytes: Vec<u8>) {
        self.files.insert(normalize(uri).to_string(), bytes);
    }

    #[must_use]
    pub fn with_file(mut self, uri: &str, bytes: Vec<u8>) -> Self {
        self.insert(uri, bytes);
        self
    }
}

impl AssetReader for MemoryAssetReader {
    fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.files
            .get(normalize(uri))
            .cloned()
            .ok_or_else(|| MarionetteError::AssetNotFound(uri.to_string()))
    }
}

fn normalize(uri: &str) -> &str {
    uri.trim_start_matches(['/', '\\'])
}

/// Joins a relative resource URI (a glTF buffer) onto the directory of the
/// document that referenced it.
#[must_use]
pub fn resolve_relative(document_uri: &str, relative: &str) -> String {
    match document_uri.rfind(['/', '\\']) {
        Some(idx) => format!("{}/{}", &document_uri[..idx], relative),
        None => relative.to_string(),
    }
}

/// Decodes a `data:[<mime>];base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| MarionetteError::DataUriError("missing 'data:' scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MarionetteError::DataUriError("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(MarionetteError::DataUriError(format!(
            "unsupported encoding in '{header}'"
        )));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}
