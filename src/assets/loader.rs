use std::sync::Arc;

use crate::assets::io::{AssetReader, FileAssetReader};
use crate::assets::loaders::GltfLoader;
use crate::assets::prefab::Prefab;
use crate::errors::{MarionetteError, Result};

/// Loads model files through an [`AssetReader`].
///
/// Cheap to clone; every clone shares the same reader.
#[derive(Clone)]
pub struct AssetLoader {
    reader: Arc<dyn AssetReader>,
}

impl AssetLoader {
    pub fn new(reader: impl AssetReader + 'static) -> Self {
        Self {
            reader: Arc::new(reader),
        }
    }

    /// Loader reading from a directory on disk.
    pub fn from_dir(root: impl AsRef<std::path::Path>) -> Self {
        Self::new(FileAssetReader::new(root))
    }

    #[must_use]
    pub fn reader(&self) -> &Arc<dyn AssetReader> {
        &self.reader
    }

    /// Reads and decodes `path` on the calling thread.
    pub fn load(&self, path: &str) -> Result<Prefab> {
        GltfLoader::load(path, self.reader.as_ref())
    }

    /// Starts decoding `path` on a worker thread.
    ///
    /// On wasm32 there are no threads; the load runs before this returns and
    /// the ticket is already complete.
    #[must_use]
    pub fn load_in_background(&self, path: &str) -> LoadTicket {
        let (tx, rx) = flume::bounded(1);
        let path = path.to_string();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let reader = Arc::clone(&self.reader);
            let worker_path = path.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("marionette-load:{path}"))
                .spawn(move || {
                    let result = GltfLoader::load(&worker_path, reader.as_ref());
                    // The ticket may have been dropped (viewer unmounted).
                    let _ = tx.send(result);
                });
            if let Err(e) = spawned {
                log::error!("Failed to spawn loader thread for {path}: {e}");
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let _ = tx.send(self.load(&path));
        }

        log::info!("Loading {path}");
        LoadTicket { path, rx }
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader").finish_non_exhaustive()
    }
}

/// Pending result of [`AssetLoader::load_in_background`].
#[derive(Debug)]
pub struct LoadTicket {
    path: String,
    rx: flume::Receiver<Result<Prefab>>,
}

impl LoadTicket {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Non-blocking check. Returns `Some` exactly once, when the worker has
    /// reported; a worker that died without reporting yields
    /// [`MarionetteError::LoaderDisconnected`].
    pub fn poll(&self) -> Option<Result<Prefab>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => {
                Some(Err(MarionetteError::LoaderDisconnected(self.path.clone())))
            }
        }
    }

    /// Blocks the calling thread until the worker reports.
    pub fn wait_blocking(self) -> Result<Prefab> {
        self.rx.recv()?
    }

    /// Resolves when the worker reports.
    pub async fn wait(self) -> Result<Prefab> {
        self.rx
            .recv_async()
            .await
            .map_err(|e| MarionetteError::LoaderDisconnected(format!("{}: {e}", self.path)))?
    }
}
