//! Error Types
//!
//! This module defines the error types used throughout the viewer.
//!
//! # Overview
//!
//! The main error type [`MarionetteError`] covers all failure modes including:
//! - Asset loading and glTF decoding errors
//! - Named lookups that do not resolve (clips, nodes, meshes)
//! - Configuration errors
//! - Background loader failures
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MarionetteError>`.
//!
//! ```rust,ignore
//! use marionette::errors::{MarionetteError, Result};
//!
//! fn load_asset() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for Marionette.
#[derive(Error, Debug)]
pub enum MarionetteError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Asset index out of bounds.
    #[error("Asset index out of bounds: {context} (index: {index})")]
    AssetIndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// No animation clip with this name was loaded.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),

    /// No scene node with this name exists under the model root.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The node exists but carries no mesh with morph targets.
    #[error("Node '{0}' has no morph targets")]
    NoMorphTargets(String),

    /// The name is not one of the controller's base states.
    #[error("Not a base state: {0}")]
    NotAState(String),

    /// The name is not one of the controller's emotes.
    #[error("Not an emote: {0}")]
    NotAnEmote(String),

    /// The command needs the model, which has not finished loading.
    #[error("Model not loaded yet")]
    ModelNotLoaded,

    /// The mesh handle no longer refers to a live mesh.
    #[error("Mesh handle is stale or invalid")]
    InvalidMesh,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value is out of range.
    #[error("Invalid config value for {field}: {message}")]
    InvalidConfig {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    // ========================================================================
    // Async & Threading Errors
    // ========================================================================
    /// The model load completed with an error (already logged).
    #[error("Model load failed: {0}")]
    LoadFailed(String),

    /// The background loader dropped its channel before reporting.
    #[error("Loader channel disconnected: {0}")]
    LoaderDisconnected(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<gltf::Error> for MarionetteError {
    fn from(err: gltf::Error) -> Self {
        MarionetteError::GltfError(err.to_string())
    }
}

impl From<flume::RecvError> for MarionetteError {
    fn from(err: flume::RecvError) -> Self {
        MarionetteError::LoaderDisconnected(err.to_string())
    }
}

/// Alias for `Result<T, MarionetteError>`.
pub type Result<T> = std::result::Result<T, MarionetteError>;
