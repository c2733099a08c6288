//! Error types for scaffold-core

use std::path::PathBuf;

/// Result type for scaffold-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scaffold-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A manifest required by dependency sync is missing or unreadable
    #[error("Manifest not readable at {path}: {message}")]
    ManifestRead { path: PathBuf, message: String },

    /// A manifest parsed but is not a JSON object
    #[error("Manifest at {path} is not a JSON object")]
    ManifestShape { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from scaffold-fs
    #[error(transparent)]
    Fs(#[from] scaffold_fs::Error),

    /// Watcher error from notify
    #[error(transparent)]
    Watch(#[from] notify::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
