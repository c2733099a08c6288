//! Error types for scaffold-fs

use std::path::PathBuf;

/// Result type for scaffold-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scaffold-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Path {path} escapes the destination root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Destination root {path} is not a directory")]
    InvalidRoot { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
