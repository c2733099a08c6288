//! Error types for scaffold-policy

/// Result type for scaffold-policy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scaffold-policy operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid glob pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Dynamic policy rule failed for {file}: {message}")]
    Dynamic { file: String, message: String },
}

impl Error {
    pub fn dynamic(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dynamic {
            file: file.into(),
            message: message.into(),
        }
    }
}
