//! Filesystem primitives for Scaffold Manager
//!
//! Provides normalized path handling, atomic write operations, binary
//! classification, and content checksums for the synchronization engine.

pub mod binary;
pub mod checksum;
pub mod error;
pub mod io;
pub mod path;

pub use binary::{BINARY_EXTENSIONS, is_binary_path};
pub use checksum::compute_content_checksum;
pub use error::{Error, Result};
pub use path::NormalizedPath;
