//! SHA-256 checksum utilities
//!
//! A single canonical checksum format (`sha256:<hex>`). The pipeline
//! compares raw content for idempotence and records the checksum of every
//! written file in its logs; no history file is kept.

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}
