//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;
use tracing::trace;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename so a reader can never observe a partially
/// written destination. The temp file lives in the destination directory to
/// guarantee the rename stays on one filesystem, and holds an advisory lock
/// while being filled.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    // Scoped so the handle is closed before the rename on every exit path.
    {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

        let write_result = temp_file
            .write_all(content)
            .and_then(|_| temp_file.sync_all());

        if let Err(e) = write_result {
            let _ = FileExt::unlock(&temp_file);
            drop(temp_file);
            let _ = fs::remove_file(&temp_path);
            return Err(Error::io(&temp_path, e));
        }

        FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;
    }

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;
    trace!(path = %path, bytes = content.len(), "atomic write complete");
    Ok(())
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Ensure a directory exists, creating intermediate components as needed.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Validate a destination root and return its canonical form.
///
/// Every pipeline write is joined onto the value returned here, which keeps
/// relocated destinations from escaping the target tree.
pub fn validate_root(root: &NormalizedPath) -> Result<NormalizedPath> {
    let native = root.to_native();
    if !native.is_dir() {
        return Err(Error::InvalidRoot { path: native });
    }
    let canonical = dunce::canonicalize(&native).map_err(|e| Error::io(&native, e))?;
    Ok(NormalizedPath::new(canonical))
}

/// Check that `path` resolves under `root`.
///
/// `path` does not need to exist; the check is purely lexical on the
/// normalized form, so `..` components are rejected outright.
pub fn is_under_root(path: &NormalizedPath, root: &NormalizedPath) -> bool {
    if path.as_str().split('/').any(|c| c == "..") {
        return false;
    }
    path.relative_to(root).is_some()
}
