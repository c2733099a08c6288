//! Per-file record handed to policy rules

use scaffold_fs::NormalizedPath;

/// The facts a dynamic policy rule may inspect about one template file.
///
/// A record is derived once per file per run from the template root and the
/// file's absolute source path; rename and relocate rules receive it and
/// return a new basename or destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path of the file inside the template tree
    pub source: NormalizedPath,
    /// Path relative to the template root (forward slashes, no leading slash)
    pub relative: String,
    /// Basename of the file
    pub name: String,
    /// Directory portion of `relative`; empty for root-level files
    pub destination_dir: String,
}

impl FileRecord {
    /// Build a record for `source` located under `source_root`.
    ///
    /// Returns `None` when the path does not live under the root, which the
    /// watch driver uses to ignore foreign change events.
    pub fn from_source(source_root: &NormalizedPath, source: &NormalizedPath) -> Option<Self> {
        let relative = source.relative_to(source_root)?;
        if relative.is_empty() {
            return None;
        }
        Some(Self::from_relative(source_root, &relative))
    }

    /// Build a record from a template-relative path.
    pub fn from_relative(source_root: &NormalizedPath, relative: &str) -> Self {
        let relative = relative.trim_matches('/').to_string();
        let (destination_dir, name) = match relative.rfind('/') {
            Some(idx) => (relative[..idx].to_string(), relative[idx + 1..].to_string()),
            None => (String::new(), relative.clone()),
        };
        Self {
            source: source_root.join(&relative),
            relative,
            name,
            destination_dir,
        }
    }
}
