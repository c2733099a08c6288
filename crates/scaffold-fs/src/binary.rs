//! Binary file classification by extension

use crate::NormalizedPath;

/// Extensions treated as binary content.
///
/// Files matching this allowlist bypass templating, transformation, and
/// merging entirely; their bytes are copied verbatim. Matching is
/// case-insensitive.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "ico", "woff", "woff2", "ttf", "otf", "eot",
    "pdf", "zip", "tar", "gz", "mp3", "mp4", "avi", "mov",
];

/// Check whether a path names a binary file.
pub fn is_binary_path(path: &NormalizedPath) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            BINARY_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
