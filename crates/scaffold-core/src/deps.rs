//! One-directional dependency synchronization
//!
//! Copies dependency entries from a source manifest into a destination
//! manifest, strictly additively: destination-only entries are never
//! touched or removed. Invoked once per run; the caller uses the returned
//! report to trigger a dependent install step exactly once, never per file.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use scaffold_fs::{NormalizedPath, io};

use crate::error::{Error, Result};

/// Manifest groups synchronized independently of each other.
const DEPENDENCY_GROUPS: [&str; 2] = ["dependencies", "devDependencies"];

/// Result of one dependency sync invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether the destination manifest was rewritten
    pub changed: bool,
    /// `name@version` entries added or updated, in source order
    pub new_dependencies: Vec<String>,
}

impl SyncReport {
    fn unchanged() -> Self {
        Self {
            changed: false,
            new_dependencies: Vec::new(),
        }
    }
}

/// Synchronize dependency groups from `source` into `dest`.
///
/// For each group, every source entry not in `ignore` that is absent from
/// the destination or carries a different version is written into the
/// destination. Version ranges are compared as opaque strings. The
/// destination manifest is rewritten atomically with unrelated fields and
/// key order preserved, and only when something actually changed.
///
/// # Errors
///
/// An unreadable or malformed manifest is fatal to this operation only;
/// file-copy work already completed in the same run remains valid.
pub fn sync_dependencies(
    source: &NormalizedPath,
    dest: &NormalizedPath,
    ignore: &BTreeSet<String>,
) -> Result<SyncReport> {
    let source_manifest = read_manifest(source)?;
    let mut dest_manifest = read_manifest(dest)?;

    let mut report = SyncReport::unchanged();

    for group in DEPENDENCY_GROUPS {
        let Some(source_group) = source_manifest.get(group).and_then(Value::as_object) else {
            continue;
        };

        // Collect first so an empty or fully ignored group never creates
        // the group object in the destination.
        let additions: Vec<(String, Value)> = {
            let dest_group = dest_manifest.get(group).and_then(Value::as_object);
            source_group
                .iter()
                .filter(|(name, _)| !ignore.contains(name.as_str()))
                .filter(|(name, version)| {
                    dest_group.and_then(|g| g.get(name.as_str())) != Some(version)
                })
                .map(|(name, version)| (name.clone(), version.clone()))
                .collect()
        };

        if additions.is_empty() {
            continue;
        }

        let dest_group = dest_manifest
            .entry(group)
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(dest_group) = dest_group.as_object_mut() else {
            return Err(Error::ManifestShape {
                path: dest.to_native(),
            });
        };

        for (name, version) in additions {
            debug!(group, name, version = %version_label(&version), "syncing dependency");
            report
                .new_dependencies
                .push(format!("{}@{}", name, version_label(&version)));
            dest_group.insert(name, version);
        }
    }

    report.changed = !report.new_dependencies.is_empty();

    if report.changed {
        let rendered = format!(
            "{}\n",
            serde_json::to_string_pretty(&Value::Object(dest_manifest))?
        );
        io::write_text(dest, &rendered)?;
        info!(
            dest = %dest,
            count = report.new_dependencies.len(),
            "dependency manifest updated"
        );
    }

    Ok(report)
}

fn read_manifest(path: &NormalizedPath) -> Result<Map<String, Value>> {
    let content = io::read_text(path).map_err(|e| Error::ManifestRead {
        path: path.to_native(),
        message: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| Error::ManifestRead {
        path: path.to_native(),
        message: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::ManifestShape {
            path: path.to_native(),
        }),
    }
}

fn version_label(version: &Value) -> String {
    match version {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
