//! Per-invocation run context
//!
//! Every operation receives an explicit context constructed once per
//! invocation. Nothing is cached behind the caller's back, and two contexts
//! never share mutable state.

use std::sync::Arc;

use serde_json::Value;

use scaffold_content::{ManifestTransform, MergeMode};
use scaffold_fs::{NormalizedPath, io};
use scaffold_policy::{FileRecord, RuleTable};

use crate::error::Result;

/// Everything one synchronization run needs.
///
/// Cheap to clone; the rule table is shared behind an `Arc` and loaded once
/// per process.
#[derive(Debug, Clone)]
pub struct RunContext {
    source_root: NormalizedPath,
    dest_root: NormalizedPath,
    rules: Arc<RuleTable>,
    merge_mode: MergeMode,
    transform_target: Option<String>,
    transform: ManifestTransform,
}

impl RunContext {
    /// Create a context for one run.
    ///
    /// The destination root is validated and canonicalized up front; every
    /// later write is checked against it.
    ///
    /// # Errors
    ///
    /// Fails when either root is not an existing directory.
    pub fn new(
        source_root: impl Into<NormalizedPath>,
        dest_root: impl Into<NormalizedPath>,
        rules: Arc<RuleTable>,
    ) -> Result<Self> {
        let source_root = io::validate_root(&source_root.into())?;
        let dest_root = io::validate_root(&dest_root.into())?;
        Ok(Self {
            source_root,
            dest_root,
            rules,
            merge_mode: MergeMode::default(),
            transform_target: None,
            transform: ManifestTransform::default(),
        })
    }

    /// Select how destination-only keys behave during config merges.
    pub fn with_merge_mode(mut self, mode: MergeMode) -> Self {
        self.merge_mode = mode;
        self
    }

    /// Designate the transform target and the project configuration that
    /// feeds the manifest field projection.
    pub fn with_transform(mut self, target: impl Into<String>, project_config: &Value) -> Self {
        self.transform_target = Some(target.into());
        self.transform = ManifestTransform::from_project_config(project_config);
        self
    }

    pub fn source_root(&self) -> &NormalizedPath {
        &self.source_root
    }

    pub fn dest_root(&self) -> &NormalizedPath {
        &self.dest_root
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    pub fn transform(&self) -> &ManifestTransform {
        &self.transform
    }

    /// Whether `relative` is the designated transform target.
    pub fn is_transform_target(&self, relative: &str) -> bool {
        self.transform_target.as_deref() == Some(relative)
    }

    /// Build the record for an absolute changed path, if it lies inside the
    /// source tree.
    pub fn record_for(&self, changed: &NormalizedPath) -> Option<FileRecord> {
        FileRecord::from_source(&self.source_root, changed)
    }
}
