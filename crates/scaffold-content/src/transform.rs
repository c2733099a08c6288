//! App manifest field projection
//!
//! The designated transform target (typically the generated app manifest)
//! receives fields projected from the project's own configuration: the
//! brand name becomes the manifest's `name` (whitespace stripped) and
//! `displayName` (verbatim).

use serde_json::Value;

use crate::error::{Error, Result};

/// Field projection derived from project configuration.
#[derive(Debug, Clone, Default)]
pub struct ManifestTransform {
    brand_name: Option<String>,
}

impl ManifestTransform {
    /// Extract the projection from a project configuration tree.
    ///
    /// Reads `brand.name`; a missing or non-string value yields a no-op
    /// transform.
    pub fn from_project_config(config: &Value) -> Self {
        let brand_name = config
            .get("brand")
            .and_then(|brand| brand.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { brand_name }
    }

    /// Whether applying this transform would change anything.
    pub fn is_noop(&self) -> bool {
        self.brand_name.is_none()
    }

    /// Project the configured fields onto a parsed manifest.
    pub fn apply(&self, manifest: &mut Value) {
        let Some(brand_name) = &self.brand_name else {
            return;
        };
        let Some(object) = manifest.as_object_mut() else {
            return;
        };
        let compact: String = brand_name.chars().filter(|c| !c.is_whitespace()).collect();
        object.insert("name".to_string(), Value::String(compact));
        object.insert(
            "displayName".to_string(),
            Value::String(brand_name.clone()),
        );
    }
}

/// Transform manifest text, returning the re-serialized result.
///
/// # Errors
///
/// Fails when `content` is not valid JSON; the pipeline logs the failure
/// and continues with the original content.
pub fn transform_manifest(content: &str, transform: &ManifestTransform) -> Result<String> {
    let mut manifest: Value = serde_json::from_str(content)
        .map_err(|e| Error::parse("manifest", e.to_string()))?;
    transform.apply(&mut manifest);
    Ok(serde_json::to_string_pretty(&manifest)?)
}
