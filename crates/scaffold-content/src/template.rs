//! Literal placeholder substitution
//!
//! Placeholders are plain substrings (conventionally `%%% name %%%`)
//! replaced verbatim. No escaping, no loops, no expression language.

use std::collections::BTreeMap;

use serde_json::Value;

/// Substitute every declared placeholder in `content`.
///
/// Map keys are the full literal placeholder strings; every occurrence is
/// replaced. A placeholder that does not occur is simply ignored.
pub fn apply_placeholders(content: &str, vars: &BTreeMap<String, String>) -> String {
    let mut output = content.to_string();
    for (placeholder, replacement) in vars {
        output = output.replace(placeholder.as_str(), replacement);
    }
    output
}

/// Build the conventional placeholder map for scaffold templates.
///
/// Covers the replacement set bundled entry points conventionally carry:
/// version, environment, and the serialized app and manager configuration
/// objects.
pub fn standard_placeholders(
    version: &str,
    environment: &str,
    app_config: &Value,
    manager_config: &Value,
) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("%%% version %%%".to_string(), version.to_string());
    vars.insert("%%% environment %%%".to_string(), environment.to_string());
    vars.insert(
        "%%% appConfiguration %%%".to_string(),
        app_config.to_string(),
    );
    vars.insert(
        "%%% managerConfiguration %%%".to_string(),
        manager_config.to_string(),
    );
    vars
}
