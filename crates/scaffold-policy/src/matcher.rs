//! Glob pattern matching, isolated from rule composition

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

/// A compiled glob pattern.
///
/// Patterns are compiled once at rule-table construction and matched against
/// template-relative paths (forward slashes). Matching follows the engine's
/// conventions: dotfiles match plain wildcards, and `**` spans directories.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Pattern,
    raw: String,
}

impl Matcher {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] when the pattern fails to compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = Pattern::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            raw: pattern.to_string(),
        })
    }

    /// Match a template-relative path against this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.pattern.matches_with(path, options)
    }

    /// The original pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
