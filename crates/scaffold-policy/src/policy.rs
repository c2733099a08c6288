//! Policy types controlling how a single file is written

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::record::FileRecord;

/// A rule returning a replacement path component for a file.
///
/// Used for both rename (new basename) and relocate (new destination
/// directory). The rule may fail; the pipeline falls back to the original
/// component and logs the failure.
pub type PathRule = Arc<dyn Fn(&FileRecord) -> std::result::Result<String, String> + Send + Sync>;

/// A policy field that is either a literal value or a dynamic rule.
///
/// The resolver stores the variant untouched; callers evaluate it uniformly
/// through [`PolicyValue::evaluate`] once a [`FileRecord`] is available.
#[derive(Clone)]
pub enum PolicyValue<T> {
    /// A fixed value
    Literal(T),
    /// A rule computed from the file record at use time
    Rule(Arc<dyn Fn(&FileRecord) -> std::result::Result<T, String> + Send + Sync>),
}

impl<T: Clone> PolicyValue<T> {
    /// Wrap an infallible function of the file record.
    pub fn rule(f: impl Fn(&FileRecord) -> T + Send + Sync + 'static) -> Self {
        Self::Rule(Arc::new(move |record| Ok(f(record))))
    }

    /// Wrap a fallible function of the file record.
    pub fn fallible(
        f: impl Fn(&FileRecord) -> std::result::Result<T, String> + Send + Sync + 'static,
    ) -> Self {
        Self::Rule(Arc::new(f))
    }

    /// Evaluate against a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dynamic`] when a rule variant fails.
    pub fn evaluate(&self, record: &FileRecord) -> Result<T> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Rule(f) => f(record).map_err(|message| Error::dynamic(&record.relative, message)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PolicyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Rule(_) => f.write_str("Rule(<fn>)"),
        }
    }
}

impl<T> From<T> for PolicyValue<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

/// Fully resolved per-file policy.
///
/// Produced by [`crate::RuleTable::resolve`]; never constructed by hand
/// outside of tests.
#[derive(Clone)]
pub struct Policy {
    /// Whether an existing destination may be replaced
    pub overwrite: PolicyValue<bool>,
    /// Whether the file is suppressed entirely; wins over everything else
    pub skip: PolicyValue<bool>,
    /// Whether JSON config merging applies
    pub merge: bool,
    /// Whether the designated manifest transform applies
    pub transform: bool,
    /// Optional basename replacement
    pub rename: Option<PathRule>,
    /// Optional destination-directory replacement
    pub relocate: Option<PathRule>,
    /// Literal placeholder substitutions for textual content
    pub template_vars: Option<BTreeMap<String, String>>,
    /// Pattern of the last rule that matched, for logging
    pub rule: Option<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            overwrite: PolicyValue::Literal(true),
            skip: PolicyValue::Literal(false),
            merge: false,
            transform: false,
            rename: None,
            relocate: None,
            template_vars: None,
            rule: None,
        }
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("overwrite", &self.overwrite)
            .field("skip", &self.skip)
            .field("merge", &self.merge)
            .field("transform", &self.transform)
            .field("rename", &self.rename.as_ref().map(|_| "<fn>"))
            .field("relocate", &self.relocate.as_ref().map(|_| "<fn>"))
            .field("template_vars", &self.template_vars)
            .field("rule", &self.rule)
            .finish()
    }
}

/// Partial policy attached to one rule-table pattern.
///
/// Only the fields a rule sets participate in the shallow merge; unset
/// fields leave the accumulator untouched.
#[derive(Clone, Default)]
pub struct PartialPolicy {
    overwrite: Option<PolicyValue<bool>>,
    skip: Option<PolicyValue<bool>>,
    merge: Option<bool>,
    transform: Option<bool>,
    rename: Option<PathRule>,
    relocate: Option<PathRule>,
    template_vars: Option<BTreeMap<String, String>>,
}

impl PartialPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a literal overwrite flag.
    pub fn overwrite(mut self, value: bool) -> Self {
        self.overwrite = Some(PolicyValue::Literal(value));
        self
    }

    /// Set overwrite from a dynamic rule.
    pub fn overwrite_when(mut self, f: impl Fn(&FileRecord) -> bool + Send + Sync + 'static) -> Self {
        self.overwrite = Some(PolicyValue::rule(f));
        self
    }

    /// Set a literal skip flag.
    pub fn skip(mut self, value: bool) -> Self {
        self.skip = Some(PolicyValue::Literal(value));
        self
    }

    /// Set skip from a dynamic rule.
    pub fn skip_when(mut self, f: impl Fn(&FileRecord) -> bool + Send + Sync + 'static) -> Self {
        self.skip = Some(PolicyValue::rule(f));
        self
    }

    /// Set the overwrite field from a prebuilt policy value.
    pub fn overwrite_policy(mut self, value: PolicyValue<bool>) -> Self {
        self.overwrite = Some(value);
        self
    }

    /// Set the skip field from a prebuilt policy value.
    pub fn skip_policy(mut self, value: PolicyValue<bool>) -> Self {
        self.skip = Some(value);
        self
    }

    pub fn merge(mut self, value: bool) -> Self {
        self.merge = Some(value);
        self
    }

    pub fn transform(mut self, value: bool) -> Self {
        self.transform = Some(value);
        self
    }

    /// Rename the file via a rule returning the new basename.
    pub fn rename(mut self, f: impl Fn(&FileRecord) -> String + Send + Sync + 'static) -> Self {
        self.rename = Some(Arc::new(move |record| Ok(f(record))));
        self
    }

    /// Relocate the file via a rule returning the new destination directory.
    pub fn relocate(mut self, f: impl Fn(&FileRecord) -> String + Send + Sync + 'static) -> Self {
        self.relocate = Some(Arc::new(move |record| Ok(f(record))));
        self
    }

    /// Attach literal placeholder substitutions.
    pub fn template_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.template_vars = Some(vars);
        self
    }

    /// Shallow-merge this partial onto an accumulated policy.
    pub(crate) fn apply_to(&self, policy: &mut Policy) {
        if let Some(overwrite) = &self.overwrite {
            policy.overwrite = overwrite.clone();
        }
        if let Some(skip) = &self.skip {
            policy.skip = skip.clone();
        }
        if let Some(merge) = self.merge {
            policy.merge = merge;
        }
        if let Some(transform) = self.transform {
            policy.transform = transform;
        }
        if let Some(rename) = &self.rename {
            policy.rename = Some(rename.clone());
        }
        if let Some(relocate) = &self.relocate {
            policy.relocate = Some(relocate.clone());
        }
        if let Some(vars) = &self.template_vars {
            policy.template_vars = Some(vars.clone());
        }
    }
}

impl fmt::Debug for PartialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialPolicy")
            .field("overwrite", &self.overwrite)
            .field("skip", &self.skip)
            .field("merge", &self.merge)
            .field("transform", &self.transform)
            .field("rename", &self.rename.as_ref().map(|_| "<fn>"))
            .field("relocate", &self.relocate.as_ref().map(|_| "<fn>"))
            .field("template_vars", &self.template_vars)
            .finish()
    }
}
