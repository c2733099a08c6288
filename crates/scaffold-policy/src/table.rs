//! Ordered rule table and the policy resolver

use tracing::trace;

use crate::error::Result;
use crate::matcher::Matcher;
use crate::policy::{PartialPolicy, Policy};

/// One pattern / partial-policy pair.
#[derive(Debug, Clone)]
struct TableRule {
    matcher: Matcher,
    policy: PartialPolicy,
}

/// Ordered pattern-to-policy mapping driving per-file decisions.
///
/// The table is loaded once per process and never mutated afterwards;
/// callers typically wrap it in an `Arc`. Declaration order is significant:
/// [`RuleTable::resolve`] folds every matching rule left to right, later
/// matches overriding earlier fields on conflict.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<TableRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, builder style.
    ///
    /// # Errors
    ///
    /// Fails when the glob pattern does not compile.
    pub fn with_rule(mut self, pattern: &str, policy: PartialPolicy) -> Result<Self> {
        self.push(pattern, policy)?;
        Ok(self)
    }

    /// Append a rule.
    pub fn push(&mut self, pattern: &str, policy: PartialPolicy) -> Result<()> {
        self.rules.push(TableRule {
            matcher: Matcher::new(pattern)?,
            policy,
        });
        Ok(())
    }

    /// Resolve the policy for a template-relative path.
    ///
    /// Pure and side-effect-free: identical path and table produce an
    /// identical policy on every call, and the table may be shared across
    /// concurrent resolutions of independent files. Zero matching rules is
    /// not an error; the defaults apply.
    pub fn resolve(&self, path: &str) -> Policy {
        let mut policy = Policy::default();
        for rule in &self.rules {
            if rule.matcher.matches(path) {
                trace!(path, pattern = rule.matcher.as_str(), "rule matched");
                rule.policy.apply_to(&mut policy);
                policy.rule = Some(rule.matcher.as_str().to_string());
            }
        }
        policy
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
