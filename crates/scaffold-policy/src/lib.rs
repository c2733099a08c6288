//! Rule table and per-file policy resolution for Scaffold Manager
//!
//! This crate decides *how* a single template file should be written into a
//! target project. A [`RuleTable`] holds an ordered sequence of glob
//! pattern / partial-policy pairs; [`RuleTable::resolve`] folds every
//! matching rule onto a default [`Policy`], later matches overriding
//! earlier fields. Resolution is pure: dynamic fields are stored as tagged
//! [`PolicyValue`] variants and evaluated by the caller at use time.

pub mod error;
pub mod matcher;
pub mod policy;
pub mod record;
pub mod table;

pub use error::{Error, Result};
pub use matcher::Matcher;
pub use policy::{PartialPolicy, PathRule, Policy, PolicyValue};
pub use record::FileRecord;
pub use table::RuleTable;
