//! Config merging and content transformation for Scaffold Manager
//!
//! Three content operations the pipeline composes per file:
//!
//! - **Merge**: directed JSON merge that preserves user customizations
//!   across template upgrades ([`merge`]).
//! - **Template**: literal placeholder substitution in textual content
//!   ([`template`]).
//! - **Transform**: field projection from project configuration onto the
//!   designated app manifest ([`transform`]).

pub mod error;
pub mod merge;
pub mod template;
pub mod transform;

pub use error::{Error, Result};
pub use merge::{MERGE_SENTINEL, MergeMode, merge, merge_strings};
pub use template::{apply_placeholders, standard_placeholders};
pub use transform::{ManifestTransform, transform_manifest};
