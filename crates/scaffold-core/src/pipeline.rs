//! Per-file content pipeline
//!
//! `process` turns one template file into one destination write (or a
//! deliberate non-write), applying the resolved policy in a fixed order:
//! directory markers, binary classification, rename/relocate, manifest
//! transform, config merge, skip law, placeholder substitution, verbatim
//! copy. Every failure is contained to its file: parse and policy failures
//! degrade to the nearest safe fallback, I/O failures mark the file
//! `Failed`, and the batch always continues.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use scaffold_content::{apply_placeholders, merge_strings, transform_manifest};
use scaffold_fs::{NormalizedPath, compute_content_checksum, io, is_binary_path};
use scaffold_policy::FileRecord;

use crate::context::RunContext;
use crate::error::Result;

/// What happened to one processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Content was written to the destination
    Written,
    /// Destination existed and received the config-merge result
    Merged,
    /// No write occurred (skip rule, overwrite protection, or unchanged)
    Skipped,
    /// An I/O or containment error prevented processing
    Failed,
}

/// One file's entry in the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFile {
    /// Template-relative path
    pub relative: String,
    pub outcome: Outcome,
}

/// Summary of a full synchronization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files in processing order
    pub files: Vec<ProcessedFile>,
}

impl RunSummary {
    fn record(&mut self, relative: String, outcome: Outcome) {
        self.files.push(ProcessedFile { relative, outcome });
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }

    pub fn written(&self) -> usize {
        self.count(Outcome::Written)
    }

    pub fn merged(&self) -> usize {
        self.count(Outcome::Merged)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::Failed)
    }

    /// Whether the run modified the destination tree at all.
    pub fn changed(&self) -> bool {
        self.files
            .iter()
            .any(|f| matches!(f.outcome, Outcome::Written | Outcome::Merged))
    }

    /// Look up one file's outcome by its template-relative path.
    pub fn outcome_for(&self, relative: &str) -> Option<Outcome> {
        self.files
            .iter()
            .find(|f| f.relative == relative)
            .map(|f| f.outcome)
    }
}

/// Process a single template file.
///
/// Never fails: errors are logged with file context and reported through
/// the returned [`Outcome`], so one bad file cannot abort a batch.
pub fn process(ctx: &RunContext, record: &FileRecord) -> Outcome {
    match process_inner(ctx, record) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(file = %record.relative, error = %e, "failed to process file");
            Outcome::Failed
        }
    }
}

fn process_inner(ctx: &RunContext, record: &FileRecord) -> Result<Outcome> {
    // A .gitkeep marks its directory for creation; the marker itself is
    // never copied.
    if record.name == ".gitkeep" {
        let dir = ctx.dest_root().join(&record.destination_dir);
        io::ensure_dir(&dir)?;
        debug!(file = %record.relative, "created directory for marker");
        return Ok(Outcome::Skipped);
    }

    let policy = ctx.rules().resolve(&record.relative);
    let is_binary = is_binary_path(&record.source);

    // Dynamic flags degrade to the safe side on rule failure: an unknown
    // skip means skip, an unknown overwrite means keep the destination.
    let skip = match policy.skip.evaluate(record) {
        Ok(value) => value,
        Err(e) => {
            warn!(file = %record.relative, error = %e, "skip rule failed; treating as skip");
            true
        }
    };
    let overwrite = match policy.overwrite.evaluate(record) {
        Ok(value) => value,
        Err(e) => {
            warn!(file = %record.relative, error = %e, "overwrite rule failed; protecting destination");
            false
        }
    };

    // Skip wins over everything, merge included.
    if skip {
        debug!(file = %record.relative, rule = ?policy.rule, "skipping file");
        return Ok(Outcome::Skipped);
    }

    // Destination: mirrored layout unless relocate/rename say otherwise.
    let mut dest_dir = record.destination_dir.clone();
    if let Some(relocate) = &policy.relocate {
        match relocate(record) {
            Ok(dir) => dest_dir = dir,
            Err(message) => {
                warn!(file = %record.relative, message, "relocate rule failed; mirroring source layout");
            }
        }
    }
    let mut name = record.name.clone();
    if let Some(rename) = &policy.rename {
        match rename(record) {
            Ok(new_name) => name = new_name,
            Err(message) => {
                warn!(file = %record.relative, message, "rename rule failed; keeping original name");
            }
        }
    }

    let dest = ctx.dest_root().join(&dest_dir).join(&name);
    if !io::is_under_root(&dest, ctx.dest_root()) {
        return Err(scaffold_fs::Error::OutsideRoot {
            path: dest.to_native(),
            root: ctx.dest_root().to_native(),
        }
        .into());
    }

    // Single read of the destination; the merge below reuses it rather
    // than re-checking existence later.
    let existing = if dest.is_file() {
        Some(io::read_bytes(&dest)?)
    } else {
        None
    };

    let mut content = io::read_bytes(&record.source)?;

    // Manifest transform for the designated target.
    if policy.transform && !is_binary && ctx.is_transform_target(&record.relative) {
        match std::str::from_utf8(&content) {
            Ok(text) => match transform_manifest(text, ctx.transform()) {
                Ok(transformed) => {
                    debug!(file = %record.relative, "applied manifest transform");
                    content = transformed.into_bytes();
                }
                Err(e) => {
                    warn!(file = %record.relative, error = %e, "manifest transform failed; using original content");
                }
            },
            Err(_) => {
                warn!(file = %record.relative, "transform target is not valid UTF-8; using original content");
            }
        }
    }

    // Config merge applies only when the destination exists and both sides
    // parse as JSON; anything else falls back to the copy policy below.
    if policy.merge && !is_binary {
        if let Some(existing_bytes) = &existing {
            let sides = (
                std::str::from_utf8(existing_bytes),
                std::str::from_utf8(&content),
            );
            if let (Ok(existing_text), Ok(incoming_text)) = sides {
                match merge_strings(existing_text, incoming_text, ctx.merge_mode()) {
                    Ok(merged) => {
                        if merged.as_bytes() == existing_bytes.as_slice() {
                            debug!(file = %record.relative, "merge produced no changes");
                            return Ok(Outcome::Skipped);
                        }
                        io::write_atomic(&dest, merged.as_bytes())?;
                        info!(file = %record.relative, "merged config file");
                        return Ok(Outcome::Merged);
                    }
                    Err(e) => {
                        warn!(file = %record.relative, error = %e, "config merge failed; falling back to copy policy");
                    }
                }
            } else {
                warn!(file = %record.relative, "merge sides are not valid UTF-8; falling back to copy policy");
            }
        }
    }

    // Overwrite protection applies when merging did not happen.
    if !overwrite && existing.is_some() {
        debug!(file = %record.relative, rule = ?policy.rule, "existing destination protected");
        return Ok(Outcome::Skipped);
    }

    // Placeholder substitution for textual content.
    if let Some(vars) = &policy.template_vars
        && !is_binary
        && let Ok(text) = std::str::from_utf8(&content)
    {
        content = apply_placeholders(text, vars).into_bytes();
    }

    // Idempotence is derived from content comparison alone: a write whose
    // bytes match the destination is elided.
    if existing.as_deref() == Some(content.as_slice()) {
        debug!(file = %record.relative, "destination already up to date");
        return Ok(Outcome::Skipped);
    }

    io::write_atomic(&dest, &content)?;
    debug!(
        file = %record.relative,
        dest = %dest,
        checksum = %compute_content_checksum(&content),
        "wrote file"
    );
    Ok(Outcome::Written)
}

/// Synchronize the whole template tree into the destination.
///
/// Files are processed in walk order with no cross-file ordering
/// guarantee; each file's resolution is atomic on its own. Per-file
/// failures are recorded in the summary and never abort the run.
pub fn sync_all(ctx: &RunContext) -> Result<RunSummary> {
    info!(source = %ctx.source_root(), dest = %ctx.dest_root(), "starting full sync");
    let mut summary = RunSummary::default();

    for entry in WalkDir::new(ctx.source_root().as_ref()).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!(error = %e, "failed to walk template entry");
                continue;
            }
        };
        let path = NormalizedPath::new(entry.path());
        let Some(relative) = path.relative_to(ctx.source_root()) else {
            continue;
        };
        if relative.is_empty() {
            continue;
        }

        if entry.file_type().is_dir() {
            if let Err(e) = io::ensure_dir(&ctx.dest_root().join(&relative)) {
                error!(dir = %relative, error = %e, "failed to create destination directory");
            }
            continue;
        }

        let record = FileRecord::from_relative(ctx.source_root(), &relative);
        let outcome = process(ctx, &record);
        summary.record(relative, outcome);
    }

    info!(
        written = summary.written(),
        merged = summary.merged(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "full sync finished"
    );
    Ok(summary)
}
