//! Scenario tests for the synchronization engine
//!
//! Each test builds a template tree and a target project in temp
//! directories, runs the pipeline, and checks the externally observable
//! result: which files exist, their exact bytes, and the returned
//! outcomes.

use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use scaffold_core::{Outcome, RunContext, process, sync_all, sync_dependencies};
use scaffold_fs::NormalizedPath;
use scaffold_policy::{FileRecord, PartialPolicy, RuleTable};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn write_template(src: &TempDir, relative: &str, content: &[u8]) {
    let path = src.path().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_target(dst: &TempDir, relative: &str, content: &[u8]) {
    let path = dst.path().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn context(src: &TempDir, dst: &TempDir, rules: RuleTable) -> RunContext {
    RunContext::new(src.path(), dst.path(), Arc::new(rules)).unwrap()
}

fn record(ctx: &RunContext, relative: &str) -> FileRecord {
    FileRecord::from_relative(ctx.source_root(), relative)
}

/// Scenario 1: merge rule preserves user value, resyncs sentinel, adds new
/// template default.
#[test]
fn merge_rule_preserves_user_customizations() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(
        &src,
        "config/app.json",
        br#"{"theme": "light", "version": "2.0", "new": "x"}"#,
    );
    write_target(
        &dst,
        "config/app.json",
        br#"{"theme": "dark", "version": "default"}"#,
    );
    let rules = RuleTable::new()
        .with_rule("config/app.json", PartialPolicy::new().merge(true))
        .unwrap();
    let ctx = context(&src, &dst, rules);

    let outcome = process(&ctx, &record(&ctx, "config/app.json"));

    assert_eq!(outcome, Outcome::Merged);
    let merged: Value =
        serde_json::from_str(&fs::read_to_string(dst.path().join("config/app.json")).unwrap())
            .unwrap();
    assert_eq!(merged, json!({"theme": "dark", "version": "2.0", "new": "x"}));
}

/// Scenario 2: binary file is copied byte-for-byte with no substitution,
/// even when its bytes contain placeholder markers.
#[test]
fn binary_file_is_copied_byte_for_byte() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    // Not valid PNG, not valid UTF-8 at the end, and contains `%%%`.
    let payload: Vec<u8> = b"\x89PNG %%% version %%% \xff\xfe\x00".to_vec();
    write_template(&src, "assets/logo.png", &payload);
    let mut vars = std::collections::BTreeMap::new();
    vars.insert("%%% version %%%".to_string(), "9.9.9".to_string());
    let rules = RuleTable::new()
        .with_rule("assets/**", PartialPolicy::new().template_vars(vars))
        .unwrap();
    let ctx = context(&src, &dst, rules);

    let outcome = process(&ctx, &record(&ctx, "assets/logo.png"));

    assert_eq!(outcome, Outcome::Written);
    assert_eq!(fs::read(dst.path().join("assets/logo.png")).unwrap(), payload);
}

/// Scenario 3: a skip rule produces no file at all.
#[test]
fn skip_rule_creates_nothing() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(&src, "nested/.DS_Store", b"junk");
    let rules = RuleTable::new()
        .with_rule("**/.DS_Store", PartialPolicy::new().skip(true))
        .unwrap();
    let ctx = context(&src, &dst, rules);

    let outcome = process(&ctx, &record(&ctx, "nested/.DS_Store"));

    assert_eq!(outcome, Outcome::Skipped);
    assert!(!dst.path().join("nested/.DS_Store").exists());
}

/// Scenario 4: a fully ignored source yields an unchanged report.
#[test]
fn ignored_dependency_yields_unchanged_report() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.json");
    let dest = dir.path().join("dest.json");
    fs::write(&source, r#"{"dependencies": {"a": "1.0"}}"#).unwrap();
    fs::write(&dest, "{}").unwrap();
    let ignore: BTreeSet<String> = ["a".to_string()].into();

    let report = sync_dependencies(
        &NormalizedPath::new(&source),
        &NormalizedPath::new(&dest),
        &ignore,
    )
    .unwrap();

    assert!(!report.changed);
    assert!(report.new_dependencies.is_empty());
    assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
}

/// Skip law: destination stays byte-identical to its pre-run state.
#[test]
fn skip_leaves_existing_destination_byte_identical() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(&src, "notes.txt", b"template body");
    write_target(&dst, "notes.txt", b"user body, hands off");
    let rules = RuleTable::new()
        .with_rule("notes.txt", PartialPolicy::new().skip(true))
        .unwrap();
    let ctx = context(&src, &dst, rules);

    let outcome = process(&ctx, &record(&ctx, "notes.txt"));

    assert_eq!(outcome, Outcome::Skipped);
    assert_eq!(
        fs::read(dst.path().join("notes.txt")).unwrap(),
        b"user body, hands off"
    );
}

/// Skip wins even when merge and overwrite are also set.
#[test]
fn skip_overrides_merge_and_overwrite() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(&src, "config/app.json", br#"{"a": 1}"#);
    write_target(&dst, "config/app.json", br#"{"a": 2}"#);
    let rules = RuleTable::new()
        .with_rule(
            "config/app.json",
            PartialPolicy::new().overwrite(true).merge(true).skip(true),
        )
        .unwrap();
    let ctx = context(&src, &dst, rules);

    let outcome = process(&ctx, &record(&ctx, "config/app.json"));

    assert_eq!(outcome, Outcome::Skipped);
    assert_eq!(
        fs::read(dst.path().join("config/app.json")).unwrap(),
        br#"{"a": 2}"#
    );
}

/// Sentinel escape applies recursively at every nesting level.
#[test]
fn sentinel_resyncs_at_depth() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(
        &src,
        "config/app.json",
        br#"{"build": {"ios": {"team": "TEMPLATE", "scheme": "Release"}}}"#,
    );
    write_target(
        &dst,
        "config/app.json",
        br#"{"build": {"ios": {"team": "default", "scheme": "MyScheme"}}}"#,
    );
    let rules = RuleTable::new()
        .with_rule("config/app.json", PartialPolicy::new().merge(true))
        .unwrap();
    let ctx = context(&src, &dst, rules);

    process(&ctx, &record(&ctx, "config/app.json"));

    let merged: Value =
        serde_json::from_str(&fs::read_to_string(dst.path().join("config/app.json")).unwrap())
            .unwrap();
    assert_eq!(merged["build"]["ios"]["team"], "TEMPLATE");
    assert_eq!(merged["build"]["ios"]["scheme"], "MyScheme");
}

/// Merge against an invalid destination degrades to an overwrite.
#[test]
fn merge_with_unparsable_destination_falls_back_to_copy() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(&src, "config/app.json", br#"{"theme": "light"}"#);
    write_target(&dst, "config/app.json", b"{not json at all");
    let rules = RuleTable::new()
        .with_rule("config/app.json", PartialPolicy::new().merge(true))
        .unwrap();
    let ctx = context(&src, &dst, rules);

    let outcome = process(&ctx, &record(&ctx, "config/app.json"));

    assert_eq!(outcome, Outcome::Written);
    assert_eq!(
        fs::read(dst.path().join("config/app.json")).unwrap(),
        br#"{"theme": "light"}"#
    );
}

/// Manifest transform projects brand config onto the designated target.
#[test]
fn transform_target_receives_brand_projection() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(
        &src,
        "dist/app.json",
        br#"{"name": "Placeholder", "displayName": "Placeholder", "sdk": "51"}"#,
    );
    let rules = RuleTable::new()
        .with_rule(
            "dist/app.json",
            PartialPolicy::new().overwrite(true).transform(true),
        )
        .unwrap();
    let project_config = json!({"brand": {"name": "Night Sky"}});
    let ctx = context(&src, &dst, rules).with_transform("dist/app.json", &project_config);

    let outcome = process(&ctx, &record(&ctx, "dist/app.json"));

    assert_eq!(outcome, Outcome::Written);
    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(dst.path().join("dist/app.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["name"], "NightSky");
    assert_eq!(manifest["displayName"], "Night Sky");
    assert_eq!(manifest["sdk"], "51");
}

/// A broken transform target falls back to the original content and still
/// writes.
#[test]
fn broken_transform_target_keeps_original_content() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(&src, "dist/app.json", b"{broken json");
    let rules = RuleTable::new()
        .with_rule("dist/app.json", PartialPolicy::new().transform(true))
        .unwrap();
    let project_config = json!({"brand": {"name": "X"}});
    let ctx = context(&src, &dst, rules).with_transform("dist/app.json", &project_config);

    let outcome = process(&ctx, &record(&ctx, "dist/app.json"));

    assert_eq!(outcome, Outcome::Written);
    assert_eq!(
        fs::read(dst.path().join("dist/app.json")).unwrap(),
        b"{broken json"
    );
}

/// Placeholder substitution applies to textual files with template vars.
#[test]
fn placeholders_substitute_literally() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(
        &src,
        "src/env.js",
        b"export const VERSION = '%%% version %%%';\nexport const ENV = '%%% environment %%%';\n",
    );
    let vars = scaffold_content::standard_placeholders(
        "3.1.4",
        "development",
        &json!({}),
        &json!({}),
    );
    let rules = RuleTable::new()
        .with_rule("src/**/*", PartialPolicy::new().template_vars(vars))
        .unwrap();
    let ctx = context(&src, &dst, rules);

    process(&ctx, &record(&ctx, "src/env.js"));

    let written = fs::read_to_string(dst.path().join("src/env.js")).unwrap();
    assert_eq!(
        written,
        "export const VERSION = '3.1.4';\nexport const ENV = 'development';\n"
    );
}

/// Dependency sync never removes or alters destination-only entries.
#[test]
fn dependency_sync_is_one_directional() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.json");
    let dest = dir.path().join("dest.json");
    fs::write(
        &source,
        r#"{"dependencies": {"react": "18.2.0"}, "devDependencies": {"gulp": "4.0.2"}}"#,
    )
    .unwrap();
    fs::write(
        &dest,
        r#"{"dependencies": {"left-pad": "1.3.0"}, "devDependencies": {"gulp": "3.9.1"}}"#,
    )
    .unwrap();

    let report = sync_dependencies(
        &NormalizedPath::new(&source),
        &NormalizedPath::new(&dest),
        &BTreeSet::new(),
    )
    .unwrap();

    assert!(report.changed);
    assert_eq!(report.new_dependencies, vec!["react@18.2.0", "gulp@4.0.2"]);
    let dest_value: Value = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    assert_eq!(dest_value["dependencies"]["left-pad"], "1.3.0");
    assert_eq!(dest_value["dependencies"]["react"], "18.2.0");
    assert_eq!(dest_value["devDependencies"]["gulp"], "4.0.2");
}

/// No temporary files are left visible anywhere under the destination.
#[test]
fn completed_run_leaves_no_temp_residue() {
    init_tracing();
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_template(&src, "a.txt", b"a");
    write_template(&src, "deep/b.json", br#"{"k": "v"}"#);
    write_template(&src, "deep/c.png", b"\x89PNG");
    let ctx = context(&src, &dst, RuleTable::new());

    sync_all(&ctx).unwrap();

    let mut stack = vec![dst.path().to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".tmp"), "temp residue: {name}");
            if entry.path().is_dir() {
                stack.push(entry.path());
            }
        }
    }
}
