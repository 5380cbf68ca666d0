#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for `airc init` and the initialisation gate.
//!
//! These tests cover the first-time layout, the "already initialised" path,
//! and the `-f` repair flow for each kind of corruption.

mod common;

use airc_cli::cli::InitOpts;
use airc_cli::commands::{CommandSetup, init};
use airc_cli::error::InitError;
use airc_cli::sync::DEFAULT_TEMPLATE;
use airc_cli::workspace::DEFAULT_PROFILE;

use common::{TestContextBuilder, quiet_logger};

fn init_error(ctx: &common::IntegrationTestContext) -> InitError {
    let err = CommandSetup::init(&ctx.global(), &quiet_logger()).unwrap_err();
    err.downcast::<InitError>().expect("an InitError")
}

// ---------------------------------------------------------------------------
// First-time initialisation
// ---------------------------------------------------------------------------

/// A fresh init writes the config, the template and a `default` snapshot.
#[test]
fn init_creates_layout_and_default_snapshot() {
    let ctx = TestContextBuilder::new()
        .with_file("CLAUDE.md", "instructions")
        .with_file(".claude/settings.json", "{}")
        .with_file("notes.txt", "not synced")
        .build();

    init::run(&ctx.global(), &InitOpts::default(), &quiet_logger()).unwrap();

    let ws = ctx.workspace();
    assert_eq!(std::fs::read_to_string(ws.sync_path()).unwrap(), DEFAULT_TEMPLATE);
    assert_eq!(ctx.current(), DEFAULT_PROFILE);
    assert_eq!(
        std::fs::read_to_string(ctx.profile_file(DEFAULT_PROFILE, "CLAUDE.md")).unwrap(),
        "instructions"
    );
    assert!(ctx.profile_file(DEFAULT_PROFILE, ".claude/settings.json").exists());
    assert!(!ctx.profile_file(DEFAULT_PROFILE, "notes.txt").exists());

    // Working tree is left as it was.
    assert_eq!(ctx.read("CLAUDE.md").as_deref(), Some("instructions"));
    ctx.setup(&quiet_logger());
}

/// The written config carries the default repository settings.
#[test]
fn init_writes_default_config_json() {
    let ctx = TestContextBuilder::new().initialised().build();
    let json = std::fs::read_to_string(ctx.workspace().config_path()).unwrap();
    insta::assert_snapshot!(json.trim_end(), @r#"
    {
      "current": "default",
      "repo": {
        "owner": "maru3460",
        "name": "airc",
        "branch": "main"
      }
    }
    "#);
}

/// Running init again without `-f` changes nothing.
#[test]
fn second_init_without_force_is_a_no_op() {
    let ctx = TestContextBuilder::new().initialised().build();
    std::fs::write(ctx.workspace().sync_path(), "custom\n").unwrap();

    init::run(&ctx.global(), &InitOpts::default(), &quiet_logger()).unwrap();

    assert_eq!(
        std::fs::read_to_string(ctx.workspace().sync_path()).unwrap(),
        "custom\n"
    );
    assert_eq!(ctx.current(), DEFAULT_PROFILE);
}

// ---------------------------------------------------------------------------
// Initialisation gate
// ---------------------------------------------------------------------------

#[test]
fn gate_reports_uninitialised_workspace() {
    let ctx = TestContextBuilder::new().build();
    assert!(matches!(init_error(&ctx), InitError::Uninitialized));
}

#[test]
fn gate_reports_unparseable_config() {
    let ctx = TestContextBuilder::new().initialised().build();
    std::fs::write(ctx.workspace().config_path(), "{ not json").unwrap();
    assert!(matches!(init_error(&ctx), InitError::InvalidConfig { .. }));
}

#[test]
fn gate_reports_dangling_current_profile() {
    let ctx = TestContextBuilder::new().initialised().build();
    ctx.manager().set_current("ghost").unwrap();
    assert!(matches!(init_error(&ctx), InitError::InvalidConfigContent));
}

#[test]
fn gate_reports_missing_rule_file() {
    let ctx = TestContextBuilder::new().initialised().build();
    std::fs::remove_file(ctx.workspace().sync_path()).unwrap();
    assert!(matches!(init_error(&ctx), InitError::InvalidSyncFile));
}

/// A config written before `repo` existed is upgraded on first read.
#[test]
fn gate_migrates_config_without_repo() {
    let ctx = TestContextBuilder::new().initialised().build();
    std::fs::write(ctx.workspace().config_path(), r#"{"current":"default"}"#).unwrap();

    let setup = ctx.setup(&quiet_logger());

    assert_eq!(setup.config.repo.owner, "maru3460");
    let json = std::fs::read_to_string(ctx.workspace().config_path()).unwrap();
    assert!(json.contains("\"branch\": \"main\""), "{json}");
}

// ---------------------------------------------------------------------------
// Repair (`init -f`)
// ---------------------------------------------------------------------------

/// A dangling `current` is replaced by a fresh `tmp` snapshot.
#[test]
fn repair_points_config_at_new_tmp_snapshot() {
    let ctx = TestContextBuilder::new()
        .with_file("CLAUDE.md", "live")
        .initialised()
        .build();
    ctx.manager().set_current("ghost").unwrap();

    init::run(&ctx.global(), &InitOpts { force: true }, &quiet_logger()).unwrap();

    assert_eq!(ctx.current(), "tmp");
    assert_eq!(
        std::fs::read_to_string(ctx.profile_file("tmp", "CLAUDE.md")).unwrap(),
        "live"
    );
    ctx.setup(&quiet_logger());
}

/// Repair never reuses an existing profile name.
#[test]
fn repair_probes_for_unused_tmp_name() {
    let ctx = TestContextBuilder::new().initialised().build();
    let profiles = ctx.manager().profiles().clone();
    profiles.create("tmp").unwrap();
    profiles.create("tmp(1)").unwrap();
    std::fs::write(ctx.workspace().config_path(), "garbage").unwrap();

    init::run(&ctx.global(), &InitOpts { force: true }, &quiet_logger()).unwrap();

    assert_eq!(ctx.current(), "tmp(2)");
    assert_eq!(
        profiles.list().unwrap(),
        vec!["default", "tmp", "tmp(1)", "tmp(2)"]
    );
}

/// A missing rule file is regenerated before the config is checked.
#[test]
fn repair_regenerates_missing_rule_file() {
    let ctx = TestContextBuilder::new().initialised().build();
    std::fs::remove_file(ctx.workspace().sync_path()).unwrap();

    init::run(&ctx.global(), &InitOpts { force: true }, &quiet_logger()).unwrap();

    assert_eq!(
        std::fs::read_to_string(ctx.workspace().sync_path()).unwrap(),
        DEFAULT_TEMPLATE
    );
    // The config was fine, so no recovery profile is made.
    assert_eq!(ctx.current(), DEFAULT_PROFILE);
    assert_eq!(ctx.manager().profiles().list().unwrap(), vec!["default"]);
}

/// A healthy workspace survives `init -f` untouched.
#[test]
fn repair_leaves_healthy_workspace_alone() {
    let ctx = TestContextBuilder::new()
        .with_rules("CLAUDE.md\n")
        .initialised()
        .build();

    init::run(&ctx.global(), &InitOpts { force: true }, &quiet_logger()).unwrap();

    assert_eq!(
        std::fs::read_to_string(ctx.workspace().sync_path()).unwrap(),
        "CLAUDE.md\n"
    );
    assert_eq!(ctx.current(), DEFAULT_PROFILE);
}

/// `repair_config` itself refuses to run without a usable rule file.
#[test]
fn repair_config_requires_rule_file() {
    let ctx = TestContextBuilder::new().initialised().build();
    std::fs::remove_file(ctx.workspace().sync_path()).unwrap();

    let err = ctx
        .manager()
        .repair_config(&airc_cli::operations::SystemFileOps, &quiet_logger())
        .unwrap_err();

    assert!(matches!(
        err,
        airc_cli::error::AircError::Init(InitError::SyncFileRequired)
    ));
}
