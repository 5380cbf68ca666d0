#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for `new`, `delete` and `rename`.

mod common;

use airc_cli::commands::{delete, new, rename, switch};
use airc_cli::error::{ProfileError, SyncError};
use airc_cli::workspace::DEFAULT_PROFILE;

use common::{TestContextBuilder, quiet_logger};

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

#[test]
fn new_creates_empty_profile() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());

    new::create_profile(setup.manager.profiles(), "work").unwrap();

    let dir = ctx.workspace().profiles_dir().join("work");
    assert!(dir.is_dir());
    assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
}

#[test]
fn new_accepts_japanese_names() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());
    for name in ["仕事用", "カタカナ-プロファイル", "ﾃｽﾄ_1", "ひらがなー"] {
        new::create_profile(setup.manager.profiles(), name).unwrap();
    }
    assert_eq!(setup.manager.profiles().list().unwrap().len(), 5);
}

#[test]
fn new_rejects_invalid_names() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());
    for name in ["../evil", "foo/bar", "a b", "🙂", "", "   "] {
        let err = new::create_profile(setup.manager.profiles(), name).unwrap_err();
        assert!(
            matches!(err, ProfileError::InvalidName(_)),
            "{name:?} gave {err}"
        );
    }
    assert_eq!(setup.manager.profiles().list().unwrap(), vec![DEFAULT_PROFILE]);
}

#[test]
fn new_refuses_existing_profile() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());
    let err = new::create_profile(setup.manager.profiles(), DEFAULT_PROFILE).unwrap_err();
    assert_eq!(err.to_string(), "profile \"default\" already exists");
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_inactive_profile_with_contents() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());
    let profiles = setup.manager.profiles();
    profiles.create("old").unwrap();
    std::fs::write(profiles.path("old").unwrap().join("CLAUDE.md"), "x").unwrap();

    delete::delete_profile(profiles, &setup.config.current, "old").unwrap();

    assert!(!profiles.exists("old").unwrap());
}

#[test]
fn delete_refuses_active_profile() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());

    let err = delete::delete_profile(setup.manager.profiles(), DEFAULT_PROFILE, DEFAULT_PROFILE)
        .unwrap_err();

    assert!(matches!(err, ProfileError::Active(_)));
    assert!(setup.manager.profiles().exists(DEFAULT_PROFILE).unwrap());
}

#[test]
fn delete_reports_missing_profile() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());
    let err =
        delete::delete_profile(setup.manager.profiles(), DEFAULT_PROFILE, "nope").unwrap_err();
    assert!(matches!(err, ProfileError::NotFound(_)));
}

/// Names that climb out of `.airc/profiles/` are not profiles, so nothing
/// outside that directory can be deleted through them.
#[test]
fn delete_refuses_names_outside_profiles_dir() {
    let ctx = TestContextBuilder::new()
        .with_file("CLAUDE.md", "mine")
        .with_file("src/main.c", "int main;")
        .initialised()
        .build();
    let setup = ctx.setup(&quiet_logger());
    new::create_profile(setup.manager.profiles(), "work").unwrap();

    for name in ["..", "../..", ".", "work/..", "../profiles/work"] {
        let err = delete::delete_profile(setup.manager.profiles(), DEFAULT_PROFILE, name)
            .unwrap_err();
        assert!(matches!(err, ProfileError::NotFound(_)), "{name:?} gave {err}");
    }

    assert_eq!(ctx.read("CLAUDE.md").as_deref(), Some("mine"));
    assert_eq!(ctx.read("src/main.c").as_deref(), Some("int main;"));
    assert!(ctx.workspace().config_path().exists());
    assert!(ctx.workspace().sync_path().exists());
    assert_eq!(
        setup.manager.profiles().list().unwrap(),
        vec![DEFAULT_PROFILE, "work"]
    );
}

/// `use ..` must not treat `.airc/` as a profile.
#[test]
fn use_refuses_names_outside_profiles_dir() {
    let ctx = TestContextBuilder::new()
        .with_file("CLAUDE.md", "mine")
        .initialised()
        .build();
    let log = quiet_logger();
    let setup = ctx.setup(&log);

    for name in ["..", "../.."] {
        let err = switch::switch_profile(&setup, name, &log).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<SyncError>(),
                Some(SyncError::ProfileNotFound { .. })
            ),
            "{name:?} gave {err}"
        );
    }

    assert_eq!(ctx.current(), DEFAULT_PROFILE);
    assert_eq!(ctx.read("CLAUDE.md").as_deref(), Some("mine"));
    let engine = setup.engine(&log);
    assert!(matches!(
        engine.restore_from_profile(".."),
        Err(SyncError::ProfileNotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// rename
// ---------------------------------------------------------------------------

/// Renaming the active profile moves the `current` pointer with it.
#[test]
fn rename_active_profile_updates_config() {
    let ctx = TestContextBuilder::new()
        .with_file("CLAUDE.md", "kept")
        .initialised()
        .build();
    let setup = ctx.setup(&quiet_logger());

    rename::rename_profile(&setup, DEFAULT_PROFILE, "main").unwrap();

    assert_eq!(ctx.current(), "main");
    assert_eq!(
        std::fs::read_to_string(ctx.profile_file("main", "CLAUDE.md")).unwrap(),
        "kept"
    );
    ctx.setup(&quiet_logger());
}

#[test]
fn rename_inactive_profile_keeps_config() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());
    setup.manager.profiles().create("a").unwrap();

    rename::rename_profile(&setup, "a", "b").unwrap();

    assert_eq!(ctx.current(), DEFAULT_PROFILE);
    assert_eq!(
        setup.manager.profiles().list().unwrap(),
        vec!["b", DEFAULT_PROFILE]
    );
}

#[test]
fn rename_refuses_taken_or_invalid_name() {
    let ctx = TestContextBuilder::new().initialised().build();
    let setup = ctx.setup(&quiet_logger());
    setup.manager.profiles().create("a").unwrap();

    let err = rename::rename_profile(&setup, "a", DEFAULT_PROFILE).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProfileError>(),
        Some(ProfileError::AlreadyExists(_))
    ));

    let err = rename::rename_profile(&setup, "a", "x/y").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProfileError>(),
        Some(ProfileError::InvalidName(_))
    ));

    let err = rename::rename_profile(&setup, "..", "c").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProfileError>(),
        Some(ProfileError::NotFound(_))
    ));

    let err = rename::rename_profile(&setup, "missing", "c").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProfileError>(),
        Some(ProfileError::NotFound(_))
    ));
    assert!(setup.manager.profiles().exists("a").unwrap());
}
