//! Save, restore and clear batches over the matched file set.
//!
//! Every batch follows the same failure policy: a problem with one file is
//! logged as a warning and recorded in the [`SyncReport`]; only conditions
//! that make the whole batch meaningless are returned as [`SyncError`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::path::is_valid_path;
use super::patterns::{MatchResult, SyncPattern, match_files};
use super::report::{FileOutcome, SyncReport};
use super::rules_file::SyncFileStore;
use crate::error::SyncError;
use crate::logging::Log;
use crate::operations::FileOps;
use crate::profiles::ProfileStore;
use crate::workspace::Workspace;

/// Format `now` as a stash directory name: ISO-8601 with millisecond
/// precision, `:` and `.` replaced by `-`.
#[must_use]
pub fn stash_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

/// Moves file content between the working tree and profile storage.
pub struct SyncEngine<'a> {
    root: PathBuf,
    stash_dir: PathBuf,
    profiles: ProfileStore,
    rules: SyncFileStore,
    ops: &'a dyn FileOps,
    log: &'a dyn Log,
}

impl std::fmt::Debug for SyncEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("root", &self.root)
            .field("ops", &self.ops)
            .finish_non_exhaustive()
    }
}

impl<'a> SyncEngine<'a> {
    /// Create an engine for `workspace`.
    #[must_use]
    pub fn new(workspace: &Workspace, ops: &'a dyn FileOps, log: &'a dyn Log) -> Self {
        Self {
            root: workspace.root().to_path_buf(),
            stash_dir: workspace.stash_dir(),
            profiles: ProfileStore::new(workspace),
            rules: SyncFileStore::new(workspace),
            ops,
            log,
        }
    }

    /// Copy every working-tree file matched by `patterns` into profile `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ProfileNotFound`] if the profile does not exist.
    pub fn save_to_profile(
        &self,
        name: &str,
        patterns: &SyncPattern,
    ) -> Result<SyncReport, SyncError> {
        let profile_dir = self.require_profile(name)?;
        let matched = self.resolve(patterns, &self.root);

        let mut report = SyncReport::default();
        for rel in &matched.files {
            let outcome = if is_valid_path(rel) {
                self.copy(&self.root.join(rel), &profile_dir.join(rel), rel)
            } else {
                self.skip_unsafe(rel)
            };
            report.push(rel, outcome);
        }

        self.log.record_batch(&format!("save → {name}"), report.counts());
        Ok(report)
    }

    /// Copy profile `name` into the working tree.
    ///
    /// The file set is chosen by the current `.sync` rules matched against
    /// the profile directory, not by the rules in force when it was saved.
    /// Working-tree files about to be overwritten are moved to
    /// `.airc/stash/<timestamp>/` first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ProfileNotFound`] if the profile does not exist,
    /// or [`SyncError::RuleFile`] if `.sync` exists but cannot be read.
    pub fn restore_from_profile(&self, name: &str) -> Result<SyncReport, SyncError> {
        let profile_dir = self.require_profile(name)?;
        let patterns = self
            .rules
            .read_patterns()
            .map_err(|source| SyncError::RuleFile {
                path: self.rules.path().to_path_buf(),
                source,
            })?;
        let matched = self.resolve(&patterns, &profile_dir);
        let stash_root = self.stash_dir.join(stash_timestamp(Utc::now()));

        let mut report = SyncReport::default();
        for rel in &matched.files {
            let outcome = if is_valid_path(rel) {
                self.restore_one(&profile_dir, &stash_root, rel)
            } else {
                self.skip_unsafe(rel)
            };
            report.push(rel, outcome);
        }

        self.log.record_batch(&format!("restore ← {name}"), report.counts());
        Ok(report)
    }

    /// Delete every working-tree file matched by `patterns`.
    ///
    /// Files that are already gone count as cleared.
    #[must_use]
    pub fn clear_files(&self, patterns: &SyncPattern) -> SyncReport {
        let matched = self.resolve(patterns, &self.root);

        let mut report = SyncReport::default();
        for rel in &matched.files {
            let outcome = if is_valid_path(rel) {
                self.remove(rel)
            } else {
                self.skip_unsafe(rel)
            };
            report.push(rel, outcome);
        }

        self.log.record_batch("clear", report.counts());
        report
    }

    /// Files `patterns` currently selects in the working tree.
    #[must_use]
    pub fn matched_files(&self, patterns: &SyncPattern) -> Vec<String> {
        self.resolve(patterns, &self.root).files
    }

    fn require_profile(&self, name: &str) -> Result<PathBuf, SyncError> {
        if self.profiles.exists(name)? {
            Ok(self.profiles.path(name)?)
        } else {
            Err(SyncError::ProfileNotFound {
                name: name.to_string(),
            })
        }
    }

    fn resolve(&self, patterns: &SyncPattern, base: &Path) -> MatchResult {
        let matched = match_files(patterns, base);
        for bad in &matched.invalid {
            self.log.warn(&format!(
                "ignoring invalid sync pattern {}: {}",
                bad.pattern, bad.message
            ));
        }
        for skipped in &matched.unreadable {
            self.log.warn(&format!(
                "cannot read {}: {}",
                base.join(&skipped.path).display(),
                skipped.message
            ));
        }
        self.log.debug(&format!(
            "{} file(s) matched under {}",
            matched.files.len(),
            base.display()
        ));
        matched
    }

    fn skip_unsafe(&self, rel: &str) -> FileOutcome {
        let reason = format!("unsafe path: {rel}");
        self.log.warn(&format!("skipped {reason}"));
        FileOutcome::Skipped { reason }
    }

    fn fail(&self, reason: String) -> FileOutcome {
        self.log.warn(&reason);
        FileOutcome::Failed { reason }
    }

    /// Byte copy `from` → `to`, creating parents and normalising permissions.
    fn copy(&self, from: &Path, to: &Path, rel: &str) -> FileOutcome {
        let contents = match self.ops.read(from) {
            Ok(c) => c,
            Err(e) => return self.fail(format!("failed to read {rel}: {e}")),
        };
        if let Some(parent) = to.parent()
            && let Err(e) = self.ops.create_dir_all(parent)
        {
            return self.fail(format!("failed to create directory for {rel}: {e}"));
        }
        if let Err(e) = self.ops.write(to, &contents) {
            return self.fail(format!("failed to write {rel}: {e}"));
        }
        if let Err(e) = self.ops.set_standard_permissions(to) {
            self.log
                .warn(&format!("failed to set permissions on {rel}: {e}"));
        }
        self.log.debug(&format!("copied {rel}"));
        FileOutcome::Synced { stashed: None }
    }

    fn restore_one(&self, profile_dir: &Path, stash_root: &Path, rel: &str) -> FileOutcome {
        let dest = self.root.join(rel);

        let mut stashed = None;
        if self.ops.exists(&dest) {
            let stash_path = stash_root.join(rel);
            if let Some(parent) = stash_path.parent()
                && let Err(e) = self.ops.create_dir_all(parent)
            {
                return self.fail(format!("failed to stash {rel}, left untouched: {e}"));
            }
            if let Err(e) = self.ops.move_file(&dest, &stash_path) {
                return self.fail(format!("failed to stash {rel}, left untouched: {e}"));
            }
            self.log
                .debug(&format!("stashed {rel} → {}", stash_path.display()));
            stashed = Some(stash_path);
        }

        match self.copy(&profile_dir.join(rel), &dest, rel) {
            FileOutcome::Synced { .. } => FileOutcome::Synced { stashed },
            FileOutcome::Failed { reason } => match stashed {
                Some(path) => FileOutcome::Failed {
                    reason: format!("{reason} (previous content kept at {})", path.display()),
                },
                None => FileOutcome::Failed { reason },
            },
            other @ FileOutcome::Skipped { .. } => other,
        }
    }

    fn remove(&self, rel: &str) -> FileOutcome {
        let path = self.root.join(rel);
        if !self.ops.exists(&path) {
            return FileOutcome::Synced { stashed: None };
        }
        match self.ops.remove_file(&path) {
            Ok(()) => {
                self.log.debug(&format!("removed {rel}"));
                FileOutcome::Synced { stashed: None }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                FileOutcome::Synced { stashed: None }
            }
            Err(e) => self.fail(format!("failed to remove {rel}: {e}")),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;
    use crate::operations::{FaultyFileOps, SystemFileOps};
    use std::fs;

    struct Fixture {
        dir: tempfile::TempDir,
        ws: Workspace,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let ws = Workspace::new(dir.path());
            ProfileStore::new(&ws).create("default").unwrap();
            Self { dir, ws }
        }

        fn write(&self, rel: &str, content: &str) {
            let p = self.dir.path().join(rel);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, content).unwrap();
        }

        fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.dir.path().join(rel)).unwrap()
        }

        fn exists(&self, rel: &str) -> bool {
            self.dir.path().join(rel).exists()
        }

        fn rules(&self, content: &str) {
            SyncFileStore::new(&self.ws).write(content).unwrap();
        }

        fn profile_file(&self, profile: &str, rel: &str) -> PathBuf {
            self.ws.profiles_dir().join(profile).join(rel)
        }
    }

    #[test]
    fn stash_timestamp_replaces_separators() {
        let t = chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_milli_opt(12, 34, 56, 789)
            .unwrap()
            .and_utc();
        assert_eq!(stash_timestamp(t), "2026-10-19T12-34-56-789Z");
    }

    #[test]
    fn save_requires_existing_profile() {
        let fx = Fixture::new();
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        let err = engine
            .save_to_profile("ghost", &SyncPattern::parse("CLAUDE.md"))
            .unwrap_err();
        assert!(matches!(err, SyncError::ProfileNotFound { name } if name == "ghost"));
        assert!(!fx.ws.profiles_dir().join("ghost").exists());
    }

    #[test]
    fn save_then_restore_round_trips_bytes() {
        let fx = Fixture::new();
        fx.rules(".claude/\nCLAUDE.md\n");
        fx.write("CLAUDE.md", "root instructions\n");
        fx.write(".claude/settings.json", "{\"a\":1}");
        fx.write("unrelated.txt", "keep me out");
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        let patterns = SyncFileStore::new(&fx.ws).read_patterns().unwrap();

        let saved = engine.save_to_profile("default", &patterns).unwrap();
        assert_eq!(saved.synced_paths(), vec![".claude/settings.json", "CLAUDE.md"]);
        assert!(!fx.profile_file("default", "unrelated.txt").exists());

        engine.clear_files(&patterns);
        assert!(!fx.exists("CLAUDE.md"));

        let restored = engine.restore_from_profile("default").unwrap();
        assert_eq!(restored.counts().synced, 2);
        assert!(restored.stashed().is_empty());
        assert_eq!(fx.read("CLAUDE.md"), "root instructions\n");
        assert_eq!(fx.read(".claude/settings.json"), "{\"a\":1}");
    }

    #[test]
    fn binary_content_is_preserved() {
        let fx = Fixture::new();
        let bytes = [0_u8, 159, 146, 150, 255, b'\n'];
        fs::write(fx.dir.path().join("blob.bin"), bytes).unwrap();
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        engine
            .save_to_profile("default", &SyncPattern::parse("blob.bin"))
            .unwrap();
        assert_eq!(fs::read(fx.profile_file("default", "blob.bin")).unwrap(), bytes);
    }

    // Restore is governed by today's .sync, not the rules used at save time.
    #[test]
    fn restore_uses_current_rules_not_rules_at_save_time() {
        let fx = Fixture::new();
        fx.write("CLAUDE.md", "a");
        fx.write("notes.md", "b");
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        engine
            .save_to_profile("default", &SyncPattern::parse("CLAUDE.md\nnotes.md"))
            .unwrap();
        fs::remove_file(fx.dir.path().join("CLAUDE.md")).unwrap();
        fs::remove_file(fx.dir.path().join("notes.md")).unwrap();

        fx.rules("CLAUDE.md\n");
        let restored = engine.restore_from_profile("default").unwrap();

        assert_eq!(restored.synced_paths(), vec!["CLAUDE.md"]);
        assert!(fx.exists("CLAUDE.md"));
        assert!(!fx.exists("notes.md"), "notes.md is no longer in .sync");
    }

    #[test]
    fn restore_stashes_existing_file_before_overwrite() {
        let fx = Fixture::new();
        fx.rules("CLAUDE.md\n");
        fs::write(fx.profile_file("default", "CLAUDE.md"), "from profile").unwrap();
        fx.write("CLAUDE.md", "local edits");
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);

        let report = engine.restore_from_profile("default").unwrap();

        assert_eq!(fx.read("CLAUDE.md"), "from profile");
        let stashed = report.stashed();
        assert_eq!(stashed.len(), 1);
        assert!(stashed[0].starts_with(fx.ws.stash_dir()));
        assert!(stashed[0].ends_with("CLAUDE.md"));
        assert_eq!(fs::read_to_string(stashed[0]).unwrap(), "local edits");
    }

    #[test]
    fn stash_failure_leaves_original_untouched() {
        let fx = Fixture::new();
        fx.rules("CLAUDE.md\nother.md\n");
        fs::write(fx.profile_file("default", "CLAUDE.md"), "from profile").unwrap();
        fs::write(fx.profile_file("default", "other.md"), "other").unwrap();
        fx.write("CLAUDE.md", "local edits");
        let log = RecordingLog::default();
        let ops = FaultyFileOps::new().fail_moves_for("CLAUDE.md");
        let engine = SyncEngine::new(&fx.ws, &ops, &log);

        let report = engine.restore_from_profile("default").unwrap();

        assert_eq!(fx.read("CLAUDE.md"), "local edits");
        assert_eq!(fx.read("other.md"), "other", "batch continues");
        let counts = report.counts();
        assert_eq!((counts.synced, counts.failed), (1, 1));
        assert!(log.warnings().iter().any(|w| w.contains("failed to stash CLAUDE.md")));
    }

    #[test]
    fn write_failure_after_stash_keeps_previous_content() {
        let fx = Fixture::new();
        fx.rules("CLAUDE.md\n");
        fs::write(fx.profile_file("default", "CLAUDE.md"), "from profile").unwrap();
        fx.write("CLAUDE.md", "local edits");
        let log = RecordingLog::default();
        let ops = FaultyFileOps::new().fail_writes_for("CLAUDE.md");
        let engine = SyncEngine::new(&fx.ws, &ops, &log);

        let report = engine.restore_from_profile("default").unwrap();

        assert_eq!(report.counts().failed, 1);
        let stash_root = fx.ws.stash_dir();
        let entry = fs::read_dir(&stash_root).unwrap().next().unwrap().unwrap();
        assert_eq!(
            fs::read_to_string(entry.path().join("CLAUDE.md")).unwrap(),
            "local edits"
        );
        let FileOutcome::Failed { reason } = &report.files[0].outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("previous content kept at"));
    }

    #[test]
    fn restore_missing_profile_fails_fast() {
        let fx = Fixture::new();
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        assert!(matches!(
            engine.restore_from_profile("nope"),
            Err(SyncError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn read_failure_skips_file_and_continues() {
        let fx = Fixture::new();
        fx.write("a.md", "a");
        fx.write("b.md", "b");
        let log = RecordingLog::default();
        let ops = FaultyFileOps::new().fail_reads_for("a.md");
        let engine = SyncEngine::new(&fx.ws, &ops, &log);

        let report = engine
            .save_to_profile("default", &SyncPattern::parse("*.md"))
            .unwrap();

        assert_eq!(report.synced_paths(), vec!["b.md"]);
        assert_eq!(log.warnings().len(), 1);
        let batches = log.batches.lock().unwrap();
        assert_eq!(batches[0].name, "save → default");
        assert_eq!(batches[0].counts.failed, 1);
    }

    #[test]
    fn clear_twice_is_idempotent() {
        let fx = Fixture::new();
        fx.write(".claude/a.json", "a");
        fx.write("keep.txt", "k");
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        let patterns = SyncPattern::parse(".claude/");

        let first = engine.clear_files(&patterns);
        let second = engine.clear_files(&patterns);

        assert_eq!(first.counts().synced, 1);
        assert!(second.files.is_empty());
        assert!(!fx.exists(".claude/a.json"));
        assert!(fx.exists("keep.txt"));
        assert!(log.warnings().is_empty());
    }

    #[test]
    fn clear_failure_is_warned() {
        let fx = Fixture::new();
        fx.write("a.md", "a");
        let log = RecordingLog::default();
        let ops = FaultyFileOps::new().fail_removes_for("a.md");
        let engine = SyncEngine::new(&fx.ws, &ops, &log);
        let report = engine.clear_files(&SyncPattern::parse("a.md"));
        assert_eq!(report.counts().failed, 1);
        assert!(fx.exists("a.md"));
    }

    #[cfg(unix)]
    #[test]
    fn unsafe_names_are_skipped() {
        let fx = Fixture::new();
        fx.write("x..\\y", "sneaky");
        fx.write("ok.txt", "fine");
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        let report = engine
            .save_to_profile("default", &SyncPattern::parse("*"))
            .unwrap();
        assert_eq!(report.synced_paths(), vec!["ok.txt"]);
        assert_eq!(report.counts().skipped, 1);
        assert!(log.warnings()[0].contains("unsafe path"));
    }

    #[test]
    fn invalid_pattern_is_warned_not_fatal() {
        let fx = Fixture::new();
        fx.write("a.md", "a");
        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        let report = engine
            .save_to_profile("default", &SyncPattern::parse("[\na.md"))
            .unwrap();
        assert_eq!(report.synced_paths(), vec!["a.md"]);
        assert!(log.warnings()[0].contains("invalid sync pattern ["));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_warned() {
        use std::os::unix::fs::PermissionsExt as _;

        let fx = Fixture::new();
        fx.write(".claude/locked/x.json", "x");
        fx.write(".claude/open.json", "y");
        let locked = fx.dir.path().join(".claude/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let readable_anyway = fs::read_dir(&locked).is_ok();

        let log = RecordingLog::default();
        let engine = SyncEngine::new(&fx.ws, &SystemFileOps, &log);
        let report = engine
            .save_to_profile("default", &SyncPattern::parse(".claude/"))
            .unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Privileged users read through the mode bits.
        if readable_anyway {
            return;
        }
        assert_eq!(report.synced_paths(), vec![".claude/open.json"]);
        let warnings = log.warnings();
        assert!(
            warnings.iter().any(|w| w.starts_with("cannot read") && w.contains("locked")),
            "{warnings:?}"
        );
    }
}
