//! Sync rule parsing and glob resolution.
//!
//! A rule file is line oriented: blank lines and `#` comments are ignored,
//! `!pattern` adds an exclusion, and every other line adds an inclusion.
//! An inclusion ending in `/` selects every file beneath that directory.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::workspace::STATE_DIR;

/// Rule file written by `airc init` and used when `.sync` is absent.
pub const DEFAULT_TEMPLATE: &str = "\
# airc sync patterns
# Lists the files that are synchronised with profiles

# Directory: sync every file beneath it
.github/
.claude/
.kiro/

# File: sync a single file
CLAUDE.md

# Wildcards
# *.md
# .github/**/*.md

# Exclusions: patterns starting with '!' are excluded
!.github/workflows/
!*.log
";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Parsed include and exclude globs, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPattern {
    /// Patterns selecting files.
    pub include: Vec<String>,
    /// Patterns removing files from the selection.
    pub exclude: Vec<String>,
}

impl SyncPattern {
    /// Parse rule file `content`.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut patterns = Self::default();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(negated) = line.strip_prefix('!') {
                let negated = negated.trim();
                if !negated.is_empty() {
                    patterns.exclude.push(negated.to_string());
                }
            } else {
                patterns.include.push(line.to_string());
            }
        }
        patterns
    }
}

/// A pattern that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPattern {
    /// The pattern as written.
    pub pattern: String,
    /// Parser message.
    pub message: String,
}

/// A part of the tree the walk could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadablePath {
    /// Relative path, or empty for the base itself.
    pub path: String,
    /// Walker message.
    pub message: String,
}

/// Result of [`match_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Sorted, de-duplicated relative paths using `/` separators.
    pub files: Vec<String>,
    /// Patterns skipped because they failed to compile.
    pub invalid: Vec<InvalidPattern>,
    /// Entries skipped because they could not be read; files beneath them
    /// are missing from [`MatchResult::files`].
    pub unreadable: Vec<UnreadablePath>,
}

/// An exclusion; `dir` marks a pattern written with a trailing `/`.
struct Exclusion {
    pattern: Pattern,
    dir: bool,
}

impl Exclusion {
    /// A path is excluded if the pattern matches it or any ancestor directory.
    fn excludes(&self, rel: &str) -> bool {
        if !self.dir && self.pattern.matches_with(rel, MATCH_OPTIONS) {
            return true;
        }
        rel.match_indices('/')
            .filter_map(|(i, _)| rel.get(..i))
            .any(|ancestor| self.pattern.matches_with(ancestor, MATCH_OPTIONS))
    }
}

/// Drop leading `./` segments; rules are always relative to the base.
fn strip_current_dir(pattern: &str) -> &str {
    let mut rest = pattern;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped.trim_start_matches('/');
    }
    rest
}

/// Expand a directory include to a recursive glob.
fn expand_include(pattern: &str) -> String {
    let pattern = strip_current_dir(pattern);
    if pattern.ends_with('/') {
        format!("{pattern}**/*")
    } else {
        pattern.to_string()
    }
}

/// Resolve `patterns` against `base` into a sorted list of relative file paths.
///
/// Only regular files (or symlinks to files) are returned. The `.airc/` state
/// directory directly under `base` is never descended into. Malformed patterns
/// are collected into [`MatchResult::invalid`] and skipped; directories the
/// walk cannot read go to [`MatchResult::unreadable`].
#[must_use]
pub fn match_files(patterns: &SyncPattern, base: &Path) -> MatchResult {
    let mut result = MatchResult::default();
    if patterns.include.is_empty() {
        return result;
    }

    let mut exclusions = Vec::new();
    for raw in &patterns.exclude {
        let trimmed = strip_current_dir(raw);
        let (body, dir) = trimmed
            .strip_suffix('/')
            .map_or((trimmed, false), |b| (b, true));
        match Pattern::new(body) {
            Ok(pattern) => exclusions.push(Exclusion { pattern, dir }),
            Err(e) => result.invalid.push(InvalidPattern {
                pattern: format!("!{raw}"),
                message: e.to_string(),
            }),
        }
    }

    let candidates = candidate_files(base, &mut result.unreadable);
    let mut files = BTreeSet::new();

    for raw in &patterns.include {
        let pattern = match Pattern::new(&expand_include(raw)) {
            Ok(p) => p,
            Err(e) => {
                result.invalid.push(InvalidPattern {
                    pattern: raw.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        for rel in &candidates {
            if pattern.matches_with(rel, MATCH_OPTIONS)
                && !exclusions.iter().any(|x| x.excludes(rel))
            {
                files.insert(rel.clone());
            }
        }
    }

    result.files = files.into_iter().collect();
    result
}

/// Every file beneath `base`, as `/`-separated relative paths.
///
/// Entries that vanish during the walk, or a missing `base`, are not
/// failures; any other walk error is pushed onto `unreadable`.
fn candidate_files(base: &Path, unreadable: &mut Vec<UnreadablePath>) -> Vec<String> {
    let mut files = Vec::new();
    let walker = walkdir::WalkDir::new(base)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == STATE_DIR));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if e.io_error().is_none_or(|err| err.kind() != io::ErrorKind::NotFound) {
                    unreadable.push(UnreadablePath {
                        path: e.path().map(|p| relative(base, p)).unwrap_or_default(),
                        message: e.to_string(),
                    });
                }
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(relative(base, entry.path()));
        }
    }
    files
}

/// `path` relative to `base`, joined with `/`.
fn relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
