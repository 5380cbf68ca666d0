//! Path safety checks shared by local sync and remote download.

/// Returns `true` if `rel` is a safe relative path.
///
/// Rejects `../` and `..\` traversal, NUL bytes, and anything that would
/// resolve as absolute (`/x`, `\x`, `C:\x`, `C:/x`).
#[must_use]
pub fn is_valid_path(rel: &str) -> bool {
    if rel.contains('\0') || rel.contains("../") || rel.contains("..\\") {
        return false;
    }
    if rel.starts_with('/') || rel.starts_with('\\') {
        return false;
    }
    let mut chars = rel.chars();
    let drive_letter = matches!(
        (chars.next(), chars.next()),
        (Some(c), Some(':')) if c.is_ascii_alphabetic()
    );
    !drive_letter && !std::path::Path::new(rel).is_absolute()
}

/// Convert a repository path under `profiles/<profile>/` to a path relative
/// to the profile.
///
/// Returns `None` if the prefix is missing or nothing remains after it.
#[must_use]
pub fn to_local_path(repo_path: &str, profile: &str) -> Option<String> {
    let prefix = format!("profiles/{profile}/");
    let rest = repo_path.strip_prefix(&prefix)?;
    (!rest.trim().is_empty()).then(|| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_relative_paths() {
        for p in ["CLAUDE.md", ".claude/settings.json", "a/b/c..d.txt", "..hidden"] {
            assert!(is_valid_path(p), "{p} should be valid");
        }
    }

    #[test]
    fn rejects_traversal_nul_and_absolute() {
        for p in [
            "../evil",
            "a/../../b",
            "a\\..\\b",
            "..\\x",
            "bad\0name",
            "/etc/passwd",
            "\\\\server\\share",
            "C:\\Windows",
            "c:/x",
        ] {
            assert!(!is_valid_path(p), "{p:?} should be invalid");
        }
    }

    #[test]
    fn to_local_path_strips_profile_prefix() {
        assert_eq!(
            to_local_path("profiles/team/.claude/x.json", "team").as_deref(),
            Some(".claude/x.json")
        );
    }

    #[test]
    fn to_local_path_rejects_foreign_or_empty() {
        assert_eq!(to_local_path("profiles/other/x", "team"), None);
        assert_eq!(to_local_path("profiles/team/", "team"), None);
        assert_eq!(to_local_path("x", "team"), None);
    }
}
