//! Log file location, ANSI stripping and timestamps.
use std::fs;
use std::path::PathBuf;

/// Remove CSI escape sequences (`ESC [ params final`) such as colours.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
        } else if chars.next_if_eq(&'[').is_some() {
            let _final = chars.by_ref().find(|c| ('@'..='~').contains(c));
        }
    }
    out
}

/// `$XDG_CACHE_HOME/airc/<command>.log`, falling back to `~/.cache/airc/`.
///
/// Creates the directory; returns `None` if that fails or no home is known.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            ["HOME", "USERPROFILE"]
                .iter()
                .find_map(|key| std::env::var_os(key).filter(|v| !v.is_empty()))
                .map(|home| PathBuf::from(home).join(".cache"))
        })?;
    let dir = cache.join("airc");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC time rendered with the `chrono` format string `fmt`.
pub(super) fn utc_now(fmt: &str) -> String {
    chrono::Utc::now().format(fmt).to_string()
}
