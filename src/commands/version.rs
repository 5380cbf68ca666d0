//! Command: print version information.

/// Version string baked in by `build.rs`, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("AIRC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the airc version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("airc {}", version());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
