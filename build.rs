//! Build script: embeds version information at compile time.

use std::process::Command;

fn main() {
    // AIRC_VERSION wins (release builds); local builds fall back to git describe.
    if let Ok(version) = std::env::var("AIRC_VERSION") {
        println!("cargo:rustc-env=AIRC_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=AIRC_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=AIRC_VERSION");
}
