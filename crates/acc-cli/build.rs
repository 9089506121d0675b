//! Embeds a version string for `acc --version`.
//!
//! Release builds report the package version. Builds from a git checkout
//! append the abbreviated commit, plus `-dirty` for uncommitted changes.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let package = env!("CARGO_PKG_VERSION");
    let version = match git_revision() {
        Some(rev) => format!("{} ({})", package, rev),
        None => package.to_string(),
    };

    println!("cargo:rustc-env=ACC_VERSION={}", version);
}

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--exclude", "*"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let rev = String::from_utf8(output.stdout).ok()?;
    let rev = rev.trim();
    (!rev.is_empty()).then(|| rev.to_string())
}
