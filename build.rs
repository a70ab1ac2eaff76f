#![allow(missing_docs)]

use std::process::Command;

fn main() {
    let cargo_version = env!("CARGO_PKG_VERSION");
    let version = match git_revision() {
        Some(rev) => format!("{cargo_version}+g{rev}"),
        // tarball and docs.rs builds have no git metadata
        None => cargo_version.to_string(),
    };
    println!("cargo:rustc-env=SYNCD_VERSION_STRING={version}");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!rev.is_empty()).then_some(rev)
}
