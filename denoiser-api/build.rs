//! Build script for denoiser-api
//!
//! Exports GIT_HASH, BUILD_TIMESTAMP and BUILD_PROFILE for the startup log.

use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    emit("GIT_HASH", &git_short_hash().unwrap_or_else(|| UNKNOWN.into()));
    emit(
        "BUILD_TIMESTAMP",
        &chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
    );
    emit(
        "BUILD_PROFILE",
        &std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.into()),
    );

    // No rerun-if-changed: the hash and timestamp must refresh on every build
}

/// Short commit hash of HEAD, or `None` outside a git checkout
fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string())
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}
