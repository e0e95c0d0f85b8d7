//! Stamps the binary with its commit, build time and profile for the startup log

use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "--short=8", "HEAD"]).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    let stamps = [
        ("GIT_HASH", git_short_hash().unwrap_or_else(|| "unknown".into())),
        ("BUILD_TIMESTAMP", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        ("BUILD_PROFILE", std::env::var("PROFILE").unwrap_or_else(|_| "unknown".into())),
    ];

    for (key, value) in stamps {
        println!("cargo:rustc-env={key}={value}");
    }
}
