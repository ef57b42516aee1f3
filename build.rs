use std::env;
use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        println!(
            "cargo:warning=git rev-parse failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let release = env::var("PROFILE").map(|p| p == "release").unwrap_or(false);

    // Hash lookups only for release builds or when explicitly requested
    let version_string = if release || env::var("DCR_VERSION_WITH_HASH").is_ok() {
        match git_short_hash() {
            Some(hash) => format!("{} ({})", version, hash),
            None => version,
        }
    } else {
        format!("{} (dev)", version)
    };

    println!("cargo:rustc-env=DCR_BUILD_VERSION={}", version_string);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/packed-refs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=DCR_VERSION_WITH_HASH");
}
