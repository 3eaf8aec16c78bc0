//! Embeds build identity for `paintshop --version`.
//!
//! `GIT_HASH` is the short commit hash, or `PAINTSHOP_BUILD_HASH` when set
//! (source tarballs have no `.git`). `ON_RELEASE_TAG` is `true` when HEAD is
//! exactly a tag, in which case the package version is printed instead.

const HASH_OVERRIDE: &str = "PAINTSHOP_BUILD_HASH";

/// Run `git` and return trimmed stdout, or `None` if it fails.
fn git(args: &[&str]) -> Option<String> {
    let out = std::process::Command::new("git").args(args).output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed={HASH_OVERRIDE}");

    let hash = std::env::var(HASH_OVERRIDE)
        .ok()
        .filter(|h| !h.is_empty())
        .or_else(|| git(&["rev-parse", "--short", "HEAD"]))
        .unwrap_or_default();
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=GIT_HASH={hash}");
    println!("cargo:rustc-env=ON_RELEASE_TAG={on_tag}");
}
