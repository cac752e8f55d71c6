//! Build metadata for `onenote-export version` and the HTTP user agent.

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
  // Optional: `version` falls back to "unknown" outside a git checkout.
  if let Some(hash) = command_stdout("git", &["rev-parse", "--short", "HEAD"]) {
    set_env("GIT_HASH", &hash);
  }

  let timestamp = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_secs())
    .unwrap_or_default();
  set_env("BUILD_TIMESTAMP", &timestamp.to_string());

  set_env("TARGET", &env::var("TARGET").unwrap_or_default());

  let rustc = command_stdout("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string());
  set_env("RUSTC_VERSION", &rustc);

  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
  println!("cargo:rerun-if-env-changed=TARGET");
}

fn set_env(key: &str, value: &str) {
  println!("cargo:rustc-env={key}={value}");
}

/// Trimmed stdout of a successful, non-empty command run.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
  let output = Command::new(program).args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let text = String::from_utf8(output.stdout).ok()?.trim().to_string();
  (!text.is_empty()).then_some(text)
}
