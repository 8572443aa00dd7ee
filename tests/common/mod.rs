//! Shared helpers for tests that drive a stand-in container engine.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

// Executing a script while another test thread still holds a write handle to
// its own script fails with ETXTBSY, so tests that spawn the fake engine run
// one at a time.
static ENGINE_LOCK: Mutex<()> = Mutex::new(());

pub fn serial() -> MutexGuard<'static, ()> {
    ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Writes a docker-compatible stand-in that logs its arguments and fakes `cp`.
///
/// `exit_codes` maps a subcommand (`build`, `run`, `cp`, `stop`, `rm`) to its exit code.
pub fn fake_engine(dir: &Path, exit_codes: &[(&str, i32)]) -> (PathBuf, PathBuf) {
    let log = dir.join("engine.log");
    let script = dir.join("fake-engine");

    let mut cases = String::new();
    for (sub, code) in exit_codes {
        cases.push_str(&format!("  {}) exit {} ;;\n", sub, code));
    }

    let body = format!(
        r#"#!/bin/sh
echo "$@" >> '{log}'
if [ "$1" = "cp" ]; then
  mkdir -p "$3/x86_64" && touch "$3/x86_64/yara-connector-2.1-1.x86_64.rpm"
fi
if [ "$1" = "rm" ] && [ "$2" = "--force" ]; then
  exit 1
fi
case "$1" in
{cases}esac
exit 0
"#,
        log = log.display(),
        cases = cases,
    );

    fs::write(&script, body).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    (script, log)
}

pub fn logged(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(|l| l.to_string())
        .collect()
}
