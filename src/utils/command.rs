//! Captured process output primitives.

use serde::Serialize;
use std::process::{ExitStatus, Output};

/// Exit code reported when a process could not be spawned at all.
/// Matches the shell's "command not found" status.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Map an exit status to a shell-style exit code.
///
/// Processes terminated by a signal report `128 + signal`, like `sh` does.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Captured output from command execution.
/// Reusable primitive for any command that executes external processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }

    pub fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }

    /// Last line of stderr, or of stdout when stderr is blank. `None` if both are blank.
    ///
    /// Engines print the reason for a failure last, after any build progress.
    pub fn error_text(&self) -> Option<String> {
        [&self.stderr, &self.stdout]
            .into_iter()
            .find_map(|stream| stream.lines().rev().map(str::trim).find(|l| !l.is_empty()))
            .map(str::to_string)
    }
}
