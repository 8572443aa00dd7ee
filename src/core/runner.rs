//! Process execution for plan steps.

use std::process::{Command, Stdio};

use crate::engine::Invocation;
use crate::utils::command::{self, CapturedOutput, EXIT_SPAWN_FAILED};

/// What happened when one step's process ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    pub exit_code: i32,
    pub output: CapturedOutput,
}

impl StepOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs one invocation to completion. Never fails: spawn errors become exit code 127.
pub trait StepRunner {
    fn run(&mut self, invocation: &Invocation) -> StepOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Children inherit stdin/stdout/stderr; nothing is captured.
    Passthrough,
    /// stdout/stderr are captured into the outcome.
    Capture,
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    mode: OutputMode,
}

impl ProcessRunner {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn passthrough() -> Self {
        Self::new(OutputMode::Passthrough)
    }

    pub fn capture() -> Self {
        Self::new(OutputMode::Capture)
    }
}

impl StepRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> StepOutcome {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        match self.mode {
            OutputMode::Passthrough => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status();

                match status {
                    Ok(s) => StepOutcome {
                        exit_code: command::exit_code(&s),
                        output: CapturedOutput::default(),
                    },
                    Err(e) => {
                        log_status!("rpmbox", "{}: {}", invocation.program, e);
                        spawn_failed(e)
                    }
                }
            }
            OutputMode::Capture => match cmd.stdin(Stdio::null()).output() {
                Ok(out) => StepOutcome {
                    exit_code: command::exit_code(&out.status),
                    output: CapturedOutput::from_output(&out),
                },
                Err(e) => spawn_failed(e),
            },
        }
    }
}

fn spawn_failed(e: std::io::Error) -> StepOutcome {
    log_debug!("rpmbox", "spawn failed: {}", e);
    StepOutcome {
        exit_code: EXIT_SPAWN_FAILED,
        output: CapturedOutput::new(String::new(), format!("Command error: {}", e)),
    }
}
