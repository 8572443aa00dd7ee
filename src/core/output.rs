//! Public output types for rpmbox command responses.

use serde::Serialize;

use crate::orchestrator::Policy;
use crate::plan::StepKind;
use crate::utils::command::CapturedOutput;

/// Result of one plan step. Skipped steps carry no exit code.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: StepKind,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub success: bool,
    pub skipped: bool,
    pub duration_ms: u64,
    /// Why a failed step failed, taken from its captured output (`--json` runs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub output: CapturedOutput,
}

/// Result of a full `run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub engine: String,
    pub image: String,
    pub container: String,
    pub cache_bust: String,
    pub policy: Policy,
    pub steps: Vec<StepReport>,
    /// `*.rpm` files found under the artifact destination after the copy step.
    pub artifacts: Vec<String>,
    pub exit_code: i32,
    /// True when no step whose failure matters exited non-zero.
    pub success: bool,
}

impl RunReport {
    pub fn step(&self, kind: StepKind) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == kind)
    }
}
