//! Runs a [`BuildPlan`] step by step.
//!
//! Steps run strictly in order; each blocks until its process exits. How a
//! failed step affects the rest of the run is decided by [`Policy`]:
//!
//! - `BestEffort` runs every step regardless and exits with the last step's code.
//! - `FailFast` skips the remaining build/start/copy steps after the first
//!   failure, still runs teardown, and exits with the first failure's code.
//!
//! The preclean step's outcome never matters under either policy.

use serde::Serialize;
use std::time::Instant;

use crate::artifacts;
use crate::output::{RunReport, StepReport};
use crate::plan::{BuildPlan, Step, StepKind};
use crate::runner::StepRunner;
use crate::utils::command::CapturedOutput;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    #[default]
    BestEffort,
    FailFast,
}

impl Policy {
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            Policy::FailFast
        } else {
            Policy::BestEffort
        }
    }
}

pub fn execute<R: StepRunner + ?Sized>(
    plan: &BuildPlan,
    runner: &mut R,
    policy: Policy,
) -> RunReport {
    let mut reports = Vec::with_capacity(plan.steps.len());
    let mut first_failure: Option<i32> = None;
    let mut last_code = 0;
    let mut copied = false;

    for step in &plan.steps {
        if policy == Policy::FailFast && first_failure.is_some() && !step.kind.is_teardown() {
            log_status!("rpmbox", "{}: skipped after earlier failure", step.kind);
            reports.push(skipped(step));
            continue;
        }

        let report = run_step(step, runner);
        let code = report.exit_code.unwrap_or(0);
        last_code = code;

        if code != 0 && !step.kind.failure_ignored() && first_failure.is_none() {
            first_failure = Some(code);
        }
        if step.kind == StepKind::Copy && code == 0 {
            copied = true;
        }

        reports.push(report);
    }

    let exit_code = match policy {
        Policy::BestEffort => last_code,
        Policy::FailFast => first_failure.unwrap_or(0),
    };

    // Files under the destination only count when this run's copy succeeded.
    let artifacts = if copied {
        artifacts::list_rpms(&plan.artifact_dest)
    } else {
        Vec::new()
    };

    RunReport {
        engine: plan.engine.clone(),
        image: plan.image.clone(),
        container: plan.container.clone(),
        cache_bust: plan.cache_bust.to_string(),
        policy,
        steps: reports,
        artifacts,
        exit_code,
        success: first_failure.is_none(),
    }
}

fn run_step<R: StepRunner + ?Sized>(step: &Step, runner: &mut R) -> StepReport {
    let command = step.invocation.command_line();
    log_status!("rpmbox", "{}: {}", step.kind, command);

    let started = Instant::now();
    let outcome = runner.run(&step.invocation);
    let duration_ms = started.elapsed().as_millis() as u64;

    log_debug!(
        "rpmbox",
        "{}: exit code {} after {} ms",
        step.kind,
        outcome.exit_code,
        duration_ms
    );

    let error = if outcome.success() {
        None
    } else {
        outcome.output.error_text()
    };

    if !outcome.success() {
        if step.kind.failure_ignored() {
            log_status!("rpmbox", "{}: exited with {} (ignored)", step.kind, outcome.exit_code);
        } else {
            log_status!("rpmbox", "{}: exited with {}", step.kind, outcome.exit_code);
        }
        if let Some(text) = &error {
            log_debug!("rpmbox", "{}: {}", step.kind, text);
        }
    }

    StepReport {
        step: step.kind,
        command,
        exit_code: Some(outcome.exit_code),
        success: outcome.success(),
        skipped: false,
        duration_ms,
        error,
        output: outcome.output,
    }
}

fn skipped(step: &Step) -> StepReport {
    StepReport {
        step: step.kind,
        command: step.invocation.command_line(),
        exit_code: None,
        success: false,
        skipped: true,
        duration_ms: 0,
        error: None,
        output: CapturedOutput::default(),
    }
}
