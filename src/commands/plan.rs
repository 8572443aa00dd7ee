use clap::Args;
use serde::Serialize;

use rpmbox::config;
use rpmbox::engine::Engine;
use rpmbox::orchestrator::Policy;
use rpmbox::{BuildPlan, CacheBust, StepKind};

use super::{CmdResult, GlobalArgs, TargetArgs};

#[derive(Args, Default, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Debug, Serialize)]
pub struct PlannedStep {
    step: StepKind,
    command: String,
}

#[derive(Debug, Serialize)]
pub struct PlanOutput {
    command: String,
    policy: Policy,
    cache_bust: String,
    /// Resolved engine binary, absent when it is not on PATH.
    #[serde(skip_serializing_if = "Option::is_none")]
    engine_path: Option<String>,
    steps: Vec<PlannedStep>,
}

pub fn run(args: PlanArgs, global: &GlobalArgs) -> CmdResult<PlanOutput> {
    let config = config::resolve(global.config.as_deref(), args.target.overrides())?;
    let plan = BuildPlan::from_config(&config, CacheBust::now());

    let engine_path = Engine::new(config.engine.clone())
        .locate()
        .ok()
        .map(|p| p.display().to_string());

    let steps = plan
        .steps
        .iter()
        .map(|s| PlannedStep {
            step: s.kind,
            command: s.invocation.command_line(),
        })
        .collect();

    Ok((
        PlanOutput {
            command: "plan".to_string(),
            policy: Policy::from_fail_fast(config.fail_fast),
            cache_bust: plan.cache_bust.to_string(),
            engine_path,
            steps,
        },
        0,
    ))
}
