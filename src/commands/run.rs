use clap::Args;
use std::env;
use std::ffi::OsStr;

use rpmbox::config::{self, RpmboxConfig};
use rpmbox::engine;
use rpmbox::orchestrator::{self, Policy};
use rpmbox::runner::ProcessRunner;
use rpmbox::{BuildPlan, CacheBust, RunLock, RunReport};

use super::{CmdResult, GlobalArgs, TargetArgs};

#[derive(Args, Default, Debug)]
pub struct RunArgs {
    /// Capture step output and print a JSON report instead of streaming it
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the full build. Step failures are reported through the exit code,
/// never as `Err`; `Err` means the run could not start.
pub fn run(args: RunArgs, global: &GlobalArgs) -> CmdResult<RunReport> {
    let config = config::resolve(global.config.as_deref(), args.target.overrides())?;
    let policy = Policy::from_fail_fast(config.fail_fast);

    let path_var = env::var_os("PATH").unwrap_or_default();
    preflight(&config, policy, &path_var)?;

    // Held until the report is built so teardown finishes under the lock.
    let _lock = if config.single_instance {
        Some(RunLock::acquire(&config.container)?)
    } else {
        None
    };

    let plan = BuildPlan::from_config(&config, CacheBust::now());

    let mut runner = if args.json {
        ProcessRunner::capture()
    } else {
        ProcessRunner::passthrough()
    };

    let report = orchestrator::execute(&plan, &mut runner, policy);
    let exit_code = report.exit_code;

    Ok((report, exit_code))
}

/// Fail-fast runs refuse to start without an engine. Best-effort runs let a
/// missing engine surface as exit code 127 on every step.
fn preflight(config: &RpmboxConfig, policy: Policy, path_var: &OsStr) -> rpmbox::Result<()> {
    if policy == Policy::FailFast {
        let path = engine::locate_in(&config.engine, path_var)?;
        rpmbox::log_debug!("run", "Using engine {}", path.display());
    }
    Ok(())
}
