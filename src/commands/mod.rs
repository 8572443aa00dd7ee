use clap::Args;

use rpmbox::config::Overrides;

pub type CmdResult<T> = rpmbox::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub config: Option<String>,
}

/// Per-run overrides shared by `run` and `plan`. Each flag replaces the
/// matching rpmbox.json field.
#[derive(Args, Default, Debug, Clone)]
pub struct TargetArgs {
    /// Container engine CLI (docker, podman, ...)
    #[arg(long)]
    pub engine: Option<String>,

    /// Container name
    #[arg(long)]
    pub name: Option<String>,

    /// Image tag to build and run
    #[arg(long)]
    pub image: Option<String>,

    /// Build context directory
    #[arg(long, value_name = "DIR")]
    pub context: Option<String>,

    /// Host directory the RPMs are copied to
    #[arg(long, value_name = "DIR")]
    pub dest: Option<String>,

    /// Skip remaining build steps after the first failure (teardown still runs)
    #[arg(long)]
    pub fail_fast: bool,

    /// Also remove the image after the container is removed
    #[arg(long)]
    pub remove_image: bool,

    /// Refuse to start while another run uses the same container name
    #[arg(long)]
    pub single_instance: bool,
}

impl TargetArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            engine: self.engine.clone(),
            image: self.image.clone(),
            container: self.name.clone(),
            context: self.context.clone(),
            artifact_dest: self.dest.clone(),
            remove_image: self.remove_image,
            fail_fast: self.fail_fast,
            single_instance: self.single_instance,
        }
    }
}

pub mod config;
pub mod plan;
pub mod run;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (rpmbox::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Run(args) => {
            crate::tty::status("rpmbox is working...");
            dispatch!(args, global, run)
        }
        crate::Commands::Plan(args) => dispatch!(args, global, plan),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
