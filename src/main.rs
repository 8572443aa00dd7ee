use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Passthrough,
}

mod commands;
mod output;
mod tty;

use commands::{config, plan, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "rpmbox")]
#[command(version = VERSION)]
#[command(about = "Build RPM packages inside a throwaway container")]
struct Cli {
    /// Config file (defaults to ./rpmbox.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    /// Suppress status lines on stderr
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Print debug lines (step exit codes, durations, failure reasons) on stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Also append log lines to this file, rotated at 10 MB
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the image, extract the RPMs and tear the container down (default)
    Run(run::RunArgs),
    /// Show the command lines `run` would execute
    Plan(plan::PlanArgs),
    /// Inspect or create rpmbox.json
    Config(config::ConfigArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Run(args) if !args.json => ResponseMode::Passthrough,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    rpmbox::set_quiet(cli.quiet);
    rpmbox::set_debug(cli.debug);

    if let Some(path) = &cli.log_file {
        let path = std::path::PathBuf::from(shellexpand::tilde(path).to_string());
        if let Err(err) = rpmbox::logging::init_log_file(&path) {
            let _ = output::print_error(&err);
            return std::process::ExitCode::from(exit_code_to_u8(output::exit_code_for_error(
                err.code,
            )));
        }
    }

    let global = GlobalArgs {
        config: cli.config,
    };

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(run::RunArgs::default()));

    let exit_code = match (response_mode(&command), command) {
        // Children own stdout; only errors that prevent the run are printed.
        (ResponseMode::Passthrough, Commands::Run(args)) => match run::run(args, &global) {
            Ok((_report, exit_code)) => exit_code,
            Err(err) => {
                let _ = output::print_error(&err);
                output::exit_code_for_error(err.code)
            }
        },
        (_, command) => {
            let (json_result, exit_code) = commands::run_json(command, &global);
            let _ = output::print_json_result(json_result);
            exit_code
        }
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
