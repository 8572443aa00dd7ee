use clap::{Args, Subcommand};
use serde::Serialize;

use rpmbox::config::{self, RpmboxConfig};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (rpmbox.json merged over built-in defaults)
    Show {
        /// Show only built-in defaults (ignore rpmbox.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Write the built-in defaults to rpmbox.json
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the path to rpmbox.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<RpmboxConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

impl ConfigOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            config: None,
            path: None,
            exists: None,
        }
    }
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let path = config::config_path(global.config.as_deref());

    match args.command {
        ConfigCommand::Show { builtin } => {
            let config = if builtin {
                RpmboxConfig::default()
            } else {
                config::load_from(&path)?
            };
            Ok((
                ConfigOutput {
                    config: Some(config),
                    ..ConfigOutput::new("config.show")
                },
                0,
            ))
        }
        ConfigCommand::Init { force } => {
            let config = RpmboxConfig::default();
            config::save_to(&path, &config, force)?;
            Ok((
                ConfigOutput {
                    config: Some(config),
                    path: Some(path.display().to_string()),
                    exists: Some(true),
                    ..ConfigOutput::new("config.init")
                },
                0,
            ))
        }
        ConfigCommand::Path => Ok((
            ConfigOutput {
                exists: Some(path.exists()),
                path: Some(path.display().to_string()),
                ..ConfigOutput::new("config.path")
            },
            0,
        )),
    }
}
