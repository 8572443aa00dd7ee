//! Container-engine command lines.
//!
//! Every method returns an [`Invocation`]; nothing here spawns a process.
//! Any docker-compatible CLI works (`docker`, `podman`, `nerdctl`).

use serde::Serialize;
use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::utils::shell;

/// A program plus its arguments, executed directly without a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Copy-pasteable command line for reports.
    pub fn command_line(&self) -> String {
        shell::command_line(&self.program, &self.args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    program: String,
}

impl Engine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn invoke<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(self.program.clone(), args.into_iter().map(Into::into).collect())
    }

    /// `rm --force <container>`: also removes a container left running by an interrupted run.
    pub fn remove_container_forced(&self, container: &str) -> Invocation {
        self.invoke(["rm", "--force", container])
    }

    /// `build --build-arg <arg>=<value> -t <image> <context>`
    pub fn build_image(&self, image: &str, context: &str, build_arg: (&str, &str)) -> Invocation {
        let (name, value) = build_arg;
        self.invoke([
            "build".to_string(),
            "--build-arg".to_string(),
            format!("{}={}", name, value),
            "-t".to_string(),
            image.to_string(),
            context.to_string(),
        ])
    }

    /// `run -d -it --name <container> <image> <command...>`
    pub fn run_detached(&self, container: &str, image: &str, command: &[String]) -> Invocation {
        let mut args: Vec<String> = ["run", "-d", "-it", "--name", container, image]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.extend(command.iter().cloned());
        Invocation::new(self.program.clone(), args)
    }

    /// `cp <container>:<source> <dest>`
    pub fn copy_from(&self, container: &str, source: &str, dest: &str) -> Invocation {
        self.invoke([
            "cp".to_string(),
            format!("{}:{}", container, source),
            dest.to_string(),
        ])
    }

    pub fn stop(&self, container: &str) -> Invocation {
        self.invoke(["stop", container])
    }

    pub fn remove_container(&self, container: &str) -> Invocation {
        self.invoke(["rm", container])
    }

    /// `rmi --force <image>`
    pub fn remove_image(&self, image: &str) -> Invocation {
        self.invoke(["rmi", "--force", image])
    }

    /// Find the engine binary on `PATH`.
    pub fn locate(&self) -> Result<PathBuf> {
        let path_var = env::var_os("PATH").unwrap_or_default();
        locate_in(&self.program, &path_var)
    }
}

/// Resolve `program` against a PATH-style list of directories.
///
/// A program containing a path separator is checked as-is.
pub fn locate_in(program: &str, path_var: &OsStr) -> Result<PathBuf> {
    let candidate = PathBuf::from(program);
    if candidate.components().count() > 1 {
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(Error::engine_not_found(program, "file does not exist"));
    }

    env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::engine_not_found(program, "not found on PATH"))
}
