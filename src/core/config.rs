use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::{io, validation};

/// Default config file, looked up in the current directory.
pub const CONFIG_FILE: &str = "rpmbox.json";

/// Everything `run` and `plan` need to build the step list.
///
/// Every field has a serde default, so a partial rpmbox.json is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpmboxConfig {
    #[serde(default = "default_engine")]
    pub engine: String,

    #[serde(default = "default_name")]
    pub image: String,

    #[serde(default = "default_name")]
    pub container: String,

    #[serde(default = "default_context")]
    pub context: String,

    #[serde(default = "default_cache_bust_arg")]
    pub cache_bust_arg: String,

    #[serde(default = "default_keepalive_command")]
    pub keepalive_command: Vec<String>,

    #[serde(default = "default_artifact_source")]
    pub artifact_source: String,

    #[serde(default = "default_artifact_dest")]
    pub artifact_dest: String,

    /// Run `rmi --force <image>` after the container is removed.
    #[serde(default)]
    pub remove_image: bool,

    /// Stop the build/start/copy chain at the first failure (teardown still runs).
    #[serde(default)]
    pub fail_fast: bool,

    /// Refuse to start while another run holds the lock for the same container.
    #[serde(default)]
    pub single_instance: bool,
}

impl Default for RpmboxConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            image: default_name(),
            container: default_name(),
            context: default_context(),
            cache_bust_arg: default_cache_bust_arg(),
            keepalive_command: default_keepalive_command(),
            artifact_source: default_artifact_source(),
            artifact_dest: default_artifact_dest(),
            remove_image: false,
            fail_fast: false,
            single_instance: false,
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_engine() -> String {
    "docker".to_string()
}

fn default_name() -> String {
    "rpmbox-build".to_string()
}

fn default_context() -> String {
    ".".to_string()
}

fn default_cache_bust_arg() -> String {
    "REBUILD_STUFF".to_string()
}

fn default_keepalive_command() -> Vec<String> {
    vec!["tail".to_string(), "-f".to_string(), "/dev/null".to_string()]
}

fn default_artifact_source() -> String {
    "/home/cb/rpmbuild/RPMS".to_string()
}

fn default_artifact_dest() -> String {
    "./RPMS".to_string()
}

/// Per-field CLI overrides. `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub engine: Option<String>,
    pub image: Option<String>,
    pub container: Option<String>,
    pub context: Option<String>,
    pub artifact_dest: Option<String>,
    pub remove_image: bool,
    pub fail_fast: bool,
    pub single_instance: bool,
}

impl RpmboxConfig {
    /// Apply CLI overrides on top of file values. Boolean flags can only enable.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(engine) = overrides.engine {
            self.engine = engine;
        }
        if let Some(image) = overrides.image {
            self.image = image;
        }
        if let Some(container) = overrides.container {
            self.container = container;
        }
        if let Some(context) = overrides.context {
            self.context = context;
        }
        if let Some(dest) = overrides.artifact_dest {
            self.artifact_dest = dest;
        }
        self.remove_image |= overrides.remove_image;
        self.fail_fast |= overrides.fail_fast;
        self.single_instance |= overrides.single_instance;
        self
    }

    /// Check every field the engine will see before any process is started.
    pub fn validate(&self) -> Result<()> {
        validation::require_trimmed(&self.engine, "engine", "Engine cannot be empty")?;
        validation::require_container_name(&self.container, "container")?;
        validation::require_image_ref(&self.image, "image")?;
        validation::require_trimmed(&self.context, "context", "Build context cannot be empty")?;
        validation::require_build_arg_name(&self.cache_bust_arg, "cache_bust_arg")?;
        validation::require_non_empty_vec(
            &self.keepalive_command,
            "keepalive_command",
            "Keepalive command cannot be empty",
        )?;
        validation::require_trimmed(
            &self.keepalive_command[0],
            "keepalive_command",
            "Keepalive program cannot be empty",
        )?;
        validation::require_trimmed(
            &self.artifact_dest,
            "artifact_dest",
            "Artifact destination cannot be empty",
        )?;

        if !self.artifact_source.starts_with('/') {
            return Err(Error::validation_invalid_argument(
                "artifact_source",
                "must be an absolute path inside the container",
                Some(self.artifact_source.clone()),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Resolve the config file path: explicit `--config` (tilde-expanded) or ./rpmbox.json.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(shellexpand::tilde(path).to_string()),
        None => PathBuf::from(CONFIG_FILE),
    }
}

/// Load config from `path`, falling back to built-in defaults when the file is missing.
///
/// A file that exists but does not parse is an error rather than a silent fallback.
pub fn load_from(path: &Path) -> Result<RpmboxConfig> {
    if !path.exists() {
        return Ok(RpmboxConfig::default());
    }

    let content = io::read_file(path, &format!("read {}", path.display()))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}

/// Load, override and validate in one step.
pub fn resolve(explicit: Option<&str>, overrides: Overrides) -> Result<RpmboxConfig> {
    let config = load_from(&config_path(explicit))?.apply(overrides);
    config.validate()?;
    Ok(config)
}

/// Write config to `path`. Refuses to overwrite unless `force` is set.
pub fn save_to(path: &Path, config: &RpmboxConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config_already_exists(path.display().to_string()));
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize config".to_string())))?;

    io::write_file_atomic(path, &content, &format!("write {}", path.display()))
}
