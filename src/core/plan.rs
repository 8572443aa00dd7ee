//! The ordered step list for one build.

use serde::Serialize;
use std::fmt;

use crate::config::RpmboxConfig;
use crate::engine::{Engine, Invocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Preclean,
    Build,
    Start,
    Copy,
    Stop,
    Remove,
    RemoveImage,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Preclean => "preclean",
            StepKind::Build => "build",
            StepKind::Start => "start",
            StepKind::Copy => "copy",
            StepKind::Stop => "stop",
            StepKind::Remove => "remove",
            StepKind::RemoveImage => "remove_image",
        }
    }

    /// Stop, remove and image removal always run, whatever happened before.
    pub fn is_teardown(&self) -> bool {
        matches!(
            self,
            StepKind::Stop | StepKind::Remove | StepKind::RemoveImage
        )
    }

    /// Failure is expected when there is nothing left over to remove.
    pub fn failure_ignored(&self) -> bool {
        matches!(self, StepKind::Preclean)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build-arg value that changes every run so the marked layer is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheBust(pub i64);

impl CacheBust {
    /// Current wall-clock time in whole seconds since the Unix epoch.
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }
}

impl fmt::Display for CacheBust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub kind: StepKind,
    pub invocation: Invocation,
}

#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub engine: String,
    pub image: String,
    pub container: String,
    pub cache_bust: CacheBust,
    pub artifact_dest: String,
    pub steps: Vec<Step>,
}

impl BuildPlan {
    /// Lay out the steps in their fixed order.
    ///
    /// Every step reads the container name from `config`, so stop/remove always
    /// target the container that start created.
    pub fn from_config(config: &RpmboxConfig, cache_bust: CacheBust) -> Self {
        let engine = Engine::new(config.engine.clone());
        let token = cache_bust.to_string();

        let mut steps = vec![
            Step {
                kind: StepKind::Preclean,
                invocation: engine.remove_container_forced(&config.container),
            },
            Step {
                kind: StepKind::Build,
                invocation: engine.build_image(
                    &config.image,
                    &config.context,
                    (config.cache_bust_arg.as_str(), token.as_str()),
                ),
            },
            Step {
                kind: StepKind::Start,
                invocation: engine.run_detached(
                    &config.container,
                    &config.image,
                    &config.keepalive_command,
                ),
            },
            Step {
                kind: StepKind::Copy,
                invocation: engine.copy_from(
                    &config.container,
                    &config.artifact_source,
                    &config.artifact_dest,
                ),
            },
            Step {
                kind: StepKind::Stop,
                invocation: engine.stop(&config.container),
            },
            Step {
                kind: StepKind::Remove,
                invocation: engine.remove_container(&config.container),
            },
        ];

        if config.remove_image {
            steps.push(Step {
                kind: StepKind::RemoveImage,
                invocation: engine.remove_image(&config.image),
            });
        }

        Self {
            engine: config.engine.clone(),
            image: config.image.clone(),
            container: config.container.clone(),
            cache_bust,
            artifact_dest: config.artifact_dest.clone(),
            steps,
        }
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(config: &RpmboxConfig) -> BuildPlan {
        BuildPlan::from_config(config, CacheBust(1_700_000_000))
    }

    #[test]
    fn default_plan_has_six_steps_in_order() {
        let plan = plan(&RpmboxConfig::default());
        assert_eq!(
            plan.kinds(),
            vec![
                StepKind::Preclean,
                StepKind::Build,
                StepKind::Start,
                StepKind::Copy,
                StepKind::Stop,
                StepKind::Remove,
            ]
        );
    }

    #[test]
    fn default_command_lines() {
        let lines: Vec<String> = plan(&RpmboxConfig::default())
            .steps
            .iter()
            .map(|s| s.invocation.command_line())
            .collect();

        assert_eq!(
            lines,
            vec![
                "docker rm --force rpmbox-build",
                "docker build --build-arg REBUILD_STUFF=1700000000 -t rpmbox-build .",
                "docker run -d -it --name rpmbox-build rpmbox-build tail -f /dev/null",
                "docker cp rpmbox-build:/home/cb/rpmbuild/RPMS ./RPMS",
                "docker stop rpmbox-build",
                "docker rm rpmbox-build",
            ]
        );
    }

    #[test]
    fn image_removal_is_opt_in() {
        let mut config = RpmboxConfig::default();
        config.remove_image = true;

        let plan = plan(&config);
        let last = plan.steps.last().unwrap();
        assert_eq!(last.kind, StepKind::RemoveImage);
        assert_eq!(last.invocation.command_line(), "docker rmi --force rpmbox-build");
    }

    #[test]
    fn every_container_step_uses_the_same_name() {
        let mut config = RpmboxConfig::default();
        config.container = "yara-rpm".to_string();
        config.image = "acme/yara-rpm:el8".to_string();

        let plan = plan(&config);
        for step in &plan.steps {
            let mentions = step
                .invocation
                .args
                .iter()
                .any(|a| a == "yara-rpm" || a.starts_with("yara-rpm:"));
            if step.kind != StepKind::Build {
                assert!(mentions, "{} does not target the container", step.kind);
            }
        }
    }

    #[test]
    fn cache_bust_is_an_integer_string() {
        let token = CacheBust::now().to_string();
        assert!(token.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn cache_bust_does_not_go_backwards() {
        let first = CacheBust::now();
        let second = CacheBust::now();
        assert!(second >= first);
    }

    #[test]
    fn teardown_and_ignored_steps() {
        assert!(StepKind::Stop.is_teardown());
        assert!(StepKind::RemoveImage.is_teardown());
        assert!(!StepKind::Copy.is_teardown());
        assert!(StepKind::Preclean.failure_ignored());
        assert!(!StepKind::Build.failure_ignored());
    }
}
