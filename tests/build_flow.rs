#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;

use rpmbox::config::{self, Overrides, RpmboxConfig};
use rpmbox::orchestrator::{self, Policy};
use rpmbox::runner::ProcessRunner;
use rpmbox::{BuildPlan, CacheBust, StepKind};
use tempfile::TempDir;

use common::{fake_engine, logged, serial};

fn config_for(engine: &Path, dir: &Path) -> RpmboxConfig {
    RpmboxConfig::default().apply(Overrides {
        engine: Some(engine.to_string_lossy().to_string()),
        context: Some(dir.to_string_lossy().to_string()),
        artifact_dest: Some(dir.join("RPMS").to_string_lossy().to_string()),
        ..Default::default()
    })
}

#[test]
fn successful_run_extracts_rpms_and_removes_container() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let (engine, log) = fake_engine(dir.path(), &[]);
    let config = config_for(&engine, dir.path());

    let plan = BuildPlan::from_config(&config, CacheBust(1_700_000_000));
    let report = orchestrator::execute(&plan, &mut ProcessRunner::capture(), Policy::BestEffort);

    let calls = logged(&log);
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[0], "rm --force rpmbox-build");
    assert_eq!(
        calls[1],
        format!(
            "build --build-arg REBUILD_STUFF=1700000000 -t rpmbox-build {}",
            dir.path().display()
        )
    );
    assert_eq!(calls[2], "run -d -it --name rpmbox-build rpmbox-build tail -f /dev/null");
    assert!(calls[3].starts_with("cp rpmbox-build:/home/cb/rpmbuild/RPMS "));
    assert_eq!(calls[4], "stop rpmbox-build");
    assert_eq!(calls[5], "rm rpmbox-build");

    assert!(report.success);
    assert_eq!(report.exit_code, 0);
    assert_eq!(report.artifacts.len(), 1);
    assert!(report.artifacts[0].ends_with("yara-connector-2.1-1.x86_64.rpm"));
    assert!(dir.path().join("RPMS/x86_64").is_dir());
}

#[test]
fn nothing_to_preclean_is_not_fatal() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let (engine, _log) = fake_engine(dir.path(), &[]);
    let config = config_for(&engine, dir.path());

    let plan = BuildPlan::from_config(&config, CacheBust::now());
    let report = orchestrator::execute(&plan, &mut ProcessRunner::capture(), Policy::FailFast);

    let preclean = report.step(StepKind::Preclean).unwrap();
    assert_eq!(preclean.exit_code, Some(1));
    assert!(report.success);
    assert_eq!(report.exit_code, 0);
}

#[test]
fn failed_build_still_attempts_every_step() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let (engine, log) = fake_engine(
        dir.path(),
        &[("build", 1), ("run", 125), ("cp", 1), ("stop", 1), ("rm", 1)],
    );
    let config = config_for(&engine, dir.path());

    let plan = BuildPlan::from_config(&config, CacheBust::now());
    let report = orchestrator::execute(&plan, &mut ProcessRunner::capture(), Policy::BestEffort);

    assert_eq!(logged(&log).len(), 6);
    assert!(report.steps.iter().all(|s| !s.skipped));
    assert!(!report.success);
    // Exit status is that of the last step (container removal).
    assert_eq!(report.exit_code, 1);
}

#[test]
fn fail_fast_tears_down_after_failed_build() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let (engine, log) = fake_engine(dir.path(), &[("build", 2)]);
    let config = config_for(&engine, dir.path());

    let plan = BuildPlan::from_config(&config, CacheBust::now());
    let report = orchestrator::execute(&plan, &mut ProcessRunner::capture(), Policy::FailFast);

    let subcommands: Vec<String> = logged(&log)
        .iter()
        .map(|l| l.split_whitespace().next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(subcommands, vec!["rm", "build", "stop", "rm"]);
    assert_eq!(report.exit_code, 2);
    assert!(report.artifacts.is_empty());
}

#[test]
fn image_removal_runs_last_when_enabled() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let (engine, log) = fake_engine(dir.path(), &[]);
    let mut config = config_for(&engine, dir.path());
    config.remove_image = true;

    let plan = BuildPlan::from_config(&config, CacheBust::now());
    orchestrator::execute(&plan, &mut ProcessRunner::capture(), Policy::BestEffort);

    let calls = logged(&log);
    assert_eq!(calls.len(), 7);
    assert_eq!(calls[6], "rmi --force rpmbox-build");
}

#[test]
fn missing_engine_fails_every_step_with_127() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-engine");
    let config = config_for(&missing, dir.path());

    let plan = BuildPlan::from_config(&config, CacheBust::now());
    let report = orchestrator::execute(&plan, &mut ProcessRunner::capture(), Policy::BestEffort);

    assert!(report.steps.iter().all(|s| s.exit_code == Some(127)));
    assert_eq!(report.exit_code, 127);
}

#[test]
fn sequential_runs_each_close_the_container_lifecycle() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let (engine, log) = fake_engine(dir.path(), &[]);
    let config = config_for(&engine, dir.path());

    for _ in 0..2 {
        let plan = BuildPlan::from_config(&config, CacheBust::now());
        let report =
            orchestrator::execute(&plan, &mut ProcessRunner::capture(), Policy::BestEffort);
        assert!(report.success);
    }

    let calls = logged(&log);
    assert_eq!(calls.len(), 12);
    assert_eq!(calls[5], "rm rpmbox-build");
    assert_eq!(calls[6], "rm --force rpmbox-build");
    assert_eq!(calls[11], "rm rpmbox-build");
}

#[test]
fn resolve_reads_file_and_applies_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rpmbox.json");
    fs::write(
        &path,
        r#"{"engine": "podman", "container": "yara-rpm", "fail_fast": true}"#,
    )
    .unwrap();

    let path_str = path.to_string_lossy().to_string();
    let config = config::resolve(
        Some(path_str.as_str()),
        Overrides {
            container: Some("override-rpm".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(config.engine, "podman");
    assert_eq!(config.container, "override-rpm");
    assert!(config.fail_fast);
}

#[test]
fn resolve_rejects_invalid_names() {
    let err = config::resolve(
        Some("/nonexistent/rpmbox.json"),
        Overrides {
            container: Some("bad name".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();

    assert_eq!(err.code.as_str(), "validation.invalid_argument");
}
