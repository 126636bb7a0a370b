#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the launch command.
//!
//! A shell script stands in for `javaws`, recording the arguments it was
//! started with and copying the descriptor it was handed.

mod common;

use common::{NoPrompt, TestHome, TestHomeBuilder, cli, exists, position};
use drac_kvm::commands::launch;
use drac_kvm::error::{KvmError, LaunchError, ResolveError};
use drac_kvm::logging::Logger;
use drac_kvm::vendor::VendorRegistry;

fn run(home: &TestHome, args: &[&str]) -> anyhow::Result<()> {
    launch::execute(
        &cli(args),
        Some(&home.config_path()),
        &VendorRegistry::builtin(),
        &NoPrompt,
        &Logger::new("integration-test"),
    )
}

fn home_with_javaws(config: &str, launch_exit: i32) -> TestHome {
    let home = TestHomeBuilder::new().with_fake_javaws(launch_exit).build();
    let config = format!(
        "[defaults]\njavaws_path = {}\n{config}",
        home.javaws_path().display()
    );
    std::fs::write(home.config_path(), config).unwrap();
    home
}

#[test]
fn launches_javaws_with_descriptor_and_fixed_flags() {
    let home = home_with_javaws("", 0);
    run(&home, &["--host", "10.0.0.5", "--version", "7", "--delay", "0"]).unwrap();

    let args = home.recorded_args();
    assert!(args.contains(".jnlp -nosecurity -noupdate -Xnofork"), "got: {args}");

    let document = home.recorded_descriptor();
    assert!(document.contains("iDRAC7"));
    let user = position(&document, "<argument>root</argument>");
    let pass = position(&document, "<argument>calvin</argument>");
    assert!(user < pass);
}

#[test]
fn descriptor_file_is_removed_after_launch() {
    let home = home_with_javaws("", 0);
    run(&home, &["--host", "10.0.0.5", "--version", "8", "-d", "0"]).unwrap();
    let args = home.recorded_args();
    let file = args.split_whitespace().next().unwrap();
    assert!(file.ends_with(".jnlp"));
    assert!(!exists(file));
}

#[test]
fn cli_javaws_is_used_without_config_entry() {
    let home = TestHomeBuilder::new().with_fake_javaws(0).build();
    let javaws = home.javaws_path();
    run(&home, &[
        "--host",
        "ilo-1",
        "--vendor",
        "hp",
        "--javaws",
        javaws.to_str().unwrap(),
        "--delay",
        "0",
    ])
    .unwrap();
    assert!(home.recorded_descriptor().contains("Administrator"));
}

#[test]
fn missing_javaws_fails_before_resolution() {
    let home = TestHomeBuilder::new()
        .with_config("[defaults]\njavaws_path = /nonexistent/javaws\n")
        .build();
    let err = run(&home, &["--host", "h", "--vendor", "ibm"]).unwrap_err();
    let launch_err = err.downcast_ref::<LaunchError>().expect("LaunchError");
    assert!(matches!(launch_err, LaunchError::JavawsNotFound(_)));
}

#[test]
fn missing_host_is_reported() {
    let home = home_with_javaws("", 0);
    let err = run(&home, &["--delay", "0"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<KvmError>(),
        Some(KvmError::Resolve(ResolveError::MissingHost))
    ));
}

#[test]
fn missing_host_wins_over_missing_javaws() {
    let home = TestHomeBuilder::new()
        .with_config("[defaults]\njavaws_path = /nonexistent/javaws\n")
        .build();
    let err = run(&home, &[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<KvmError>(),
        Some(KvmError::Resolve(ResolveError::MissingHost))
    ));
}

#[test]
fn missing_host_wins_over_broken_config() {
    let home = TestHomeBuilder::new().with_config("[defaults\n").build();
    let err = run(&home, &["--username", "admin"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<KvmError>(),
        Some(KvmError::Resolve(ResolveError::MissingHost))
    ));
}

#[test]
fn unreadable_config_launches_with_vendor_defaults() {
    let home = TestHomeBuilder::new().with_fake_javaws(0).build();
    std::fs::create_dir(home.config_path()).unwrap();
    let javaws = home.javaws_path();
    run(&home, &[
        "--host",
        "10.0.0.5",
        "--version",
        "7",
        "--javaws",
        javaws.to_str().unwrap(),
        "--delay",
        "0",
    ])
    .unwrap();
    let document = home.recorded_descriptor();
    assert!(document.contains("<argument>root</argument>"));
    assert!(document.contains("<argument>calvin</argument>"));
}

#[test]
fn viewer_failure_is_launch_error() {
    let home = home_with_javaws("", 1);
    let err = run(&home, &["--host", "h", "--version", "7", "-d", "0"]).unwrap_err();
    let Some(LaunchError::ViewerFailed { file, reason }) = err.downcast_ref::<LaunchError>()
    else {
        unreachable!("expected ViewerFailed, got {err:#}");
    };
    assert!(reason.contains("exit 1"));
    assert!(!exists(file));
}

#[test]
fn keep_jnlp_preserves_descriptor_on_failure() {
    let home = home_with_javaws("", 1);
    let err = run(&home, &["--host", "h", "--version", "7", "-d", "0", "-k"]).unwrap_err();
    let Some(LaunchError::ViewerFailed { file, .. }) = err.downcast_ref::<LaunchError>() else {
        unreachable!("expected ViewerFailed, got {err:#}");
    };
    assert!(exists(file));
    std::fs::remove_file(file).unwrap();
}

#[test]
fn unsupported_version_is_render_error() {
    let home = home_with_javaws("", 0);
    let err = run(&home, &["--host", "h", "--version", "9", "-d", "0"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<KvmError>(),
        Some(KvmError::Render(_))
    ));
    assert!(format!("{err:#}").contains("vendor 'dell' version 9"));
}

#[test]
fn broken_config_is_fatal() {
    let home = TestHomeBuilder::new().with_config("[defaults\n").build();
    let err = run(&home, &["--host", "h"]).unwrap_err();
    assert!(format!("{err:#}").contains("line 1"));
}
