//! Tests for `WslBackend` existence checks, retries and capability probes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use apx_cli::application::WslBackend;
use apx_cli::domain::{CommandError, ExecError};
use tokio_util::sync::CancellationToken;

use crate::helpers::{FAKE_EXE, FakeWsl};

fn backend(fake: &FakeWsl) -> WslBackend<FakeWsl> {
    WslBackend::new(fake.clone(), FAKE_EXE).with_poll_interval(Duration::ZERO)
}

#[tokio::test]
async fn test_list_distros_trims_and_drops_blanks() {
    let fake = FakeWsl::with_seed();
    fake.add_distro("  ", None);
    fake.add_distro(" dev ", None);

    let names = backend(&fake)
        .list_distros(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(names, ["Ubuntu", "dev"]);
}

#[tokio::test]
async fn test_exists_matches_list_case_insensitively_without_probe() {
    let fake = FakeWsl::with_seed();

    let exists = backend(&fake)
        .distro_exists("  ubuntu ", &CancellationToken::new())
        .await
        .unwrap();

    assert!(exists);
    assert!(fake.calls_with("-d").is_empty());
}

#[tokio::test]
async fn test_exists_probes_when_missing_from_list() {
    let fake = FakeWsl::with_seed();

    let exists = backend(&fake)
        .distro_exists("ghost", &CancellationToken::new())
        .await
        .unwrap();

    assert!(!exists);
    assert_eq!(fake.calls_with("-d"), [vec!["-d", "ghost", "--", "true"]]);
}

#[tokio::test]
async fn test_exists_trusts_successful_probe_over_stale_list() {
    let fake = FakeWsl::with_seed();
    fake.0.borrow_mut().unlisted.push("fresh".to_string());

    let exists = backend(&fake)
        .distro_exists("fresh", &CancellationToken::new())
        .await
        .unwrap();

    assert!(exists);
}

#[tokio::test]
async fn test_exists_treats_unrelated_probe_failure_as_missing() {
    let fake = FakeWsl::with_seed();
    fake.0.borrow_mut().probe_stderr = Some("Catastrophic failure".to_string());

    let exists = backend(&fake)
        .distro_exists("dev", &CancellationToken::new())
        .await
        .unwrap();

    assert!(!exists);
}

#[tokio::test]
async fn test_exists_blank_name_is_false_without_calls() {
    let fake = FakeWsl::with_seed();

    let exists = backend(&fake)
        .distro_exists(" \t ", &CancellationToken::new())
        .await
        .unwrap();

    assert!(!exists);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_appears_immediately_without_shutdown() {
    let fake = FakeWsl::with_seed();

    let appeared = backend(&fake)
        .ensure_distro_appears("Ubuntu", 3, &CancellationToken::new())
        .await
        .unwrap();

    assert!(appeared);
    assert!(fake.calls_with("--shutdown").is_empty());
}

#[tokio::test]
async fn test_appears_after_shutdown() {
    let fake = FakeWsl::with_seed();
    fake.0.borrow_mut().hidden.push("dev".to_string());

    let appeared = backend(&fake)
        .ensure_distro_appears("dev", 3, &CancellationToken::new())
        .await
        .unwrap();

    assert!(appeared);
    assert_eq!(fake.calls_with("--shutdown").len(), 1);
    assert_eq!(fake.calls_with("-l").len(), 4, "three polls, then one after shutdown");
}

#[tokio::test]
async fn test_never_appears_polls_both_phases() {
    let fake = FakeWsl::with_seed();

    let appeared = backend(&fake)
        .ensure_distro_appears("ghost", 2, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!appeared);
    assert_eq!(fake.calls_with("-l").len(), 4);
    assert_eq!(fake.calls_with("--shutdown").len(), 1);
}

#[tokio::test]
async fn test_appears_honours_cancellation() {
    let fake = FakeWsl::with_seed();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = backend(&fake)
        .ensure_distro_appears("dev", 2, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Cancelled));
}

#[tokio::test]
async fn test_supports_cd_reads_help_output() {
    let fake = FakeWsl::with_seed();
    let cancel = CancellationToken::new();
    assert!(backend(&fake).supports_cd(&cancel).await.unwrap());

    fake.0.borrow_mut().help_has_cd = false;
    assert!(!backend(&fake).supports_cd(&cancel).await.unwrap());
}

#[tokio::test]
async fn test_base_image_export_writes_target_once() {
    let fake = FakeWsl::with_seed();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("base").join("ubuntu-base.tar");
    let cancel = CancellationToken::new();
    let b = backend(&fake);

    b.ensure_base_image(&target, "Ubuntu", &|_| {}, &cancel)
        .await
        .unwrap();
    b.ensure_base_image(&target, "Ubuntu", &|_| {}, &cancel)
        .await
        .unwrap();

    assert!(target.is_file());
    assert_eq!(fake.calls_with("--export").len(), 1);
}

#[tokio::test]
async fn test_base_image_missing_seed_is_precondition_failure() {
    let fake = FakeWsl::default();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ubuntu-base.tar");

    let err = backend(&fake)
        .ensure_base_image(&target, "Ubuntu", &|_| {}, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::PreconditionFailed(_)));
    assert!(!target.exists());
}
