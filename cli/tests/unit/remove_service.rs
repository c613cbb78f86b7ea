//! Tests for the `remove` application service.

#![allow(clippy::expect_used)]

use std::io::ErrorKind;
use std::time::Duration;

use quadlet_cli::application::services::install::{InstallOptions, install_quadlets};
use quadlet_cli::application::services::list::list_quadlets;
use quadlet_cli::application::services::remove::{RemoveOptions, remove_quadlets};
use quadlet_cli::domain::{CancelToken, JobResult, ListFilters, QuadletError};
use quadlet_cli::infra::fetch::DefaultSourceFetcher;

use crate::helpers::{Fixture, WEB_CONTAINER};
use crate::mocks::{FaultyFs, MockArtifactStore, MockGenerator, MockServiceManager};

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_string()).collect()
}

fn force() -> RemoveOptions {
    RemoveOptions {
        force: true,
        ..RemoveOptions::default()
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_names_without_all_is_no_targets() {
    let fx = Fixture::new();
    let manager = MockServiceManager::default();

    let err = remove_quadlets(
        &fx.ctx(&manager),
        &[],
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect_err("no targets");
    assert!(matches!(err, QuadletError::NoTargets));
    assert!(manager.calls().is_empty());
}

#[tokio::test]
async fn test_missing_quadlet_with_ignore_counts_as_removed() {
    let fx = Fixture::new();
    let manager = MockServiceManager::default();
    let options = RemoveOptions {
        ignore: true,
        ..RemoveOptions::default()
    };

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["x.container"]),
        &options,
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().collect::<Vec<_>>(), vec!["x.container"]);
    assert_eq!(report.errors().count(), 0);
}

#[tokio::test]
async fn test_missing_quadlet_without_ignore_is_not_found() {
    let fx = Fixture::new();
    let manager = MockServiceManager::default();

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["x.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].1, QuadletError::NotFound(_)));
    assert!(report.has_failures());
}

#[tokio::test]
async fn test_unsupported_name_is_rejected() {
    let fx = Fixture::new();
    let manager = MockServiceManager::default();

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["notes.txt"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert!(matches!(
        report.outcomes[0].result,
        Err(QuadletError::UnsupportedExtension { .. })
    ));
}

#[tokio::test]
async fn test_unparsable_quadlet_is_kept_with_parse_error() {
    let fx = Fixture::new();
    let path = fx.installed("user", "broken.container", "Image=orphan-key\n");
    let manager = MockServiceManager::default();

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["broken.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert!(matches!(report.outcomes[0].result, Err(QuadletError::Parse { .. })));
    assert!(path.exists());
}

// ── Running services ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_running_quadlet_without_force_is_kept() {
    let fx = Fixture::new();
    let path = fx.installed("user", "web.container", WEB_CONTAINER);
    let manager = MockServiceManager::default().with_unit("web.service", "active", "running");

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "web.container");
    assert!(matches!(errors[0].1, QuadletError::Running(_)));
    assert!(path.exists());
    assert_eq!(manager.count("stop:"), 0);
}

#[tokio::test]
async fn test_running_quadlet_with_force_is_stopped_and_deleted() {
    let fx = Fixture::new();
    let path = fx.installed("user", "web.container", WEB_CONTAINER);
    let manager = MockServiceManager::default().with_unit("web.service", "active", "running");

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container"]),
        &force(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().collect::<Vec<_>>(), vec!["web.container"]);
    assert!(!report.has_failures());
    assert!(!path.exists());
    assert_eq!(manager.active_state("web.service").as_deref(), Some("inactive"));
    assert_eq!(
        manager.calls(),
        vec!["connect", "list:1", "stop:web.service", "reload"]
    );

    let entries = list_quadlets(&fx.ctx(&manager), &ListFilters::default())
        .await
        .expect("list");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_failed_stop_keeps_file_and_records_stop_error() {
    let fx = Fixture::new();
    let path = fx.installed("user", "web.container", WEB_CONTAINER);
    let manager = MockServiceManager {
        stop_result: JobResult::Timeout,
        ..MockServiceManager::default()
    }
    .with_unit("web.service", "active", "running");

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container"]),
        &force(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert!(matches!(
        report.outcomes[0].result,
        Err(QuadletError::Stop { ref reason, .. }) if reason == "timeout"
    ));
    assert!(path.exists());
}

#[tokio::test]
async fn test_stops_run_one_at_a_time_in_order() {
    let fx = Fixture::new();
    fx.installed("user", "a.container", "[Container]\nImage=a\n");
    fx.installed("user", "b.container", "[Container]\nImage=b\n");
    let manager = MockServiceManager::default()
        .with_unit("a.service", "active", "running")
        .with_unit("b.service", "active", "running");

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["b.container", "a.container"]),
        &RemoveOptions {
            force: true,
            stop_timeout: Duration::from_secs(1),
            ..RemoveOptions::default()
        },
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().count(), 2);
    assert_eq!(
        manager.calls(),
        vec!["connect", "list:2", "stop:b.service", "stop:a.service", "reload"]
    );
}

// ── Reload ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_never_loaded_quadlet_is_deleted_without_reload() {
    let fx = Fixture::new();
    let path = fx.installed("user", "web.container", WEB_CONTAINER);
    let manager = MockServiceManager::default();

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().count(), 1);
    assert!(!path.exists());
    assert_eq!(manager.count("reload"), 0);
}

#[tokio::test]
async fn test_loaded_inactive_quadlet_triggers_single_reload() {
    let fx = Fixture::new();
    fx.installed("user", "web.container", WEB_CONTAINER);
    fx.installed("user", "data.volume", "[Volume]\n");
    let manager = MockServiceManager::default()
        .with_unit("web.service", "inactive", "dead")
        .with_unit("data-volume.service", "inactive", "dead");

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container", "data.volume"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().count(), 2);
    assert_eq!(manager.count("reload"), 1);
    assert_eq!(manager.count("stop:"), 0);
}

#[tokio::test]
async fn test_reload_failure_is_batch_error_after_delete() {
    let fx = Fixture::new();
    let path = fx.installed("user", "web.container", WEB_CONTAINER);
    let manager = MockServiceManager {
        reload_fails: true,
        ..MockServiceManager::default()
    }
    .with_unit("web.service", "inactive", "dead");

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().count(), 1);
    assert!(!path.exists());
    assert!(matches!(
        report.batch_errors.as_slice(),
        [QuadletError::ReloadFailed(_)]
    ));
}

// ── All ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_all_removes_every_enumerated_quadlet() {
    let fx = Fixture::with_dirs(&["etc", "user"]);
    let a = fx.installed("etc", "web.container", WEB_CONTAINER);
    let b = fx.installed("user", "web.container", WEB_CONTAINER);
    let c = fx.installed("user", "data.volume", "[Volume]\n");
    let manager = MockServiceManager::default();
    let options = RemoveOptions {
        all: true,
        ..RemoveOptions::default()
    };

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["ignored.container"]),
        &options,
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().count(), 3);
    assert!(!a.exists() && !b.exists() && !c.exists());
}

#[tokio::test]
async fn test_all_on_empty_tree_is_empty_report() {
    let fx = Fixture::new();
    let manager = MockServiceManager::default();
    let options = RemoveOptions {
        all: true,
        ..RemoveOptions::default()
    };

    let report = remove_quadlets(&fx.ctx(&manager), &[], &options, &CancelToken::new())
        .await
        .expect("remove");
    assert!(report.outcomes.is_empty());
}

// ── Files removed concurrently ────────────────────────────────────────────────

fn ghost_fs() -> FaultyFs {
    FaultyFs {
        phantom: vec!["ghost.container".to_string()],
        ..FaultyFs::default()
    }
}

#[tokio::test]
async fn test_all_treats_vanished_quadlet_as_removed() {
    let fx = Fixture::new();
    let real = fx.installed("user", "web.container", WEB_CONTAINER);
    let fs = ghost_fs();
    let manager = MockServiceManager::default();
    let options = RemoveOptions {
        all: true,
        ..RemoveOptions::default()
    };

    let report = remove_quadlets(
        &fx.ctx_with(&fs, &manager),
        &[],
        &options,
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.errors().count(), 0, "errors: {:?}", report.outcomes);
    let mut removed: Vec<_> = report.removed().collect();
    removed.sort_unstable();
    assert_eq!(removed, vec!["ghost.container", "web.container"]);
    assert!(!real.exists());
}

#[tokio::test]
async fn test_ignore_treats_vanished_quadlet_as_removed() {
    let fx = Fixture::new();
    fx.installed("user", "web.container", WEB_CONTAINER);
    let fs = ghost_fs();
    let manager = MockServiceManager::default();
    let options = RemoveOptions {
        ignore: true,
        ..RemoveOptions::default()
    };

    let report = remove_quadlets(
        &fx.ctx_with(&fs, &manager),
        &names(&["ghost.container"]),
        &options,
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().collect::<Vec<_>>(), vec!["ghost.container"]);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_vanished_quadlet_without_ignore_is_io_error() {
    let fx = Fixture::new();
    fx.installed("user", "web.container", WEB_CONTAINER);
    let fs = ghost_fs();
    let manager = MockServiceManager::default();

    let report = remove_quadlets(
        &fx.ctx_with(&fs, &manager),
        &names(&["ghost.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert!(matches!(report.outcomes[0].result, Err(QuadletError::Io { .. })));
}

#[tokio::test]
async fn test_file_already_gone_at_delete_time_counts_as_removed() {
    let fx = Fixture::new();
    fx.installed("user", "web.container", WEB_CONTAINER);
    let fs = FaultyFs {
        remove_error: Some(ErrorKind::NotFound),
        ..FaultyFs::default()
    };
    let manager = MockServiceManager::default();

    let report = remove_quadlets(
        &fx.ctx_with(&fs, &manager),
        &names(&["web.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert_eq!(report.removed().collect::<Vec<_>>(), vec!["web.container"]);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_delete_failure_keeps_file_and_records_delete_error() {
    let fx = Fixture::new();
    let path = fx.installed("user", "web.container", WEB_CONTAINER);
    let fs = FaultyFs {
        remove_error: Some(ErrorKind::PermissionDenied),
        ..FaultyFs::default()
    };
    let manager = MockServiceManager::default();

    let report = remove_quadlets(
        &fx.ctx_with(&fs, &manager),
        &names(&["web.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");

    assert!(matches!(report.outcomes[0].result, Err(QuadletError::Delete { .. })));
    assert!(path.exists());
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancelled_remove_deletes_nothing() {
    let fx = Fixture::new();
    let path = fx.installed("user", "web.container", WEB_CONTAINER);
    let manager = MockServiceManager::default();
    let cancel = CancelToken::new();
    cancel.cancel();

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container"]),
        &RemoveOptions::default(),
        &cancel,
    )
    .await
    .expect("remove");

    assert!(matches!(report.outcomes[0].result, Err(QuadletError::Cancelled)));
    assert!(path.exists());
}

// ── End to end ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_install_list_remove_round_trip() {
    let fx = Fixture::new();
    let manager = MockServiceManager::default();
    let source = fx.source("web.container", WEB_CONTAINER);

    let report = install_quadlets(
        &fx.ctx(&manager),
        &DefaultSourceFetcher::new(MockArtifactStore::default(), Duration::from_secs(1)),
        &MockGenerator::default(),
        &[source],
        &InstallOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("install");
    assert!(!report.has_failures());

    let entries = list_quadlets(&fx.ctx(&manager), &ListFilters::default())
        .await
        .expect("list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "web.container");
    assert_eq!(entries[0].status, "Not loaded");

    let report = remove_quadlets(
        &fx.ctx(&manager),
        &names(&["web.container"]),
        &RemoveOptions::default(),
        &CancelToken::new(),
    )
    .await
    .expect("remove");
    assert_eq!(report.removed().collect::<Vec<_>>(), vec!["web.container"]);
    assert!(!fx.user_dir().join("web.container").exists());
}
