//! Integration tests for Notion sync runs
//!
//! These tests verify that:
//! - Missing credentials stop the run before anything touches the network
//! - The target is prepared once before the library is fetched
//! - Push failures are recorded per book and the batch continues
//! - A shutdown request stops the run between books

mod common;

use common::{book, FakeAnnotations, FakeLibrary, FakeTarget, Notes, RecordingSink};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use test_case::test_case;
use tokio::sync::watch;
use weread_toolbox::config::secret_string;
use weread_toolbox::core::export::{BatchOrchestrator, ExportRequest, RunResult};
use weread_toolbox::core::progress::ProgressKind;
use weread_toolbox::domain::ToolboxError;

const DATABASE_URL: &str = "https://www.notion.so/Reading-Notes-0123456789abcdef0123456789abcdef";

struct Fixture {
    library: Arc<FakeLibrary>,
    annotations: Arc<FakeAnnotations>,
    target: Arc<FakeTarget>,
    sink: Arc<RecordingSink>,
    orchestrator: BatchOrchestrator,
    _shutdown: watch::Sender<bool>,
}

fn fixture(library: FakeLibrary, annotations: FakeAnnotations, target: FakeTarget) -> Fixture {
    let library = Arc::new(library);
    let annotations = Arc::new(annotations);
    let target = Arc::new(target);
    let sink = Arc::new(RecordingSink::new());
    let (shutdown, shutdown_rx) = watch::channel(false);

    let orchestrator = BatchOrchestrator::new(
        library.clone(),
        annotations.clone(),
        sink.clone(),
        shutdown_rx,
    )
    .with_sync_target(target.clone());

    Fixture {
        library,
        annotations,
        target,
        sink,
        orchestrator,
        _shutdown: shutdown,
    }
}

#[test_case("", "secret_token" ; "missing database url")]
#[test_case(DATABASE_URL, "" ; "missing token")]
#[test_case("   ", "   " ; "both blank")]
#[tokio::test]
async fn test_missing_credentials_touch_nothing(database_url: &str, token: &str) {
    let f = fixture(
        FakeLibrary::with_books(vec![book("1", "A")]),
        FakeAnnotations::new(),
        FakeTarget::new(),
    );

    let result = f
        .orchestrator
        .run_sync(database_url, &secret_string(token.to_string()))
        .await;

    assert!(matches!(result, Err(ToolboxError::MissingCredentials(_))));
    assert_eq!(f.library.calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.target.prepare_calls.load(Ordering::SeqCst), 0);
    assert!(f.annotations.calls().is_empty());

    let events = f.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, ProgressKind::Error);
    assert_eq!(events[0].key, "exportAllToNotion");
}

#[tokio::test]
async fn test_sync_pushes_books_with_notes() {
    let f = fixture(
        FakeLibrary::with_books(vec![book("1", "A"), book("2", "B"), book("3", "C")]),
        FakeAnnotations::new()
            .with("1", Notes::Markdown("# A\n\n> one".to_string()))
            .with("2", Notes::Sentinel)
            .with("3", Notes::Markdown("# C\n\n> three".to_string())),
        FakeTarget::new(),
    );

    let summary = f
        .orchestrator
        .run_sync(DATABASE_URL, &secret_string("secret_token".to_string()))
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.exported, 2);
    assert_eq!(summary.empty, 1);
    assert!(summary.failed_titles.is_empty());
    assert_eq!(f.target.pushed(), vec!["A".to_string(), "C".to_string()]);
    assert_eq!(f.target.prepare_calls.load(Ordering::SeqCst), 1);

    let events = f.sink.events();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.key == "exportAllToNotion"));
    assert_eq!(events.last().unwrap().kind, ProgressKind::Success);
}

#[tokio::test]
async fn test_shutdown_stops_sync_after_current_book() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let annotations = Arc::new(
        FakeAnnotations::new()
            .with("1", Notes::Markdown("a".to_string()))
            .with("2", Notes::Markdown("b".to_string()))
            .with("3", Notes::Markdown("c".to_string()))
            .shutdown_after(1, shutdown_tx),
    );
    let target = Arc::new(FakeTarget::new());
    let sink = Arc::new(RecordingSink::new());
    let orchestrator = BatchOrchestrator::new(
        Arc::new(FakeLibrary::with_books(vec![
            book("1", "A"),
            book("2", "B"),
            book("3", "C"),
        ])),
        annotations.clone(),
        sink.clone(),
        shutdown_rx,
    )
    .with_sync_target(target.clone());

    let summary = orchestrator
        .run_sync(DATABASE_URL, &secret_string("secret_token".to_string()))
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.exported, 1);
    assert_eq!(summary.not_processed, 2);
    assert!(summary.is_consistent());
    assert_eq!(annotations.calls(), vec!["1".to_string()]);
    assert_eq!(target.pushed(), vec!["A".to_string()]);

    let events = sink.events();
    assert!(events.iter().all(|e| e.key == "exportAllToNotion"));
    let last = events.last().cloned().unwrap();
    assert_eq!(last.kind, ProgressKind::Error);
    assert!(last.body.contains("2 not processed"));
}

#[tokio::test]
async fn test_push_failure_does_not_stop_batch() {
    let f = fixture(
        FakeLibrary::with_books(vec![book("1", "A"), book("2", "B"), book("3", "C")]),
        FakeAnnotations::new()
            .with("1", Notes::Markdown("a".to_string()))
            .with("2", Notes::Markdown("b".to_string()))
            .with("3", Notes::Fail("timeout".to_string())),
        FakeTarget::new().failing_on("B"),
    );

    let summary = f
        .orchestrator
        .run_sync(DATABASE_URL, &secret_string("secret_token".to_string()))
        .await
        .unwrap();

    assert_eq!(summary.exported, 1);
    assert_eq!(summary.failed_titles, vec!["B".to_string(), "C".to_string()]);
    assert_eq!(summary.failures[0].stage, "sync");
    assert_eq!(summary.failures[1].stage, "fetch");
    assert!(summary.is_consistent());
    assert_eq!(f.target.pushed(), vec!["A".to_string()]);
}

#[tokio::test]
async fn test_unready_target_ends_run_before_library_fetch() {
    let f = fixture(
        FakeLibrary::with_books(vec![book("1", "A")]),
        FakeAnnotations::new(),
        FakeTarget::never_ready(),
    );

    let result = f
        .orchestrator
        .run_sync(DATABASE_URL, &secret_string("secret_token".to_string()))
        .await;

    assert!(matches!(result, Err(ToolboxError::NotReady { .. })));
    assert_eq!(f.library.calls.load(Ordering::SeqCst), 0);
    let events = f.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, ProgressKind::Error);
}

#[tokio::test]
async fn test_invalid_database_link_is_rejected() {
    let f = fixture(
        FakeLibrary::with_books(vec![book("1", "A")]),
        FakeAnnotations::new(),
        FakeTarget::new(),
    );

    let result = f
        .orchestrator
        .run_sync("https://www.notion.so/not-a-database", &secret_string("t".to_string()))
        .await;

    assert!(result.is_err());
    assert_eq!(f.target.prepare_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sync_without_target_is_a_configuration_error() {
    let sink = Arc::new(RecordingSink::new());
    let (_shutdown, shutdown_rx) = watch::channel(false);
    let orchestrator = BatchOrchestrator::new(
        Arc::new(FakeLibrary::with_books(Vec::new())),
        Arc::new(FakeAnnotations::new()),
        sink,
        shutdown_rx,
    );

    let result = orchestrator
        .run_sync(DATABASE_URL, &secret_string("t".to_string()))
        .await;
    assert!(matches!(result, Err(ToolboxError::Configuration(_))));
}

#[tokio::test]
async fn test_dispatch_routes_requests() {
    let f = fixture(
        FakeLibrary::with_books(vec![book("1", "A")]),
        FakeAnnotations::new().with("1", Notes::Markdown("a".to_string())),
        FakeTarget::new(),
    );

    let local: ExportRequest = serde_json::from_str(r#"{"type":"exportAllToLocal"}"#).unwrap();
    let result = f.orchestrator.dispatch(local).await.unwrap();
    assert!(matches!(result, RunResult::Local(_)));
    assert_eq!(result.summary().exported, 1);

    let notion: ExportRequest = serde_json::from_value(serde_json::json!({
        "type": "exportAllToNotion",
        "databaseUrl": DATABASE_URL,
        "notionToken": "secret_token",
    }))
    .unwrap();
    let result = f.orchestrator.dispatch(notion).await.unwrap();
    assert!(matches!(result, RunResult::Synced(_)));
    assert_eq!(f.target.pushed(), vec!["A".to_string()]);
}

#[tokio::test]
async fn test_local_and_sync_guards_are_independent() {
    let f = fixture(
        FakeLibrary::with_books(vec![book("1", "A")]),
        FakeAnnotations::new().with("1", Notes::Markdown("a".to_string())),
        FakeTarget::new(),
    );

    let _local = f
        .orchestrator
        .guards()
        .try_acquire(weread_toolbox::core::guard::RunKind::Local)
        .unwrap();

    let summary = f
        .orchestrator
        .run_sync(DATABASE_URL, &secret_string("secret_token".to_string()))
        .await
        .unwrap();
    assert_eq!(summary.exported, 1);
}
