//! Integration tests for session orchestration and health monitoring.
//!
//! Run with: cargo test --test session_flow

use std::io::Write;
use std::path::PathBuf;

use voxify::{ClientConfig, OutputFormat, SessionController, Step, VoxifyError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn temp_memo(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let file_path = dir.path().join(name);
    let mut f = std::fs::File::create(&file_path).unwrap();
    f.write_all(b"pretend this is a voice memo").unwrap();
    file_path
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(server.uri())
        .premium(true)
        .build()
        .unwrap()
}

async fn mount_health(server: &MockServer, status: &str, demo_mode: bool) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": status,
            "demo_mode": demo_mode,
        })))
        .mount(server)
        .await;
}

// ── Health semantics ─────────────────────────────────────────────────────────

#[tokio::test]
async fn healthy_backend_clears_demo_mode() {
    let server = MockServer::start().await;
    mount_health(&server, "ok", false).await;

    let session = SessionController::new(config_for(&server)).unwrap();
    let status = session.check_health().await;

    assert!(status.available);
    assert!(!status.demo_mode);
    assert_eq!(session.backend_status(), status);
}

#[tokio::test]
async fn demo_status_shows_the_demo_indicator() {
    let server = MockServer::start().await;
    mount_health(&server, "demo", true).await;

    let session = SessionController::new(config_for(&server)).unwrap();
    let status = session.check_health().await;

    assert!(!status.available);
    assert!(status.demo_mode);
    assert_eq!(
        session.completion_message(),
        "Processed in demo mode - using mock data"
    );
}

#[tokio::test]
async fn unreachable_backend_implies_demo_mode() {
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .health_timeout_secs(2)
        .build()
        .unwrap();
    let session = SessionController::new(config).unwrap();
    let status = session.check_health().await;

    assert!(!status.available);
    assert!(status.demo_mode);
}

#[tokio::test]
async fn garbage_health_body_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let session = SessionController::new(config_for(&server)).unwrap();
    let status = session.check_health().await;

    assert!(!status.available);
    assert!(status.demo_mode);
}

// ── Session flow ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_flow_from_format_to_rendered_sections() {
    let server = MockServer::start().await;
    mount_health(&server, "ok", false).await;
    Mock::given(method("POST"))
        .and(path("/process-audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tasks": [
                {"title": "Book the venue", "priority": "High"},
                {"title": "Send invites", "priority": "Medium", "status": "Completed"}
            ],
            "next_steps": ["confirm catering"],
            "notes": ["recorded on the way home"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let memo = temp_memo(&dir, "planning.mp3");

    let mut session = SessionController::new(config_for(&server)).unwrap();
    assert_eq!(session.step(), Step::ChooseFormat);

    let metadata = session.select_format(OutputFormat::Tasks).unwrap();
    assert_eq!(metadata.button_label, "Extract Tasks");
    assert_eq!(session.step(), Step::AwaitingFile);

    let document = session.submit(&memo).await.expect("upload should succeed");
    assert_eq!(session.step(), Step::Processing);
    assert_eq!(document.format, OutputFormat::Tasks);

    let titles: Vec<&str> = document.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Tasks", "Next Steps", "Notes"]);
    assert!(document.markdown.contains("**1 of 2 completed**"));
    assert!(document.markdown.contains("- confirm catering"));
    assert!(document.markdown.ends_with('\n'));
}

#[tokio::test]
async fn rejected_file_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let memo = temp_memo(&dir, "notes.txt");

    let mut session = SessionController::new(config_for(&server)).unwrap();
    session.select_format(OutputFormat::Tasks).unwrap();

    let err = session.submit(&memo).await.unwrap_err();
    assert!(matches!(err, VoxifyError::UnsupportedMediaType { .. }));
    // Validation failed before acceptance: still waiting for a file.
    assert_eq!(session.step(), Step::AwaitingFile);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn premium_gate_blocks_upload_for_free_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::builder().base_url(server.uri()).build().unwrap();
    let mut session = SessionController::new(config).unwrap();

    let err = session.select_format(OutputFormat::Roadmap).unwrap_err();
    assert_eq!(err.user_message(), "This is a Pro feature. Upgrade to access.");
    assert_eq!(session.current_format(), OutputFormat::Tasks);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn upload_failure_keeps_session_in_processing_for_manual_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process-audio"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "detail": "upstream down"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let memo = temp_memo(&dir, "memo.mp3");
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .retry_delay_ms(1)
        .build()
        .unwrap();

    let mut session = SessionController::new(config).unwrap();
    session.select_format(OutputFormat::Tasks).unwrap();

    let err = session.submit(&memo).await.unwrap_err();
    assert!(matches!(err, VoxifyError::Server { .. }));
    // The file was accepted; the host shows a retry affordance in place.
    assert_eq!(session.step(), Step::Processing);

    // A manual resubmit is a fresh upload with a fresh retry budget.
    let second = session.submit(&memo).await.unwrap_err();
    assert!(matches!(second, VoxifyError::Server { .. }));
}
