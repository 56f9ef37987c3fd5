//! End-to-end tests for intake-client.
//!
//! Each test starts an in-process `/intake/` server on `127.0.0.1:0` that
//! records the multipart fields it receives and answers with a canned
//! reply, then drives a real `SubmissionController` over HTTP.
//!
//! One extra test talks to a live backend and is gated behind
//! `INTAKE_E2E_URL`:
//!   INTAKE_E2E_URL=http://127.0.0.1:8000 cargo test --test e2e -- --nocapture

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use intake_client::{
    IntakeConfig, IntakeError, IntakeResult, Notice, NoticeKind, SubmissionController,
    SubmissionObserver, SubmissionOutcome, SubmissionState,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::net::TcpListener;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// One multipart field as seen by the server.
#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl ReceivedField {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[derive(Clone)]
enum Reply {
    Json(Value),
    Status(u16, &'static str),
    Stall(Duration),
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    requests: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
}

async fn handle_intake(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.requests.lock().unwrap().push(fields);

    match state.reply {
        Reply::Json(body) => Json(body).into_response(),
        Reply::Status(code, body) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        Reply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({"late": true})).into_response()
        }
    }
}

struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
}

impl TestServer {
    fn requests(&self) -> Vec<Vec<ReceivedField>> {
        self.requests.lock().unwrap().clone()
    }

    /// The single field of the single request received so far.
    fn only_field(&self) -> ReceivedField {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        assert_eq!(requests[0].len(), 1, "expected exactly one field");
        requests[0][0].clone()
    }
}

/// Keep loopback traffic away from any proxy configured in the environment.
/// Every test calls this before it builds a client.
fn bypass_proxy_for_loopback() {
    static NO_PROXY: Once = Once::new();
    NO_PROXY.call_once(|| std::env::set_var("NO_PROXY", "127.0.0.1,localhost"));
}

async fn spawn_intake_server_at(route: &str, reply: Reply) -> TestServer {
    bypass_proxy_for_loopback();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        reply,
        requests: requests.clone(),
    };
    let app = Router::new()
        .route(route, post(handle_intake))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}

async fn spawn_intake_server(reply: Reply) -> TestServer {
    spawn_intake_server_at("/intake/", reply).await
}

fn controller_for(server: &TestServer) -> SubmissionController {
    let config = IntakeConfig::builder()
        .api_base(server.base_url.clone())
        .build()
        .expect("valid config");
    SubmissionController::new(config).expect("controller")
}

#[derive(Default)]
struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl SubmissionObserver for NoticeLog {
    fn on_notice(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

// ── Request construction ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_json_body_is_sent_verbatim_as_the_only_field() {
    let server = spawn_intake_server(Reply::Json(json!({"ok": true}))).await;
    let ctl = controller_for(&server);
    let body = "  {\"id\": \"123\", \"type\": \"order\"}\n";
    ctl.set_json_body(body);
    ctl.set_email_body("From: ignored@example.com");

    ctl.submit().await.expect("submitted");

    let field = server.only_field();
    assert_eq!(field.name, "json_body");
    assert_eq!(field.text(), body);
    assert!(field.file_name.is_none());
}

#[tokio::test]
async fn test_file_takes_precedence_and_arrives_as_pdf_part() {
    let server = spawn_intake_server(Reply::Json(json!({"ok": true}))).await;
    let ctl = controller_for(&server);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claim.pdf");
    std::fs::write(&path, b"%PDF-1.7\nfake body").unwrap();
    ctl.load_file(&path).await.expect("picker accepts pdf");
    ctl.set_json_body(r#"{"id": "123"}"#);
    ctl.set_email_body("Subject: also ignored");

    ctl.submit().await.expect("submitted");

    let field = server.only_field();
    assert_eq!(field.name, "file");
    assert_eq!(field.file_name.as_deref(), Some("claim.pdf"));
    assert_eq!(field.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(field.bytes, b"%PDF-1.7\nfake body");
}

#[tokio::test]
async fn test_email_body_is_sent_when_json_is_blank() {
    let server = spawn_intake_server(Reply::Json(json!({"ok": true}))).await;
    let ctl = controller_for(&server);
    ctl.set_json_body(" \n\t");
    ctl.set_email_body("From: John Doe <john@example.com>\nSubject: RFQ");

    ctl.submit().await.expect("submitted");

    let field = server.only_field();
    assert_eq!(field.name, "email_body");
    assert_eq!(field.text(), "From: John Doe <john@example.com>\nSubject: RFQ");
}

#[tokio::test]
async fn test_empty_form_never_reaches_the_server() {
    let server = spawn_intake_server(Reply::Json(json!({"ok": true}))).await;
    let log = Arc::new(NoticeLog::default());
    let ctl = controller_for(&server).with_observer(log.clone());
    ctl.set_json_body("   ");

    let err = ctl.submit().await.unwrap_err();

    assert!(matches!(err, IntakeError::NoInputProvided));
    assert_eq!(ctl.state(), SubmissionState::Idle);
    assert!(server.requests().is_empty());
    assert_eq!(
        log.notices.lock().unwrap()[0].kind,
        NoticeKind::NoInputProvided
    );
}

// ── Outcome classification ───────────────────────────────────────────────────

#[tokio::test]
async fn test_success_body_becomes_the_result() {
    let body = json!({"category": "complaint", "confidence": 0.9});
    let server = spawn_intake_server(Reply::Json(body.clone())).await;
    let ctl = controller_for(&server);
    ctl.set_email_body("I want to complain.");

    let outcome = ctl.submit().await.expect("submitted");

    assert_eq!(outcome, SubmissionOutcome::Success(body.clone()));
    assert_eq!(ctl.result(), Some(IntakeResult::Payload(body)));
    assert_eq!(
        ctl.view().result_panel().unwrap(),
        "{\n  \"category\": \"complaint\",\n  \"confidence\": 0.9\n}"
    );
    assert_eq!(ctl.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_non_json_success_body_is_kept_as_text() {
    let server = spawn_intake_server(Reply::Status(200, "accepted")).await;
    let ctl = controller_for(&server);
    ctl.set_json_body("{}");

    let outcome = ctl.submit().await.expect("submitted");

    assert_eq!(outcome, SubmissionOutcome::Success(json!("accepted")));
}

#[tokio::test]
async fn test_server_error_is_reported_with_status_and_body() {
    let server = spawn_intake_server(Reply::Status(500, "internal error")).await;
    let log = Arc::new(NoticeLog::default());
    let ctl = controller_for(&server).with_observer(log.clone());
    ctl.set_json_body("{}");

    let outcome = ctl.submit().await.expect("submitted");

    assert_eq!(
        outcome,
        SubmissionOutcome::ServerError {
            status: 500,
            body: "internal error".into()
        }
    );
    assert_eq!(ctl.result(), Some(IntakeResult::error("Server error: 500")));
    let notices = log.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("500"));
    assert!(notices[0].message.contains("internal error"));
}

#[tokio::test]
async fn test_backend_validation_error_is_a_server_error() {
    let server = spawn_intake_server(Reply::Status(400, r#"{"error":"No input provided"}"#)).await;
    let ctl = controller_for(&server);
    ctl.set_email_body("x");

    let outcome = ctl.submit().await.expect("submitted");

    assert!(matches!(outcome, SubmissionOutcome::ServerError { status: 400, .. }));
    assert_eq!(ctl.result(), Some(IntakeResult::error("Server error: 400")));
}

#[tokio::test]
async fn test_slow_server_times_out_as_network_error() {
    let server = spawn_intake_server(Reply::Stall(Duration::from_secs(5))).await;
    let config = IntakeConfig::builder()
        .api_base(server.base_url.clone())
        .timeout_ms(300)
        .build()
        .unwrap();
    let ctl = SubmissionController::new(config).unwrap();
    ctl.set_json_body("{}");

    let outcome = ctl.submit().await.expect("submitted");

    assert_eq!(outcome, SubmissionOutcome::NetworkError);
    assert_eq!(
        ctl.result(),
        Some(IntakeResult::error("Network error: No response from server"))
    );
    assert_eq!(ctl.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    bypass_proxy_for_loopback();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = IntakeConfig::builder()
        .api_base(format!("http://127.0.0.1:{port}"))
        .timeout_ms(2_000)
        .build()
        .unwrap();
    let ctl = SubmissionController::new(config).unwrap();
    ctl.set_email_body("hello");

    let outcome = ctl.submit().await.expect("submitted");

    assert_eq!(outcome, SubmissionOutcome::NetworkError);
}

// ── Addressing ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_base_posts_to_intake_on_the_origin() {
    let server = spawn_intake_server(Reply::Json(json!({"ok": true}))).await;
    let config = IntakeConfig::builder()
        .api_base("")
        .origin(server.base_url.clone())
        .build()
        .unwrap();
    assert_eq!(config.endpoint_path(), "/intake/");
    let ctl = SubmissionController::new(config).unwrap();
    ctl.set_json_body("{}");

    assert!(ctl.submit().await.unwrap().is_success());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_base_with_path_prefix_is_respected() {
    let server = spawn_intake_server_at("/api/intake/", Reply::Json(json!({"ok": true}))).await;
    let config = IntakeConfig::builder()
        .api_base(format!("{}/api", server.base_url))
        .build()
        .unwrap();
    let ctl = SubmissionController::new(config).unwrap();
    ctl.set_json_body("{}");

    assert!(ctl.submit().await.unwrap().is_success());
}

// ── Repeated use ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_controller_is_reusable_and_keeps_inputs() {
    let server = spawn_intake_server(Reply::Json(json!({
        "classification": {"format": "JSON", "intent": "Invoice"},
        "extraction": {"flowbit_schema": {}, "anomalies": []}
    })))
    .await;
    let ctl = controller_for(&server);
    ctl.set_json_body(r#"{"id": "123", "type": "invoice"}"#);

    let first = ctl.submit().await.unwrap();
    let second = ctl.submit().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(server.requests().len(), 2);
    assert_eq!(ctl.form().json_body, r#"{"id": "123", "type": "invoice"}"#);
    assert_eq!(
        second.response().unwrap().summary(),
        "format=JSON intent=Invoice"
    );
}

// ── Live backend (opt-in) ────────────────────────────────────────────────────

#[tokio::test]
async fn test_live_backend_accepts_json_body() {
    let Ok(base) = std::env::var("INTAKE_E2E_URL") else {
        println!("SKIP — set INTAKE_E2E_URL to run against a live backend");
        return;
    };
    bypass_proxy_for_loopback();

    let config = IntakeConfig::builder().api_base(base).build().unwrap();
    let ctl = SubmissionController::new(config).unwrap();
    ctl.set_json_body(r#"{"id": "123", "type": "order", "attributes": {"item": "book"}}"#);

    let outcome = ctl.submit().await.expect("submitted");
    println!("{}", outcome.result().render());
    assert!(outcome.is_success(), "live backend failed: {outcome:?}");
}
