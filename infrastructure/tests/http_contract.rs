//! HTTP contract tests for the backend adapters.
//!
//! These verify the exact request shapes sent to the backend and how its
//! answers (bare payloads, envelopes, error statuses) are mapped.

use assist_application::{
    ChatRequest, JobApiError, JobCatalog, JobCommands, JobStatusSource, ResponseReader,
    SessionParams, StartOutcome, StreamSessionUseCase, TranscriptStore, TransportAdapter,
    TransportError,
};
use assist_domain::{FrameDecoder, JobId, JobStatus, Message, ModelId, StreamStatus};
use assist_infrastructure::{HttpJobApi, HttpStreamTransport, InMemoryTranscriptStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> HttpStreamTransport {
    HttpStreamTransport::new(Duration::from_secs(5)).unwrap()
}

fn job_api(server: &MockServer) -> HttpJobApi {
    HttpJobApi::new(format!("{}/api/v1", server.uri()), Duration::from_secs(5))
        .unwrap()
        .with_auth_token(Some("tok".to_string()))
}

fn request() -> ChatRequest {
    ChatRequest::new("hi", ModelId::new("phi-3").unwrap())
}

// ────────────────────────────────────────────────────────────────────────────
// Streaming chat
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_chat_request_shape_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/send"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"message": "hi", "model": "phi-3"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("data: Hello\n\nignored\ndata:world\ndata: tail"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/api/v1/chat/send", server.uri());
    let mut reader = transport()
        .open(&endpoint, &request(), Some("tok"))
        .await
        .unwrap();

    let mut body = Vec::new();
    loop {
        let chunk = reader.read_next().await.unwrap();
        body.extend_from_slice(&chunk.bytes);
        if chunk.is_final {
            break;
        }
    }
    assert_eq!(FrameDecoder::decode_all(&body), vec!["Hello", "world", "tail"]);

    // Reads after the end keep reporting the end
    assert!(reader.read_next().await.unwrap().is_final);
}

#[tokio::test]
async fn test_chat_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let endpoint = format!("{}/api/v1/chat/send", server.uri());
    let err = transport()
        .open(&endpoint, &request(), None)
        .await
        .err()
        .unwrap();
    assert_eq!(err, TransportError::Unauthorized);
}

#[tokio::test]
async fn test_chat_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("runtime offline"))
        .mount(&server)
        .await;

    let endpoint = format!("{}/api/v1/chat/send", server.uri());
    let err = transport()
        .open(&endpoint, &request(), None)
        .await
        .err()
        .unwrap();
    assert_eq!(
        err,
        TransportError::Status {
            status: 503,
            message: "runtime offline".to_string()
        }
    );
}

#[tokio::test]
async fn test_aborted_reader_reports_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("data: a\n"))
        .mount(&server)
        .await;

    let endpoint = format!("{}/chat", server.uri());
    let mut reader = transport().open(&endpoint, &request(), None).await.unwrap();
    reader.abort();
    reader.abort();

    let chunk = reader.read_next().await.unwrap();
    assert!(chunk.is_final);
    assert!(chunk.bytes.is_empty());
}

#[tokio::test]
async fn test_stream_session_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("data: Hello\ndata:  there\n"),
        )
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryTranscriptStore::new());
    store.append(Message::system("be brief"));
    let params = SessionParams::new(format!("{}/api/v1/chat/send", server.uri()));
    let uc = StreamSessionUseCase::new(Arc::new(transport()), store.clone(), params);

    let outcome = uc
        .send("hi", ModelId::new("phi-3").unwrap(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, StreamStatus::Done);
    assert_eq!(outcome.content, "Hello there");
    let transcript = store.snapshot();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript.last().and_then(|m| m.text()), Some("Hello there"));
    assert!(!store.is_streaming());
}

#[tokio::test]
async fn test_stream_session_failure_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryTranscriptStore::new());
    let params = SessionParams::new(format!("{}/api/v1/chat/send", server.uri()));
    let uc = StreamSessionUseCase::new(Arc::new(transport()), store.clone(), params);

    let outcome = uc
        .send("hi", ModelId::new("phi-3").unwrap(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, StreamStatus::Errored);
    assert_eq!(
        store.snapshot().last().and_then(|m| m.text()),
        Some("Error: Failed to get response.")
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Job API
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_poll_bare_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models/download/status/qwen2.5-3b"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "downloading",
            "progress": 42.7,
            "downloaded": 1024,
            "total": 4096,
            "error": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = job_api(&server)
        .fetch_status(&JobId::from("qwen2.5-3b"))
        .await
        .unwrap();

    assert_eq!(snapshot.status, JobStatus::Downloading);
    assert_eq!(snapshot.progress_percent(), 42);
    assert_eq!(snapshot.downloaded, 1024);
    assert_eq!(snapshot.total, 4096);
}

#[tokio::test]
async fn test_status_poll_enveloped_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models/download/status/sd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"status": "failed", "progress": 10, "error": "disk full"}
        })))
        .mount(&server)
        .await;

    let snapshot = job_api(&server).fetch_status(&JobId::from("sd")).await.unwrap();

    assert_eq!(snapshot.status, JobStatus::Failed);
    assert_eq!(snapshot.error.as_deref(), Some("disk full"));
}

#[tokio::test]
async fn test_status_poll_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = job_api(&server)
        .fetch_status(&JobId::from("x"))
        .await
        .unwrap_err();
    assert_eq!(err, JobApiError::Unauthorized);
}

#[tokio::test]
async fn test_catalog_envelope_with_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"models": [
                {"type": "text", "id": "qwen2.5-3b", "name": "Qwen 2.5 3B",
                 "supportsThinking": true,
                 "download_status": {"status": "downloading", "progress": 12}},
                {"type": "image", "id": "sd", "name": "SD 1.5", "installed": true}
            ]}
        })))
        .mount(&server)
        .await;

    let entries = job_api(&server).fetch_catalog().await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].capabilities(), vec!["thinking"]);
    assert!(entries[0].active_download().is_some());
    assert!(entries[1].is_installed());
}

#[tokio::test]
async fn test_catalog_bare_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "text", "id": "tiny", "name": "Tiny"}
        ])))
        .mount(&server)
        .await;

    let entries = job_api(&server).fetch_catalog().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id(), &JobId::from("tiny"));
}

#[tokio::test]
async fn test_start_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/models/download/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "started", "message": "Downloading New..."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/models/download/busy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "already_downloading"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/models/download/have"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "already_installed", "message": "Model already downloaded"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/models/download/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error", "message": "Model 'ghost' not found in catalog"
        })))
        .mount(&server)
        .await;

    let api = job_api(&server);
    assert_eq!(api.start(&JobId::from("new")).await, Ok(StartOutcome::Started));
    assert_eq!(
        api.start(&JobId::from("busy")).await,
        Ok(StartOutcome::AlreadyDownloading)
    );
    assert_eq!(
        api.start(&JobId::from("have")).await,
        Ok(StartOutcome::AlreadyInstalled)
    );
    assert_eq!(
        api.start(&JobId::from("ghost")).await,
        Err(JobApiError::Rejected(
            "Model 'ghost' not found in catalog".to_string()
        ))
    );
}

#[tokio::test]
async fn test_cancel_and_delete_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/models/download/cancel/qwen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "cancelled", "message": "Download for qwen cancelled"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/models/delete/qwen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "message": "deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = job_api(&server);
    api.cancel(&JobId::from("qwen")).await.unwrap();
    api.delete(&JobId::from("qwen")).await.unwrap();
}

#[tokio::test]
async fn test_cancel_without_active_download_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error", "message": "No active download found for this model"
        })))
        .mount(&server)
        .await;

    let err = job_api(&server)
        .cancel(&JobId::from("idle"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        JobApiError::Rejected("No active download found for this model".to_string())
    );
}
