//! Actor platform protocol against a mock HTTP server.

use std::time::Duration;

use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobboard_mcp_server::config::{ApifyConfig, JobMode};
use jobboard_mcp_server::jobs::{ApifyClient, JobError, JobRequest, JobRunner, JobStage, RunStatus};

const TOKEN: &str = "test-token";
const ACTOR: &str = "act-1";

fn client(server: &MockServer) -> ApifyClient {
    let config = ApifyConfig::new(server.uri(), TOKEN).with_polling(Duration::from_millis(1), 60);
    ApifyClient::new(reqwest::Client::new(), config)
}

fn request(mode: JobMode) -> JobRequest {
    let mut input = Map::new();
    input.insert("title".to_string(), json!("Rust Engineer"));
    JobRequest::new(ACTOR, input, mode)
}

fn run_body(status: &str) -> Value {
    json!({ "data": { "id": "run-1", "status": status, "defaultDatasetId": "ds-1" } })
}

async fn mount_start(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/runs")))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(json!({ "title": "Rust Engineer" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_body("READY")))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sync_run_returns_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/run-sync-get-dataset-items")))
        .and(query_param("token", TOKEN))
        .and(body_json(json!({ "title": "Rust Engineer" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([{ "title": "a" }, { "title": "b" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server).run(&request(JobMode::Sync)).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["title"], "b");
}

#[tokio::test]
async fn test_sync_run_reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/run-sync-get-dataset-items")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "type": "token-not-valid", "message": "Authentication token is not valid" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).run(&request(JobMode::Sync)).await.unwrap_err();
    match &err {
        JobError::Http { stage, status, .. } => {
            assert_eq!(*stage, JobStage::SyncRun);
            assert_eq!(*status, 401);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "actor run failed with HTTP 401: Authentication token is not valid"
    );
}

#[tokio::test]
async fn test_sync_run_rejects_non_array_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/run-sync-get-dataset-items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let err = client(&server).run(&request(JobMode::Sync)).await.unwrap_err();
    assert!(matches!(err, JobError::Decode { stage: JobStage::SyncRun, .. }));
}

#[tokio::test]
async fn test_sync_transport_errors_hide_the_token() {
    const SECRET: &str = "secret-token-8842";
    let config = ApifyConfig::new("http://127.0.0.1:1", SECRET);
    let client = ApifyClient::new(reqwest::Client::new(), config);

    let err = client.run(&request(JobMode::Sync)).await.unwrap_err();
    assert!(matches!(err, JobError::Network { stage: JobStage::SyncRun, .. }));

    let mut source: Option<&dyn std::error::Error> = Some(&err);
    while let Some(current) = source {
        assert!(!current.to_string().contains(SECRET));
        assert!(!format!("{current:?}").contains(SECRET));
        source = current.source();
    }
}

#[tokio::test]
async fn test_sync_decode_errors_hide_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/run-sync-get-dataset-items")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = client(&server).run(&request(JobMode::Sync)).await.unwrap_err();
    assert!(matches!(err, JobError::Decode { stage: JobStage::SyncRun, .. }));
    assert!(!err.to_string().contains(TOKEN));
}

#[tokio::test]
async fn test_async_polls_until_succeeded() {
    let server = MockServer::start().await;
    mount_start(&server).await;

    let status_path = format!("/acts/{ACTOR}/runs/run-1");
    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("RUNNING")))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/acts/{ACTOR}/runs/run-1/dataset/items")))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "title": "a" }])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .run(&request(JobMode::AsyncPoll))
        .await
        .unwrap();
    assert_eq!(items, vec![json!({ "title": "a" })]);

    let polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|req| req.method.as_str() == "GET" && req.url.path() == status_path)
        .count();
    assert_eq!(polls, 4);
}

#[tokio::test]
async fn test_async_times_out_without_fetching_dataset() {
    let server = MockServer::start().await;
    mount_start(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/acts/{ACTOR}/runs/run-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("RUNNING")))
        .expect(60)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/acts/{ACTOR}/runs/run-1/dataset/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .run(&request(JobMode::AsyncPoll))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(
        err.to_string(),
        "actor run run-1 did not complete after 60 status checks, status=RUNNING"
    );
}

#[tokio::test]
async fn test_async_failed_run_is_not_fetched() {
    let server = MockServer::start().await;
    mount_start(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/acts/{ACTOR}/runs/run-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("FAILED")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/acts/{ACTOR}/runs/run-1/dataset/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .run(&request(JobMode::AsyncPoll))
        .await
        .unwrap_err();
    match err {
        JobError::RunFailed { run_id, status } => {
            assert_eq!(run_id, "run-1");
            assert_eq!(status, RunStatus::Failed);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_dataset_fetch_failure_is_distinct() {
    let server = MockServer::start().await;
    mount_start(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/acts/{ACTOR}/runs/run-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/acts/{ACTOR}/runs/run-1/dataset/items")))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .run(&request(JobMode::AsyncPoll))
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Some(JobStage::DatasetFetch));
    assert_eq!(
        err.to_string(),
        "fetching results dataset failed with HTTP 500: internal"
    );
}

#[tokio::test]
async fn test_start_failure_stops_before_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/acts/{ACTOR}/runs")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "record-not-found", "message": "Actor was not found" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("SUCCEEDED")))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .run(&request(JobMode::AsyncPoll))
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Some(JobStage::Start));
    assert!(err.to_string().contains("HTTP 404: Actor was not found"));
}
