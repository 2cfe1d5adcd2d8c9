//! HTTP client for the actor platform.
//!
//! Endpoints used, relative to the configured base URL:
//! - `POST /acts/{actor}/run-sync-get-dataset-items?token=..` (sync mode)
//! - `POST /acts/{actor}/runs` then `GET /acts/{actor}/runs/{id}` until the
//!   run leaves RUNNING, then `GET /acts/{actor}/runs/{id}/dataset/items`

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::{JobError, JobRequest, JobRun, JobRunner, JobStage, RunStatus};
use crate::config::{ApifyConfig, JobMode};

const MAX_ERROR_DETAIL_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    data: RunData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunData {
    #[serde(default)]
    id: Option<String>,
    status: String,
    #[serde(default)]
    default_dataset_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlatformErrorBody {
    error: PlatformError,
}

#[derive(Debug, Deserialize)]
struct PlatformError {
    message: String,
}

/// Job platform client. Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApifyClient {
    http: Client,
    config: ApifyConfig,
}

impl ApifyClient {
    pub fn new(http: Client, config: ApifyConfig) -> Self {
        Self { http, config }
    }

    fn actor_url(&self, actor_id: &str, suffix: &str) -> String {
        format!("{}/acts/{}{}", self.config.base_url, actor_id, suffix)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.bearer_auth(&self.config.token);
        match self.config.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// Single blocking call; the platform enforces its own run limit.
    pub async fn run_sync(&self, request: &JobRequest) -> Result<Vec<Value>, JobError> {
        let url = self.actor_url(&request.actor_id, "/run-sync-get-dataset-items");
        info!("running actor {} synchronously: POST {}", request.actor_id, url);

        let response = self
            .http
            .post(&url)
            .query(&[("token", self.config.token.as_str())])
            .json(&request.input)
            .send()
            .await
            .map_err(|source| network(JobStage::SyncRun, source))?;

        read_items(JobStage::SyncRun, response).await
    }

    /// Start a run without waiting for it.
    pub async fn start_run(&self, request: &JobRequest) -> Result<JobRun, JobError> {
        let url = self.actor_url(&request.actor_id, "/runs");
        info!("starting actor {}: POST {}", request.actor_id, url);

        let response = self
            .authorized(self.http.post(&url))
            .json(&request.input)
            .send()
            .await
            .map_err(|source| network(JobStage::Start, source))?;

        let data = read_run(JobStage::Start, response).await?;
        let id = data.id.ok_or_else(|| JobError::Decode {
            stage: JobStage::Start,
            message: "run id missing from response".to_string(),
        })?;

        Ok(JobRun {
            id,
            status: RunStatus::parse(&data.status),
            dataset_id: data.default_dataset_id,
        })
    }

    /// Read the current status of a run.
    pub async fn poll_status(&self, actor_id: &str, run_id: &str) -> Result<RunStatus, JobError> {
        let url = self.actor_url(actor_id, &format!("/runs/{run_id}"));
        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(|source| network(JobStage::Poll, source))?;

        let data = read_run(JobStage::Poll, response).await?;
        Ok(RunStatus::parse(&data.status))
    }

    /// Fetch the dataset items produced by a finished run.
    pub async fn fetch_items(&self, actor_id: &str, run_id: &str) -> Result<Vec<Value>, JobError> {
        let url = self.actor_url(actor_id, &format!("/runs/{run_id}/dataset/items"));
        debug!("fetching dataset: GET {}", url);

        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(|source| network(JobStage::DatasetFetch, source))?;

        read_items(JobStage::DatasetFetch, response).await
    }

    /// Start a run and poll it on a fixed interval until it leaves RUNNING or
    /// the attempt budget is spent. The dataset is only fetched on success.
    pub async fn run_with_polling(&self, request: &JobRequest) -> Result<Vec<Value>, JobError> {
        let mut run = self.start_run(request).await?;
        let max_attempts = self.config.max_poll_attempts;

        let mut attempts = 0;
        loop {
            if attempts == max_attempts {
                warn!(
                    "actor run {} still {} after {} status checks",
                    run.id, run.status, attempts
                );
                return Err(JobError::Timeout {
                    run_id: run.id,
                    attempts,
                    last_status: run.status,
                });
            }

            tokio::time::sleep(self.config.poll_interval).await;
            attempts += 1;
            run.status = self.poll_status(&request.actor_id, &run.id).await?;
            debug!(
                "actor run {} status {} (check {}/{})",
                run.id, run.status, attempts, max_attempts
            );

            if !run.status.is_pending() {
                break;
            }
        }

        if run.status != RunStatus::Succeeded {
            return Err(JobError::RunFailed {
                run_id: run.id,
                status: run.status,
            });
        }

        info!(
            "actor run {} succeeded after {} status checks (dataset {})",
            run.id,
            attempts,
            run.dataset_id.as_deref().unwrap_or("unknown")
        );
        self.fetch_items(&request.actor_id, &run.id).await
    }
}

#[async_trait]
impl JobRunner for ApifyClient {
    async fn run(&self, request: &JobRequest) -> Result<Vec<Value>, JobError> {
        match request.mode {
            JobMode::Sync => self.run_sync(request).await,
            JobMode::AsyncPoll => self.run_with_polling(request).await,
        }
    }
}

// Sync URLs carry the token in the query string; it must not reach messages or logs.
fn network(stage: JobStage, source: reqwest::Error) -> JobError {
    JobError::Network {
        stage,
        source: source.without_url(),
    }
}

async fn ensure_success(stage: JobStage, response: Response) -> Result<Response, JobError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<PlatformErrorBody>(&body)
        .map(|parsed| parsed.error.message)
        .ok()
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.chars().take(MAX_ERROR_DETAIL_CHARS).collect())
        });

    warn!("{} failed with HTTP {}", stage, status.as_u16());
    Err(JobError::Http {
        stage,
        status: status.as_u16(),
        detail,
    })
}

async fn read_run(stage: JobStage, response: Response) -> Result<RunData, JobError> {
    let response = ensure_success(stage, response).await?;
    let envelope: RunEnvelope = response.json().await.map_err(|err| JobError::Decode {
        stage,
        message: err.without_url().to_string(),
    })?;
    Ok(envelope.data)
}

async fn read_items(stage: JobStage, response: Response) -> Result<Vec<Value>, JobError> {
    let response = ensure_success(stage, response).await?;
    let body: Value = response.json().await.map_err(|err| JobError::Decode {
        stage,
        message: err.without_url().to_string(),
    })?;

    match body {
        Value::Array(items) => Ok(items),
        other => Err(JobError::Decode {
            stage,
            message: format!("expected a JSON array of items, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
