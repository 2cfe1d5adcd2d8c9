//! External job client.
//!
//! Runs scraping actors on the job platform, either as a single blocking
//! run-and-fetch call or as start + poll + dataset fetch.

pub mod client;

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::JobMode;

pub use client::ApifyClient;

/// One actor invocation. Built per tool call and not modified after sending.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub actor_id: String,
    pub input: Map<String, Value>,
    pub mode: JobMode,
}

impl JobRequest {
    pub fn new(actor_id: impl Into<String>, input: Map<String, Value>, mode: JobMode) -> Self {
        Self {
            actor_id: actor_id.into(),
            input,
            mode,
        }
    }
}

/// Run status as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
    Other(String),
}

impl RunStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "READY" => Self::Ready,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "TIMING-OUT" => Self::TimingOut,
            "TIMED-OUT" => Self::TimedOut,
            "ABORTING" => Self::Aborting,
            "ABORTED" => Self::Aborted,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the run is still progressing and should be polled again.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::TimingOut => "TIMING-OUT",
            Self::TimedOut => "TIMED-OUT",
            Self::Aborting => "ABORTING",
            Self::Aborted => "ABORTED",
            Self::Other(raw) => raw,
        };
        f.write_str(text)
    }
}

/// A started actor run, updated only from polling reads.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRun {
    pub id: String,
    pub status: RunStatus,
    pub dataset_id: Option<String>,
}

/// Which HTTP exchange a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    SyncRun,
    Start,
    Poll,
    DatasetFetch,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SyncRun => "actor run",
            Self::Start => "starting actor run",
            Self::Poll => "checking run status",
            Self::DatasetFetch => "fetching results dataset",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("{stage} failed: {source}")]
    Network {
        stage: JobStage,
        #[source]
        source: reqwest::Error,
    },
    #[error("{stage} failed with HTTP {status}{}", detail_suffix(.detail))]
    Http {
        stage: JobStage,
        status: u16,
        detail: Option<String>,
    },
    #[error("{stage} returned an unexpected payload: {message}")]
    Decode { stage: JobStage, message: String },
    #[error("actor run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: RunStatus },
    #[error("actor run {run_id} did not complete after {attempts} status checks, status={last_status}")]
    Timeout {
        run_id: String,
        attempts: u32,
        last_status: RunStatus,
    },
}

impl JobError {
    pub fn stage(&self) -> Option<JobStage> {
        match self {
            Self::Network { stage, .. } | Self::Http { stage, .. } | Self::Decode { stage, .. } => {
                Some(*stage)
            }
            Self::RunFailed { .. } | Self::Timeout { .. } => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(": {detail}"),
        _ => String::new(),
    }
}

/// Executes a [`JobRequest`] and returns the raw dataset records.
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, request: &JobRequest) -> Result<Vec<Value>, JobError>;
}
