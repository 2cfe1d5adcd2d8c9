#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use jobboard_mcp_server::config::AppConfig;
use jobboard_mcp_server::jobs::{JobError, JobRequest, JobRunner};
use jobboard_mcp_server::mcp::tools::{default_registry, ToolRegistry};

/// Config built from a fixed lookup table instead of the process env.
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "APIFY_TOKEN" => Some("test-token".to_string()),
        "LINKEDIN_ACTOR_ID" => Some("linkedin-actor".to_string()),
        "INDEED_ACTOR_ID" => Some("indeed-actor".to_string()),
        _ => None,
    })
    .expect("test config should load")
}

type Reply = Box<dyn Fn() -> Result<Vec<Value>, JobError> + Send + Sync>;

/// Mock job runner that records every request and answers with a canned reply.
pub struct MockJobRunner {
    requests: Mutex<Vec<JobRequest>>,
    reply: Reply,
}

impl MockJobRunner {
    pub fn returning(records: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Box::new(move || Ok(records.clone())),
        })
    }

    pub fn failing<F>(error: F) -> Arc<Self>
    where
        F: Fn() -> JobError + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Box::new(move || Err(error())),
        })
    }

    pub fn requests(&self) -> Vec<JobRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRunner for MockJobRunner {
    async fn run(&self, request: &JobRequest) -> Result<Vec<Value>, JobError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)()
    }
}

pub fn registry_with(runner: Arc<MockJobRunner>) -> ToolRegistry {
    default_registry(runner, &test_config()).expect("tools should register")
}

/// `count` LinkedIn-shaped records.
pub fn linkedin_records(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "title": format!("Engineer {i}"),
                "companyName": format!("Company {i}"),
                "location": "Remote",
                "publishedAt": "2026-10-01",
                "jobUrl": format!("https://www.linkedin.com/jobs/view/{i}"),
            })
        })
        .collect()
}

/// `count` Indeed-shaped records.
pub fn indeed_records(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "positionName": format!("Welder {i}"),
                "company": format!("Shop {i}"),
                "location": "Austin, TX",
                "postedAt": "2 days ago",
                "url": format!("https://www.indeed.com/viewjob?jk={i}"),
                "rating": 4.1,
            })
        })
        .collect()
}
