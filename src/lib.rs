use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod jobs;
pub mod listings;
pub mod mcp;
pub mod metrics;

use crate::config::{AppConfig, ServerConfig};
use crate::jobs::{ApifyClient, JobRunner};
use crate::mcp::{McpService, McpState};
use crate::metrics::ToolMetrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Fallback for every unrouted request.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}

/// Wire the tool registry to a job runner and wrap it for the HTTP layer.
pub fn build_state(
    runner: Arc<dyn JobRunner>,
    config: &AppConfig,
    metrics: Arc<ToolMetrics>,
) -> anyhow::Result<McpState> {
    let registry = mcp::tools::default_registry(runner, config)
        .context("failed to register tools")?
        .with_metrics(metrics.clone());
    Ok(McpState::new(McpService::new(registry), metrics))
}

fn cors(server: &ServerConfig) -> Cors {
    let cors = if server.allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        server
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    log::info!(
        "LinkedIn actor {} ({}), Indeed actor {} ({})",
        config.linkedin.actor_id,
        config.linkedin.mode,
        config.indeed.actor_id,
        config.indeed.mode
    );

    let http_client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(900))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP client")?;
    let runner: Arc<dyn JobRunner> = Arc::new(ApifyClient::new(http_client, config.apify.clone()));

    let metrics = Arc::new(ToolMetrics::new().context("failed to create tool metrics")?);
    let state = web::Data::new(Arc::new(build_state(runner, &config, metrics)?));

    let prometheus = PrometheusMetricsBuilder::new("jobboard_mcp_server")
        .endpoint("/metrics")
        .build()
        .map_err(|err| anyhow!("failed to create Prometheus metrics middleware: {}", err))?;

    let server_config = config.server.clone();
    log::info!(
        "Starting server at http://{}:{}",
        server_config.host,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&server_config))
            .app_data(state.clone())
            .configure(mcp::config)
            .default_service(web::to(not_found))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
