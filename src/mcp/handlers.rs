//! MCP Stateless HTTP Handlers for Actix-Web.
//!
//! Stateless HTTP POST only: no SSE connections are held open and each
//! request is independent.

use actix_web::error::InternalError;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;

use crate::mcp::rpc::{OutboundResponse, RpcRequest};
use crate::mcp::service::McpService;
use crate::metrics::ToolMetrics;
use crate::ErrorResponse;

/// MCP State for Actix-Web (stateless version)
pub struct McpState {
    pub service: McpService,
    pub metrics: Arc<ToolMetrics>,
}

impl McpState {
    pub fn new(service: McpService, metrics: Arc<ToolMetrics>) -> Self {
        Self { service, metrics }
    }
}

/// RPC handler - POST /mcp
pub async fn rpc_handler(
    state: web::Data<Arc<McpState>>,
    body: web::Json<RpcRequest>,
) -> impl Responder {
    info!("Received MCP request: {}", body.method);

    if let Some(response) = state.service.handle_request(body.into_inner()).await {
        return HttpResponse::Ok()
            .content_type("application/json")
            .json(response);
    }

    // Notifications return 202 Accepted
    HttpResponse::Accepted().finish()
}

/// GET /health
pub async fn health_handler(state: web::Data<Arc<McpState>>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "tools": state.service.registry().names(),
    }))
}

/// GET /metrics/tools - tool call counters and latencies.
pub async fn tool_metrics_handler(state: web::Data<Arc<McpState>>) -> impl Responder {
    match state.metrics.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(err) => {
            error!("failed to render tool metrics: {}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("failed to render tool metrics"))
        }
    }
}

/// Bodies that are not a JSON-RPC request get a parse error instead of the
/// default plain-text 400.
fn rpc_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        warn!("rejected MCP request body: {}", err);
        let response =
            HttpResponse::BadRequest().json(OutboundResponse::parse_error(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Configure MCP routes (stateless)
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/mcp")
            .app_data(rpc_json_config())
            .route(web::post().to(rpc_handler)),
    );

    // Same handler under the legacy path some clients are configured with
    cfg.service(
        web::resource("/sse")
            .app_data(rpc_json_config())
            .route(web::post().to(rpc_handler)),
    );

    cfg.service(web::resource("/health").route(web::get().to(health_handler)));
    cfg.service(web::resource("/metrics/tools").route(web::get().to(tool_metrics_handler)));
}
