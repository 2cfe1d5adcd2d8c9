//! Tool registry - central routing for MCP tools.
//!
//! Provides `list_tools()` and `dispatch()`. Registration
//! happens once at startup; afterwards the registry is read-only and shared
//! between concurrent calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::schema::{Arguments, ParameterSchema};
use super::ToolError;
use crate::listings::format_error;
use crate::mcp::content::ToolResult;
use crate::metrics::{CallOutcome, ToolMetrics};

/// Tool descriptor as returned by `tools/list`.
#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Receives validated, defaulted arguments and produces the response text.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Arguments) -> Result<String, ToolError>;
}

/// Everything the registry needs to advertise and run one tool.
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// Leads every failure message, e.g. `Error scraping LinkedIn jobs`.
    pub error_prefix: String,
    pub schema: ParameterSchema,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolSpec {
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.schema.to_json_schema(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// Central registry for all MCP tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
    index: HashMap<String, usize>,
    metrics: Option<Arc<ToolMetrics>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: Arc<ToolMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, spec: ToolSpec) -> Result<(), RegistryError> {
        if self.index.contains_key(&spec.name) {
            return Err(RegistryError::DuplicateTool(spec.name));
        }
        self.index.insert(spec.name.clone(), self.tools.len());
        self.tools.push(spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|spec| spec.name.as_str()).collect()
    }

    /// List all available tools, in registration order.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(ToolSpec::descriptor).collect()
    }

    /// Validate the arguments and run the named tool. Never fails: unknown
    /// tools, bad arguments and handler errors all come back as error text.
    pub async fn dispatch(&self, name: &str, arguments: Option<Value>) -> ToolResult {
        let call_id = Uuid::new_v4();
        let started = Instant::now();

        let Some(spec) = self.get(name) else {
            warn!("[{}] unknown tool requested: {}", call_id, name);
            self.record(name, CallOutcome::UnknownTool, started);
            return ToolResult::error(format!(
                "Error: unknown tool '{}'. Available tools: {}",
                name,
                self.names().join(", ")
            ));
        };

        info!("[{}] calling tool {}", call_id, name);
        let outcome = match spec.schema.validate(arguments) {
            Ok(arguments) => spec.handler.call(arguments).await,
            Err(errors) => Err(ToolError::Validation(errors)),
        };

        match outcome {
            Ok(text) => {
                info!(
                    "[{}] tool {} finished in {:?}",
                    call_id,
                    name,
                    started.elapsed()
                );
                self.record(name, CallOutcome::Ok, started);
                ToolResult::success_text(text)
            }
            Err(err) => {
                warn!("[{}] tool {} failed: {}", call_id, name, err);
                self.record(name, CallOutcome::Error, started);
                ToolResult::error(format_error(&spec.error_prefix, &err))
            }
        }
    }

    fn record(&self, name: &str, outcome: CallOutcome, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record(name, outcome, started.elapsed());
        }
    }
}
