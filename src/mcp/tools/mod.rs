//! MCP Tools module - defines tools exposed via JSON-RPC.
//!
//! Each tool provides:
//! - Tool descriptor (name, description, input schema)
//! - Argument validation against a declared parameter schema
//! - Execution and result formatting

pub mod calculator;
pub mod indeed;
pub mod job_search;
pub mod linkedin;
pub mod registry;
pub mod schema;
pub mod validation;

use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::jobs::{JobError, JobRunner};
pub use registry::{RegistryError, ToolDescriptor, ToolHandler, ToolRegistry, ToolSpec};
pub use validation::{ValidationError, ValidationErrors};

/// Everything that can go wrong inside a tool call. Never crosses the tool
/// boundary: the registry renders it as error text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    Job(#[from] JobError),
    #[error("{0}")]
    Arithmetic(String),
}

/// Registry with every tool this server offers, in listing order.
pub fn default_registry(
    runner: Arc<dyn JobRunner>,
    config: &AppConfig,
) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(calculator::add_spec())?;
    registry.register(calculator::calculate_spec())?;
    registry.register(linkedin::spec(runner.clone(), config.linkedin.clone()))?;
    registry.register(indeed::spec(runner, config.indeed.clone()))?;
    Ok(registry)
}
