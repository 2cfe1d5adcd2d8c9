//! Shared handler for the job board tools.
//!
//! A board contributes its typed arguments (via [`BoardSearch`]); running
//! the actor, normalizing the records and rendering the text is common.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::registry::ToolHandler;
use super::schema::Arguments;
use super::ToolError;
use crate::config::ActorConfig;
use crate::jobs::{JobRequest, JobRunner};
use crate::listings::{format_no_results, format_results, normalize, JobBoard, SearchDescription};

/// Typed arguments of one job board tool.
pub trait BoardSearch: DeserializeOwned + Send {
    const BOARD: JobBoard;

    /// Input payload sent to the actor.
    fn actor_input(&self) -> Map<String, Value>;

    fn description(&self) -> SearchDescription;

    /// Maximum number of listings to render.
    fn limit(&self) -> usize;
}

pub struct JobSearchTool<S> {
    runner: Arc<dyn JobRunner>,
    actor: ActorConfig,
    _search: PhantomData<fn() -> S>,
}

impl<S: BoardSearch> JobSearchTool<S> {
    pub fn new(runner: Arc<dyn JobRunner>, actor: ActorConfig) -> Self {
        Self {
            runner,
            actor,
            _search: PhantomData,
        }
    }

    /// Run the search and render the response text.
    pub async fn search(&self, search: S) -> Result<String, ToolError> {
        let request = JobRequest::new(
            self.actor.actor_id.clone(),
            search.actor_input(),
            self.actor.mode,
        );
        let description = search.description();

        let records = self.runner.run(&request).await?;
        info!(
            "{} actor {} returned {} records",
            S::BOARD.display_name(),
            request.actor_id,
            records.len()
        );

        if records.is_empty() {
            return Ok(format_no_results(&description));
        }

        let listings = normalize(&records, search.limit(), S::BOARD.aliases());
        Ok(format_results(&description, records.len(), &listings))
    }
}

#[async_trait]
impl<S: BoardSearch + 'static> ToolHandler for JobSearchTool<S> {
    async fn call(&self, arguments: Arguments) -> Result<String, ToolError> {
        let search: S = arguments.into_typed()?;
        self.search(search).await
    }
}
