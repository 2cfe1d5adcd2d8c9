//! Tool definition for `scrape_indeed_jobs`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::job_search::{BoardSearch, JobSearchTool};
use super::registry::ToolSpec;
use super::schema::{ParamSpec, ParameterSchema};
use crate::config::ActorConfig;
use crate::jobs::JobRunner;
use crate::listings::{JobBoard, SearchDescription};

pub const TOOL_NAME: &str = "scrape_indeed_jobs";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndeedSearch {
    pub position: String,
    pub country: String,
    #[serde(default)]
    pub location: Option<String>,
    pub max_items: usize,
    pub parse_company_details: bool,
    pub save_only_unique_items: bool,
    pub follow_apply_redirects: bool,
}

impl BoardSearch for IndeedSearch {
    const BOARD: JobBoard = JobBoard::Indeed;

    fn actor_input(&self) -> Map<String, Value> {
        let mut input = Map::new();
        input.insert("position".into(), json!(self.position));
        input.insert("country".into(), json!(self.country));
        input.insert("maxItems".into(), json!(self.max_items));
        input.insert("parseCompanyDetails".into(), json!(self.parse_company_details));
        input.insert("saveOnlyUniqueItems".into(), json!(self.save_only_unique_items));
        input.insert("followApplyRedirects".into(), json!(self.follow_apply_redirects));
        if let Some(location) = &self.location {
            input.insert("location".into(), json!(location));
        }
        input
    }

    fn description(&self) -> SearchDescription {
        let place = self
            .location
            .clone()
            .unwrap_or_else(|| self.country.clone());
        SearchDescription::new(Self::BOARD, self.position.clone(), Some(place))
    }

    fn limit(&self) -> usize {
        self.max_items
    }
}

pub fn input_schema() -> ParameterSchema {
    ParameterSchema::new(vec![
        ParamSpec::string("position")
            .required()
            .describe("Job position to search for (e.g., 'web developer', 'marketing manager')"),
        ParamSpec::string("country")
            .default_value(json!("US"))
            .describe("Country code (e.g., 'US', 'CA', 'UK', 'DE')"),
        ParamSpec::string("location")
            .describe("Location for the job search (e.g., 'San Francisco', 'New York', 'Remote')"),
        ParamSpec::integer("maxItems")
            .range(1.0, 100.0)
            .default_value(json!(50))
            .describe("Maximum number of jobs to return (1-100)"),
        ParamSpec::boolean("parseCompanyDetails")
            .default_value(json!(false))
            .describe("Whether to parse detailed company information"),
        ParamSpec::boolean("saveOnlyUniqueItems")
            .default_value(json!(true))
            .describe("Whether to save only unique job items"),
        ParamSpec::boolean("followApplyRedirects")
            .default_value(json!(false))
            .describe("Whether to follow apply redirects for more details"),
    ])
}

pub fn spec(runner: Arc<dyn JobRunner>, actor: ActorConfig) -> ToolSpec {
    ToolSpec {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "Search Indeed job postings by position and country, optionally narrowed ",
            "to a location. Returns a formatted list of matching jobs."
        )
        .to_string(),
        error_prefix: JobBoard::Indeed.error_prefix(),
        schema: input_schema(),
        handler: Arc::new(JobSearchTool::<IndeedSearch>::new(runner, actor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_actor_input() {
        let search: IndeedSearch = input_schema()
            .validate(Some(json!({ "position": "welder" })))
            .unwrap()
            .into_typed()
            .unwrap();

        assert_eq!(search.country, "US");
        assert_eq!(search.max_items, 50);

        let input = search.actor_input();
        assert_eq!(input["position"], "welder");
        assert_eq!(input["maxItems"], 50);
        assert_eq!(input["parseCompanyDetails"], false);
        assert_eq!(input["saveOnlyUniqueItems"], true);
        assert_eq!(input["followApplyRedirects"], false);
        assert!(!input.contains_key("location"));
    }

    #[test]
    fn test_place_prefers_location_over_country() {
        let search: IndeedSearch = input_schema()
            .validate(Some(json!({ "position": "welder", "country": "DE", "location": "Berlin" })))
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(search.description().place.as_deref(), Some("Berlin"));
        assert_eq!(search.actor_input()["location"], "Berlin");

        let search: IndeedSearch = input_schema()
            .validate(Some(json!({ "position": "welder", "country": "DE" })))
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(search.description().place.as_deref(), Some("DE"));
    }

    #[test]
    fn test_blank_location_and_country() {
        let search: IndeedSearch = input_schema()
            .validate(Some(json!({ "position": "welder", "country": "", "location": "" })))
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(search.country, "US");
        assert!(search.location.is_none());
        assert!(!search.actor_input().contains_key("location"));
        assert_eq!(search.description().place.as_deref(), Some("US"));
    }

    #[test]
    fn test_boolean_type_checked() {
        let errors = input_schema()
            .validate(Some(json!({ "position": "welder", "parseCompanyDetails": "yes" })))
            .unwrap_err();
        assert!(errors
            .to_mcp_message()
            .contains("[parseCompanyDetails] expected boolean, got string"));
    }
}
