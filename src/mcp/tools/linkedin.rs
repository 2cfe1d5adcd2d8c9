//! Tool definition for `scrape_linkedin_jobs`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::job_search::{BoardSearch, JobSearchTool};
use super::registry::ToolSpec;
use super::schema::{ParamSpec, ParameterSchema};
use crate::config::ActorConfig;
use crate::jobs::JobRunner;
use crate::listings::{JobBoard, SearchDescription};

pub const TOOL_NAME: &str = "scrape_linkedin_jobs";

/// Used when the caller gives no location.
pub const DEFAULT_LOCATION: &str = "United States";

pub const EXPERIENCE_LEVELS: &[&str] = &[
    "Internship",
    "Entry level",
    "Associate",
    "Mid-Senior level",
    "Director",
    "Executive",
];

pub const JOB_TYPES: &[&str] = &[
    "Full-time",
    "Part-time",
    "Contract",
    "Temporary",
    "Volunteer",
    "Internship",
    "Other",
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInSearch {
    pub job_title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company_name: Option<Vec<String>>,
    #[serde(default)]
    pub company_id: Option<Vec<String>>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    pub max_results: usize,
}

impl BoardSearch for LinkedInSearch {
    const BOARD: JobBoard = JobBoard::LinkedIn;

    fn actor_input(&self) -> Map<String, Value> {
        let mut input = Map::new();
        input.insert("title".into(), json!(self.job_title));
        input.insert(
            "location".into(),
            json!(self.location.as_deref().unwrap_or(DEFAULT_LOCATION)),
        );
        input.insert("rows".into(), json!(self.max_results));
        input.insert(
            "proxy".into(),
            json!({
                "useApifyProxy": true,
                "apifyProxyGroups": ["RESIDENTIAL"]
            }),
        );

        if let Some(names) = self.company_name.as_ref().filter(|v| !v.is_empty()) {
            input.insert("companyName".into(), json!(names));
        }
        if let Some(ids) = self.company_id.as_ref().filter(|v| !v.is_empty()) {
            input.insert("companyId".into(), json!(ids));
        }
        if let Some(level) = &self.experience_level {
            input.insert("experienceLevel".into(), json!(level));
        }
        if let Some(job_type) = &self.job_type {
            input.insert("jobType".into(), json!(job_type));
        }
        input
    }

    fn description(&self) -> SearchDescription {
        SearchDescription::new(Self::BOARD, self.job_title.clone(), self.location.clone())
    }

    fn limit(&self) -> usize {
        self.max_results
    }
}

pub fn input_schema() -> ParameterSchema {
    ParameterSchema::new(vec![
        ParamSpec::string("jobTitle")
            .required()
            .describe("Job title to search for (e.g., 'Software Engineer', 'Marketing Manager')"),
        ParamSpec::string("location")
            .describe("Location for the job search (e.g., 'San Francisco, CA', 'Remote')"),
        ParamSpec::string_array("companyName").describe("Array of company names to filter by"),
        ParamSpec::string_array("companyId").describe("Array of LinkedIn company IDs to filter by"),
        ParamSpec::one_of("experienceLevel", EXPERIENCE_LEVELS).describe("Experience level filter"),
        ParamSpec::one_of("jobType", JOB_TYPES).describe("Employment type filter"),
        ParamSpec::integer("maxResults")
            .range(1.0, 100.0)
            .default_value(json!(10))
            .describe("Maximum number of jobs to return (1-100)"),
    ])
}

pub fn spec(runner: Arc<dyn JobRunner>, actor: ActorConfig) -> ToolSpec {
    ToolSpec {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "Search LinkedIn job postings by title, with optional location, company ",
            "and experience filters. Returns a formatted list of matching jobs."
        )
        .to_string(),
        error_prefix: JobBoard::LinkedIn.error_prefix(),
        schema: input_schema(),
        handler: Arc::new(JobSearchTool::<LinkedInSearch>::new(runner, actor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(value: Value) -> LinkedInSearch {
        input_schema()
            .validate(Some(value))
            .unwrap()
            .into_typed()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let search = search(json!({ "jobTitle": "Data Engineer" }));
        assert_eq!(search.max_results, 10);
        assert!(search.location.is_none());

        let input = search.actor_input();
        assert_eq!(input["title"], "Data Engineer");
        assert_eq!(input["location"], DEFAULT_LOCATION);
        assert_eq!(input["rows"], 10);
        assert_eq!(input["proxy"]["apifyProxyGroups"], json!(["RESIDENTIAL"]));
        assert!(!input.contains_key("companyName"));
        assert!(!input.contains_key("companyId"));
    }

    #[test]
    fn test_empty_filter_arrays_are_omitted() {
        let search = search(json!({
            "jobTitle": "Data Engineer",
            "companyName": [],
            "companyId": ["1441"]
        }));
        let input = search.actor_input();
        assert!(!input.contains_key("companyName"));
        assert_eq!(input["companyId"], json!(["1441"]));
    }

    #[test]
    fn test_filters_are_forwarded() {
        let search = search(json!({
            "jobTitle": "Data Engineer",
            "location": "Remote",
            "experienceLevel": "Director",
            "jobType": "Contract",
            "maxResults": 25
        }));
        let input = search.actor_input();
        assert_eq!(input["location"], "Remote");
        assert_eq!(input["experienceLevel"], "Director");
        assert_eq!(input["jobType"], "Contract");
        assert_eq!(input["rows"], 25);
        assert_eq!(search.description().place.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_blank_location_falls_back_to_default() {
        let search = search(json!({ "jobTitle": "Data Engineer", "location": "  " }));
        assert!(search.location.is_none());
        assert_eq!(search.actor_input()["location"], DEFAULT_LOCATION);
        assert!(search.description().place.is_none());
    }

    #[test]
    fn test_max_results_out_of_range() {
        let errors = input_schema()
            .validate(Some(json!({ "jobTitle": "x", "maxResults": 150 })))
            .unwrap_err();
        assert!(errors.to_mcp_message().contains("[maxResults] must be at most 100"));
    }

    #[test]
    fn test_unknown_experience_level() {
        let errors = input_schema()
            .validate(Some(json!({ "jobTitle": "x", "experienceLevel": "Senior" })))
            .unwrap_err();
        assert_eq!(errors.errors()[0].field, "experienceLevel");
    }
}
