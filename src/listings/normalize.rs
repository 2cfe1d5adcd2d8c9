//! Maps loosely-typed provider records onto [`JobListing`].
//!
//! Each logical field has an ordered alias list; the first alias holding a
//! usable value wins.

use serde::Serialize;
use serde_json::{Map, Value};

/// Rendered in place of a missing core field.
pub const NOT_AVAILABLE: &str = "N/A";
/// Character budget for descriptions before truncation.
pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

/// Alias keys per logical field, tried in order.
#[derive(Debug)]
pub struct FieldAliases {
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub posted_at: &'static [&'static str],
    pub url: &'static [&'static str],
    pub salary: &'static [&'static str],
    pub employment_type: &'static [&'static str],
    pub applicant_count: &'static [&'static str],
    pub company_rating: &'static [&'static str],
    pub description: &'static [&'static str],
}

pub static LINKEDIN_ALIASES: FieldAliases = FieldAliases {
    title: &["title", "jobTitle"],
    company: &["companyName", "company"],
    location: &["location", "jobLocation"],
    posted_at: &["publishedAt", "postedAt", "datePosted"],
    url: &["jobUrl", "url", "link"],
    salary: &["salary", "salaryRange"],
    employment_type: &["jobType", "employmentType"],
    applicant_count: &["applicants", "applicantsCount"],
    company_rating: &[],
    description: &["description"],
};

pub static INDEED_ALIASES: FieldAliases = FieldAliases {
    title: &["positionName", "title", "jobTitle"],
    company: &["company", "companyName"],
    location: &["location", "jobLocation"],
    posted_at: &["postedAt", "datePosted", "posted"],
    url: &["url", "jobUrl", "link"],
    salary: &["salary", "salaryRange", "estimatedSalary"],
    employment_type: &["jobType", "employmentType", "schedule"],
    applicant_count: &[],
    company_rating: &["rating", "companyRating"],
    description: &["description"],
};

/// A normalized job posting. Core fields always hold text ("N/A" when absent);
/// extras are `None` unless the provider supplied them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_at: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobListing {
    pub fn from_record(record: &Value, aliases: &FieldAliases) -> Self {
        let empty = Map::new();
        let fields = record.as_object().unwrap_or(&empty);

        Self {
            title: required(fields, aliases.title),
            company: required(fields, aliases.company),
            location: required(fields, aliases.location),
            posted_at: required(fields, aliases.posted_at),
            url: required(fields, aliases.url),
            salary: first_present(fields, aliases.salary),
            employment_type: first_present(fields, aliases.employment_type),
            applicant_count: first_present(fields, aliases.applicant_count),
            company_rating: first_present(fields, aliases.company_rating),
            description: first_present(fields, aliases.description)
                .map(|text| truncate_chars(&text, DESCRIPTION_MAX_CHARS)),
        }
    }
}

/// Normalize at most `limit` records, keeping input order.
pub fn normalize(records: &[Value], limit: usize, aliases: &FieldAliases) -> Vec<JobListing> {
    records
        .iter()
        .take(limit)
        .map(|record| JobListing::from_record(record, aliases))
        .collect()
}

/// First alias whose value renders to non-empty text.
pub fn first_present(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(value_text)
}

fn required(fields: &Map<String, Value>, keys: &[&str]) -> String {
    first_present(fields, keys).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// null, false, blank strings, empty arrays and objects count as absent.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Bool(false) | Value::Object(_) => None,
    }
}

/// Cut `text` to `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
        None => text.to_string(),
    }
}
