//! Renders listings (or failures) into the single text block returned to the caller.

use std::fmt::Display;

use super::normalize::JobListing;
use super::JobBoard;

pub const LISTING_DIVIDER: &str = "\n\n---\n\n";

/// What was searched for, as echoed back in the response header.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDescription {
    pub board: JobBoard,
    pub query: String,
    /// Location (or country) appended as ` in <place>`.
    pub place: Option<String>,
}

impl SearchDescription {
    pub fn new(board: JobBoard, query: impl Into<String>, place: Option<String>) -> Self {
        Self {
            board,
            query: query.into(),
            place,
        }
    }

    fn place_suffix(&self) -> String {
        match self.place.as_deref() {
            Some(place) if !place.trim().is_empty() => format!(" in {place}"),
            _ => String::new(),
        }
    }
}

/// Header plus one block per listing. `total` is the number of records the
/// platform returned before truncation.
pub fn format_results(search: &SearchDescription, total: usize, listings: &[JobListing]) -> String {
    if listings.is_empty() {
        return format_no_results(search);
    }

    let blocks: Vec<String> = listings
        .iter()
        .enumerate()
        .map(|(index, listing)| format_listing(index + 1, listing))
        .collect();

    format!(
        "# {} Jobs Search Results\n\n**Search Query:** \"{}\"{}\n**Found:** {} jobs (showing {})\n\n{}",
        search.board.display_name(),
        search.query,
        search.place_suffix(),
        total,
        listings.len(),
        blocks.join(LISTING_DIVIDER)
    )
}

pub fn format_no_results(search: &SearchDescription) -> String {
    format!(
        "No jobs found for \"{}\"{}. Try different search terms or location.",
        search.query,
        search.place_suffix()
    )
}

/// `"<prefix>: <cause>"`, e.g. `Error scraping LinkedIn jobs: actor run failed with HTTP 401`.
pub fn format_error(prefix: &str, cause: &dyn Display) -> String {
    format!("{prefix}: {cause}")
}

fn format_listing(position: usize, listing: &JobListing) -> String {
    let mut lines = vec![
        format!("**{}. {}**", position, listing.title),
        format!("🏢 **Company:** {}", listing.company),
        format!("📍 **Location:** {}", listing.location),
        format!("⏰ **Posted:** {}", listing.posted_at),
        format!("🔗 **Link:** {}", listing.url),
    ];

    if let Some(salary) = &listing.salary {
        lines.push(format!("💰 **Salary:** {salary}"));
    }
    if let Some(kind) = &listing.employment_type {
        lines.push(format!("🏠 **Type:** {kind}"));
    }
    if let Some(applicants) = &listing.applicant_count {
        lines.push(format!("👥 **Applicants:** {applicants}"));
    }
    if let Some(rating) = &listing.company_rating {
        lines.push(format!("⭐ **Company Rating:** {rating}"));
    }
    if let Some(description) = &listing.description {
        lines.push(format!("📄 **Description:** {description}"));
    }

    lines.join("\n")
}
