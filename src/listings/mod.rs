//! Result normalization and response formatting for job boards.

pub mod format;
pub mod normalize;

pub use format::{format_error, format_no_results, format_results, SearchDescription};
pub use normalize::{normalize, FieldAliases, JobListing, NOT_AVAILABLE};

/// Job boards backed by a scraping actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobBoard {
    LinkedIn,
    Indeed,
}

impl JobBoard {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Indeed => "Indeed",
        }
    }

    pub fn aliases(&self) -> &'static FieldAliases {
        match self {
            Self::LinkedIn => &normalize::LINKEDIN_ALIASES,
            Self::Indeed => &normalize::INDEED_ALIASES,
        }
    }

    /// Prefix used on every failure message from this board's tool.
    pub fn error_prefix(&self) -> String {
        format!("Error scraping {} jobs", self.display_name())
    }
}
