//! Validation errors for tool arguments.
//!
//! Messages are written to be read by the calling agent, so each one names
//! the offending field and, where useful, how to fix it.

use std::fmt;

/// Validation error with detailed, user-friendly messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(field, "is required")
    }

    pub fn blank_field(field: &str) -> Self {
        Self::new(field, "must not be empty")
    }

    pub fn wrong_type(field: &str, expected: &str, found: &str) -> Self {
        Self::new(field, format!("expected {expected}, got {found}"))
    }

    pub fn below_minimum(field: &str, minimum: f64) -> Self {
        Self::new(field, format!("must be at least {minimum}"))
    }

    pub fn above_maximum(field: &str, maximum: f64) -> Self {
        Self::new(field, format!("must be at most {maximum}"))
    }

    pub fn not_one_of(field: &str, value: &str, allowed: &[&str]) -> Self {
        Self::new(field, format!("'{value}' is not an allowed value"))
            .with_suggestion(format!("Use one of: {}", allowed.join(", ")))
    }

    pub fn not_an_object() -> Self {
        Self::new("arguments", "must be a JSON object")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get formatted error message suitable for MCP response
    pub fn to_mcp_message(&self) -> String {
        match self.errors.as_slice() {
            [] => String::new(),
            [single] => format!("invalid arguments: {single}"),
            many => {
                let mut parts = vec![format!("invalid arguments ({} problems):", many.len())];
                for (i, error) in many.iter().enumerate() {
                    parts.push(format!("{}. {}", i + 1, error));
                }
                parts.join("\n")
            }
        }
    }

    /// Ok if no errors were collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mcp_message())
    }
}

impl std::error::Error for ValidationErrors {}
