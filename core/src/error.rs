use serde::Serialize;
use utoipa::ToSchema;

use crate::cases::CaseError;
use crate::report::ReportError;

/// Structured error payload printed by the tools on failure.
/// Carries enough context for a caller (human or script) to fix the input.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorPayload {
    /// Machine-readable error code (see [`codes`])
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

impl ErrorPayload {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            field: None,
            docs_hint: None,
        }
    }

    pub fn with_docs_hint(mut self, hint: impl Into<String>) -> Self {
        self.docs_hint = Some(hint.into());
        self
    }
}

/// Error codes shared by the library and the CLI
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const NO_MATCHING_CASES: &str = "no_matching_cases";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const IO_ERROR: &str = "io_error";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Crate-level error, wrapping the per-module taxonomies.
#[derive(Debug, thiserror::Error)]
pub enum FaddtError {
    #[error(transparent)]
    Case(#[from] CaseError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("invalid case data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl FaddtError {
    /// Stable machine code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            FaddtError::Case(CaseError::MissingField { .. }) => codes::VALIDATION_FAILED,
            FaddtError::Case(CaseError::NotFound(_)) => codes::NOT_FOUND,
            FaddtError::Report(ReportError::NoMatchingCases) => codes::NO_MATCHING_CASES,
            FaddtError::Report(ReportError::Serialize(_)) => codes::INTERNAL_ERROR,
            FaddtError::Json(_) => codes::INVALID_INPUT,
            FaddtError::Io(_) => codes::IO_ERROR,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let mut payload = ErrorPayload::new(self.code(), self.to_string());
        if let FaddtError::Case(CaseError::MissingField { field }) = self {
            payload.field = Some((*field).to_string());
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::{FaddtError, codes};
    use crate::cases::CaseError;
    use crate::report::ReportError;

    #[test]
    fn missing_field_maps_to_validation_payload() {
        let err = FaddtError::from(CaseError::MissingField { field: "title" });
        let payload = err.to_payload();
        assert_eq!(payload.error, codes::VALIDATION_FAILED);
        assert_eq!(payload.field.as_deref(), Some("title"));
    }

    #[test]
    fn empty_report_has_dedicated_code() {
        let err = FaddtError::from(ReportError::NoMatchingCases);
        assert_eq!(err.code(), codes::NO_MATCHING_CASES);
        let json = serde_json::to_value(err.to_payload()).unwrap();
        assert!(json.get("field").is_none());
        assert!(json.get("docs_hint").is_none());
    }
}
