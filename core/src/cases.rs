use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::detector::{AnalysisResult, DeceptionPattern, analyze_deception_patterns};

/// Number of description characters shown in list views.
pub const SUMMARY_CHARS: usize = 150;

#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("field '{field}' is required and must not be blank")]
    MissingField { field: &'static str },
    #[error("no audit case with id {0}")]
    NotFound(Uuid),
}

#[derive(Debug, thiserror::Error)]
#[error("unknown severity '{0}' (expected low, medium, high or critical)")]
pub struct ParseSeverityError(String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CaseType {
    #[default]
    HardwareMismatch,
    AiDeception,
    FalseAdvertising,
    SpecFraud,
    Other,
}

impl CaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseType::HardwareMismatch => "hardware-mismatch",
            CaseType::AiDeception => "ai-deception",
            CaseType::FalseAdvertising => "false-advertising",
            CaseType::SpecFraud => "spec-fraud",
            CaseType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Open,
    Closed,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Open => "open",
            CaseStatus::Closed => "closed",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CaseStatus::Open => CaseStatus::Closed,
            CaseStatus::Closed => CaseStatus::Open,
        }
    }
}

/// User-supplied fields of an audit case, as entered on the case form.
/// Empty optional fields are treated the same as absent ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditCase {
    /// Short description of the case (required)
    pub title: String,
    #[serde(default)]
    pub case_type: CaseType,
    /// Detailed description of the issue (required)
    pub description: String,
    /// Store location or website URL
    #[serde(default)]
    pub location: Option<String>,
    /// Retailer or vendor name
    #[serde(default)]
    pub retailer: Option<String>,
    /// Advertised or expected specifications
    #[serde(default)]
    pub expected_specs: Option<String>,
    /// Specifications actually discovered
    #[serde(default)]
    pub actual_specs: Option<String>,
    /// Screenshots, receipts, serial numbers, etc.
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub failure_timeline: Option<String>,
    /// Statutory sections the case maps to
    #[serde(default)]
    pub acl_sections: Vec<String>,
    /// AI-generated response under review; input to the deception scorer
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub intentionality: Option<String>,
}

/// A stored audit case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditCase {
    /// Case ID (UUIDv7, time-sortable)
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(flatten)]
    pub details: NewAuditCase,
    /// Pattern recommended by the scorer, e.g. "safety-hedging"
    #[serde(default)]
    pub deception_pattern: Option<String>,
}

impl AuditCase {
    /// Scores the AI response (missing scores as empty text) and, when a
    /// pattern is detected, records the recommendation on the case.
    pub fn analyze(&mut self, context: Option<&str>) -> AnalysisResult {
        let text = self.details.ai_response.as_deref().unwrap_or_default();
        let analysis = analyze_deception_patterns(text, context);

        if analysis.detected {
            let recommendation = analysis
                .recommendation
                .map_or("none", DeceptionPattern::as_str);
            self.deception_pattern = Some(recommendation.to_string());
            tracing::info!(
                case_id = %self.id,
                pattern = recommendation,
                score = analysis.overall_score,
                "deception pattern recorded"
            );
        }
        analysis
    }
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdate {
    pub status: Option<CaseStatus>,
    pub severity: Option<Severity>,
    pub deception_pattern: Option<String>,
    pub ai_response: Option<String>,
    pub intentionality: Option<String>,
    pub notes: Option<String>,
}

/// `Some` only for non-empty text. Whitespace-only text is kept.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Description excerpt for list views.
pub fn case_summary(description: &str) -> String {
    if description.chars().count() > SUMMARY_CHARS {
        let head: String = description.chars().take(SUMMARY_CHARS).collect();
        format!("{head}...")
    } else {
        description.to_string()
    }
}

/// Ordered in-memory case list. Lives only as long as the session.
#[derive(Debug, Default)]
pub struct CaseStore {
    cases: Vec<AuditCase>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cases(cases: Vec<AuditCase>) -> Self {
        Self { cases }
    }

    pub fn cases(&self) -> &[AuditCase] {
        &self.cases
    }

    pub fn into_cases(self) -> Vec<AuditCase> {
        self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&AuditCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut AuditCase, CaseError> {
        self.cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CaseError::NotFound(id))
    }

    /// Validates and appends a new open case.
    pub fn add(&mut self, new_case: NewAuditCase) -> Result<&AuditCase, CaseError> {
        if new_case.title.trim().is_empty() {
            return Err(CaseError::MissingField { field: "title" });
        }
        if new_case.description.trim().is_empty() {
            return Err(CaseError::MissingField {
                field: "description",
            });
        }

        let case = AuditCase {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            status: CaseStatus::Open,
            details: new_case,
            deception_pattern: None,
        };
        tracing::info!(case_id = %case.id, case_type = case.details.case_type.as_str(), "audit case created");
        self.cases.push(case);
        Ok(self.cases.last().expect("case was just pushed"))
    }

    pub fn update(&mut self, id: Uuid, update: CaseUpdate) -> Result<&AuditCase, CaseError> {
        let case = self.get_mut(id)?;
        if let Some(status) = update.status {
            case.status = status;
        }
        if let Some(severity) = update.severity {
            case.details.severity = severity;
        }
        if let Some(pattern) = update.deception_pattern {
            case.deception_pattern = Some(pattern);
        }
        if let Some(ai_response) = update.ai_response {
            case.details.ai_response = Some(ai_response);
        }
        if let Some(intentionality) = update.intentionality {
            case.details.intentionality = Some(intentionality);
        }
        if let Some(notes) = update.notes {
            case.details.notes = Some(notes);
        }
        tracing::debug!(case_id = %id, "audit case updated");
        Ok(case)
    }

    /// Flips open/closed and returns the new status.
    pub fn toggle_status(&mut self, id: Uuid) -> Result<CaseStatus, CaseError> {
        let case = self.get_mut(id)?;
        case.status = case.status.toggled();
        Ok(case.status)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<AuditCase, CaseError> {
        let index = self
            .cases
            .iter()
            .position(|c| c.id == id)
            .ok_or(CaseError::NotFound(id))?;
        tracing::info!(case_id = %id, "audit case deleted");
        Ok(self.cases.remove(index))
    }

    /// Runs [`AuditCase::analyze`] on the case with this id.
    pub fn analyze_case(
        &mut self,
        id: Uuid,
        context: Option<&str>,
    ) -> Result<AnalysisResult, CaseError> {
        Ok(self.get_mut(id)?.analyze(context))
    }

    /// Runs [`AuditCase::analyze`] on every case carrying an AI response,
    /// by position, so cases sharing an id are each scored. Returns how many
    /// cases were scored and how many were flagged.
    pub fn analyze_all(&mut self, context: Option<&str>) -> (usize, usize) {
        let mut scored = 0;
        let mut flagged = 0;
        for case in &mut self.cases {
            if non_empty(&case.details.ai_response).is_none() {
                continue;
            }
            scored += 1;
            if case.analyze(context).detected {
                flagged += 1;
            }
        }
        (scored, flagged)
    }
}
