use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cases::{AuditCase, CaseStatus, CaseType, Severity, non_empty};

pub const TOOL_NAME: &str = "Forensic Audit & Deception Detection Toolkit (FADDT)";
pub const REPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

const RULE_WIDTH: usize = 80;

pub const CSV_HEADERS: [&str; 18] = [
    "ID",
    "Title",
    "Type",
    "Severity",
    "Status",
    "Created",
    "Retailer",
    "Location",
    "Description",
    "Expected Specs",
    "Actual Specs",
    "Failure Timeline",
    "ACL Sections",
    "Evidence",
    "AI Response",
    "Deception Pattern",
    "Intentionality",
    "Notes",
];

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no cases match the selected filters")]
    NoMatchingCases,
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("unknown report format '{0}' (expected text, json or csv)")]
pub struct ParseFormatError(String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ReportFormat::Text => "text/plain",
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv",
        }
    }

    /// Download name, e.g. `faddt-report-1714557600000.csv`.
    pub fn file_name(self, now: DateTime<Utc>) -> String {
        format!("faddt-report-{}.{}", now.timestamp_millis(), self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

/// Which cases go into a report.
#[derive(Debug, Clone, Copy)]
pub struct ReportFilter {
    pub include_closed: bool,
    /// `None` means every severity
    pub severity: Option<Severity>,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            include_closed: true,
            severity: None,
        }
    }
}

impl ReportFilter {
    pub fn matches(&self, case: &AuditCase) -> bool {
        if !self.include_closed && case.status != CaseStatus::Open {
            return false;
        }
        self.severity.is_none_or(|s| case.details.severity == s)
    }
}

pub fn filter_cases<'a>(cases: &'a [AuditCase], filter: &ReportFilter) -> Vec<&'a AuditCase> {
    cases.iter().filter(|c| filter.matches(c)).collect()
}

/// Counts over the whole case list, independent of any filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CaseStats {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl CaseStats {
    pub fn from_cases(cases: &[AuditCase]) -> Self {
        let mut stats = Self {
            total: cases.len(),
            ..Self::default()
        };
        for case in cases {
            match case.status {
                CaseStatus::Open => stats.open += 1,
                CaseStatus::Closed => stats.closed += 1,
            }
            match case.details.severity {
                Severity::Critical => stats.critical += 1,
                Severity::High => stats.high += 1,
                Severity::Medium => stats.medium += 1,
                Severity::Low => stats.low += 1,
            }
        }
        stats
    }
}

/// Renders `cases` in the requested format. Refuses to render an empty list.
pub fn render_report(
    format: ReportFormat,
    cases: &[&AuditCase],
    generated_at: DateTime<Utc>,
) -> Result<String, ReportError> {
    if cases.is_empty() {
        return Err(ReportError::NoMatchingCases);
    }
    tracing::debug!(format = format.extension(), cases = cases.len(), "rendering report");
    match format {
        ReportFormat::Text => Ok(generate_text_report(cases, generated_at)),
        ReportFormat::Json => generate_json_report(cases, generated_at),
        ReportFormat::Csv => Ok(generate_csv_report(cases)),
    }
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Stored pattern/assessment values print with hyphens as spaces.
fn humanize(value: &str) -> String {
    value.replace('-', " ")
}

pub fn generate_text_report(cases: &[&AuditCase], generated_at: DateTime<Utc>) -> String {
    let banner = "=".repeat(RULE_WIDTH);
    let divider = "-".repeat(RULE_WIDTH);
    let mut lines: Vec<String> = vec![
        banner.clone(),
        "FORENSIC AUDIT & DECEPTION DETECTION TOOLKIT (FADDT) - AUDIT REPORT".to_string(),
        banner.clone(),
        format!("Generated: {}", iso_timestamp(generated_at)),
        format!("Total Cases: {}", cases.len()),
        banner.clone(),
        String::new(),
    ];

    for (index, case) in cases.iter().enumerate() {
        let details = &case.details;
        lines.push(String::new());
        lines.push(format!("CASE #{}", index + 1));
        lines.push(divider.clone());
        lines.push(format!("Title: {}", details.title));
        lines.push(format!("Type: {}", details.case_type.as_str()));
        lines.push(format!(
            "Severity: {}",
            details.severity.as_str().to_uppercase()
        ));
        lines.push(format!("Status: {}", case.status.as_str()));
        lines.push(format!(
            "Created: {}",
            case.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if let Some(retailer) = non_empty(&details.retailer) {
            lines.push(format!("Retailer: {retailer}"));
        }
        if let Some(location) = non_empty(&details.location) {
            lines.push(format!("Location: {location}"));
        }

        let mut section = |heading: &str, body: &str| {
            lines.push(String::new());
            lines.push(format!("{heading}:\n{body}"));
        };

        section("Description", &details.description);
        if let Some(v) = non_empty(&details.expected_specs) {
            section("Expected Specifications", v);
        }
        if let Some(v) = non_empty(&details.actual_specs) {
            section("Actual Specifications", v);
        }
        if let Some(v) = non_empty(&details.failure_timeline) {
            section("Structural Failure Timeline", v);
        }
        if !details.acl_sections.is_empty() {
            section(
                "ACL Statutory Mapping",
                &format!("Sections {}", details.acl_sections.join(", ")),
            );
        }
        if let Some(v) = non_empty(&details.evidence) {
            section("Evidence", v);
        }
        if let Some(v) = non_empty(&details.ai_response) {
            section("AI Response", v);
        }
        if let Some(v) = non_empty(&case.deception_pattern).filter(|p| *p != "none") {
            section("Deception Pattern", &humanize(v));
        }
        if let Some(v) = non_empty(&details.intentionality) {
            section("Intentionality Assessment", &humanize(v));
        }
        if let Some(v) = non_empty(&details.notes) {
            section("Additional Notes", v);
        }

        lines.push(divider.clone());
    }

    lines.push(String::new());
    lines.push(banner.clone());
    lines.push("END OF REPORT".to_string());
    lines.push(banner);

    lines.join("\n")
}

/// JSON export envelope.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub generated_at: String,
    pub total_cases: usize,
    pub version: String,
    pub tool: String,
    pub cases: Vec<JsonReportCase>,
}

/// One exported case. Empty optional fields export as `null`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsonReportCase {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub case_type: CaseType,
    pub severity: Severity,
    pub status: CaseStatus,
    /// ISO-8601 UTC with milliseconds, e.g. `2024-05-01T10:00:00.000Z`
    pub created_at: String,
    pub retailer: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub expected_specs: Option<String>,
    pub actual_specs: Option<String>,
    pub failure_timeline: Option<String>,
    pub acl_sections: Vec<String>,
    pub evidence: Option<String>,
    pub ai_response: Option<String>,
    pub deception_pattern: Option<String>,
    pub intentionality: Option<String>,
    pub notes: Option<String>,
}

impl From<&AuditCase> for JsonReportCase {
    fn from(case: &AuditCase) -> Self {
        let d = &case.details;
        let owned = |v: &Option<String>| non_empty(v).map(str::to_string);
        Self {
            id: case.id,
            title: d.title.clone(),
            case_type: d.case_type,
            severity: d.severity,
            status: case.status,
            created_at: iso_timestamp(case.created_at),
            retailer: owned(&d.retailer),
            location: owned(&d.location),
            description: d.description.clone(),
            expected_specs: owned(&d.expected_specs),
            actual_specs: owned(&d.actual_specs),
            failure_timeline: owned(&d.failure_timeline),
            acl_sections: d.acl_sections.clone(),
            evidence: owned(&d.evidence),
            ai_response: owned(&d.ai_response),
            deception_pattern: owned(&case.deception_pattern),
            intentionality: owned(&d.intentionality),
            notes: owned(&d.notes),
        }
    }
}

pub fn generate_json_report(
    cases: &[&AuditCase],
    generated_at: DateTime<Utc>,
) -> Result<String, ReportError> {
    let report = JsonReport {
        generated_at: iso_timestamp(generated_at),
        total_cases: cases.len(),
        version: REPORT_VERSION.to_string(),
        tool: TOOL_NAME.to_string(),
        cases: cases.iter().map(|c| JsonReportCase::from(*c)).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Quotes a field when it contains a delimiter, quote or line break.
pub fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report(cases: &[&AuditCase]) -> String {
    let mut csv = CSV_HEADERS.join(",");
    csv.push('\n');

    for case in cases {
        let d = &case.details;
        let opt = |v: &Option<String>| escape_csv(non_empty(v).unwrap_or_default());
        let row = [
            case.id.to_string(),
            escape_csv(&d.title),
            d.case_type.as_str().to_string(),
            d.severity.as_str().to_string(),
            case.status.as_str().to_string(),
            iso_timestamp(case.created_at),
            opt(&d.retailer),
            opt(&d.location),
            escape_csv(&d.description),
            opt(&d.expected_specs),
            opt(&d.actual_specs),
            opt(&d.failure_timeline),
            escape_csv(&d.acl_sections.join(" | ")),
            opt(&d.evidence),
            opt(&d.ai_response),
            opt(&case.deception_pattern),
            opt(&d.intentionality),
            opt(&d.notes),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}
