use utoipa::OpenApi;

/// Component schemas for everything the tools print or read as JSON.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FADDT data shapes",
        version = "0.1.0",
        description = "Deception-pattern analysis results, audit case records and report exports."
    ),
    components(schemas(
        crate::detector::DeceptionPattern,
        crate::detector::Confidence,
        crate::detector::DetectionResult,
        crate::detector::AllPatterns,
        crate::detector::AnalysisResult,
        crate::cases::CaseType,
        crate::cases::Severity,
        crate::cases::CaseStatus,
        crate::cases::NewAuditCase,
        crate::cases::AuditCase,
        crate::cases::CaseUpdate,
        crate::report::ReportFormat,
        crate::report::CaseStats,
        crate::report::JsonReport,
        crate::report::JsonReportCase,
        crate::error::ErrorPayload,
    ))
)]
pub struct SchemaDoc;

/// Pretty-printed OpenAPI document.
pub fn schema_json() -> Result<String, serde_json::Error> {
    SchemaDoc::openapi().to_pretty_json()
}
