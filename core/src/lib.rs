pub mod cases;
pub mod detector;
pub mod error;
pub mod report;
pub mod schema;

pub use cases::{
    AuditCase, CaseError, CaseStatus, CaseStore, CaseType, CaseUpdate, NewAuditCase, Severity,
};
pub use detector::{
    AllPatterns, AnalysisResult, Confidence, DeceptionPattern, DetectionResult,
    analyze_deception_patterns, analyze_value, detect_facade_of_competence,
    detect_safety_hedging, detect_stochastic_parroting,
};
pub use error::{ErrorPayload, FaddtError};
pub use report::{CaseStats, ReportError, ReportFilter, ReportFormat, render_report};
