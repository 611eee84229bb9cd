pub mod analyze;
pub mod report;
pub mod schema;
pub mod triage;
