use std::io::Read;
use std::path::{Path, PathBuf};

use faddt_core::error::{ErrorPayload, FaddtError, codes};
use faddt_core::{AuditCase, ReportFormat};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "faddt=warn,faddt_core=warn";

/// Exit codes: 0=success, 1=domain error (bad case data, nothing to report),
///             4=usage or i/o error
pub const EXIT_DOMAIN_ERROR: i32 = 1;
pub const EXIT_USAGE_ERROR: i32 = 4;

/// Logs go to stderr so stdout stays machine-readable.
/// Filter comes from `FADDT_LOG`, then `RUST_LOG`.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("FADDT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn print_payload(payload: &ErrorPayload) {
    match serde_json::to_string_pretty(payload) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{}: {}", payload.error, payload.message),
    }
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut payload = ErrorPayload::new("cli_error", message);
    if let Some(hint) = docs_hint {
        payload = payload.with_docs_hint(hint);
    }
    print_payload(&payload);
    std::process::exit(EXIT_USAGE_ERROR);
}

/// Prints a structured error and returns the matching exit code.
pub fn fail(err: &FaddtError) -> i32 {
    tracing::debug!(error = %err, "command failed");
    let mut payload = err.to_payload();
    if err.code() == codes::NO_MATCHING_CASES {
        payload = payload.with_docs_hint("Relax --severity or drop --exclude-closed");
    }
    print_payload(&payload);
    match err {
        FaddtError::Io(_) => EXIT_USAGE_ERROR,
        _ => EXIT_DOMAIN_ERROR,
    }
}

/// Response text from `--text`, else `--file`, else all of `stdin`.
pub fn resolve_text(
    text: Option<String>,
    file: Option<&Path>,
    mut stdin: impl Read,
) -> Result<String, FaddtError> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Reads a JSON array of audit cases.
pub fn load_cases(path: &Path) -> Result<Vec<AuditCase>, FaddtError> {
    let raw = std::fs::read_to_string(path)?;
    let cases: Vec<AuditCase> = serde_json::from_str(&raw)?;
    tracing::debug!(path = %path.display(), cases = cases.len(), "loaded case file");
    Ok(cases)
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, FaddtError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes to `path`, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), FaddtError> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Explicit `--output` wins; `--output-dir` gets a generated report name.
pub fn resolve_output_path(
    output: Option<PathBuf>,
    output_dir: Option<&Path>,
    format: ReportFormat,
    now: chrono::DateTime<chrono::Utc>,
) -> Option<PathBuf> {
    output.or_else(|| output_dir.map(|dir| dir.join(format.file_name(now))))
}
