use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use faddt_core::error::FaddtError;
use faddt_core::report::filter_cases;
use faddt_core::{CaseStats, ReportFilter, ReportFormat, Severity, render_report};

use crate::util::{
    exit_error, fail, load_cases, resolve_output_path, to_pretty_json, write_output,
};

#[derive(Args)]
pub struct ReportArgs {
    /// JSON file holding an array of audit cases
    #[arg(long, env = "FADDT_CASES")]
    pub cases: PathBuf,
    /// Output format
    #[arg(
        long,
        env = "FADDT_REPORT_FORMAT",
        default_value = "text",
        value_parser = ["text", "json", "csv"]
    )]
    pub format: String,
    /// Leave closed cases out of the report
    #[arg(long)]
    pub exclude_closed: bool,
    /// Only include cases of this severity
    #[arg(long, value_parser = ["low", "medium", "high", "critical"])]
    pub severity: Option<String>,
    /// Write the report to this file
    #[arg(long, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,
    /// Write the report into this directory under a generated name
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Print case statistics (over all cases) to stderr
    #[arg(long)]
    pub stats: bool,
}

pub fn run(args: ReportArgs) -> i32 {
    let format = args.format.parse::<ReportFormat>().unwrap_or_else(|e| {
        exit_error(&e.to_string(), Some("Use --format text, json or csv"));
    });
    let severity = args.severity.as_deref().map(|s| {
        s.parse::<Severity>().unwrap_or_else(|e| {
            exit_error(&e.to_string(), Some("Use --severity low, medium, high or critical"));
        })
    });
    let filter = ReportFilter {
        include_closed: !args.exclude_closed,
        severity,
    };

    match report(&args, format, &filter) {
        Ok(()) => 0,
        Err(err) => fail(&err),
    }
}

fn report(args: &ReportArgs, format: ReportFormat, filter: &ReportFilter) -> Result<(), FaddtError> {
    let cases = load_cases(&args.cases)?;
    if args.stats {
        eprintln!("{}", to_pretty_json(&CaseStats::from_cases(&cases))?);
    }

    let selected = filter_cases(&cases, filter);
    tracing::info!(total = cases.len(), selected = selected.len(), "filtered cases");

    let now = Utc::now();
    let content = render_report(format, &selected, now)?;
    let path = resolve_output_path(args.output.clone(), args.output_dir.as_deref(), format, now);
    write_output(path.as_deref(), &content)
}
