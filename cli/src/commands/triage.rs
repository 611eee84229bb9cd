use std::path::PathBuf;

use clap::Args;
use faddt_core::{AuditCase, CaseStore};

use crate::util::{fail, load_cases, to_pretty_json, write_output};

#[derive(Args)]
pub struct TriageArgs {
    /// JSON file holding an array of audit cases
    #[arg(long, env = "FADDT_CASES")]
    pub cases: PathBuf,
    /// Write the updated cases here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: TriageArgs) -> i32 {
    let result = load_cases(&args.cases)
        .map(triage)
        .and_then(|cases| to_pretty_json(&cases))
        .and_then(|json| write_output(args.output.as_deref(), &json));
    match result {
        Ok(()) => 0,
        Err(err) => fail(&err),
    }
}

/// Scores every case that carries an AI response; detected patterns are
/// written back onto the case.
fn triage(cases: Vec<AuditCase>) -> Vec<AuditCase> {
    let mut store = CaseStore::from_cases(cases);
    let (scored, flagged) = store.analyze_all(None);
    tracing::info!(scored, flagged, "triage complete");
    store.into_cases()
}
