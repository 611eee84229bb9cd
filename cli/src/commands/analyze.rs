use std::path::PathBuf;

use clap::Args;
use faddt_core::error::FaddtError;
use faddt_core::{AnalysisResult, analyze_deception_patterns, analyze_value};

use crate::util::{fail, resolve_text, to_pretty_json, write_output};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Response text to score (reads --file or stdin when omitted)
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,
    /// Read the response text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Original user input the response answers
    #[arg(long)]
    pub context: Option<String>,
    /// Treat the input as a JSON request: {"text": ..., "context": ...}
    #[arg(long)]
    pub json: bool,
    /// Print only the triggered indicators
    #[arg(long)]
    pub indicators_only: bool,
}

pub fn run(args: AnalyzeArgs) -> i32 {
    match analyze(args) {
        Ok(()) => 0,
        Err(err) => fail(&err),
    }
}

fn analyze(args: AnalyzeArgs) -> Result<(), FaddtError> {
    let input = resolve_text(args.text, args.file.as_deref(), std::io::stdin().lock())?;
    let analysis = if args.json {
        score_request(&input, args.context.as_deref())?
    } else {
        analyze_deception_patterns(&input, args.context.as_deref())
    };

    let out = if args.indicators_only {
        to_pretty_json(&analysis.flattened_indicators())?
    } else {
        to_pretty_json(&analysis)?
    };
    write_output(None, &out)
}

/// A request whose `text` is missing or not a string scores as empty text.
/// `--context` overrides the request's own `context`.
fn score_request(raw: &str, context: Option<&str>) -> Result<AnalysisResult, FaddtError> {
    let request: serde_json::Value = serde_json::from_str(raw)?;
    let text = request.get("text").unwrap_or(&serde_json::Value::Null);
    let context = context.or_else(|| request.get("context").and_then(|c| c.as_str()));
    Ok(analyze_value(text, context))
}
