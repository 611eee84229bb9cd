use clap::{Parser, Subcommand};

mod commands;
mod util;

#[derive(Parser)]
#[command(
    name = "faddt",
    version,
    about = "Forensic Audit & Deception Detection Toolkit: score AI responses and export audit case reports"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an AI response for deception patterns
    Analyze(commands::analyze::AnalyzeArgs),
    /// Score every case in a case file and record detected patterns
    Triage(commands::triage::TriageArgs),
    /// Render a text, JSON or CSV report from a case file
    Report(commands::report::ReportArgs),
    /// Print the OpenAPI schema of analysis results and case records
    Schema,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    util::init_tracing(cli.log_json);

    let code = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Triage(args) => commands::triage::run(args),
        Commands::Report(args) => commands::report::run(args),
        Commands::Schema => commands::schema::run(),
    };

    std::process::exit(code);
}
