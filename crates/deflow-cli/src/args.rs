use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the deflow binary.
#[derive(Parser, Debug)]
#[command(
    name = "deflow",
    version,
    about = "Translate ambient TypeScript declaration trees into Flow libdefs"
)]
pub struct CliArgs {
    /// Raw declaration tree to translate (JSON produced by an external
    /// front end). Use '-' to read from stdin.
    pub input: PathBuf,

    /// Write the emitted document here instead of stdout.
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Suppress human-readable diagnostic output.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Report unrecognized constructs instead of dropping them silently.
    #[arg(long = "reportUnsupported", alias = "report-unsupported")]
    pub report_unsupported: bool,

    /// Render diagnostics as a JSON array instead of human-readable lines.
    #[arg(long = "diagnosticsJson", alias = "diagnostics-json")]
    pub diagnostics_json: bool,
}
