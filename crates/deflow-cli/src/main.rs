//! deflow binary entry point.

mod args;
mod driver;

use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = args::CliArgs::parse();
    match driver::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
