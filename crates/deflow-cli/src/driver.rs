//! Translation driver: file and stream plumbing around one `translate` run.
//!
//! All translation semantics live in the core crates; this module only
//! reads the raw tree, runs the pipeline, and renders the results.

use crate::args::CliArgs;
use anyhow::{Context, bail};
use colored::Colorize;
use deflow_ast::RawNode;
use deflow_common::{DiagnosticCategory, FatalError, TranslateOptions};
use deflow_emitter::{Translation, translate};
use std::io::{Read, Write};
use std::path::Path;

pub fn run(args: &CliArgs) -> anyhow::Result<()> {
    let source = read_input(&args.input)?;
    if source.trim().is_empty() {
        bail!(FatalError::EmptyInput);
    }

    let root: RawNode = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse raw tree from {}", args.input.display()))?;

    let options = TranslateOptions {
        quiet: args.quiet,
        report_unsupported: args.report_unsupported,
    };
    let translation = translate(&root, &options).context("translation aborted")?;

    if !args.quiet {
        render_diagnostics(&translation, args.diagnostics_json)?;
    }

    match &args.out {
        Some(path) => std::fs::write(path, &translation.text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(translation.text.as_bytes())?;
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn render_diagnostics(translation: &Translation, as_json: bool) -> anyhow::Result<()> {
    if translation.diagnostics.is_empty() {
        return Ok(());
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();

    if as_json {
        let json = serde_json::to_string_pretty(&translation.diagnostics)?;
        writeln!(handle, "{json}")?;
        return Ok(());
    }

    for diagnostic in &translation.diagnostics {
        let label = match diagnostic.category() {
            DiagnosticCategory::Error => "error".red().bold(),
            DiagnosticCategory::Warning => "warning".yellow().bold(),
            DiagnosticCategory::Message => "note".cyan(),
        };
        writeln!(
            handle,
            "{label} DF{:04} [{}]: {}",
            diagnostic.code(),
            diagnostic.path,
            diagnostic.message
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::CliArgs;
    use clap::Parser;

    #[test]
    fn translates_a_json_tree_to_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("tree.json");
        let output = dir.path().join("out.js.flow");
        std::fs::write(
            &input,
            r#"{
                "kind": "sourceFile",
                "children": [
                    {
                        "kind": "interface",
                        "name": "Point",
                        "children": [
                            {"kind": "property", "name": "x", "typeText": "number"},
                            {"kind": "property", "name": "y", "typeText": "number"}
                        ]
                    }
                ]
            }"#,
        )
        .expect("write input");

        let args = CliArgs::parse_from([
            "deflow",
            input.to_str().expect("utf8 path"),
            "-o",
            output.to_str().expect("utf8 path"),
            "--quiet",
        ]);
        run(&args).expect("run must succeed");

        let emitted = std::fs::read_to_string(&output).expect("read output");
        assert!(
            emitted.contains("declare interface Point"),
            "expected interface in output: {emitted}"
        );
        assert!(emitted.contains("x: number;"), "expected member: {emitted}");
    }

    #[test]
    fn empty_input_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("empty.json");
        std::fs::write(&input, "  ").expect("write input");

        let args = CliArgs::parse_from(["deflow", input.to_str().expect("utf8 path")]);
        let err = run(&args).expect_err("empty input must fail");
        assert!(
            err.to_string().contains("no input tree"),
            "unexpected error: {err}"
        );
    }
}
