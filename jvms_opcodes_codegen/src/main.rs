// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = "Generates JVM opcode table entries from a saved copy of the JVMS chapter 6 page.\n\n\
          The output is pasted into the `Opcodes` enum of the bytecode library; use `--check` \
          to verify that an existing enum is still up to date.\n"]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jvms_opcodes::drift::diff_tables;
use jvms_opcodes::extract::extract_sections;
use jvms_opcodes::normalize::normalize;
use jvms_opcodes::record::InstructionRecord;
use jvms_opcodes::render::{DEFAULT_BASE_URL, RenderOptions, render_records_json, render_table};

/// Output format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Opcode enum constants, one per line.
    Table,
    /// Normalized instruction records as a JSON array.
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about = "Generate JVM opcode table entries from the JVMS chapter 6 HTML page")]
struct Cli {
    /// Saved HTML of the JVMS chapter 6 page (e.g. `jvms-6.html`).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write output to FILE instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Page URL that section anchors are appended to in `link:` comments.
    #[arg(long = "base-url", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Output format.
    #[arg(long = "format", value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Compare the rendered table against the table lines of FILE and fail on drift.
    #[arg(long = "check", value_name = "FILE", conflicts_with_all = ["output", "format"])]
    check: Option<PathBuf>,

    /// Log extraction details (overridden by `RUST_LOG`).
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn load_records(path: &Path) -> Result<Vec<InstructionRecord>> {
    let html = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let document = scraper::Html::parse_document(&html);
    let sections =
        extract_sections(&document).with_context(|| format!("extract {}", path.display()))?;
    if sections.is_empty() {
        bail!(
            "no instruction sections found in {}; is this the JVMS chapter 6 page?",
            path.display()
        );
    }
    info!(path = %path.display(), sections = sections.len(), "extracted sections");
    Ok(normalize(&sections))
}

fn check(rendered: &str, path: &Path) -> Result<()> {
    let existing = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let drift = diff_tables(rendered, &existing);
    if drift.is_empty() {
        info!(path = %path.display(), "opcode table is up to date");
        return Ok(());
    }
    let mut stderr = io::stderr().lock();
    for d in &drift {
        writeln!(stderr, "{d}").context("write drift report")?;
    }
    bail!(
        "{} is out of date ({} opcode(s) differ); re-run: jvms_opcodes_codegen <jvms-6.html>",
        path.display(),
        drift.len()
    );
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    let text = format!("{rendered}\n");
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            fs::write(path, text.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write stdout")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let records = load_records(&cli.input)?;
    let options = RenderOptions {
        base_url: cli.base_url,
    };

    if let Some(path) = &cli.check {
        return check(&render_table(&records, &options), path);
    }

    let rendered = match cli.format {
        Format::Table => render_table(&records, &options),
        Format::Json => render_records_json(&records).context("serialize records")?,
    };
    write_output(&rendered, cli.output.as_deref())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;

    use super::{Cli, Format, check, write_output};
    use jvms_opcodes::render::DEFAULT_BASE_URL;

    const TABLE: &str = "\t/*  0  0x0 */NOP             (0, 0, none(Type.class), null), // Do nothing,\n\
        \t/*  1  0x1 */ACONST_NULL     (1, 0, enums(Type.PUSH1), null); // Push null,";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "jvms_opcodes_codegen-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["jvms_opcodes_codegen", "jvms-6.html"]).unwrap();
        assert_eq!(cli.input.to_str(), Some("jvms-6.html"));
        assert_eq!(cli.format, Format::Table);
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert!(cli.output.is_none());
        assert!(cli.check.is_none());
    }

    #[test]
    fn json_to_file() {
        let cli = Cli::try_parse_from([
            "jvms_opcodes_codegen",
            "--format",
            "json",
            "-o",
            "records.json",
            "jvms-6.html",
        ])
        .unwrap();
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.output.as_deref().and_then(|p| p.to_str()), Some("records.json"));
    }

    #[test]
    fn check_conflicts_with_output() {
        let res = Cli::try_parse_from([
            "jvms_opcodes_codegen",
            "--check",
            "Opcodes.java",
            "-o",
            "out.txt",
            "jvms-6.html",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["jvms_opcodes_codegen"]).is_err());
    }

    #[test]
    fn file_output_ends_with_newline() {
        let dir = scratch_dir("write");
        let path = dir.join("out").join("Opcodes.txt");
        write_output(TABLE, Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{TABLE}\n"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn check_accepts_current_table() {
        let dir = scratch_dir("check-ok");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Opcodes.java");
        fs::write(&path, format!("public enum Opcodes {{\n{TABLE}\n}}\n")).unwrap();
        assert!(check(TABLE, &path).is_ok());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn check_fails_on_stale_table() {
        let dir = scratch_dir("check-stale");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Opcodes.java");
        let stale = TABLE.replace("Type.PUSH1", "Type.PUSH2");
        fs::write(&path, format!("public enum Opcodes {{\n{stale}\n}}\n")).unwrap();

        let err = check(TABLE, &path).unwrap_err().to_string();
        assert!(err.contains("is out of date (1 opcode(s) differ)"), "{err}");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn check_reports_unreadable_file() {
        let path = scratch_dir("check-missing").join("Opcodes.java");
        let err = check(TABLE, &path).unwrap_err().to_string();
        assert!(err.starts_with("read "), "{err}");
    }
}
