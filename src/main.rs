//! quire - replay editing interactions against an HTML fragment.
//!
//! # Usage
//!
//! ```bash
//! quire page.html --script edits.txt
//! quire page.html --script edits.txt --state --every
//! quire page.html --script - --format json < edits.txt
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use quire::config::{
    ConfigFlags, OutputFormat, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use quire::prelude::*;
use quire::script::{self, PassReport};

/// Headless host for the quire rich text editing surface
#[derive(Parser, Debug)]
#[command(name = "quire", version, about, long_about = None)]
struct Cli {
    /// HTML fragment to mount as the editor content
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Interaction script to replay, `-` for stdin
    #[arg(short, long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Print the formatting state after each pass
    #[arg(long)]
    state: bool,

    /// Print the content snapshot after each pass
    #[arg(long)]
    every: bool,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Tracing filter directives, e.g. `quire=debug`
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_tracing(filter: Option<&str>) {
    let env_filter = filter
        .and_then(|directives| tracing_subscriber::EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into())
        });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn read_script(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return io::read_to_string(io::stdin()).context("Failed to read script from stdin");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))
}

fn print_pass(report: &PassReport, flags: &ConfigFlags) -> Result<()> {
    match flags.format.unwrap_or(OutputFormat::Html) {
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
        OutputFormat::Html => {
            if !(flags.state || flags.every) && report.error.is_none() {
                return Ok(());
            }
            println!("-- line {}: {}", report.line, report.step);
            if let Some(error) = &report.error {
                println!("   skipped: {error}");
            }
            if flags.state {
                println!("   state: {}", serde_json::to_string(&report.state)?);
            }
            if flags.every {
                println!("{}", report.html);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_tracing(effective.log_filter.as_deref());

    let html = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let mut surface = EditorSurface::mount(&html, HeadlessHost::new());

    if let Some(path) = &cli.script {
        let source = read_script(path)?;
        let mut printed = Ok(());
        script::run(&mut surface, &source, |report| {
            if printed.is_ok() {
                printed = print_pass(report, &effective);
            }
        })
        .with_context(|| format!("Script {} failed", path.display()))?;
        printed?;
    }

    match effective.format.unwrap_or(OutputFormat::Html) {
        OutputFormat::Json => println!(
            "{}",
            json!({ "final": surface.content(), "state": surface.state() })
        ),
        OutputFormat::Html => println!("{}", surface.content()),
    }
    for alert in surface.host().alerts() {
        tracing::info!(alert = %alert, "host alert");
    }
    Ok(())
}
