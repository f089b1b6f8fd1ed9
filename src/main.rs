//! Command line inspector for saved canvas states.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};

use patchstate::{paths, DocumentLocation, HandlerRegistry, Ledger, StateFile};

#[derive(Parser)]
#[command(
    name = "patchstate",
    version,
    about = "Inspect saved widget states of a canvas document"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List saved states, newest first
    List {
        /// Path to the canvas document
        document: PathBuf,
    },
    /// Print one saved state
    Show {
        /// Path to the canvas document
        document: PathBuf,
        /// State token to show; defaults to the most recent
        #[arg(long)]
        id: Option<String>,
        /// Print parsed JSON instead of the raw file
        #[arg(long)]
        json: bool,
    },
    /// Print the accumulated state ledger
    Ledger {
        /// Path to the canvas document
        document: PathBuf,
        /// Print rows as JSON objects keyed by column
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List { document } => list(&document),
        Command::Show { document, id, json } => show(&document, id.as_deref(), json),
        Command::Ledger { document, json } => ledger(&document, json),
    }
}

fn locate(document: &Path) -> Result<DocumentLocation> {
    DocumentLocation::from_document_path(document)
        .with_context(|| format!("not a usable document path: {}", document.display()))
}

fn list(document: &Path) -> Result<()> {
    let location = locate(document)?;
    let files = paths::list_state_files(&location)?;
    if files.is_empty() {
        println!("no saved states");
        return Ok(());
    }
    for (path, created) in files {
        let token = paths::state_token_from_path(&path).unwrap_or_else(|| "-".to_string());
        let stamp = DateTime::<Local>::from(created).format("%Y-%m-%d %H:%M:%S");
        println!("{token}  {stamp}  {}", path.display());
    }
    Ok(())
}

fn show(document: &Path, id: Option<&str>, json: bool) -> Result<()> {
    let location = locate(document)?;
    let path = match id {
        Some(token) => {
            let path = paths::state_path_for(&location, token);
            if !path.is_file() {
                bail!("state file with id '{token}' not found: {}", path.display());
            }
            path
        }
        None => paths::find_latest_state(&location)?,
    };
    let text =
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    if json {
        let registry = HandlerRegistry::new();
        let file = StateFile::parse(&text, &registry.section_labels());
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        print!("{text}");
    }
    Ok(())
}

fn ledger(document: &Path, json: bool) -> Result<()> {
    let location = locate(document)?;
    let path = paths::ledger_path(&location);
    if !path.is_file() {
        bail!("no ledger at {}", path.display());
    }
    let ledger = Ledger::load(&path)?;
    if json {
        let rows: Vec<serde_json::Value> = ledger
            .rows
            .iter()
            .map(|row| {
                let map: serde_json::Map<String, serde_json::Value> = ledger
                    .header
                    .iter()
                    .enumerate()
                    .map(|(i, column)| {
                        let cell = row.get(i).map(String::as_str).unwrap_or("");
                        (column.clone(), serde_json::Value::from(cell))
                    })
                    .collect();
                serde_json::Value::Object(map)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let mut widths: Vec<usize> = ledger.header.iter().map(|h| h.chars().count()).collect();
        for row in &ledger.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                } else {
                    widths.push(cell.chars().count());
                }
            }
        }
        print_aligned(&ledger.header, &widths);
        for row in &ledger.rows {
            print_aligned(row, &widths);
        }
    }
    Ok(())
}

fn print_aligned(cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| format!("{:<width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", line.trim_end());
}
