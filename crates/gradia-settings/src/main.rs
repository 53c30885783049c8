//! Gradia settings tool: entry point.
//!
//! Inspects and edits the persisted Gradia preferences from a terminal.  It
//! goes through the same [`Settings`] handle as the application, so values
//! are validated and canonicalised exactly as the editor would write them.
//!
//! # Usage
//!
//! ```text
//! gradia-settings [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list              Print every key with its effective value
//!   get <KEY>         Print one value
//!   set <KEY> <VALUE> Parse VALUE as the key's type and store it
//!   reset <KEY>       Restore the default of one key
//!   reset-all         Restore every default
//!   describe <KEY>    Print type, default, summary and description
//!   options           Print the drawing, image and export option bundles
//!
//! Options:
//!   --file <PATH>         Settings file [env: GRADIA_SETTINGS_FILE]
//!   --log-level <LEVEL>   Log filter, e.g. `debug` (default: RUST_LOG, then info)
//! ```
//!
//! Keys may be given bare (`pen-size`) or with the schema path prefix
//! (`/be/alexandervanhee/gradia/pen-size`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gradia_core::{SettingKey, SCHEMA_ID};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gradia_settings::application::options::{DrawingOptions, ExportOptions, ImageOptions};
use gradia_settings::application::settings::Settings;
use gradia_settings::infrastructure::storage::toml_file::TomlFileBackend;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and edit Gradia's persisted settings.
#[derive(Debug, Parser)]
#[command(name = "gradia-settings", about = "Inspect and edit Gradia settings", version)]
struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long, global = true, env = "GRADIA_SETTINGS_FILE")]
    file: Option<PathBuf>,

    /// Log filter directive.  Falls back to `RUST_LOG`, then `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every key with its effective value.
    List {
        /// Only print keys that differ from their default.
        #[arg(long)]
        changed: bool,
    },
    /// Print the effective value of one key.
    Get { key: String },
    /// Parse VALUE as the key's type and store it.
    Set { key: String, value: String },
    /// Restore the default of one key.
    Reset { key: String },
    /// Restore the default of every key.
    ResetAll,
    /// Print type, default, summary and description of one key.
    Describe { key: String },
    /// Print the drawing, image and export option bundles as TOML.
    Options,
}

impl Cli {
    fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        }
    }

    fn open_settings(&self) -> anyhow::Result<Settings> {
        let backend = match &self.file {
            Some(path) => TomlFileBackend::new(path),
            None => TomlFileBackend::open_default()
                .context("cannot locate the settings file; pass --file")?,
        };
        let path = backend.path().to_path_buf();
        debug!(path = %path.display(), "opening settings");
        Settings::new(backend).with_context(|| format!("failed to load {}", path.display()))
    }
}

#[derive(Serialize)]
struct OptionsReport {
    drawing: DrawingOptions,
    image: ImageOptions,
    export: ExportOptions,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.env_filter())
        .with_writer(std::io::stderr)
        .init();

    let settings = cli.open_settings()?;
    run(&settings, cli.command)
}

fn run(settings: &Settings, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { changed } => {
            for (key, value) in settings.snapshot() {
                if !changed || settings.is_overridden(key) {
                    println!("{key} = {value}");
                }
            }
        }
        Command::Get { key } => {
            let value = settings.get_by_name(&key)?;
            println!("{value}");
        }
        Command::Set { key, value } => {
            settings
                .set_from_literal(&key, &value)
                .with_context(|| format!("cannot set {key}"))?;
            info!("{key} updated");
        }
        Command::Reset { key } => {
            let key: SettingKey = key.parse()?;
            settings.reset(key)?;
        }
        Command::ResetAll => {
            settings.reset_all()?;
            info!("all settings restored to their defaults");
        }
        Command::Describe { key } => {
            let key: SettingKey = key.parse()?;
            println!("{SCHEMA_ID} {key}");
            println!("  type:        {}", key.value_type());
            println!("  default:     {}", key.default_value());
            println!("  current:     {}", settings.get(key));
            println!("  summary:     {}", key.summary());
            println!("  description: {}", key.description());
        }
        Command::Options => {
            let report = OptionsReport {
                drawing: DrawingOptions::read(settings),
                image: ImageOptions::read(settings),
                export: ExportOptions::read(settings),
            };
            print!("{}", toml::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
