//! Command-line interface for the umlgen utility
//!
//! Scans a Java source tree and writes one StarUML model document.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::scanner::JavaScanner;
use umlgen::core::logging::init_logging;
use umlgen::plugins::Assembler;
use umlgen::AssemblyConfig;

/// File name used when no output file is given
pub const DEFAULT_OUTPUT: &str = "uml.mdj";

/// umlgen - Generate a StarUML model from Java sources
#[derive(Parser, Debug)]
#[command(name = "umlgen")]
#[command(about = "Generate a StarUML model document from Java sources")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// Root directory of the Java sources (defaults to the current directory)
    pub source: Option<PathBuf>,

    /// Output file, or a directory to write uml.mdj into
    pub output: Option<PathBuf>,

    /// Name of the generated project
    #[arg(long, default_value = "projectName")]
    pub project_name: String,

    /// First element identifier (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_seed)]
    pub id_seed: Option<u64>,

    /// Write indented JSON (default)
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Write JSON on a single line
    #[arg(long)]
    pub compact: bool,

    /// Report relationships dropped because a type is not a modeled class
    #[arg(long)]
    pub report_unresolved: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

fn parse_seed(value: &str) -> Result<u64, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid identifier seed '{}': {}", value, e))
}

/// Where the document is written for a given OUTPUT argument
///
/// A path ending in a separator, or naming an existing directory, gets the
/// default file name appended.
pub fn resolve_output_path(output: Option<&Path>) -> PathBuf {
    let Some(output) = output else {
        return PathBuf::from(DEFAULT_OUTPUT);
    };
    let raw = output.to_string_lossy();
    if raw.ends_with('/') || raw.ends_with('\\') || output.is_dir() {
        output.join(DEFAULT_OUTPUT)
    } else {
        output.to_path_buf()
    }
}

/// Main CLI application
pub struct UmlgenApp {
    scanner: JavaScanner,
}

impl UmlgenApp {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scanner: JavaScanner::new()?,
        })
    }

    fn build_config(cli: &Cli) -> AssemblyConfig {
        let config = AssemblyConfig::default()
            .with_project_name(cli.project_name.clone())
            .with_report_unresolved(cli.report_unresolved);
        match cli.id_seed {
            Some(seed) => config.with_id_seed(seed),
            None => config,
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level = std::env::var("UMLGEN_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());
        let log_format = std::env::var("UMLGEN_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            if cli.verbose {
                eprintln!("Warning: Failed to initialize logging: {}", e);
            }
        }

        if cli.verbose {
            eprintln!("umlgen v{}", env!("CARGO_PKG_VERSION"));
        }

        let source = cli.source.clone().unwrap_or_else(|| PathBuf::from("."));
        let output = resolve_output_path(cli.output.as_deref());
        debug!(source = %source.display(), output = %output.display(), "Resolved paths");

        let declarations = self.scanner.scan_dir(&source)?;
        if cli.verbose {
            eprintln!(
                "Found {} declarations under {}",
                declarations.len(),
                source.display()
            );
        }

        let assembly = Assembler::new(Self::build_config(&cli)).assemble(&declarations)?;
        for diagnostic in &assembly.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }

        let json = if cli.compact {
            assembly.document.to_json()?
        } else {
            assembly.document.to_json_pretty()?
        };
        fs::write(&output, json)
            .with_context(|| format!("Failed to write output file: {}", output.display()))?;

        info!(
            output = %output.display(),
            elements = assembly.document.len(),
            "Wrote model document"
        );
        if cli.verbose {
            eprintln!(
                "Wrote {} elements to {}",
                assembly.document.len(),
                output.display()
            );
        }
        Ok(())
    }
}
