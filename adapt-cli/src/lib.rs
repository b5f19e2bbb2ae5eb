//! # Auto-Adapt CLI
//!
//! Command-line host for the layout auto-adaptation engine.
//!
//! Reads a layout snapshot (size table plus the elements of one size),
//! synthesizes the layout for a new size and prints it as JSON.
//!
//! ## Usage
//!
//! ```bash
//! auto-adapt --input layout.json --target portrait
//! auto-adapt --input - --target 1080x1920 --reference landscape --pretty < layout.json
//! auto-adapt --input layout.json --target 300x250 --matches
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use adapt_core::{AdaptConfig, LayoutAdapter, LayoutSnapshot};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

/// Command-line arguments for auto-adapt.
#[derive(Debug, Clone, Parser)]
#[command(name = "auto-adapt")]
#[command(about = "Synthesize the layout of a new canvas size from an existing one")]
#[command(version)]
pub struct CliArgs {
    /// Layout snapshot JSON file, or `-` for stdin
    #[arg(long, short, default_value = "-")]
    pub input: PathBuf,

    /// Target size: `WxH`, `square`, `landscape` or `portrait`
    #[arg(long, short)]
    pub target: String,

    /// Size ID to adapt from instead of the best match
    #[arg(long, short)]
    pub reference: Option<String>,

    /// JSON file with adaptation thresholds and weights
    #[arg(long, env = "AUTO_ADAPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print how every size matches the target instead of a layout
    #[arg(long)]
    pub matches: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Load the adaptation configuration, or the defaults when no file is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid configuration.
pub fn load_config(path: Option<&Path>) -> Result<AdaptConfig> {
    let Some(path) = path else {
        return Ok(AdaptConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    AdaptConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
}

/// Read the snapshot JSON from a file, or from stdin for `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read snapshot from stdin")?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read snapshot {}", path.display()))
}

/// Run the engine on snapshot JSON and render the JSON output.
///
/// # Errors
///
/// Returns an error if the snapshot or config is invalid or adaptation fails.
pub fn run(args: &CliArgs, input: &str) -> Result<String> {
    let config = load_config(args.config.as_deref())?;
    let snapshot = LayoutSnapshot::from_json(input).context("Invalid layout snapshot")?;
    let adapter = LayoutAdapter::with_config(config);

    if args.matches {
        let closest = adapter
            .closest_size(&snapshot, &args.target)
            .with_context(|| format!("Failed to match sizes against {}", args.target))?;
        tracing::debug!("Best reference for {} is {}", args.target, closest.id);
        render(&closest, args.pretty)
    } else {
        let layout = adapter
            .generate_layout_for_size(&snapshot, &args.target, args.reference.as_deref())
            .with_context(|| format!("Failed to adapt layout to {}", args.target))?;
        render(&layout, args.pretty)
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// Read the input named by `args` and run the engine on it.
///
/// # Errors
///
/// Returns an error if the input cannot be read or [`run`] fails.
pub fn execute(args: &CliArgs) -> Result<String> {
    let input = read_input(&args.input)?;
    run(args, &input)
}
