//! pngcloak — hide a file inside a PNG container and get it back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pngcloak_core::config::CloakConfig;
use tracing_subscriber::EnvFilter;

mod cmd;

use cmd::{decode::cmd_decode, encode::cmd_encode, inspect::cmd_inspect};

fn print_usage() {
    eprintln!("Usage: pngcloak [--config <path>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  encode  <INFILE> <OUTFILE>   Wrap INFILE in a PNG container");
    eprintln!("  decode  <INFILE> <OUTFILE>   Recover the payload from a container");
    eprintln!("  inspect <FILE> [--json]      List the chunks of a PNG file");
    eprintln!("  help                         Show this message");
    eprintln!();
    eprintln!("Options:");
    eprintln!(
        "  --config <path>   Config file (default: {})",
        CloakConfig::file_path().display()
    );
    eprintln!();
    eprintln!("--encode and --decode are accepted in place of encode and decode.");
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit `--config` must load; the default location falls back to
/// defaults with a warning.
fn load_config(explicit: Option<&Path>) -> Result<CloakConfig> {
    match explicit {
        Some(path) => {
            anyhow::ensure!(path.exists(), "config file not found: {}", path.display());
            let config = CloakConfig::load_from(path)?;
            init_logging(&config.logging.filter);
            Ok(config)
        }
        None => match CloakConfig::load() {
            Ok(config) => {
                init_logging(&config.logging.filter);
                Ok(config)
            }
            Err(e) => {
                let config = CloakConfig::default();
                init_logging(&config.logging.filter);
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Ok(config)
            }
        },
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse options
    let mut config_path: Option<PathBuf> = None;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).context("--config requires a value")?.into());
            }
            other => remaining.push(other),
        }
        i += 1;
    }

    if matches!(remaining.as_slice(), ["help"] | ["--help"] | ["-h"]) {
        print_usage();
        return Ok(());
    }

    let config = load_config(config_path.as_deref())?;

    match remaining.as_slice() {
        ["encode" | "--encode", input, output] => {
            cmd_encode(&config, Path::new(input), Path::new(output))
        }
        ["decode" | "--decode", input, output] => {
            cmd_decode(&config, Path::new(input), Path::new(output))
        }
        ["inspect", file] => cmd_inspect(Path::new(file), false),
        ["inspect", file, "--json"] | ["inspect", "--json", file] => {
            cmd_inspect(Path::new(file), true)
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
