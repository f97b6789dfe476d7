//! Shared file helpers for CLI commands.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pngcloak_core::config::OutputSettings;

pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read input: {}", path.display()))
}

pub fn write_output(path: &Path, bytes: &[u8], settings: &OutputSettings) -> Result<()> {
    if !settings.overwrite && path.exists() {
        bail!(
            "refusing to overwrite {} (output.overwrite = false)",
            path.display()
        );
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write output: {}", path.display()))
}
