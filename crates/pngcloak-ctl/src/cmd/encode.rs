//! Hide a file inside a PNG container.

use std::path::Path;

use anyhow::{Context, Result};
use pngcloak_core::config::CloakConfig;

use super::io::{read_input, write_output};

pub fn cmd_encode(config: &CloakConfig, input: &Path, output: &Path) -> Result<()> {
    let payload = read_input(input)?;
    let container = pngcloak_core::encode(&payload)
        .with_context(|| format!("cannot cloak {}", input.display()))?;
    write_output(output, &container, &config.output)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        payload_bytes = payload.len(),
        container_bytes = container.len(),
        "payload cloaked"
    );
    Ok(())
}
