//! Recover a file from a PNG container.

use std::path::Path;

use anyhow::{Context, Result};
use pngcloak_core::config::{CloakConfig, FailurePolicy};

use super::io::{read_input, write_output};

pub fn cmd_decode(config: &CloakConfig, input: &Path, output: &Path) -> Result<()> {
    let container = read_input(input)?;

    match pngcloak_core::decode(&container) {
        Ok(payload) => {
            write_output(output, payload, &config.output)?;
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                payload_bytes = payload.len(),
                "payload recovered"
            );
            Ok(())
        }
        Err(e) => match config.decode.on_failure {
            FailurePolicy::Empty => {
                tracing::warn!(
                    input = %input.display(),
                    error = %e,
                    "no payload recovered, writing empty output"
                );
                write_output(output, &[], &config.output)
            }
            FailurePolicy::Error => Err(e)
                .with_context(|| format!("no payload recovered from {}", input.display())),
        },
    }
}
