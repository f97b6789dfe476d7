//! Chunk listing for a container, cloaked or not.

use std::path::Path;

use anyhow::Result;
use pngcloak_core::chunk::{ChunkReader, CrcForm};
use pngcloak_core::wire::PNG_SIGNATURE;
use serde::Serialize;

use super::io::read_input;

/// Bytes of chunk data shown in the preview column.
const PREVIEW_LEN: usize = 8;

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub file: String,
    pub bytes: usize,
    pub signature: bool,
    pub chunks: Vec<ChunkEntry>,
    /// Bytes after the last complete chunk.
    pub trailing_bytes: usize,
    /// Payload length when the file decodes.
    pub payload_bytes: Option<usize>,
    pub decode_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChunkEntry {
    pub offset: usize,
    pub chunk_type: String,
    pub length: usize,
    pub declared_crc: String,
    pub crc_ok: bool,
    /// The stored CRC covers the length field too (legacy containers).
    pub crc_covers_length: bool,
    pub preview: String,
}

pub fn build_report(file: &str, bytes: &[u8]) -> InspectReport {
    let signature = bytes.starts_with(&PNG_SIGNATURE);
    let mut chunks = Vec::new();
    let mut trailing_bytes = bytes.len();

    if signature {
        let body = &bytes[PNG_SIGNATURE.len()..];
        let mut reader = ChunkReader::new(body);
        loop {
            let offset = PNG_SIGNATURE.len() + reader.offset();
            match reader.next_chunk() {
                Ok(chunk) => {
                    let form = chunk.crc_form();
                    chunks.push(ChunkEntry {
                        offset,
                        chunk_type: chunk.chunk_type.to_string(),
                        length: chunk.data.len(),
                        declared_crc: format!("{:08x}", chunk.declared_crc),
                        crc_ok: form.is_some(),
                        crc_covers_length: form == Some(CrcForm::LengthCovering),
                        preview: hex::encode(&chunk.data[..chunk.data.len().min(PREVIEW_LEN)]),
                    })
                }
                Err(e) => {
                    if !reader.remaining().is_empty() {
                        tracing::debug!(offset, error = %e, "chunk walk stopped");
                    }
                    break;
                }
            }
        }
        trailing_bytes = reader.remaining().len();
    }

    let (payload_bytes, decode_error) = match pngcloak_core::decode(bytes) {
        Ok(payload) => (Some(payload.len()), None),
        Err(e) => (None, Some(e.to_string())),
    };

    InspectReport {
        file: file.to_string(),
        bytes: bytes.len(),
        signature,
        chunks,
        trailing_bytes,
        payload_bytes,
        decode_error,
    }
}

pub fn cmd_inspect(path: &Path, json: bool) -> Result<()> {
    let bytes = read_input(path)?;
    let report = build_report(&path.display().to_string(), &bytes);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  {}", report.file);
    println!("═══════════════════════════════════════");
    println!("  Size      : {} bytes", report.bytes);
    println!(
        "  Signature : {}",
        if report.signature { "PNG" } else { "missing" }
    );

    if report.chunks.is_empty() {
        println!("\n  No chunks.");
    } else {
        println!("\n  Chunks:");
        for c in &report.chunks {
            println!("  ┌─ {} @ {}", c.chunk_type, c.offset);
            println!("  │  length  : {}", c.length);
            println!(
                "  │  crc     : {} ({})",
                c.declared_crc,
                match (c.crc_ok, c.crc_covers_length) {
                    (true, false) => "ok",
                    (true, true) => "ok, covers length",
                    (false, _) => "BAD",
                }
            );
            println!("  └─ preview : {}", c.preview);
        }
    }
    if report.trailing_bytes > 0 {
        println!("\n  Trailing bytes : {}", report.trailing_bytes);
    }

    match (&report.payload_bytes, &report.decode_error) {
        (Some(n), _) => println!("\n  Payload : {} bytes recoverable", n),
        (None, Some(e)) => println!("\n  Payload : none ({})", e),
        (None, None) => println!("\n  Payload : none"),
    }

    Ok(())
}
