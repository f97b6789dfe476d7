//! Container codec — hide a payload in a minimal PNG and get it back.
//!
//! A container is the PNG signature followed by exactly three chunks:
//!
//! ```text
//! 89 50 4E 47 0D 0A 1A 0A              signature
//! [len=13][IHDR][1x1 RGBA header][crc] fixed cover header
//! [len=n ][IDAT][payload, n bytes][crc] the payload, uncompressed
//! [len=0 ][IEND][crc]                  trailer
//! ```
//!
//! Both directions are pure functions over in-memory buffers. The data
//! chunk's CRC is written over `type ++ data`; on read, a CRC over
//! `length ++ type ++ data` (legacy containers) is accepted as well.

use bytes::{BufMut, Bytes, BytesMut};
use zerocopy::AsBytes;

use crate::chunk::{frame_chunk, ChunkReader, CrcForm};
use crate::wire::{
    ChunkType, ImageHeader, CHUNK_OVERHEAD, IMAGE_HEADER_LEN, MAX_CHUNK_DATA_LEN, PNG_SIGNATURE,
};

// ── Errors ───────────────────────────────────────────────────────────────────

/// Why a buffer could not be decoded.
///
/// Every variant means the same thing to a caller that only wants the
/// payload: there is none. The variants exist for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("missing PNG signature")]
    BadSignature,

    #[error("truncated container: chunk needs {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("data chunk checksum mismatch: stored 0x{stored:08x}, computed 0x{computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}

/// Why a payload could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("payload length {0} exceeds maximum {}", MAX_CHUNK_DATA_LEN)]
    PayloadTooLarge(usize),
}

// ── Encode ───────────────────────────────────────────────────────────────────

/// Size of the container [`encode`] produces for a payload of `payload_len`
/// bytes.
pub const fn encoded_len(payload_len: usize) -> usize {
    PNG_SIGNATURE.len()
        + (CHUNK_OVERHEAD + IMAGE_HEADER_LEN)
        + (CHUNK_OVERHEAD + payload_len)
        + CHUNK_OVERHEAD
}

/// Wrap `payload` in a container. Any payload up to
/// [`MAX_CHUNK_DATA_LEN`] bytes is accepted, including an empty one.
pub fn encode(payload: &[u8]) -> Result<Bytes, EncodeError> {
    let mut buf = BytesMut::with_capacity(encoded_len(payload.len()));
    buf.put_slice(&PNG_SIGNATURE);
    frame_chunk(&mut buf, ChunkType::IHDR, ImageHeader::cover().as_bytes())?;
    frame_chunk(&mut buf, ChunkType::IDAT, payload)?;
    frame_chunk(&mut buf, ChunkType::IEND, &[])?;

    tracing::trace!(
        payload_len = payload.len(),
        container_len = buf.len(),
        "payload encoded"
    );
    Ok(buf.freeze())
}

// ── Decode ───────────────────────────────────────────────────────────────────

/// Recover the payload from a container.
///
/// Reads the signature, skips the header chunk by its length field alone,
/// then reads the data chunk and checks its CRC in either accepted form.
/// Nothing after the data chunk is looked at, so a missing or damaged
/// trailer does not matter.
/// The returned slice borrows from `container`.
pub fn decode(container: &[u8]) -> Result<&[u8], DecodeError> {
    let result = read_payload(container);
    match &result {
        Ok(payload) => tracing::trace!(payload_len = payload.len(), "payload decoded"),
        Err(e) => tracing::debug!(
            error = %e,
            container_len = container.len(),
            "container not decodable"
        ),
    }
    result
}

fn read_payload(container: &[u8]) -> Result<&[u8], DecodeError> {
    let body = container
        .strip_prefix(&PNG_SIGNATURE[..])
        .ok_or(DecodeError::BadSignature)?;

    let mut reader = ChunkReader::new(body);
    reader.skip_chunk()?;

    let data = reader.next_chunk()?;
    match data.crc_form() {
        Some(CrcForm::Standard) => {}
        Some(CrcForm::LengthCovering) => {
            tracing::debug!("data chunk CRC covers the length field");
        }
        None => {
            return Err(DecodeError::ChecksumMismatch {
                stored: data.declared_crc,
                computed: data.computed_crc(),
            })
        }
    }

    Ok(data.data)
}

// ── Tests ────────────────────────────────────────────────────────────────────
