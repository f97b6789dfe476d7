//! Chunk framing and CRC-32.
//!
//! A framed chunk is `length(4) ++ type(4) ++ data ++ crc(4)`, with the CRC
//! taken over `type ++ data`. Writers append frames to a `BytesMut`; readers
//! walk a borrowed slice with [`ChunkReader`] and never read past its end.
//!
//! Legacy containers carry a CRC over `length ++ type ++ data` instead.
//! Readers accept both forms; writers only produce the standard one.

use bytes::{BufMut, Bytes, BytesMut};
use zerocopy::{AsBytes, FromBytes};

use crate::codec::{DecodeError, EncodeError};
use crate::wire::{ChunkPrefix, ChunkType, CHUNK_CRC_LEN, CHUNK_OVERHEAD, CHUNK_PREFIX_LEN};

// ── Checksum ─────────────────────────────────────────────────────────────────

/// Standard CRC-32 (ISO 3309 / ITU-T V.42, reflected 0xEDB88320).
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// CRC-32 of `chunk_type ++ data` without concatenating the two.
pub fn chunk_crc(chunk_type: ChunkType, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(data);
    hasher.finalize()
}

/// CRC-32 of `length ++ chunk_type ++ data`, as found in legacy containers.
pub fn length_covering_crc(length: u32, chunk_type: ChunkType, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&length.to_be_bytes());
    hasher.update(chunk_type.as_bytes());
    hasher.update(data);
    hasher.finalize()
}

/// Which bytes a chunk's stored CRC was found to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrcForm {
    /// `type ++ data`, as PNG defines it.
    Standard,
    /// `length ++ type ++ data`.
    LengthCovering,
}

// ── Framing ──────────────────────────────────────────────────────────────────

/// Length field for `len` data bytes, or an error if it does not fit in 32
/// bits.
pub fn chunk_length(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::PayloadTooLarge(len))
}

/// Append one framed chunk to `buf`. Nothing is written on error.
pub fn frame_chunk(
    buf: &mut BytesMut,
    chunk_type: ChunkType,
    data: &[u8],
) -> Result<(), EncodeError> {
    let length = chunk_length(data.len())?;
    buf.reserve(CHUNK_OVERHEAD + data.len());
    buf.put_slice(ChunkPrefix::new(chunk_type, length).as_bytes());
    buf.put_slice(data);
    buf.put_u32(chunk_crc(chunk_type, data));
    Ok(())
}

/// Allocate and return a single framed chunk.
pub fn framed_chunk(chunk_type: ChunkType, data: &[u8]) -> Result<Bytes, EncodeError> {
    let mut buf = BytesMut::with_capacity(CHUNK_OVERHEAD + data.len());
    frame_chunk(&mut buf, chunk_type, data)?;
    Ok(buf.freeze())
}

// ── Reading ──────────────────────────────────────────────────────────────────

/// A framed chunk borrowed from its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    pub chunk_type: ChunkType,
    pub data: &'a [u8],
    /// CRC as stored in the container. Not checked on read.
    pub declared_crc: u32,
}

impl RawChunk<'_> {
    pub fn computed_crc(&self) -> u32 {
        chunk_crc(self.chunk_type, self.data)
    }

    pub fn is_intact(&self) -> bool {
        self.declared_crc == self.computed_crc()
    }

    /// Match the stored CRC against both accepted forms.
    pub fn crc_form(&self) -> Option<CrcForm> {
        if self.is_intact() {
            return Some(CrcForm::Standard);
        }
        // Lengths read from a container always fit in 32 bits.
        let length = u32::try_from(self.data.len()).ok()?;
        (self.declared_crc == length_covering_crc(length, self.chunk_type, self.data))
            .then_some(CrcForm::LengthCovering)
    }

    /// Framed size on disk.
    pub fn framed_len(&self) -> usize {
        CHUNK_OVERHEAD + self.data.len()
    }
}

/// Sequential, bounds-checked chunk reader over a byte slice.
///
/// Every read is guarded: a length field that claims more bytes than remain
/// yields [`DecodeError::Truncated`] and leaves the reader where it was.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ChunkReader<'a> {
    /// Start reading chunks at the beginning of `buf`. The caller strips the
    /// signature first.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Unread tail.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }

    /// Read and consume the next chunk. The CRC is returned, not verified.
    pub fn next_chunk(&mut self) -> Result<RawChunk<'a>, DecodeError> {
        let rest = self.remaining();
        let prefix = ChunkPrefix::read_from_prefix(rest).ok_or(DecodeError::Truncated {
            needed: CHUNK_PREFIX_LEN,
            available: rest.len(),
        })?;

        let needed = prefix
            .data_len()
            .checked_add(CHUNK_OVERHEAD)
            .ok_or(DecodeError::Truncated {
                needed: usize::MAX,
                available: rest.len(),
            })?;
        if rest.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                available: rest.len(),
            });
        }

        let data_end = CHUNK_PREFIX_LEN + prefix.data_len();
        let data = &rest[CHUNK_PREFIX_LEN..data_end];
        let mut crc = [0u8; CHUNK_CRC_LEN];
        crc.copy_from_slice(&rest[data_end..needed]);

        let chunk = RawChunk {
            chunk_type: prefix.chunk_type,
            data,
            declared_crc: u32::from_be_bytes(crc),
        };
        self.offset += chunk.framed_len();
        Ok(chunk)
    }

    /// Consume the next chunk using only its length field. Type and CRC are
    /// not looked at.
    pub fn skip_chunk(&mut self) -> Result<(), DecodeError> {
        self.next_chunk().map(|_| ())
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = RawChunk<'a>;

    /// Yields chunks until the input runs out or a frame is truncated.
    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().ok()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
