//! pngcloak wire format — the on-disk layout of a cloaked container.
//!
//! These types ARE the format. Every field, every size, every byte order is
//! what a stock PNG reader sees when it opens one of our files. Changing
//! anything here breaks every container already written.
//!
//! Multi-byte integers are big-endian. Fixed records derive zerocopy traits
//! and are read straight out of the input slice; there is no unsafe code in
//! this module.

use std::fmt;

use static_assertions::assert_eq_size;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

// ── Signature ────────────────────────────────────────────────────────────────

/// The eight magic bytes every PNG file opens with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

// ── Chunk Type ───────────────────────────────────────────────────────────────

/// Four-byte ASCII chunk tag.
///
/// The tags we emit are the three critical PNG chunks. They are picked so that
/// image tooling accepts the container, not for what they mean to us.
#[derive(Clone, Copy, PartialEq, Eq, Hash, AsBytes, FromBytes, FromZeroes)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header. Always carries the fixed 1x1 cover header.
    pub const IHDR: Self = Self(*b"IHDR");

    /// Image data. Carries the payload, uncompressed.
    pub const IDAT: Self = Self(*b"IDAT");

    /// Image trailer. Always empty.
    pub const IEND: Self = Self(*b"IEND");
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic()) {
            // All four bytes are printable ASCII, so this is valid UTF-8.
            f.write_str(std::str::from_utf8(&self.0).map_err(|_| fmt::Error)?)
        } else {
            write!(
                f,
                "0x{:02x}{:02x}{:02x}{:02x}",
                self.0[0], self.0[1], self.0[2], self.0[3]
            )
        }
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

assert_eq_size!(ChunkType, [u8; 4]);

// ── Chunk Prefix ─────────────────────────────────────────────────────────────

/// The first eight bytes of every chunk: data length, then type tag.
///
/// The length counts data bytes only. It does not include the prefix itself
/// or the trailing CRC.
///
/// Wire size: 8 bytes.
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes)]
#[repr(C)]
pub struct ChunkPrefix {
    /// Number of data bytes that follow the prefix.
    pub length: U32<BigEndian>,

    /// Chunk tag. The CRC covers this field but not `length`.
    pub chunk_type: ChunkType,
}

assert_eq_size!(ChunkPrefix, [u8; 8]);

impl ChunkPrefix {
    pub fn new(chunk_type: ChunkType, length: u32) -> Self {
        Self {
            length: U32::new(length),
            chunk_type,
        }
    }

    /// Data length as a host integer.
    pub fn data_len(&self) -> usize {
        self.length.get() as usize
    }
}

// ── Image Header ─────────────────────────────────────────────────────────────

/// Body of the IHDR chunk.
///
/// We always write the same header: a single 8-bit RGBA pixel, deflate
/// compression, adaptive filtering, no interlace. The decoder never reads it.
///
/// Wire size: 13 bytes.
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes)]
#[repr(C)]
pub struct ImageHeader {
    pub width: U32<BigEndian>,
    pub height: U32<BigEndian>,
    pub bit_depth: u8,
    /// 6 = truecolour with alpha.
    pub color_type: u8,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

assert_eq_size!(ImageHeader, [u8; 13]);

impl ImageHeader {
    /// The fixed header every cloaked container carries.
    pub fn cover() -> Self {
        Self {
            width: U32::new(COVER_WIDTH),
            height: U32::new(COVER_HEIGHT),
            bit_depth: COVER_BIT_DEPTH,
            color_type: COVER_COLOR_TYPE,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        }
    }
}

// ── Constants ────────────────────────────────────────────────────────────────

/// Length + type.
pub const CHUNK_PREFIX_LEN: usize = 8;

/// Trailing CRC-32.
pub const CHUNK_CRC_LEN: usize = 4;

/// Framing bytes around every chunk's data.
pub const CHUNK_OVERHEAD: usize = CHUNK_PREFIX_LEN + CHUNK_CRC_LEN;

/// Size of the IHDR body.
pub const IMAGE_HEADER_LEN: usize = 13;

/// Largest data length a chunk's 32-bit length field can describe.
pub const MAX_CHUNK_DATA_LEN: usize = u32::MAX as usize;

pub const COVER_WIDTH: u32 = 1;
pub const COVER_HEIGHT: u32 = 1;
pub const COVER_BIT_DEPTH: u8 = 8;
pub const COVER_COLOR_TYPE: u8 = 6;

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_prefix_is_big_endian() {
        let prefix = ChunkPrefix::new(ChunkType::IDAT, 0x0102_0304);
        assert_eq!(
            prefix.as_bytes(),
            &[0x01, 0x02, 0x03, 0x04, b'I', b'D', b'A', b'T']
        );
    }

    #[test]
    fn chunk_prefix_reads_from_prefix_of_longer_slice() {
        let bytes = [0x00, 0x00, 0x00, 0x0d, b'I', b'H', b'D', b'R', 0xff, 0xff];
        let prefix = ChunkPrefix::read_from_prefix(&bytes[..]).unwrap();
        assert_eq!(prefix.data_len(), 13);
        assert_eq!(prefix.chunk_type, ChunkType::IHDR);
    }

    #[test]
    fn chunk_prefix_rejects_short_slice() {
        assert!(ChunkPrefix::read_from_prefix(&[0u8; 7][..]).is_none());
    }

    #[test]
    fn cover_header_layout() {
        let header = ImageHeader::cover();
        assert_eq!(
            header.as_bytes(),
            &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]
        );
        assert_eq!(header.as_bytes().len(), IMAGE_HEADER_LEN);
    }

    #[test]
    fn chunk_type_display() {
        assert_eq!(ChunkType::IEND.to_string(), "IEND");
        assert_eq!(ChunkType([0x00, b'A', 0x7f, b'B']).to_string(), "0x00417f42");
    }

    #[test]
    fn signature_matches_png_magic() {
        assert_eq!(&PNG_SIGNATURE[1..4], b"PNG");
        assert_eq!(PNG_SIGNATURE.len(), 8);
    }
}
