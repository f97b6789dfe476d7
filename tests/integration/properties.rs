//! Container properties that must hold for every payload.

use pngcloak_core::chunk::{chunk_crc, length_covering_crc, ChunkReader};
use pngcloak_core::wire::{ChunkType, CHUNK_OVERHEAD, IMAGE_HEADER_LEN, PNG_SIGNATURE};
use pngcloak_core::{decode, encode, encoded_len, DecodeError};
use proptest::prelude::*;

const IDAT_OFFSET: usize = PNG_SIGNATURE.len() + CHUNK_OVERHEAD + IMAGE_HEADER_LEN;
const IDAT_DATA_OFFSET: usize = IDAT_OFFSET + 8;

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2048)
}

fn non_empty_payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..512)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// decode(encode(p)) == p for any payload, including empty.
    #[test]
    fn prop_round_trip(p in payload()) {
        let container = encode(&p).unwrap();
        prop_assert_eq!(container.len(), encoded_len(p.len()));
        prop_assert_eq!(decode(&container), Ok(&p[..]));
    }

    /// Any change to the first eight bytes is fatal, whatever follows.
    #[test]
    fn prop_signature_gate(
        p in payload(),
        index in 0usize..8,
        mask in 1u8..=255,
    ) {
        let mut container = encode(&p).unwrap().to_vec();
        container[index] ^= mask;
        prop_assert_eq!(decode(&container), Err(DecodeError::BadSignature));
    }

    /// The IHDR body is never looked at.
    #[test]
    fn prop_header_content_irrelevant(
        p in payload(),
        header in prop::array::uniform13(any::<u8>()),
    ) {
        let mut container = encode(&p).unwrap().to_vec();
        let body = PNG_SIGNATURE.len() + 8;
        container[body..body + IMAGE_HEADER_LEN].copy_from_slice(&header);
        prop_assert_eq!(decode(&container), Ok(&p[..]));
    }

    /// A single flipped bit in the payload is caught.
    #[test]
    fn prop_payload_bit_flip_detected(
        p in non_empty_payload(),
        pick in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut container = encode(&p).unwrap().to_vec();
        let at = IDAT_DATA_OFFSET + pick.index(p.len());
        container[at] ^= 1 << bit;
        let is_mismatch = matches!(decode(&container), Err(DecodeError::ChecksumMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    /// A single flipped bit in the stored CRC is caught.
    #[test]
    fn prop_crc_bit_flip_detected(
        p in payload(),
        byte in 0usize..4,
        bit in 0u8..8,
    ) {
        let mut container = encode(&p).unwrap().to_vec();
        let at = IDAT_DATA_OFFSET + p.len() + byte;
        container[at] ^= 1 << bit;
        let is_mismatch = matches!(decode(&container), Err(DecodeError::ChecksumMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    /// Dropping or mangling the trailer does not matter.
    #[test]
    fn prop_trailer_irrelevant(
        p in payload(),
        tail in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let container = encode(&p).unwrap();
        let idat_end = IDAT_OFFSET + CHUNK_OVERHEAD + p.len();
        let mut cut = container[..idat_end].to_vec();
        prop_assert_eq!(decode(&cut), Ok(&p[..]));

        cut.extend_from_slice(&tail);
        prop_assert_eq!(decode(&cut), Ok(&p[..]));
    }

    /// Every encoded container is three intact chunks and nothing else.
    #[test]
    fn prop_three_intact_chunks(p in payload()) {
        let container = encode(&p).unwrap();
        let mut reader = ChunkReader::new(&container[PNG_SIGNATURE.len()..]);
        let chunks: Vec<_> = reader.by_ref().collect();
        prop_assert_eq!(chunks.len(), 3);
        prop_assert!(reader.remaining().is_empty());
        prop_assert_eq!(chunks[0].chunk_type, ChunkType::IHDR);
        prop_assert_eq!(chunks[1].chunk_type, ChunkType::IDAT);
        prop_assert_eq!(chunks[2].chunk_type, ChunkType::IEND);
        for chunk in &chunks {
            prop_assert_eq!(chunk.declared_crc, chunk_crc(chunk.chunk_type, chunk.data));
        }
    }

    /// A data chunk whose CRC also covers its length field decodes the same.
    #[test]
    fn prop_length_covering_crc_accepted(p in payload()) {
        let mut container = encode(&p).unwrap().to_vec();
        let crc = length_covering_crc(p.len() as u32, ChunkType::IDAT, &p);
        let crc_at = IDAT_DATA_OFFSET + p.len();
        container[crc_at..crc_at + 4].copy_from_slice(&crc.to_be_bytes());
        prop_assert_eq!(decode(&container), Ok(&p[..]));
    }
}

#[test]
fn hello_world_is_seventy_bytes() {
    let container = encode(b"Hello, world!").unwrap();
    assert_eq!(container.len(), 8 + 25 + 25 + 12);
    assert!(container.starts_with(&PNG_SIGNATURE));
    assert_eq!(decode(&container), Ok(&b"Hello, world!"[..]));
}

#[test]
fn empty_payload_is_not_failure() {
    let container = encode(b"").unwrap();
    assert_eq!(decode(&container), Ok(&b""[..]));
}

#[test]
fn large_payload_round_trips() {
    let p: Vec<u8> = (0..1_000_000u32).map(|i| (i.wrapping_mul(31) >> 3) as u8).collect();
    let container = encode(&p).unwrap();
    assert_eq!(decode(&container).map(<[u8]>::len), Ok(p.len()));
    assert_eq!(decode(&container), Ok(&p[..]));
}

#[test]
fn random_bytes_are_not_decodable() {
    assert_eq!(decode(b"GIF89a......"), Err(DecodeError::BadSignature));
}
