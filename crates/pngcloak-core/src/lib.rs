//! pngcloak-core — the container format, chunk framing, and configuration.
//! The `pngcloak` binary is a thin file-I/O wrapper around this crate.

pub mod chunk;
pub mod codec;
pub mod config;
pub mod wire;

pub use codec::{decode, encode, encoded_len, DecodeError, EncodeError};
