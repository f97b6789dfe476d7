//! pngcloak integration tests: the codec exercised as a black box.
//!
//! End-to-end runs of the `pngcloak` binary live with the binary, in
//! `crates/pngcloak-ctl/tests/cli.rs`.
//!
//!   cargo test --test integration

mod properties;
