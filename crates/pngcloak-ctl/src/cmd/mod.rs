//! CLI command modules.

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod io;
