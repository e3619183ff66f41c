#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Raw-format engine for sectioned `key=value` profile files.
//!
//! This crate is the sole owner of on-disk text: it parses a file into an
//! ordered `Document` and serializes it back. Parsing never fails — malformed
//! lines degrade per documented rules — so the only errors here are I/O.

mod file;
mod parser;
mod writer;

pub use file::{ProfileFile, ProfileError};
pub use parser::{parse_str, parse_with};
pub use writer::render;
