#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Profile store: get/set/remove/enumerate over a sectioned `key=value`
//! file, plus typed codecs for the geometry and color encodings.
//!
//! Two tiers share one core. The `try_*` methods return
//! `Result<_, ProfileError>` and surface I/O failures; their unprefixed
//! twins keep the legacy contract of never failing — an I/O error is logged
//! and the call degrades to a neutral value. Callers that must distinguish
//! "absent" from "disk failed" use the strict tier.

mod codec;
mod lock;
mod store;

pub use codec::{Color, Point, Size};
pub use inikit_format::ProfileError;
pub use inikit_model::NameMatch;
pub use store::ProfileStore;
