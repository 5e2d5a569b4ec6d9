//! Reconstruction of a closed set of well-known shapes from a parsed record graph,
//! and the inverse: writing those shapes as the canonical record sequence.
//!
//! Nothing outside the allow-list in [`KnownTypes`] is ever instantiated.
//! A graph naming any other type is declined, not guessed at.

mod drawing;
mod hash_helpers;
mod known_types;
mod materializer;
mod objects;
mod writer;

pub use drawing::*;
pub use known_types::*;
pub use materializer::*;
pub use objects::*;
pub use writer::*;
