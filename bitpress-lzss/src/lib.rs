//! # Bitpress LZSS
//!
//! Dictionary matching for the bitpress codec stack:
//!
//! - [`matcher`]: per-position longest-match search over a sliding
//!   window, run as a parallel map and joined in input order. This is the
//!   tokenizer front-end for both the textual LZSS codec and DEFLATE.
//! - [`codec`]: the standalone textual LZSS codec
//!   (`<offset,length>` back-references with escaped reserved bytes).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod matcher;

// Re-exports
pub use matcher::{Reference, find_matches};
