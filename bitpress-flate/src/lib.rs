//! # Bitpress Flate
//!
//! Pure Rust DEFLATE (RFC 1951) for the bitpress codec stack.
//!
//! Each call encodes or decodes exactly one dynamic-Huffman block
//! (BTYPE=2). The encoder tokenizes with the shared sliding-window
//! matcher, builds canonical Huffman tables for the literal/length and
//! distance alphabets, and transmits their code lengths through the
//! 19-symbol code-length alphabet; the decoder reverses every step.
//!
//! ## Example
//!
//! ```rust
//! use bitpress_flate::{deflate, inflate};
//!
//! let original = b"Hello, World! Hello, World!";
//! let compressed = deflate(original, 2, 1).unwrap();
//! let decompressed = inflate(&compressed).unwrap();
//! assert_eq!(&decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod deflate;
pub mod inflate;
pub mod tables;

// Re-exports
pub use deflate::{Token, deflate, deflate_tokens, tokenize};
pub use inflate::inflate;
