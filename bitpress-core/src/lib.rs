//! # Bitpress Core
//!
//! Core components shared by the bitpress compression codecs:
//!
//! - [`bitstream`]: LSB-first bit-level I/O over byte buffers
//! - [`crc`]: CRC-32 checksum for container trailers
//! - [`error`]: the common error type
//!
//! ## Architecture
//!
//! The bitpress workspace is a layered stack; this crate is the bottom
//! layer:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ bitpress              codec dispatcher, stats        │
//! ├──────────────────────────────────────────────────────┤
//! │ bitpress-gzip         RFC 1952 member framing        │
//! ├──────────────────────────────────────────────────────┤
//! │ bitpress-flate        RFC 1951 dynamic blocks        │
//! ├──────────────────────────────────────────────────────┤
//! │ bitpress-huffman / bitpress-lzss                     │
//! │     canonical coding, longest-match search           │
//! ├──────────────────────────────────────────────────────┤
//! │ bitpress-core (this crate)                           │
//! │     BitReader/BitWriter, Crc32, errors               │
//! └──────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter, reverse_bits};
pub use crc::Crc32;
pub use error::{BitpressError, Result};
