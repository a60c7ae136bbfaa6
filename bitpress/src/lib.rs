//! # Bitpress
//!
//! Pluggable lossless compression codecs behind a uniform
//! byte-in/byte-out API.
//!
//! Four algorithms are supported:
//!
//! - `huffman`: plain Huffman coding with a textual frequency header
//! - `lzss`: textual LZSS with `<offset,length>` back-references
//! - `flate`: one DEFLATE dynamic-Huffman block (RFC 1951)
//! - `gzip`: a single GZIP member wrapping a DEFLATE payload (RFC 1952)
//!
//! Every operation is a pure function from an input buffer and options to
//! an output buffer plus [`Stats`]; nothing is cached across calls, and
//! independent calls may run concurrently.
//!
//! ## Example
//!
//! ```rust
//! use bitpress::{Algorithm, Options, compress, decompress};
//!
//! let options = Options::new(Algorithm::Gzip);
//! let data = b"Hello, World! Hello, World!";
//! let (compressed, stats) = compress(data, &options).unwrap();
//! assert_eq!(stats.original_size, data.len());
//!
//! let (restored, _) = decompress(&compressed, &options).unwrap();
//! assert_eq!(restored, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::str::FromStr;

pub use bitpress_core::error::{BitpressError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Algorithm, BitpressError, Options, Result, Stats, compress, decompress,
        is_valid_algorithm, supported_algorithms,
    };
}

/// A supported compression algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Plain Huffman coding with a textual frequency header.
    Huffman,
    /// Textual LZSS back-references.
    Lzss,
    /// A single DEFLATE dynamic-Huffman block.
    Flate,
    /// A single GZIP member.
    Gzip,
}

impl Algorithm {
    /// All supported algorithms, in stable order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Huffman,
        Algorithm::Lzss,
        Algorithm::Flate,
        Algorithm::Gzip,
    ];

    /// The algorithm's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Huffman => "huffman",
            Algorithm::Lzss => "lzss",
            Algorithm::Flate => "flate",
            Algorithm::Gzip => "gzip",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = BitpressError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "huffman" => Ok(Algorithm::Huffman),
            "lzss" => Ok(Algorithm::Lzss),
            "flate" => Ok(Algorithm::Flate),
            "gzip" => Ok(Algorithm::Gzip),
            _ => Err(BitpressError::invalid_algorithm(name)),
        }
    }
}

/// Compression and decompression options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// The algorithm to run.
    pub algorithm: Algorithm,
    /// DEFLATE block type for `flate`/`gzip`; 0 selects dynamic Huffman.
    pub btype: u32,
    /// DEFLATE final-block flag for `flate`/`gzip`.
    pub bfinal: u32,
}

impl Options {
    /// Options for `algorithm` with the default block settings: dynamic
    /// Huffman, final block.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            btype: 0,
            bfinal: 1,
        }
    }
}

/// Statistics for one compression or decompression call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Input size in bytes.
    pub original_size: usize,
    /// Output size in bytes.
    pub processed_size: usize,
    /// Size ratio in percent: output over input for compression, input
    /// over output for decompression. Zero when the denominator is empty.
    pub ratio: f64,
    /// The algorithm that ran.
    pub algorithm: Algorithm,
}

/// The resolved codec variant; option defaults are applied exactly once,
/// here, and the block parameters only exist where they apply.
#[derive(Debug, Clone, Copy)]
enum Codec {
    Huffman,
    Lzss,
    Flate { btype: u32, bfinal: u32 },
    Gzip { btype: u32, bfinal: u32 },
}

impl Codec {
    fn resolve(options: &Options) -> Self {
        let btype = if options.btype == 0 { 2 } else { options.btype };
        match options.algorithm {
            Algorithm::Huffman => Codec::Huffman,
            Algorithm::Lzss => Codec::Lzss,
            Algorithm::Flate => Codec::Flate {
                btype,
                bfinal: options.bfinal,
            },
            Algorithm::Gzip => Codec::Gzip {
                btype,
                bfinal: options.bfinal,
            },
        }
    }
}

/// Compress `data` with the configured algorithm.
pub fn compress(data: &[u8], options: &Options) -> Result<(Vec<u8>, Stats)> {
    let output = match Codec::resolve(options) {
        Codec::Huffman => bitpress_huffman::codec::compress(data)?,
        Codec::Lzss => bitpress_lzss::codec::compress(data),
        Codec::Flate { btype, bfinal } => bitpress_flate::deflate(data, btype, bfinal)?,
        Codec::Gzip { btype, bfinal } => bitpress_gzip::compress(data, btype, bfinal)?,
    };
    let stats = Stats {
        original_size: data.len(),
        processed_size: output.len(),
        ratio: percent_ratio(output.len(), data.len()),
        algorithm: options.algorithm,
    };
    Ok((output, stats))
}

/// Decompress `data` with the configured algorithm.
pub fn decompress(data: &[u8], options: &Options) -> Result<(Vec<u8>, Stats)> {
    let output = match Codec::resolve(options) {
        Codec::Huffman => bitpress_huffman::codec::decompress(data)?,
        Codec::Lzss => bitpress_lzss::codec::decompress(data)?,
        Codec::Flate { .. } => bitpress_flate::inflate(data)?,
        Codec::Gzip { .. } => bitpress_gzip::decompress(data)?,
    };
    let stats = Stats {
        original_size: data.len(),
        processed_size: output.len(),
        ratio: percent_ratio(data.len(), output.len()),
        algorithm: options.algorithm,
    };
    Ok((output, stats))
}

fn percent_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// The supported algorithm names, in stable order.
pub fn supported_algorithms() -> Vec<&'static str> {
    Algorithm::ALL.iter().map(Algorithm::as_str).collect()
}

/// Whether `name` names a supported algorithm.
pub fn is_valid_algorithm(name: &str) -> bool {
    Algorithm::from_str(name).is_ok()
}
