//! Error types for bitpress operations.
//!
//! Every failing site in the codec stack names exactly one variant of
//! [`BitpressError`]; errors abort the current invocation and propagate
//! unchanged to the caller. No partial output is ever returned.

use thiserror::Error;

/// The main error type for bitpress operations.
#[derive(Debug, Error)]
pub enum BitpressError {
    /// Unknown algorithm name passed to the dispatcher.
    #[error("unsupported algorithm: {name}")]
    InvalidAlgorithm {
        /// The algorithm name as given by the caller.
        name: String,
    },

    /// The bit reader ran out of input mid-symbol.
    #[error("input truncated: expected {expected} more byte(s)")]
    InputTruncated {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// DEFLATE block type other than dynamic Huffman on decode.
    #[error("unsupported DEFLATE block type {btype} (only dynamic Huffman blocks are accepted)")]
    InvalidBlockType {
        /// The BTYPE field as read from the stream.
        btype: u32,
    },

    /// Invalid code-length sequence in a dynamic block header.
    #[error("malformed code lengths: {message}")]
    MalformedCodeLengths {
        /// Description of the violation.
        message: String,
    },

    /// A symbol's natural tree depth exceeds the alphabet's length cap.
    #[error("code length {length} exceeds limit {limit}")]
    CodeLengthExceeded {
        /// The offending code length.
        length: u32,
        /// The cap for this alphabet.
        limit: u32,
    },

    /// Match length or distance outside the bounds the format allows.
    #[error("match out of range: length {length}, distance {distance}")]
    MatchOutOfRange {
        /// The match length.
        length: usize,
        /// The match distance.
        distance: usize,
    },

    /// GZIP CRC-32 or ISIZE trailer disagrees with the decoded output.
    #[error("checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Value stored in the trailer.
        expected: u32,
        /// Value computed from the decoded data.
        computed: u32,
    },

    /// Huffman tree traversal stepped into an absent subtree.
    #[error("decode walk failed at bit position {bit_position}")]
    DecodeWalkFailure {
        /// Bit offset into the input where the walk failed.
        bit_position: u64,
    },

    /// A symbol to encode has no entry in the encoding table.
    #[error("no encoding for symbol {symbol}")]
    EncodingFailure {
        /// The symbol value.
        symbol: u32,
    },

    /// Invalid container header (magic, method, or flag bytes).
    #[error("invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Malformed textual framing (LZSS back-reference or Huffman header).
    #[error("malformed reference: {message}")]
    MalformedReference {
        /// Description of the parse failure.
        message: String,
    },
}

/// Result type alias for bitpress operations.
pub type Result<T> = std::result::Result<T, BitpressError>;

impl BitpressError {
    /// Create an invalid algorithm error.
    pub fn invalid_algorithm(name: impl Into<String>) -> Self {
        Self::InvalidAlgorithm { name: name.into() }
    }

    /// Create an input truncated error.
    pub fn input_truncated(expected: usize) -> Self {
        Self::InputTruncated { expected }
    }

    /// Create a malformed code lengths error.
    pub fn malformed_code_lengths(message: impl Into<String>) -> Self {
        Self::MalformedCodeLengths {
            message: message.into(),
        }
    }

    /// Create a code length exceeded error.
    pub fn code_length_exceeded(length: u32, limit: u32) -> Self {
        Self::CodeLengthExceeded { length, limit }
    }

    /// Create a match out of range error.
    pub fn match_out_of_range(length: usize, distance: usize) -> Self {
        Self::MatchOutOfRange { length, distance }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Create a decode walk failure error.
    pub fn decode_walk_failure(bit_position: u64) -> Self {
        Self::DecodeWalkFailure { bit_position }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a malformed reference error.
    pub fn malformed_reference(message: impl Into<String>) -> Self {
        Self::MalformedReference {
            message: message.into(),
        }
    }
}
