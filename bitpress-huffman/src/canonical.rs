//! Canonical Huffman codes (RFC 1951 §3.2.2).
//!
//! A canonical code is fully determined by each symbol's bit length: codes
//! of the same length are consecutive integers in symbol-ascending order,
//! and the first code of length `l+1` is `(last code of length l + 1) << 1`.
//! The encoder therefore only has to transmit lengths, and the decoder
//! rebuilds the identical code assignment from them.
//!
//! Codes are stored MSB-first; callers writing to an LSB-first bit stream
//! reverse them with [`bitpress_core::reverse_bits`] first. The decoder
//! tree accounts for this by inserting each leaf along the bit-reversed
//! code path, so decoding reads the stream one LSB-first bit at a time.

use crate::tree::build_tree;
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::{BitReader, reverse_bits};

/// One symbol's canonical code assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    /// The code value, MSB-first.
    pub code: u32,
    /// The code length in bits.
    pub length: u32,
}

/// Compute the first canonical code of every length.
///
/// `counts[l]` is the number of symbols with code length `l`.
fn base_codes(counts: &[u32]) -> Vec<u32> {
    let mut next = vec![0u32; counts.len()];
    let mut code = 0u32;
    for length in 1..counts.len() {
        code = (code + counts[length - 1]) << 1;
        next[length] = code;
    }
    next
}

/// Symbols ordered canonically: by `(length, symbol)` ascending, zero
/// lengths excluded.
fn canonical_order(lengths: &[u32]) -> Vec<(u16, u32)> {
    let mut order: Vec<(u16, u32)> = lengths
        .iter()
        .enumerate()
        .filter(|&(_, &len)| len > 0)
        .map(|(symbol, &len)| (symbol as u16, len))
        .collect();
    order.sort_by_key(|&(symbol, length)| (length, symbol));
    order
}

/// Build a canonical encoder table from a frequency vector.
///
/// Symbol depths come from plain frequency merging; a depth beyond
/// `length_limit` fails with [`BitpressError::CodeLengthExceeded`] (no
/// length-limiting pass is performed). An alphabet with no used symbol
/// yields an all-absent table.
pub fn build_encoder(freqs: &[u64], length_limit: u32) -> Result<Vec<Option<Code>>> {
    let mut table = vec![None; freqs.len()];
    let Some(tree) = build_tree(freqs) else {
        return Ok(table);
    };
    let lengths = tree.code_lengths(freqs.len());

    let max_length = lengths.iter().copied().max().unwrap_or(0);
    if max_length > length_limit {
        return Err(BitpressError::code_length_exceeded(max_length, length_limit));
    }

    let mut counts = vec![0u32; max_length as usize + 1];
    for &len in &lengths {
        if len > 0 {
            counts[len as usize] += 1;
        }
    }
    let mut next_code = base_codes(&counts);

    for (symbol, length) in canonical_order(&lengths) {
        table[symbol as usize] = Some(Code {
            code: next_code[length as usize],
            length,
        });
        next_code[length as usize] += 1;
    }
    Ok(table)
}

/// A binary decoding tree for a canonical code.
///
/// Each traversal step consumes one bit, `0` descending left and `1`
/// descending right; reaching a leaf yields its symbol. Stepping into an
/// absent subtree is a decode failure.
#[derive(Debug, Default)]
pub struct DecoderTree {
    symbol: Option<u16>,
    left: Option<Box<DecoderTree>>,
    right: Option<Box<DecoderTree>>,
}

impl DecoderTree {
    /// Build a decoding tree from per-symbol code lengths (0 = unused).
    ///
    /// Leaves are inserted in canonical order along the bit-reversed code
    /// path. A collision means the lengths over-subscribe the code space
    /// and fails with [`BitpressError::MalformedCodeLengths`].
    pub fn from_lengths(lengths: &[u32]) -> Result<Self> {
        let max_length = lengths.iter().copied().max().unwrap_or(0);
        let mut root = DecoderTree::default();
        if max_length == 0 {
            return Ok(root);
        }

        let mut counts = vec![0u32; max_length as usize + 1];
        for &len in lengths {
            if len > 0 {
                counts[len as usize] += 1;
            }
        }
        let mut next_code = base_codes(&counts);

        for (symbol, length) in canonical_order(lengths) {
            let code = next_code[length as usize];
            next_code[length as usize] += 1;
            root.insert(reverse_bits(code, length), length, symbol)?;
        }
        Ok(root)
    }

    /// Insert `symbol` at the path given by the low `length` bits of
    /// `path`, least significant bit first.
    fn insert(&mut self, mut path: u32, length: u32, symbol: u16) -> Result<()> {
        let mut node = self;
        for _ in 0..length {
            if node.symbol.is_some() {
                return Err(BitpressError::malformed_code_lengths(
                    "over-subscribed code space",
                ));
            }
            let bit = path & 1;
            path >>= 1;
            let child = if bit == 0 {
                &mut node.left
            } else {
                &mut node.right
            };
            node = &mut **child.get_or_insert_with(Default::default);
        }
        if node.symbol.is_some() || node.left.is_some() || node.right.is_some() {
            return Err(BitpressError::malformed_code_lengths(
                "over-subscribed code space",
            ));
        }
        node.symbol = Some(symbol);
        Ok(())
    }

    /// Whether the tree holds no codes at all.
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.left.is_none() && self.right.is_none()
    }

    /// Decode one symbol from an LSB-first bit stream.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut node = self;
        loop {
            if let Some(symbol) = node.symbol {
                return Ok(symbol);
            }
            let bit = reader.read_bit()?;
            let child = if bit == 0 { &node.left } else { &node.right };
            match child {
                Some(next) => node = &**next,
                None => {
                    return Err(BitpressError::decode_walk_failure(reader.bit_position()));
                }
            }
        }
    }
}
