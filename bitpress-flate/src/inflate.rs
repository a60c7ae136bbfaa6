//! DEFLATE decompression for dynamic-Huffman blocks.
//!
//! Mirrors the encoder: read the block header counts, rebuild the
//! code-length decoder, expand the run-length-coded table lengths,
//! rebuild the literal/length and distance decoders, then decode tokens
//! until the end-of-block symbol. Matches are copied byte by byte so a
//! distance smaller than the length reconstructs its repeating run.

use crate::tables::{
    CODE_LENGTH_ORDER, DISTANCE_ALPHABET_SIZE, LENGTH_EXTRA_BITS, DISTANCE_EXTRA_BITS,
    decode_distance, decode_length,
};
use bitpress_core::BitReader;
use bitpress_core::error::{BitpressError, Result};
use bitpress_huffman::DecoderTree;

/// Decompress a single dynamic-Huffman DEFLATE block.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(data);

    let _bfinal = reader.read(1)?;
    let btype = reader.read(2)?;
    if btype != 2 {
        return Err(BitpressError::InvalidBlockType { btype });
    }

    let hlit = reader.read(5)? as usize + 257;
    let hdist = reader.read(5)? as usize + 1;
    let hclen = reader.read(4)? as usize + 4;

    let mut codelen_lengths = [0u32; 19];
    for &position in CODE_LENGTH_ORDER.iter().take(hclen) {
        codelen_lengths[position] = reader.read(3)?;
    }
    let codelen_tree = DecoderTree::from_lengths(&codelen_lengths)?;

    let combined = read_code_lengths(&mut reader, &codelen_tree, hlit + hdist)?;
    let litlen_tree = DecoderTree::from_lengths(&combined[..hlit])?;
    let dist_tree = DecoderTree::from_lengths(&combined[hlit..])?;

    decode_block(&mut reader, &litlen_tree, &dist_tree)
}

/// Expand the RLE-coded code-length stream into `total` lengths.
fn read_code_lengths(
    reader: &mut BitReader<'_>,
    codelen_tree: &DecoderTree,
    total: usize,
) -> Result<Vec<u32>> {
    let mut lengths = Vec::with_capacity(total);
    while lengths.len() < total {
        let symbol = codelen_tree.decode(reader)?;
        match symbol {
            0..=15 => lengths.push(symbol as u32),
            16 => {
                let Some(&previous) = lengths.last() else {
                    return Err(BitpressError::malformed_code_lengths(
                        "repeat code 16 with no previous length",
                    ));
                };
                let repeat = reader.read(2)? as usize + 3;
                lengths.resize(lengths.len() + repeat, previous);
            }
            17 => {
                let repeat = reader.read(3)? as usize + 3;
                lengths.resize(lengths.len() + repeat, 0);
            }
            18 => {
                let repeat = reader.read(7)? as usize + 11;
                lengths.resize(lengths.len() + repeat, 0);
            }
            _ => {
                return Err(BitpressError::malformed_code_lengths(format!(
                    "invalid code-length symbol {symbol}"
                )));
            }
        }
    }
    if lengths.len() > total {
        return Err(BitpressError::malformed_code_lengths(
            "repeat run overruns the transmitted table size",
        ));
    }
    Ok(lengths)
}

/// Decode literals and matches until the end-of-block symbol.
fn decode_block(
    reader: &mut BitReader<'_>,
    litlen_tree: &DecoderTree,
    dist_tree: &DecoderTree,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    loop {
        let symbol = litlen_tree.decode(reader)?;
        match symbol {
            0..=255 => output.push(symbol as u8),
            256 => break,
            257..=285 => {
                let extra_bits = LENGTH_EXTRA_BITS[(symbol - 257) as usize];
                let extra = reader.read(extra_bits)?;
                let length = decode_length(symbol, extra);

                let distance_symbol = dist_tree.decode(reader)?;
                if distance_symbol as usize >= DISTANCE_ALPHABET_SIZE {
                    return Err(BitpressError::malformed_code_lengths(format!(
                        "invalid distance symbol {distance_symbol}"
                    )));
                }
                let distance_extra_bits = DISTANCE_EXTRA_BITS[distance_symbol as usize];
                let distance_extra = reader.read(distance_extra_bits)?;
                let distance = decode_distance(distance_symbol, distance_extra);

                copy_match(&mut output, length, distance)?;
            }
            _ => {
                return Err(BitpressError::malformed_code_lengths(format!(
                    "invalid literal/length symbol {symbol}"
                )));
            }
        }
    }
    Ok(output)
}

/// Append `length` bytes starting `distance` back in `output`.
///
/// Byte-wise so the source window may grow into the copy itself.
fn copy_match(output: &mut Vec<u8>, length: usize, distance: usize) -> Result<()> {
    if distance == 0 || distance > output.len() {
        return Err(BitpressError::match_out_of_range(length, distance));
    }
    let start = output.len() - distance;
    for i in 0..length {
        let byte = output[start + i];
        output.push(byte);
    }
    Ok(())
}
