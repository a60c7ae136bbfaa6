//! DEFLATE compression: one dynamic-Huffman block per call.
//!
//! The encoder tokenizes the input with the shared longest-match search,
//! builds canonical literal/length and distance tables from the token
//! frequencies, run-length-encodes the two tables' code lengths with the
//! 19-symbol code-length alphabet, and emits the block LSB-first:
//!
//! ```text
//! BFINAL(1) BTYPE(2) HLIT(5) HDIST(5) HCLEN(4)
//! code-length code lengths (3 bits each, header order)
//! RLE-coded litlen+distance code lengths
//! token stream, terminated by symbol 256
//! ```
//!
//! Huffman codes are bit-reversed before writing so the MSB of each code
//! leads in the stream; extra-bit fields are written raw.

use crate::tables::{
    CODE_LENGTH_ORDER, CODELEN_REPEAT_EXTRA_BITS, END_OF_BLOCK, LITLEN_ALPHABET_SIZE,
    DISTANCE_ALPHABET_SIZE, CODELEN_ALPHABET_SIZE, MAX_CODE_LENGTH, MAX_CODELEN_CODE_LENGTH,
    MAX_MATCH_DISTANCE, MAX_MATCH_LENGTH, MIN_MATCH_LENGTH, distance_to_code, length_to_code,
};
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::{BitWriter, reverse_bits};
use bitpress_huffman::canonical::{Code, build_encoder};
use bitpress_lzss::find_matches;

/// A symbol of the DEFLATE token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference to previously emitted output.
    Match {
        /// Bytes to copy (3-258).
        length: usize,
        /// How far back the copy starts (1-32768). May be smaller than
        /// `length`: the copy then overlaps its own output.
        distance: usize,
    },
}

/// One item of the run-length-encoded code-length stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RleItem {
    /// Code-length alphabet symbol (0-18).
    pub code: u8,
    /// Extra-bits value for the repeat codes 16/17/18.
    pub offset: u8,
}

/// Tokenize `data` for DEFLATE encoding.
///
/// References shorter than the 3-byte match minimum degrade to literals.
pub fn tokenize(data: &[u8]) -> Result<Vec<Token>> {
    let refs = find_matches(data, MAX_MATCH_DISTANCE, MAX_MATCH_LENGTH);
    let mut tokens = Vec::new();
    let mut skip = 0usize;
    for (i, reference) in refs.iter().enumerate() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        if !reference.is_ref || reference.size < MIN_MATCH_LENGTH {
            tokens.push(Token::Literal(data[i]));
        } else {
            if reference.size > MAX_MATCH_LENGTH || reference.negative_offset > MAX_MATCH_DISTANCE {
                return Err(BitpressError::match_out_of_range(
                    reference.size,
                    reference.negative_offset,
                ));
            }
            tokens.push(Token::Match {
                length: reference.size,
                distance: reference.negative_offset,
            });
            skip = reference.size - 1;
        }
    }
    Ok(tokens)
}

/// Compress `data` into a single dynamic-Huffman DEFLATE block.
///
/// `bfinal` and `btype` are written into the block header as given; the
/// decoder in this crate accepts BTYPE=2 only.
pub fn deflate(data: &[u8], btype: u32, bfinal: u32) -> Result<Vec<u8>> {
    let tokens = tokenize(data)?;
    deflate_tokens(&tokens, btype, bfinal)
}

/// Encode an already-tokenized stream.
pub fn deflate_tokens(tokens: &[Token], btype: u32, bfinal: u32) -> Result<Vec<u8>> {
    // Symbol frequencies; end-of-block is always transmitted once.
    let mut litlen_freqs = vec![0u64; LITLEN_ALPHABET_SIZE];
    let mut dist_freqs = vec![0u64; DISTANCE_ALPHABET_SIZE];
    for token in tokens {
        match *token {
            Token::Literal(byte) => litlen_freqs[byte as usize] += 1,
            Token::Match { length, distance } => {
                let (length_code, _, _) = length_to_code(length)?;
                let (distance_code, _, _) = distance_to_code(distance)?;
                litlen_freqs[length_code as usize] += 1;
                dist_freqs[distance_code as usize] += 1;
            }
        }
    }
    litlen_freqs[END_OF_BLOCK as usize] += 1;

    let litlen_table = build_encoder(&litlen_freqs, MAX_CODE_LENGTH)?;
    let dist_table = build_encoder(&dist_freqs, MAX_CODE_LENGTH)?;

    let litlen_lengths = truncated_lengths(&litlen_table, 257);
    let dist_lengths = truncated_lengths(&dist_table, 1);
    let hlit = litlen_lengths.len() - 257;
    let hdist = dist_lengths.len() - 1;

    let mut combined = litlen_lengths;
    combined.extend_from_slice(&dist_lengths);
    let items = rle_encode(&combined);

    let mut codelen_freqs = vec![0u64; CODELEN_ALPHABET_SIZE];
    for item in &items {
        codelen_freqs[item.code as usize] += 1;
    }
    let codelen_table = build_encoder(&codelen_freqs, MAX_CODELEN_CODE_LENGTH)?;

    // The code-length code lengths travel in header order, truncated
    // after the last non-zero entry but never below four.
    let header_order_table: Vec<Option<Code>> = CODE_LENGTH_ORDER
        .iter()
        .map(|&symbol| codelen_table[symbol])
        .collect();
    let codelen_header_lengths = truncated_lengths(&header_order_table, 4);
    let hclen = codelen_header_lengths.len() - 4;

    let mut writer = BitWriter::new();
    writer.write(bfinal, 1);
    writer.write(btype, 2);
    writer.write(hlit as u32, 5);
    writer.write(hdist as u32, 5);
    writer.write(hclen as u32, 4);
    for &length in &codelen_header_lengths {
        writer.write(length, 3);
    }

    for item in &items {
        write_code(&mut writer, &codelen_table, item.code as usize)?;
        if item.code >= 16 {
            let extra_bits = CODELEN_REPEAT_EXTRA_BITS[item.code as usize - 16];
            writer.write(item.offset as u32, extra_bits);
        }
    }

    for token in tokens {
        match *token {
            Token::Literal(byte) => write_code(&mut writer, &litlen_table, byte as usize)?,
            Token::Match { length, distance } => {
                let (length_code, length_extra_bits, length_extra) = length_to_code(length)?;
                write_code(&mut writer, &litlen_table, length_code as usize)?;
                if length_extra_bits > 0 {
                    writer.write(length_extra, length_extra_bits);
                }
                let (distance_code, distance_extra_bits, distance_extra) =
                    distance_to_code(distance)?;
                write_code(&mut writer, &dist_table, distance_code as usize)?;
                if distance_extra_bits > 0 {
                    writer.write(distance_extra, distance_extra_bits);
                }
            }
        }
    }
    write_code(&mut writer, &litlen_table, END_OF_BLOCK as usize)?;

    writer.flush_align();
    Ok(writer.into_bytes())
}

/// Write one Huffman code, bit-reversed for the LSB-first stream.
fn write_code(writer: &mut BitWriter, table: &[Option<Code>], symbol: usize) -> Result<()> {
    let code = table[symbol].ok_or(BitpressError::EncodingFailure {
        symbol: symbol as u32,
    })?;
    writer.write(reverse_bits(code.code, code.length), code.length);
    Ok(())
}

/// Per-symbol lengths with trailing zeros removed.
///
/// The first `min_len` entries are always kept: DEFLATE transmits at
/// least 257 literal/length, 1 distance, and 4 code-length lengths.
fn truncated_lengths(table: &[Option<Code>], min_len: usize) -> Vec<u32> {
    let mut lengths = Vec::with_capacity(table.len());
    let mut pending_zeros = 0usize;
    for (symbol, entry) in table.iter().enumerate() {
        let length = entry.map_or(0, |code| code.length);
        if symbol < min_len {
            lengths.push(length);
        } else if length == 0 {
            pending_zeros += 1;
        } else {
            lengths.resize(lengths.len() + pending_zeros, 0);
            pending_zeros = 0;
            lengths.push(length);
        }
    }
    lengths
}

/// Run-length-encode a code-length sequence with symbols 16/17/18.
///
/// Zero runs of 1-2 stay literal, 3-10 become code 17, 11-138 become
/// code 18. A non-zero value is sent once, then repeats of 3-6 become
/// code 16 (repeats of 1-2 stay literal).
pub(crate) fn rle_encode(lengths: &[u32]) -> Vec<RleItem> {
    let mut items = Vec::new();
    let mut i = 0usize;
    while i < lengths.len() {
        let value = lengths[i];
        let mut run = 1usize;
        while i + run < lengths.len() && lengths[i + run] == value {
            run += 1;
        }
        if value == 0 {
            let mut remaining = run;
            while remaining > 0 {
                if remaining >= 11 {
                    let n = remaining.min(138);
                    items.push(RleItem {
                        code: 18,
                        offset: (n - 11) as u8,
                    });
                    remaining -= n;
                } else if remaining >= 3 {
                    items.push(RleItem {
                        code: 17,
                        offset: (remaining - 3) as u8,
                    });
                    remaining = 0;
                } else {
                    items.push(RleItem { code: 0, offset: 0 });
                    remaining -= 1;
                }
            }
        } else {
            items.push(RleItem {
                code: value as u8,
                offset: 0,
            });
            let mut remaining = run - 1;
            while remaining > 0 {
                if remaining >= 3 {
                    let n = remaining.min(6);
                    items.push(RleItem {
                        code: 16,
                        offset: (n - 3) as u8,
                    });
                    remaining -= n;
                } else {
                    items.push(RleItem {
                        code: value as u8,
                        offset: 0,
                    });
                    remaining -= 1;
                }
            }
        }
        i += run;
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_literals_only() {
        let tokens = tokenize(b"abcdefgh").unwrap();
        assert_eq!(tokens.len(), 8);
        assert!(tokens.iter().all(|t| matches!(t, Token::Literal(_))));
    }

    #[test]
    fn test_tokenize_alternating_pattern() {
        let tokens = tokenize(b"ABABABABAB").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(b'A'),
                Token::Literal(b'B'),
                Token::Match {
                    length: 8,
                    distance: 2,
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_short_match_degrades_to_literal() {
        // "ab" recurs but two bytes are below the match minimum.
        let tokens = tokenize(b"abcdab").unwrap();
        assert!(tokens.iter().all(|t| matches!(t, Token::Literal(_))));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_tokenize_covers_input() {
        let data = b"The quick brown fox jumps over the lazy dog. The quick brown fox.";
        let tokens = tokenize(data).unwrap();
        let total: usize = tokens
            .iter()
            .map(|t| match t {
                Token::Literal(_) => 1,
                Token::Match { length, .. } => *length,
            })
            .sum();
        assert_eq!(total, data.len());
        assert!(tokens.iter().any(|t| matches!(t, Token::Match { .. })));
    }

    #[test]
    fn test_tokenize_max_length_match() {
        let data = vec![7u8; 600];
        let tokens = tokenize(&data).unwrap();
        assert_eq!(tokens[0], Token::Literal(7));
        assert!(matches!(
            tokens[1],
            Token::Match {
                length: 258,
                distance: 1,
            }
        ));
    }

    #[test]
    fn test_rle_zero_runs() {
        // 138 zeros collapse into one code 18 with maximum offset.
        let items = rle_encode(&vec![0u32; 138]);
        assert_eq!(
            items,
            vec![RleItem {
                code: 18,
                offset: 127,
            }]
        );

        // 139 zeros need a trailing literal zero.
        let items = rle_encode(&vec![0u32; 139]);
        assert_eq!(
            items,
            vec![
                RleItem {
                    code: 18,
                    offset: 127,
                },
                RleItem { code: 0, offset: 0 },
            ]
        );

        // Short zero runs stay literal.
        let items = rle_encode(&[0, 0]);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.code == 0));

        // 3-10 zeros use code 17.
        let items = rle_encode(&vec![0u32; 7]);
        assert_eq!(items, vec![RleItem { code: 17, offset: 4 }]);
    }

    #[test]
    fn test_rle_repeat_runs() {
        // Five repeats: the value itself, then code 16 with offset 1.
        let items = rle_encode(&[5, 5, 5, 5, 5]);
        assert_eq!(
            items,
            vec![
                RleItem { code: 5, offset: 0 },
                RleItem {
                    code: 16,
                    offset: 1,
                },
            ]
        );

        // Two repeats stay literal.
        let items = rle_encode(&[9, 9, 9]);
        assert_eq!(
            items,
            vec![
                RleItem { code: 9, offset: 0 },
                RleItem { code: 9, offset: 0 },
                RleItem { code: 9, offset: 0 },
            ]
        );

        // A long repeat splits at the six-repeat cap.
        let items = rle_encode(&vec![4u32; 8]);
        assert_eq!(
            items,
            vec![
                RleItem { code: 4, offset: 0 },
                RleItem {
                    code: 16,
                    offset: 3,
                },
                RleItem { code: 4, offset: 0 },
            ]
        );
    }

    #[test]
    fn test_rle_mixed_sequence() {
        let items = rle_encode(&[1, 0, 0, 0, 0, 2, 2]);
        assert_eq!(
            items,
            vec![
                RleItem { code: 1, offset: 0 },
                RleItem { code: 17, offset: 1 },
                RleItem { code: 2, offset: 0 },
                RleItem { code: 2, offset: 0 },
            ]
        );
    }

    #[test]
    fn test_truncated_lengths_keeps_prefix() {
        let table = vec![None; 10];
        assert_eq!(truncated_lengths(&table, 4), vec![0, 0, 0, 0]);

        let mut table = vec![None; 10];
        table[1] = Some(Code { code: 0, length: 2 });
        table[6] = Some(Code { code: 1, length: 2 });
        assert_eq!(truncated_lengths(&table, 4), vec![0, 2, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_deflate_emits_block_header() {
        let out = deflate(b"hello", 2, 1).unwrap();
        // BFINAL=1 in bit 0, BTYPE=2 in bits 1-2.
        assert_eq!(out[0] & 0b111, 0b101);
    }
}
