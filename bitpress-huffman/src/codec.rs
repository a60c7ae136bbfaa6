//! The plain-Huffman codec with textual frequency header.
//!
//! This framing is not DEFLATE-compatible; it is a self-contained
//! end-to-end codec. The wire format is:
//!
//! ```text
//! freq1|sym1 freq2|sym2 ... \ LF  pad_byte  payload...
//! ```
//!
//! Each header pair is the decimal frequency, a `|`, and the raw symbol
//! byte. Byte 10 (newline) is spelled as the two characters `\n` so that
//! the backslash-newline terminator stays unique. `pad_byte` counts the
//! zero bits appended to the final payload byte; payload bits are packed
//! MSB-first within each byte, matching the top-down walk of the
//! frequency tree (`0` left, `1` right).

use crate::tree::{FreqTree, build_tree};
use bitpress_core::error::{BitpressError, Result};

/// Header terminator: backslash, newline.
const TERMINATOR: [u8; 2] = [b'\\', b'\n'];

/// Compress `content` with a frequency-tree Huffman code.
pub fn compress(content: &[u8]) -> Result<Vec<u8>> {
    let freqs = byte_frequencies(content);
    let mut out = write_header(&freqs);

    let Some(tree) = build_tree(&freqs) else {
        // Empty input: empty header, zero pad bits, no payload.
        out.push(0);
        return Ok(out);
    };

    let mut codes: Vec<Option<(u64, u32)>> = vec![None; 256];
    collect_codes(&tree, 0, 0, &mut codes);

    let mut packer = MsbPacker::default();
    for &byte in content {
        let (code, length) = codes[byte as usize]
            .ok_or(BitpressError::EncodingFailure {
                symbol: byte as u32,
            })?;
        packer.push(code, length);
    }
    let (payload, pad_bits) = packer.finish();
    out.push(pad_bits);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decompress a plain-Huffman frame.
pub fn decompress(content: &[u8]) -> Result<Vec<u8>> {
    let split = find_terminator(content)?;
    let header = &content[..split];
    let rest = &content[split + TERMINATOR.len()..];

    let freqs = parse_header(header)?;
    let Some(tree) = build_tree(&freqs) else {
        return Ok(Vec::new());
    };

    let Some((&pad_bits, payload)) = rest.split_first() else {
        return Err(BitpressError::malformed_reference(
            "missing padding byte after header terminator",
        ));
    };
    if pad_bits >= 8 || (payload.is_empty() && pad_bits != 0) {
        return Err(BitpressError::malformed_reference(
            "invalid padding bit count",
        ));
    }

    let total_bits = payload.len() * 8 - pad_bits as usize;
    decode_payload(&tree, payload, total_bits)
}

fn byte_frequencies(content: &[u8]) -> Vec<u64> {
    let mut freqs = vec![0u64; 256];
    for &byte in content {
        freqs[byte as usize] += 1;
    }
    freqs
}

/// Emit the frequency pairs in ascending symbol order, then the
/// terminator. Deterministic ordering keeps compressed output
/// reproducible; the decoder accepts any pair order.
fn write_header(freqs: &[u64]) -> Vec<u8> {
    let mut header = Vec::new();
    for (symbol, &freq) in freqs.iter().enumerate() {
        if freq == 0 {
            continue;
        }
        header.extend_from_slice(freq.to_string().as_bytes());
        header.push(b'|');
        if symbol == 10 {
            header.extend_from_slice(b"\\n");
        } else {
            header.push(symbol as u8);
        }
    }
    header.extend_from_slice(&TERMINATOR);
    header
}

/// Position of the backslash-newline terminator.
fn find_terminator(content: &[u8]) -> Result<usize> {
    content
        .windows(2)
        .position(|window| window == TERMINATOR)
        .ok_or_else(|| BitpressError::malformed_reference("missing header terminator"))
}

/// Parse `freq|sym` pairs. A `|` not preceded by another `|` separates a
/// frequency from its symbol; the pair `|` + `\n` denotes byte 10. A
/// frequency's digits are scanned backwards, stopping before the previous
/// pair's symbol even when that symbol is itself a digit.
fn parse_header(header: &[u8]) -> Result<Vec<u64>> {
    let mut freqs = vec![0u64; 256];
    for i in 0..header.len() {
        if header[i] != b'|' || (i > 0 && header[i - 1] == b'|') {
            continue;
        }
        if i == 0 || i + 1 >= header.len() {
            return Err(BitpressError::malformed_reference(
                "dangling separator in frequency header",
            ));
        }

        let mut start = i - 1;
        while start > 0
            && header[start - 1].is_ascii_digit()
            && (start == 1 || header[start - 2] != b'|')
        {
            start -= 1;
        }
        let digits = std::str::from_utf8(&header[start..i])
            .map_err(|_| BitpressError::malformed_reference("non-ASCII frequency digits"))?;
        let freq: u64 = digits.parse().map_err(|_| {
            BitpressError::malformed_reference("unparsable frequency in header")
        })?;

        let symbol = if header[i + 1] == b'\\' && i + 2 < header.len() && header[i + 2] == b'n' {
            10usize
        } else {
            header[i + 1] as usize
        };
        freqs[symbol] = freq;
    }
    Ok(freqs)
}

fn collect_codes(tree: &FreqTree, prefix: u64, depth: u32, codes: &mut [Option<(u64, u32)>]) {
    match tree {
        FreqTree::Leaf { symbol, .. } => {
            // A lone leaf still needs a transmissible code.
            if depth == 0 {
                codes[*symbol as usize] = Some((0, 1));
            } else {
                codes[*symbol as usize] = Some((prefix, depth));
            }
        }
        FreqTree::Node { left, right, .. } => {
            collect_codes(left, prefix << 1, depth + 1, codes);
            collect_codes(right, (prefix << 1) | 1, depth + 1, codes);
        }
    }
}

fn decode_payload(tree: &FreqTree, payload: &[u8], total_bits: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut bits = (0..total_bits).map(|i| (payload[i / 8] >> (7 - i % 8)) & 1);

    if let FreqTree::Leaf { symbol, .. } = tree {
        // Single-symbol alphabet: one bit per occurrence.
        out.extend(bits.map(|_| *symbol as u8));
        return Ok(out);
    }

    let mut node = tree;
    for bit in bits.by_ref() {
        let FreqTree::Node { left, right, .. } = node else {
            unreachable!("walk restarts at the root after every leaf");
        };
        node = if bit == 0 { left } else { right };
        if let FreqTree::Leaf { symbol, .. } = node {
            out.push(*symbol as u8);
            node = tree;
        }
    }
    if !std::ptr::eq(node, tree) {
        return Err(BitpressError::input_truncated(1));
    }
    Ok(out)
}

/// Packs code bits MSB-first into bytes.
#[derive(Default)]
struct MsbPacker {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl MsbPacker {
    fn push(&mut self, code: u64, length: u32) {
        for shift in (0..length).rev() {
            self.current = (self.current << 1) | ((code >> shift) & 1) as u8;
            self.filled += 1;
            if self.filled == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.filled = 0;
            }
        }
    }

    /// Flush, returning the payload and the count of zero pad bits added
    /// to the final byte.
    fn finish(mut self) -> (Vec<u8>, u8) {
        if self.filled == 0 {
            return (self.bytes, 0);
        }
        let pad = 8 - self.filled;
        self.bytes.push(self.current << pad);
        (self.bytes, pad)
    }
}
