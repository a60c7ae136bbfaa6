//! The textual LZSS codec.
//!
//! Output is a byte stream in which the four reserved bytes
//! `< > , \` are escaped by a preceding backslash and a back-reference is
//! spelled `<negative_offset,length>` in decimal. A reference is emitted
//! only when its textual form is strictly shorter than the run it
//! replaces; otherwise the bytes stay literal.
//!
//! Decoding runs in two passes: the first resolves references against the
//! already-decoded (still escaped) stream, copying byte by byte so that
//! self-overlapping references reconstruct correctly; the second strips
//! the escape characters.

use crate::matcher::find_matches;
use bitpress_core::error::{BitpressError, Result};

/// Opens a back-reference.
const OPENING: u8 = b'<';
/// Closes a back-reference.
const CLOSING: u8 = b'>';
/// Separates offset from length.
const SEPARATOR: u8 = b',';
/// Escape prefix.
const ESCAPE: u8 = b'\\';

/// Window size the compression service configures (both the maximum
/// match distance and the maximum match length).
const MAX_WINDOW: usize = 4096;

fn is_reserved(byte: u8) -> bool {
    matches!(byte, OPENING | CLOSING | SEPARATOR | ESCAPE)
}

/// Compress `content` into the textual LZSS form.
pub fn compress(content: &[u8]) -> Vec<u8> {
    compress_with_window(content, MAX_WINDOW, MAX_WINDOW)
}

/// Compress with explicit window parameters.
///
/// The effective match length is capped at the match distance window.
pub fn compress_with_window(content: &[u8], max_distance: usize, max_length: usize) -> Vec<u8> {
    let max_length = max_length.min(max_distance);
    let (escaped, pair_open) = escape(content);
    let refs = find_matches(&escaped, max_distance, max_length);

    let mut out = Vec::with_capacity(escaped.len());
    let mut skip = 0usize;
    for (i, reference) in refs.iter().enumerate() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        if reference.is_ref {
            // A match must not end between an escape and the byte it
            // escapes: the tail byte would re-enter the stream bare.
            let mut size = reference.size;
            if pair_open[i + size - 1] {
                size -= 1;
            }
            let encoding = format!("<{},{}>", reference.negative_offset, size);
            if size > 1 && encoding.len() < size {
                out.extend_from_slice(encoding.as_bytes());
                skip = size - 1;
                continue;
            }
        }
        out.push(escaped[i]);
    }
    out
}

/// Decompress the textual LZSS form.
pub fn decompress(content: &[u8]) -> Result<Vec<u8>> {
    let resolved = resolve_references(content)?;
    remove_escapes(&resolved)
}

/// Escape reserved bytes. The second vector flags positions holding an
/// escape byte that opens an escape pair.
fn escape(content: &[u8]) -> (Vec<u8>, Vec<bool>) {
    let mut escaped = Vec::with_capacity(content.len());
    let mut pair_open = Vec::with_capacity(content.len());
    for &byte in content {
        if is_reserved(byte) {
            escaped.push(ESCAPE);
            pair_open.push(true);
        }
        escaped.push(byte);
        pair_open.push(false);
    }
    (escaped, pair_open)
}

/// First decode pass: substitute `<offset,length>` references.
///
/// An `<` opens a reference only when preceded by an even number of
/// consecutive escape bytes (an odd count means the `<` itself is
/// escaped data).
fn resolve_references(content: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(content.len());
    let mut escape_run = 0usize;
    let mut i = 0;
    while i < content.len() {
        let byte = content[i];
        if byte == OPENING && escape_run % 2 == 0 {
            let (negative_offset, length, consumed) = parse_reference(&content[i..])?;
            if negative_offset == 0 {
                return Err(BitpressError::malformed_reference("zero reference offset"));
            }
            let start = out.len().checked_sub(negative_offset).ok_or_else(|| {
                BitpressError::malformed_reference(format!(
                    "offset {negative_offset} reaches before the start of the output"
                ))
            })?;
            // Byte-wise copy: the reference may overlap its own output.
            for k in 0..length {
                let copied = out[start + k];
                out.push(copied);
            }
            i += consumed;
            escape_run = 0;
            continue;
        }
        if byte == ESCAPE {
            escape_run += 1;
        } else {
            escape_run = 0;
        }
        out.push(byte);
        i += 1;
    }
    Ok(out)
}

/// Parse `<offset,length>` at the start of `input`.
///
/// Returns the two fields and the number of bytes consumed.
fn parse_reference(input: &[u8]) -> Result<(usize, usize, usize)> {
    debug_assert_eq!(input[0], OPENING);
    let mut i = 1;
    let offset = parse_decimal(input, &mut i, SEPARATOR)?;
    i += 1;
    let length = parse_decimal(input, &mut i, CLOSING)?;
    i += 1;
    Ok((offset, length, i))
}

fn parse_decimal(input: &[u8], i: &mut usize, until: u8) -> Result<usize> {
    let start = *i;
    while *i < input.len() && input[*i] != until {
        *i += 1;
    }
    if *i >= input.len() {
        return Err(BitpressError::malformed_reference(
            "unterminated back-reference",
        ));
    }
    let digits = &input[start..*i];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(BitpressError::malformed_reference(
            "non-numeric back-reference field",
        ));
    }
    digits
        .iter()
        .try_fold(0usize, |acc, &digit| {
            acc.checked_mul(10)?.checked_add((digit - b'0') as usize)
        })
        .ok_or_else(|| BitpressError::malformed_reference("back-reference field out of range"))
}

/// Second decode pass: drop escape prefixes.
///
/// Every reserved byte must arrive escaped; a bare reserved byte or a
/// trailing escape is malformed input.
fn remove_escapes(content: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(content.len());
    let mut i = 0;
    while i < content.len() {
        let byte = content[i];
        if byte == ESCAPE {
            let Some(&escaped) = content.get(i + 1) else {
                return Err(BitpressError::malformed_reference("trailing escape byte"));
            };
            if !is_reserved(escaped) {
                return Err(BitpressError::malformed_reference(
                    "escape before a non-reserved byte",
                ));
            }
            out.push(escaped);
            i += 2;
        } else if is_reserved(byte) {
            return Err(BitpressError::malformed_reference(
                "unescaped reserved byte in decoded stream",
            ));
        } else {
            out.push(byte);
            i += 1;
        }
    }
    Ok(out)
}
