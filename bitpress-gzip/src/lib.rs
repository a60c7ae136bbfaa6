//! # Bitpress GZIP
//!
//! Single-member GZIP framing (RFC 1952) over the bitpress DEFLATE codec.
//!
//! A member is:
//!
//! ```text
//! header(10) || deflate payload || crc32_le(4) || isize_le(4)
//! ```
//!
//! The emitted header is fixed (`1f 8b 08 00 00 00 00 00 00 ff`): DEFLATE
//! method, no flags, no modification time, unknown OS. The trailer holds
//! the CRC-32 of the *uncompressed* bytes and their count modulo 2^32.
//! Decoding requires FLG=0: members carrying FEXTRA/FNAME/FCOMMENT/FHCRC
//! extensions are rejected rather than skipped.
//!
//! ## Example
//!
//! ```rust
//! use bitpress_gzip::{compress, decompress};
//!
//! let data = b"Hello, GZIP World!";
//! let member = compress(data, 2, 1).unwrap();
//! assert_eq!(&member[..2], &[0x1F, 0x8B]);
//! assert_eq!(decompress(&member).unwrap(), data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use bitpress_core::Crc32;
use bitpress_core::error::{BitpressError, Result};
use bitpress_flate::{deflate, inflate};

/// GZIP magic bytes (ID1, ID2).
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compression method byte for DEFLATE.
pub const CM_DEFLATE: u8 = 0x08;

/// The fixed header this encoder emits: magic, DEFLATE, FLG=0, MTIME=0,
/// XFL=0, OS=unknown.
pub const FIXED_HEADER: [u8; 10] = [0x1F, 0x8B, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xFF];

/// Size of the CRC-32 + ISIZE trailer.
const TRAILER_SIZE: usize = 8;

/// Compress `data` into one GZIP member.
///
/// `btype` and `bfinal` are forwarded to the DEFLATE block header.
pub fn compress(data: &[u8], btype: u32, bfinal: u32) -> Result<Vec<u8>> {
    let payload = deflate(data, btype, bfinal)?;

    let mut member = Vec::with_capacity(FIXED_HEADER.len() + payload.len() + TRAILER_SIZE);
    member.extend_from_slice(&FIXED_HEADER);
    member.extend_from_slice(&payload);
    member.extend_from_slice(&Crc32::compute(data).to_le_bytes());
    member.extend_from_slice(&(data.len() as u32).to_le_bytes());
    Ok(member)
}

/// Decompress one GZIP member, verifying the trailer.
pub fn decompress(member: &[u8]) -> Result<Vec<u8>> {
    if member.len() < FIXED_HEADER.len() + TRAILER_SIZE {
        return Err(BitpressError::input_truncated(
            FIXED_HEADER.len() + TRAILER_SIZE - member.len(),
        ));
    }

    validate_header(&member[..FIXED_HEADER.len()])?;

    let payload = &member[FIXED_HEADER.len()..member.len() - TRAILER_SIZE];
    let trailer = &member[member.len() - TRAILER_SIZE..];
    let given_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let given_size = u32::from_le_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);

    let output = inflate(payload)?;

    if given_size != output.len() as u32 {
        return Err(BitpressError::checksum_mismatch(
            given_size,
            output.len() as u32,
        ));
    }
    let computed_crc = Crc32::compute(&output);
    if given_crc != computed_crc {
        return Err(BitpressError::checksum_mismatch(given_crc, computed_crc));
    }
    Ok(output)
}

/// Check magic, compression method, and flag bytes.
fn validate_header(header: &[u8]) -> Result<()> {
    if header[0..2] != GZIP_MAGIC {
        return Err(BitpressError::invalid_header(format!(
            "bad magic {:02x} {:02x}",
            header[0], header[1]
        )));
    }
    if header[2] != CM_DEFLATE {
        return Err(BitpressError::invalid_header(format!(
            "unsupported compression method {}",
            header[2]
        )));
    }
    if header[3] != 0 {
        return Err(BitpressError::invalid_header(format!(
            "unsupported FLG {:#04x} (extension fields are not parsed)",
            header[3]
        )));
    }
    Ok(())
}
