//! DEFLATE alphabet tables (RFC 1951 §3.2.5, §3.2.7).
//!
//! Three alphabets drive a dynamic block:
//!
//! - **Literal/length** (0-285): 0-255 are literal bytes, 256 is
//!   end-of-block, 257-285 encode match lengths 3-258 with extra bits.
//! - **Distance** (0-29): encodes match distances 1-32768 with extra bits.
//! - **Code length** (0-18): the meta-alphabet that transmits the other
//!   two tables' code lengths, with three repeat codes (16, 17, 18).

use bitpress_core::error::{BitpressError, Result};

/// Size of the literal/length alphabet.
pub const LITLEN_ALPHABET_SIZE: usize = 286;

/// Size of the distance alphabet.
pub const DISTANCE_ALPHABET_SIZE: usize = 30;

/// Size of the code-length alphabet.
pub const CODELEN_ALPHABET_SIZE: usize = 19;

/// End-of-block symbol.
pub const END_OF_BLOCK: u16 = 256;

/// Maximum code length for the literal/length and distance alphabets.
pub const MAX_CODE_LENGTH: u32 = 15;

/// Maximum code length for the code-length alphabet.
pub const MAX_CODELEN_CODE_LENGTH: u32 = 7;

/// Minimum encodable match length.
pub const MIN_MATCH_LENGTH: usize = 3;

/// Maximum encodable match length.
pub const MAX_MATCH_LENGTH: usize = 258;

/// Maximum encodable match distance.
pub const MAX_MATCH_DISTANCE: usize = 32768;

/// Base length for codes 257-285.
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, // 257-264: 0 extra bits
    11, 13, 15, 17, // 265-268: 1 extra bit
    19, 23, 27, 31, // 269-272: 2 extra bits
    35, 43, 51, 59, // 273-276: 3 extra bits
    67, 83, 99, 115, // 277-280: 4 extra bits
    131, 163, 195, 227, // 281-284: 5 extra bits
    258, // 285: 0 extra bits
];

/// Extra-bit counts for codes 257-285.
pub const LENGTH_EXTRA_BITS: [u32; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, // 257-264
    1, 1, 1, 1, // 265-268
    2, 2, 2, 2, // 269-272
    3, 3, 3, 3, // 273-276
    4, 4, 4, 4, // 277-280
    5, 5, 5, 5, // 281-284
    0, // 285
];

/// Base distance for codes 0-29.
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, // 0-3: 0 extra bits
    5, 7, // 4-5: 1 extra bit
    9, 13, // 6-7: 2 extra bits
    17, 25, // 8-9: 3 extra bits
    33, 49, // 10-11: 4 extra bits
    65, 97, // 12-13: 5 extra bits
    129, 193, // 14-15: 6 extra bits
    257, 385, // 16-17: 7 extra bits
    513, 769, // 18-19: 8 extra bits
    1025, 1537, // 20-21: 9 extra bits
    2049, 3073, // 22-23: 10 extra bits
    4097, 6145, // 24-25: 11 extra bits
    8193, 12289, // 26-27: 12 extra bits
    16385, 24577, // 28-29: 13 extra bits
];

/// Extra-bit counts for distance codes 0-29.
pub const DISTANCE_EXTRA_BITS: [u32; 30] = [
    0, 0, 0, 0, // 0-3
    1, 1, // 4-5
    2, 2, // 6-7
    3, 3, // 8-9
    4, 4, // 10-11
    5, 5, // 12-13
    6, 6, // 14-15
    7, 7, // 16-17
    8, 8, // 18-19
    9, 9, // 20-21
    10, 10, // 22-23
    11, 11, // 24-25
    12, 12, // 26-27
    13, 13, // 28-29
];

/// Base repeat counts for code-length codes 16, 17, 18.
pub const CODELEN_REPEAT_BASE: [u32; 3] = [3, 3, 11];

/// Extra-bit counts for code-length codes 16, 17, 18.
pub const CODELEN_REPEAT_EXTRA_BITS: [u32; 3] = [2, 3, 7];

/// Transmission order of the code-length code lengths in a dynamic block
/// header (RFC 1951 §3.2.7).
pub const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Map a match length (3-258) to `(code, extra_bits, extra_value)`.
pub fn length_to_code(length: usize) -> Result<(u16, u32, u32)> {
    if !(MIN_MATCH_LENGTH..=MAX_MATCH_LENGTH).contains(&length) {
        return Err(BitpressError::match_out_of_range(length, 0));
    }
    let code = match length {
        3..=10 => length - 3 + 257,
        11..=18 => (length - 11) / 2 + 265,
        19..=34 => (length - 19) / 4 + 269,
        35..=66 => (length - 35) / 8 + 273,
        67..=130 => (length - 67) / 16 + 277,
        131..=257 => (length - 131) / 32 + 281,
        _ => 285,
    };
    let base = LENGTH_BASE[code - 257] as usize;
    Ok((
        code as u16,
        LENGTH_EXTRA_BITS[code - 257],
        (length - base) as u32,
    ))
}

/// Map a match distance (1-32768) to `(code, extra_bits, extra_value)`.
pub fn distance_to_code(distance: usize) -> Result<(u16, u32, u32)> {
    if !(1..=MAX_MATCH_DISTANCE).contains(&distance) {
        return Err(BitpressError::match_out_of_range(0, distance));
    }
    let code = DISTANCE_BASE.partition_point(|&base| (base as usize) <= distance) - 1;
    Ok((
        code as u16,
        DISTANCE_EXTRA_BITS[code],
        (distance - DISTANCE_BASE[code] as usize) as u32,
    ))
}

/// Length value for a length code (257-285) and its extra bits.
pub fn decode_length(code: u16, extra: u32) -> usize {
    debug_assert!((257..=285).contains(&code));
    LENGTH_BASE[(code - 257) as usize] as usize + extra as usize
}

/// Distance value for a distance code (0-29) and its extra bits.
pub fn decode_distance(code: u16, extra: u32) -> usize {
    debug_assert!(code < 30);
    DISTANCE_BASE[code as usize] as usize + extra as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_code_roundtrip() {
        for length in MIN_MATCH_LENGTH..=MAX_MATCH_LENGTH {
            let (code, extra_bits, extra) = length_to_code(length).unwrap();
            assert!((257..=285).contains(&code));
            assert!(extra < (1 << extra_bits) || extra_bits == 0 && extra == 0);
            assert_eq!(decode_length(code, extra), length);
        }
    }

    #[test]
    fn test_distance_code_roundtrip() {
        for distance in 1..=MAX_MATCH_DISTANCE {
            let (code, extra_bits, extra) = distance_to_code(distance).unwrap();
            assert!(code < 30);
            assert!(extra < (1 << extra_bits) || extra_bits == 0 && extra == 0);
            assert_eq!(decode_distance(code, extra), distance);
        }
    }

    #[test]
    fn test_specific_length_codes() {
        assert_eq!(length_to_code(3).unwrap(), (257, 0, 0));
        assert_eq!(length_to_code(10).unwrap(), (264, 0, 0));
        assert_eq!(length_to_code(11).unwrap(), (265, 1, 0));
        assert_eq!(length_to_code(12).unwrap(), (265, 1, 1));
        assert_eq!(length_to_code(257).unwrap(), (284, 5, 30));
        assert_eq!(length_to_code(258).unwrap(), (285, 0, 0));
    }

    #[test]
    fn test_specific_distance_codes() {
        assert_eq!(distance_to_code(1).unwrap(), (0, 0, 0));
        assert_eq!(distance_to_code(4).unwrap(), (3, 0, 0));
        assert_eq!(distance_to_code(5).unwrap(), (4, 1, 0));
        assert_eq!(distance_to_code(6).unwrap(), (4, 1, 1));
        assert_eq!(distance_to_code(24577).unwrap(), (29, 13, 0));
        assert_eq!(distance_to_code(32768).unwrap(), (29, 13, 8191));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(length_to_code(2).is_err());
        assert!(length_to_code(259).is_err());
        assert!(distance_to_code(0).is_err());
        assert!(distance_to_code(32769).is_err());
    }
}
