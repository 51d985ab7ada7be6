//! Byte classes used by the scanner.
//!
//! All structural characters of the language are ASCII, so the scanner works
//! on bytes and only decodes full characters inside literals and raw text.

/// Whitespace skipped between code tokens.
#[inline]
pub fn is_white_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

#[inline]
pub fn is_line_break(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

#[inline]
pub fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
pub fn is_identifier_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub fn is_octal_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

#[inline]
pub fn is_binary_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

#[inline]
pub fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// `[gis]`.
#[inline]
pub fn is_regex_flag(b: u8) -> bool {
    matches!(b, b'g' | b'i' | b's')
}

/// Length in bytes of the UTF-8 sequence starting with `b`.
#[inline]
pub fn utf8_len(b: u8) -> usize {
    match b {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}
