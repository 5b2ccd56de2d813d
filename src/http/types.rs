//! Byte tables and small helpers shared by the codecs

// TO LOWER CASE

#[rustfmt::skip]
const ASCII_TABLE: [u8; 256] = [
    //   x0    x1    x2    x3    x4    x5    x6    x7    x8    x9    xA    xB    xC    xD    xE    xF
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, // 0x
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E, 0x1F, // 1x
    0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x2B, 0x2C, 0x2D, 0x2E, 0x2F, // 2x
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x3B, 0x3C, 0x3D, 0x3E, 0x3F, // 3x
    0x40, b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j', b'k', b'l', b'm', b'n', b'o', // 4x
    b'p', b'q', b'r', b's', b't', b'u', b'v', b'w', b'x', b'y', b'z', 0x5B, 0x5C, 0x5D, 0x5E, 0x5F, // 5x
    0x60, b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j', b'k', b'l', b'm', b'n', b'o', // 6x
    b'p', b'q', b'r', b's', b't', b'u', b'v', b'w', b'x', b'y', b'z', 0x7B, 0x7C, 0x7D, 0x7E, 0x7F, // 7x
    0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x8D, 0x8E, 0x8F, // 8x
    0x90, 0x91, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0x9B, 0x9C, 0x9D, 0x9E, 0x9F, // 9x
    0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, // Ax
    0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xBB, 0xBC, 0xBD, 0xBE, 0xBF, // Bx
    0xC0, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xCB, 0xCC, 0xCD, 0xCE, 0xCF, // Cx
    0xD0, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xDB, 0xDC, 0xDD, 0xDE, 0xDF, // Dx
    0xE0, 0xE1, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xEB, 0xEC, 0xED, 0xEE, 0xEF, // Ex
    0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF, // Fx
];

#[inline(always)]
pub(crate) fn to_lower_case(src: &mut [u8]) {
    for byte in src.iter_mut() {
        *byte = ASCII_TABLE[*byte as usize];
    }
}

// HEX

pub(crate) const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Value of an ASCII hex digit, `0xFF` for anything else.
#[rustfmt::skip]
const HEX_TABLE: [u8; 256] = {
    let mut table = [0xFF; 256];
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < 6 {
        table[b'a' as usize + i] = 10 + i as u8;
        table[b'A' as usize + i] = 10 + i as u8;
        i += 1;
    }
    table
};

#[inline(always)]
pub(crate) const fn hex_value(byte: u8) -> Option<u8> {
    match HEX_TABLE[byte as usize] {
        0xFF => None,
        value => Some(value),
    }
}

/// Decodes the two hex digits following a `%` at `src[i]`, if both are valid.
#[inline(always)]
pub(crate) fn hex_pair(src: &[u8], i: usize) -> Option<u8> {
    match (src.get(i + 1), src.get(i + 2)) {
        (Some(&hi), Some(&lo)) => Some(hex_value(hi)? << 4 | hex_value(lo)?),
        _ => None,
    }
}

// NUMBERS

#[inline(always)]
pub(crate) fn slice_to_u64(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;

    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return None;
        }

        result = result
            .checked_mul(10)?
            .checked_add((byte - b'0') as u64)?;
    }

    Some(result)
}

/// Signed base-10 integer with an optional leading `+` or `-`.
pub(crate) fn slice_to_i64(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, bytes),
    };
    let value = slice_to_u64(digits)?;

    match negative {
        true if value == i64::MIN.unsigned_abs() => Some(i64::MIN),
        true => i64::try_from(value).ok().map(|v| -v),
        false => i64::try_from(value).ok(),
    }
}

/// Non-negative decimal float: digits, one optional fraction and an optional exponent.
pub(crate) fn slice_to_ufloat(bytes: &[u8]) -> Option<f64> {
    let starts_with_number = matches!(bytes.first(), Some(b'0'..=b'9' | b'.'));
    let allowed = bytes
        .iter()
        .all(|&b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !starts_with_number || !allowed {
        return None;
    }

    let text = simdutf8::basic::from_utf8(bytes).ok()?;
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

// WHITESPACE

#[inline(always)]
pub(crate) fn trim_whitespace(mut src: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = src {
        match first.is_ascii_whitespace() {
            true => src = rest,
            false => break,
        }
    }
    while let [rest @ .., last] = src {
        match last.is_ascii_whitespace() {
            true => src = rest,
            false => break,
        }
    }
    src
}

#[inline(always)]
pub(crate) fn has_control_bytes(src: &[u8]) -> bool {
    src.iter().any(|&b| b < 0x20 || b == 0x7F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_case() {
        let mut value = *b"FooBar.COM:8080";
        to_lower_case(&mut value);
        assert_eq!(&value, b"foobar.com:8080");
    }

    #[test]
    fn hex() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'f'), Some(15));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);

        assert_eq!(hex_pair(b"%2f", 0), Some(0x2F));
        assert_eq!(hex_pair(b"%2", 0), None);
        assert_eq!(hex_pair(b"%zz", 0), None);
    }

    #[test]
    fn numbers() {
        #[rustfmt::skip]
        let cases: [(&[u8], Option<u64>); 6] = [
            (b"0", Some(0)),
            (b"1234", Some(1234)),
            (b"18446744073709551615", Some(u64::MAX)),
            (b"18446744073709551616", None),
            (b"", None),
            (b"12a", None),
        ];
        for (input, expected) in cases {
            assert_eq!(slice_to_u64(input), expected);
        }

        assert_eq!(slice_to_i64(b"-150"), Some(-150));
        assert_eq!(slice_to_i64(b"+7"), Some(7));
        assert_eq!(slice_to_i64(b"-9223372036854775808"), Some(i64::MIN));
        assert_eq!(slice_to_i64(b"-"), None);
        assert_eq!(slice_to_i64(b"foobar"), None);

        assert_eq!(slice_to_ufloat(b"123.456"), Some(123.456));
        assert_eq!(slice_to_ufloat(b"1e3"), Some(1000.0));
        assert_eq!(slice_to_ufloat(b".5"), Some(0.5));
        assert_eq!(slice_to_ufloat(b"-1.5"), None);
        assert_eq!(slice_to_ufloat(b"inf"), None);
        assert_eq!(slice_to_ufloat(b"1.2.3"), None);
    }

    #[test]
    fn whitespace() {
        assert_eq!(trim_whitespace(b"  foo=bar \t"), b"foo=bar");
        assert_eq!(trim_whitespace(b"   "), b"");
        assert_eq!(trim_whitespace(b""), b"");
        assert!(has_control_bytes(b"a\nb"));
        assert!(!has_control_bytes(b"/a b"));
    }
}
