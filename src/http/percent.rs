//! Percent-encoding and decoding of URI components
//!
//! Every component of a URI tolerates a different set of raw bytes. Each set
//! is described by an [`EncodeSet`]: a lookup table of bytes that pass through
//! untouched, everything else is written as `%XX` with uppercase hex digits.
//!
//! Decoding never fails: an escape that is not followed by two hex digits is
//! copied literally.
//!
//! # Examples
//! ```
//! use maker_wire::percent::{EncodeSet, PercentCodec};
//!
//! let encoded = PercentCodec::encode(b"a b&c", &EncodeSet::QUERY);
//! assert_eq!(encoded, b"a+b%26c");
//!
//! let decoded = PercentCodec::decode(&encoded, true);
//! assert_eq!(decoded, b"a b&c");
//! ```

use crate::http::types::{hex_pair, HEX_UPPER};

/// Bytes allowed to appear unescaped in a URI component.
#[derive(Debug, Clone)]
pub struct EncodeSet {
    allowed: [bool; 256],
    space_as_plus: bool,
}

const UNRESERVED_EXTRA: &[u8] = b"-._~";
const SUB_DELIMS: &[u8] = b"!$&'()*+,;=";

const fn table(groups: &[&[u8]]) -> [bool; 256] {
    let mut allowed = [false; 256];

    let mut byte = 0;
    while byte < 256 {
        allowed[byte] = (byte as u8).is_ascii_alphanumeric();
        byte += 1;
    }

    let mut g = 0;
    while g < groups.len() {
        let mut i = 0;
        while i < groups[g].len() {
            allowed[groups[g][i] as usize] = true;
            i += 1;
        }
        g += 1;
    }

    allowed
}

impl EncodeSet {
    /// Query keys and values (`application/x-www-form-urlencoded`).
    ///
    /// Only unreserved bytes survive, so `&`, `=` and `+` are always escaped.
    /// A space becomes `+`.
    pub const QUERY: EncodeSet = EncodeSet {
        allowed: table(&[UNRESERVED_EXTRA]),
        space_as_plus: true,
    };

    /// Path of a URI. Keeps `/`, existing `%XX` escapes and the path
    /// sub-delimiters, escapes `?` and `#`.
    pub const PATH: EncodeSet = EncodeSet {
        allowed: table(&[UNRESERVED_EXTRA, SUB_DELIMS, b":@/%"]),
        space_as_plus: false,
    };

    /// Username or password of a URI. `:` and `@` are escaped.
    pub const USERINFO: EncodeSet = EncodeSet {
        allowed: table(&[UNRESERVED_EXTRA, SUB_DELIMS, b"%"]),
        space_as_plus: false,
    };

    /// Fragment of a URI.
    pub const FRAGMENT: EncodeSet = EncodeSet {
        allowed: table(&[UNRESERVED_EXTRA, SUB_DELIMS, b":@/?%"]),
        space_as_plus: false,
    };

    /// Returns `true` if `byte` is written as is.
    #[inline(always)]
    pub const fn contains(&self, byte: u8) -> bool {
        self.allowed[byte as usize]
    }
}

/// Stateless percent codec.
pub struct PercentCodec;

impl PercentCodec {
    /// Decodes `%XX` escapes in `src` into a new buffer.
    ///
    /// With `plus_as_space` set (query and form context) a `+` turns into a
    /// space. Path context must leave `+` alone.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::percent::PercentCodec;
    ///
    /// assert_eq!(PercentCodec::decode(b"a%20b+c", false), b"a b+c");
    /// assert_eq!(PercentCodec::decode(b"a%20b+c", true), b"a b c");
    /// // Broken escapes are kept
    /// assert_eq!(PercentCodec::decode(b"100%", true), b"100%");
    /// ```
    pub fn decode(src: &[u8], plus_as_space: bool) -> Vec<u8> {
        let mut dst = Vec::with_capacity(src.len());
        Self::decode_into(&mut dst, src, plus_as_space);
        dst
    }

    /// Appends the decoded form of `src` to `dst`.
    pub fn decode_into(dst: &mut Vec<u8>, src: &[u8], plus_as_space: bool) {
        let mut rest = src;

        loop {
            let next = match plus_as_space {
                true => memchr::memchr2(b'%', b'+', rest),
                false => memchr::memchr(b'%', rest),
            };
            let Some(pos) = next else {
                dst.extend_from_slice(rest);
                return;
            };

            dst.extend_from_slice(&rest[..pos]);
            match rest[pos] {
                b'+' => {
                    dst.push(b' ');
                    rest = &rest[pos + 1..];
                }
                _ => match hex_pair(rest, pos) {
                    Some(byte) => {
                        dst.push(byte);
                        rest = &rest[pos + 3..];
                    }
                    None => {
                        dst.push(b'%');
                        rest = &rest[pos + 1..];
                    }
                },
            }
        }
    }

    /// Percent-encodes every byte of `src` that `set` does not allow.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::percent::{EncodeSet, PercentCodec};
    ///
    /// assert_eq!(PercentCodec::encode(b"/a b/?", &EncodeSet::PATH), b"/a%20b/%3F");
    /// assert_eq!(PercentCodec::encode(b"k=v", &EncodeSet::QUERY), b"k%3Dv");
    /// ```
    pub fn encode(src: &[u8], set: &EncodeSet) -> Vec<u8> {
        let mut dst = Vec::with_capacity(src.len());
        Self::encode_into(&mut dst, src, set);
        dst
    }

    /// Appends the encoded form of `src` to `dst`.
    pub fn encode_into(dst: &mut Vec<u8>, src: &[u8], set: &EncodeSet) {
        for &byte in src {
            if set.contains(byte) {
                dst.push(byte);
            } else if byte == b' ' && set.space_as_plus {
                dst.push(b'+');
            } else {
                dst.extend_from_slice(&[
                    b'%',
                    HEX_UPPER[(byte >> 4) as usize],
                    HEX_UPPER[(byte & 0x0F) as usize],
                ]);
            }
        }
    }

    /// Returns `true` if encoding `src` with `set` would change it.
    #[inline]
    pub fn needs_encoding(src: &[u8], set: &EncodeSet) -> bool {
        src.iter().any(|&byte| !set.contains(byte))
    }
}
