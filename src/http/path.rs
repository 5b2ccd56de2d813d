//! Canonical form of URI paths
//!
//! [`PathNormalizer`] resolves `.` and `..` segments, collapses duplicate
//! slashes and uppercases the hex digits of `%XX` escapes. Escapes are never
//! decoded, so `%2F` stays an encoded slash inside its segment. The result
//! always starts with `/` and normalizing it again changes nothing.

use crate::http::types::hex_pair;
use memchr::{memchr, memrchr};

/// Dot-segment and duplicate-slash resolution.
///
/// # Examples
/// ```
/// use maker_wire::PathNormalizer;
///
/// assert_eq!(PathNormalizer::normalize(b""), b"/");
/// assert_eq!(PathNormalizer::normalize(b"a//b/./c/"), b"/a/b/c/");
/// assert_eq!(PathNormalizer::normalize(b"/a/b/../../c/d"), b"/c/d");
/// assert_eq!(PathNormalizer::normalize(b"/../x"), b"/x");
/// assert_eq!(PathNormalizer::normalize(b"/a%2fb"), b"/a%2Fb");
/// ```
pub struct PathNormalizer;

impl PathNormalizer {
    /// Returns the canonical form of `src`.
    pub fn normalize(src: &[u8]) -> Vec<u8> {
        let mut dst = Vec::with_capacity(src.len() + 1);
        Self::normalize_into(&mut dst, src);
        dst
    }

    /// Appends the canonical form of `src` to `dst`.
    ///
    /// Bytes already in `dst` are left alone; `..` never climbs above the
    /// `/` written by this call.
    pub fn normalize_into(dst: &mut Vec<u8>, src: &[u8]) {
        let root = dst.len();
        dst.push(b'/');

        // Last token was `.` or `..`
        let mut directory = false;

        let mut rest = src;
        while !rest.is_empty() {
            let end = memchr(b'/', rest).unwrap_or(rest.len());
            let segment = &rest[..end];
            rest = rest.get(end + 1..).unwrap_or_default();

            match segment {
                b"" => continue,
                b"." => directory = true,
                b".." => {
                    // `dst[root]` is always `/`, so there is a match
                    let last = memrchr(b'/', &dst[root..]).unwrap_or(0);
                    dst.truncate(root + last.max(1));
                    directory = true;
                }
                _ => {
                    if dst.len() > root + 1 {
                        dst.push(b'/');
                    }
                    Self::push_segment(dst, segment);
                    directory = false;
                }
            }
        }

        if (directory || src.ends_with(b"/")) && dst.len() > root + 1 {
            dst.push(b'/');
        }
    }

    /// Copies a segment, uppercasing the hex digits of valid escapes.
    fn push_segment(dst: &mut Vec<u8>, segment: &[u8]) {
        let mut rest = segment;

        while let Some(pos) = memchr(b'%', rest) {
            dst.extend_from_slice(&rest[..pos]);
            match hex_pair(rest, pos) {
                Some(_) => {
                    dst.extend_from_slice(&[
                        b'%',
                        rest[pos + 1].to_ascii_uppercase(),
                        rest[pos + 2].to_ascii_uppercase(),
                    ]);
                    rest = &rest[pos + 3..];
                }
                None => {
                    dst.push(b'%');
                    rest = &rest[pos + 1..];
                }
            }
        }

        dst.extend_from_slice(rest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::*;

    #[test]
    fn basic() {
        #[rustfmt::skip]
        let cases = [
            ("", "/"),
            ("/", "/"),
            ("a/b", "/a/b"),
            ("/aa//bb", "/aa/bb"),
            ("/a/b//", "/a/b/"),
            ("//", "/"),
            ("/a/b/../../c/d", "/c/d"),
            ("/a/b/../../c", "/c"),
            ("/a/..", "/"),
            ("/a/.", "/a/"),
            ("/a/./b", "/a/b"),
            ("/a/../", "/"),
            ("/..", "/"),
            ("/../../a", "/a"),
            ("/a/..b", "/a/..b"),
            ("/a/.b/", "/a/.b/"),
            ("/a/b/c/../../../../..e", "/..e"),
            ("/a/b/c/d/../../e", "/a/b/e"),
            ("/x/y/..", "/x/"),
            ("/a/..b/c/..", "/a/..b/"),
            ("/a/../../..b/c/..", "/..b/"),
        ];

        for (src, expected) in cases {
            let normalized = PathNormalizer::normalize(src.as_bytes());
            assert_eq!(str_op(&normalized), expected, "{src:?}");
        }
    }

    #[test]
    fn escapes() {
        #[rustfmt::skip]
        let cases: [(&[u8], &[u8]); 6] = [
            (b"/a%2fb", b"/a%2Fb"),
            (b"/a/b%c0%afc", b"/a/b%C0%AFc"),
            (b"/100%", b"/100%"),
            (b"/%zz/%a", b"/%zz/%a"),
            (b"/%2e%2E", b"/%2E%2E"),
            (b"/\xC0\xAF/x", b"/\xC0\xAF/x"),
        ];

        for (src, expected) in cases {
            assert_eq!(PathNormalizer::normalize(src), expected);
        }
    }

    #[test]
    fn idempotent() {
        let cases = [
            "",
            "a/b/..",
            "/a/./b/../../../c//d/.",
            "/a%2f%c0/b/",
            "/.../..../.",
            "/%/%%/%2",
            "/x/..y/../z/",
        ];

        for src in cases {
            let once = PathNormalizer::normalize(src.as_bytes());
            let twice = PathNormalizer::normalize(&once);
            assert_eq!(once, twice, "{src:?}");
        }
    }

    #[test]
    fn into_existing_buffer() {
        let mut dst = b"http://host".to_vec();
        PathNormalizer::normalize_into(&mut dst, b"/../../a/./b");
        assert_eq!(str_op(&dst), "http://host/a/b");
    }
}
