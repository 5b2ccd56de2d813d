//! Zero-copy splitter for `key=value` pair lists.
//!
//! Query strings, form bodies and `Cookie:` headers share one shape: pairs
//! separated by a delimiter byte, key and value split on the first `=`.
//! [`Query`] walks such input without decoding or allocating and hands each
//! pair to a [`QueryCollector`]. [`Args`](crate::Args) is one such collector;
//! it copies and percent-decodes what it receives.

use crate::{errors::Error, http::types::trim_whitespace};
use memchr::memchr;

/// Zero-copy query string splitter.
///
/// Empty segments (`&&`, leading or trailing `&`) are skipped. A segment
/// without `=` is reported with no value, which is different from an empty
/// value (`key=`).
///
/// # Examples
/// ```rust
/// use maker_wire::query::Query;
///
/// // Parse into Vec (preserves order)
/// let query = b"name=john&age=25&city";
/// let vec_params: Vec<(&[u8], &[u8])> = Query::parse(query, 10).unwrap();
/// assert_eq!(vec_params.len(), 3);
///
/// // Keep the difference between `city` and `city=`
/// let raw: Vec<(&[u8], Option<&[u8]>)> = Query::parse(query, 10).unwrap();
/// assert_eq!(raw[2], (&b"city"[..], None));
///
/// // Handle limits
/// let result = Query::parse::<Vec<(&[u8], &[u8])>>(b"a=1&b=2", 1);
/// assert!(result.is_err()); // Exceeds limit of 1 parameter
/// ```
pub struct Query;

impl Query {
    /// Parses a query string into a new collection.
    ///
    /// # Type Parameters
    /// - `C`: Collection type implementing [QueryCollector]
    ///
    /// # Arguments
    /// - `query`: Raw bytes of the query string
    ///   (handles optional leading `?` automatically, so `?a=1` and `a=1` are equivalent)
    /// - `limit`: Maximum number of parameters to parse
    #[inline(always)]
    pub fn parse<'a, C: QueryCollector<'a>>(query: &'a [u8], limit: usize) -> Result<C, Error> {
        let data = match query.first() {
            Some(b'?') => &query[1..],
            _ => query,
        };

        let mut result = C::with_capacity(limit.min(16));
        Self::parse_into(&mut result, data, limit)?;
        Ok(result)
    }

    /// Parses a query string into an existing collection.
    ///
    /// Parameters are appended; the collection is not cleared first. The
    /// limit counts what the collection already holds. Unlike
    /// [`parse`](Query::parse), a leading `?` is part of the first key.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::query::Query;
    ///
    /// let mut collector: Vec<(&[u8], &[u8])> = Vec::new();
    ///
    /// Query::parse_into(&mut collector, b"a=1&b=2", 10).unwrap();
    /// Query::parse_into(&mut collector, b"c=3&&d=4", 10).unwrap();
    /// assert_eq!(collector.len(), 4);
    ///
    /// // No decoding happens here
    /// let mut collector: Vec<(&[u8], &[u8])> = Vec::new();
    /// Query::parse_into(&mut collector, b"email=user%40example.com", 10).unwrap();
    /// assert_eq!(collector[0].1, b"user%40example.com");
    ///
    /// let mut collector: Vec<(&[u8], &[u8])> = Vec::new();
    /// Query::parse_into(&mut collector, b"?a=1", 10).unwrap();
    /// assert_eq!(collector[0].0, b"?a");
    /// ```
    #[inline]
    pub fn parse_into<'a, C: QueryCollector<'a>>(
        result: &mut C,
        query: &'a [u8],
        limit: usize,
    ) -> Result<(), Error> {
        Self::split_into(result, query, b'&', false, limit)
    }

    /// Splits `data` on `separator` and feeds each non-empty segment to `result`.
    ///
    /// With `trim` set, whitespace around each segment, key and value is
    /// dropped (`Cookie:` header rules).
    pub(crate) fn split_into<'a, C: QueryCollector<'a>>(
        result: &mut C,
        data: &'a [u8],
        separator: u8,
        trim: bool,
        limit: usize,
    ) -> Result<(), Error> {
        let mut start = 0;
        while start < data.len() {
            // Find next separator or end of string
            let end = memchr(separator, &data[start..])
                .map(|pos| start + pos)
                .unwrap_or(data.len());

            let mut segment = &data[start..end];
            start = end + 1;

            if trim {
                segment = trim_whitespace(segment);
            }
            if segment.is_empty() {
                continue;
            }
            if result.length() >= limit {
                return Err(Error::TooManyArgs(limit));
            }

            match memchr(b'=', segment) {
                Some(index) => {
                    let (mut key, mut value) = (&segment[..index], &segment[index + 1..]);
                    if trim {
                        key = trim_whitespace(key);
                        value = trim_whitespace(value);
                    }
                    result.add_param(key, Some(value));
                }
                None => result.add_param(segment, None),
            }
        }

        Ok(())
    }
}

/// A trait for types that can collect parsed query parameters.
///
/// # Lifetime
/// - `'a`: The lifetime of the input query string bytes
///
/// # Examples
/// ```rust
/// use maker_wire::query::{Query, QueryCollector};
///
/// struct Keys(Vec<String>);
///
/// impl<'a> QueryCollector<'a> for Keys {
///     fn add_param(&mut self, key: &'a [u8], _: Option<&'a [u8]>) {
///         self.0.push(String::from_utf8_lossy(key).to_string());
///     }
///
///     fn length(&self) -> usize {
///         self.0.len()
///     }
///
///     fn with_capacity(capacity: usize) -> Self {
///         Keys(Vec::with_capacity(capacity))
///     }
/// }
///
/// let keys: Keys = Query::parse(b"a=1&b&c=", 8).unwrap();
/// assert_eq!(keys.0, ["a", "b", "c"]);
/// ```
pub trait QueryCollector<'a>
where
    Self: Sized,
{
    /// Adds a parsed parameter to the collection.
    ///
    /// # Arguments
    /// - `key`: The parameter name as bytes
    /// - `value`: `None` for a bare key, `Some` (possibly empty) after `=`
    fn add_param(&mut self, key: &'a [u8], value: Option<&'a [u8]>);

    /// Returns the current number of parameters in the collection.
    fn length(&self) -> usize;

    /// Creates a new collection with the specified capacity.
    fn with_capacity(capacity: usize) -> Self;
}

// Implementation for Vec - preserves parameter order, bare keys read as empty
impl<'a> QueryCollector<'a> for Vec<(&'a [u8], &'a [u8])> {
    #[inline(always)]
    fn add_param(&mut self, key: &'a [u8], value: Option<&'a [u8]>) {
        self.push((key, value.unwrap_or_default()));
    }

    #[inline(always)]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }
}

// Implementation for Vec - preserves parameter order and bare keys
impl<'a> QueryCollector<'a> for Vec<(&'a [u8], Option<&'a [u8]>)> {
    #[inline(always)]
    fn add_param(&mut self, key: &'a [u8], value: Option<&'a [u8]>) {
        self.push((key, value));
    }

    #[inline(always)]
    fn length(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::*;

    #[test]
    fn basic() {
        let cases = ["a=1&b=2", "?a=1&b=2", "&&a=1&&b=2&"];

        for line in cases {
            let params: Vec<(&[u8], &[u8])> = Query::parse(line.as_bytes(), 8).unwrap();

            assert_eq!(params.len(), 2);
            assert_eq!(str_2(params[0]), ("a", "1"));
            assert_eq!(str_2(params[1]), ("b", "2"));
        }
    }

    #[test]
    fn full() {
        let line = b"flag&empty=&=val&&key=value&===";
        let params: Vec<(&[u8], Option<&[u8]>)> = Query::parse(line, 10).unwrap();

        assert_eq!(params.len(), 5);
        assert_eq!(params[0], (&b"flag"[..], None));
        assert_eq!(params[1], (&b"empty"[..], Some(&b""[..])));
        assert_eq!(params[2], (&b""[..], Some(&b"val"[..])));
        assert_eq!(params[3], (&b"key"[..], Some(&b"value"[..])));
        assert_eq!(params[4], (&b""[..], Some(&b"=="[..])));
    }

    #[test]
    fn empty() {
        for line in ["", "?", "&&&", "?&"] {
            let params: Vec<(&[u8], &[u8])> = Query::parse(line.as_bytes(), 10).unwrap();
            assert!(params.is_empty(), "{line:?}");
        }
    }

    #[test]
    fn trimmed() {
        let mut params: Vec<(&[u8], &[u8])> = Vec::new();
        Query::split_into(&mut params, b"  foo=bar;  aaa = bbb  ;;", b';', true, 10).unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(str_2(params[0]), ("foo", "bar"));
        assert_eq!(str_2(params[1]), ("aaa", "bbb"));
    }

    #[test]
    fn question_mark_only_stripped_by_parse() {
        let params: Vec<(&[u8], &[u8])> = Query::parse(b"??a=1", 8).unwrap();
        assert_eq!(str_2(params[0]), ("?a", "1"));

        let mut params: Vec<(&[u8], &[u8])> = Vec::new();
        Query::parse_into(&mut params, b"?a=1&b", 8).unwrap();
        assert_eq!(str_2(params[0]), ("?a", "1"));
        assert_eq!(str_2(params[1]), ("b", ""));
    }

    #[test]
    fn limit_error() {
        assert_eq!(
            Query::parse::<Vec<(&[u8], &[u8])>>(b"a&a", 1),
            Err(Error::TooManyArgs(1))
        );
        // Skipped segments do not count
        assert!(Query::parse::<Vec<(&[u8], &[u8])>>(b"a&&&", 1).is_ok());
    }
}
