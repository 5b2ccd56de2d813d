//! Ordered multimap of query or form arguments

use crate::{
    errors::{Error, Result},
    http::{
        percent::{EncodeSet, PercentCodec},
        query::{Query, QueryCollector},
        types::{slice_to_u64, slice_to_ufloat},
        write::{write_all, WriteBuffer},
    },
    limits::ArgsLimits,
    log,
};
use std::{cmp::Ordering, fmt, io};

/// Ordered `key=value` pairs of a query string or an
/// `application/x-www-form-urlencoded` body.
///
/// Keys are not unique: duplicates keep their insertion order. A pair can
/// be a bare key (`debug`, added by [`add_no_value`](Args::add_no_value) or
/// parsed from a segment without `=`), which is not the same as an empty
/// value (`debug=`). Keys and values are stored decoded and encoded again
/// on output.
///
/// # Examples
/// ```
/// use maker_wire::Args;
///
/// let mut args = Args::new();
/// args.parse("foo=bar&baz&foo=qux%20quux");
///
/// assert_eq!(args.peek("foo"), b"bar");
/// assert_eq!(args.peek_multi("foo"), [b"bar".to_vec(), b"qux quux".to_vec()]);
/// assert!(args.has("baz"));
/// assert_eq!(args.peek("baz"), b"");
///
/// args.add("name", "John Smith");
/// assert_eq!(args.string(), "foo=bar&baz&foo=qux+quux&name=John+Smith");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: Vec<u8>,
    value: Vec<u8>,
    no_value: bool,
}

impl Entry {
    fn new(key: &[u8], value: Option<&[u8]>) -> Self {
        Self {
            key: key.to_vec(),
            value: value.unwrap_or_default().to_vec(),
            no_value: value.is_none(),
        }
    }

    #[inline(always)]
    fn value(&self) -> Option<&[u8]> {
        match self.no_value {
            true => None,
            false => Some(&self.value),
        }
    }
}

impl Args {
    /// Creates empty arguments.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of pairs, bare keys included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every pair.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Replaces the contents with the pairs parsed from `src`.
    ///
    /// Splits on `&`, then on the first `=` of each segment, and
    /// percent-decodes both sides (`+` is a space). Empty segments are
    /// skipped. A leading `?` is kept as part of the first key. Never fails.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::Args;
    ///
    /// let mut args = Args::new();
    /// args.parse("&&&foo&&&bar=%41+b&&");
    ///
    /// assert_eq!(args.len(), 2);
    /// assert_eq!(args.peek("bar"), b"A b");
    /// ```
    #[inline]
    pub fn parse(&mut self, src: impl AsRef<[u8]>) {
        self.parse_bytes(src.as_ref());
    }

    /// Same as [`parse`](Args::parse) for raw bytes.
    pub fn parse_bytes(&mut self, src: &[u8]) {
        self.reset();
        // No limit, cannot fail
        let _ = Query::parse_into(self, src, usize::MAX);
    }

    /// Parses `src` like [`parse`](Args::parse) but refuses input above `limits`.
    ///
    /// Pairs found before the pair limit was hit are kept.
    ///
    /// # Errors
    /// - [`Error::ArgsTooLong`] if `src` is longer than `limits.max_len`
    /// - [`Error::TooManyArgs`] if it holds more than `limits.max_pairs` pairs
    pub fn parse_with_limits(&mut self, src: impl AsRef<[u8]>, limits: &ArgsLimits) -> Result<()> {
        let src = src.as_ref();
        self.reset();

        if src.len() > limits.max_len {
            log::warning!("query string of {} bytes rejected", src.len());
            return Err(Error::ArgsTooLong(limits.max_len));
        }

        Query::parse_into(self, src, limits.max_pairs).map_err(|err| {
            log::warning!("query string parsing stopped: {err}");
            err
        })
    }

    /// Appends a pair. Existing pairs with the same key are kept.
    #[inline]
    pub fn add(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.entries
            .push(Entry::new(key.as_ref(), Some(value.as_ref())));
    }

    /// Appends a bare key, serialized without `=`.
    #[inline]
    pub fn add_no_value(&mut self, key: impl AsRef<[u8]>) {
        self.entries.push(Entry::new(key.as_ref(), None));
    }

    /// Appends a pair with a decimal value.
    #[inline]
    pub fn add_uint(&mut self, key: impl AsRef<[u8]>, value: u64) {
        let mut buffer = Vec::new();
        value.write_to(&mut buffer);
        self.add(key, buffer);
    }

    /// Overwrites the value of the first pair with `key`, keeping its
    /// position, or appends a new pair.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::Args;
    ///
    /// let mut args = Args::new();
    /// args.parse("foo=bar&baz&foo=2");
    /// args.set("foo", "1");
    /// args.set("new", "");
    ///
    /// assert_eq!(args.string(), "foo=1&baz&foo=2&new=");
    /// ```
    #[inline]
    pub fn set(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.set_entry(key.as_ref(), Some(value.as_ref()));
    }

    /// Turns the first pair with `key` into a bare key, or appends one.
    #[inline]
    pub fn set_no_value(&mut self, key: impl AsRef<[u8]>) {
        self.set_entry(key.as_ref(), None);
    }

    /// Sets a decimal value, see [`set`](Args::set).
    #[inline]
    pub fn set_uint(&mut self, key: impl AsRef<[u8]>, value: u64) {
        let mut buffer = Vec::new();
        value.write_to(&mut buffer);
        self.set(key, buffer);
    }

    fn set_entry(&mut self, key: &[u8], value: Option<&[u8]>) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.value.clear();
                entry.value.extend_from_slice(value.unwrap_or_default());
                entry.no_value = value.is_none();
            }
            None => self.entries.push(Entry::new(key, value)),
        }
    }

    /// Removes every pair with `key`.
    #[inline]
    pub fn del(&mut self, key: impl AsRef<[u8]>) {
        let key = key.as_ref();
        self.entries.retain(|entry| entry.key != key);
    }

    /// Returns the first value for `key`.
    ///
    /// Empty if the key is absent or is a bare key; use [`has`](Args::has)
    /// to tell those cases apart.
    #[inline]
    pub fn peek(&self, key: impl AsRef<[u8]>) -> &[u8] {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map_or(&[][..], |entry| entry.value.as_slice())
    }

    /// [`peek`](Args::peek) as text, `None` if the key is absent or the
    /// value is not valid UTF-8.
    #[inline]
    pub fn peek_str(&self, key: impl AsRef<[u8]>) -> Option<&str> {
        let key = key.as_ref();
        let entry = self.entries.iter().find(|entry| entry.key == key)?;
        simdutf8::basic::from_utf8(&entry.value).ok()
    }

    /// Returns owned copies of every value for `key`, in insertion order.
    ///
    /// The result is empty if the key is absent.
    pub fn peek_multi(&self, key: impl AsRef<[u8]>) -> Vec<Vec<u8>> {
        let key = key.as_ref();
        self.entries
            .iter()
            .filter(|entry| entry.key == key)
            .map(|entry| entry.value.clone())
            .collect()
    }

    #[inline]
    pub fn has(&self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Iterates over all pairs in order. Bare keys yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], Option<&[u8]>)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_slice(), entry.value()))
    }

    /// Calls `f` for every pair in order. Bare keys are visited with an
    /// empty value.
    pub fn visit_all<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &[u8]),
    {
        for entry in &self.entries {
            f(&entry.key, &entry.value);
        }
    }

    /// Overwrites `dst` with a deep copy of these pairs.
    #[inline]
    pub fn copy_to(&self, dst: &mut Args) {
        dst.entries.clone_from(&self.entries);
    }

    /// Stable sort of the pairs by key.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::Args;
    ///
    /// let mut args = Args::new();
    /// args.parse("d=c&b=a&a=f&b=b&f=z");
    /// args.sort(|a, b| a.cmp(b));
    ///
    /// assert_eq!(args.string(), "a=f&b=a&b=b&d=c&f=z");
    /// ```
    pub fn sort<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.entries.sort_by(|a, b| cmp(&a.key, &b.key));
    }

    // TYPED GETTERS

    /// Returns the first value for `key` as a non-negative integer.
    ///
    /// # Errors
    /// [`Error::NumericFormat`] if the key is absent or the value holds
    /// anything but base-10 digits.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::{Args, Error};
    ///
    /// let mut args = Args::new();
    /// args.parse("page=12&size=-1");
    ///
    /// assert_eq!(args.get_uint("page"), Ok(12));
    /// assert_eq!(args.get_uint("size"), Err(Error::NumericFormat));
    /// assert_eq!(args.get_uint("missing"), Err(Error::NumericFormat));
    /// ```
    pub fn get_uint(&self, key: impl AsRef<[u8]>) -> Result<u64> {
        slice_to_u64(self.peek(key)).ok_or(Error::NumericFormat)
    }

    /// [`get_uint`](Args::get_uint) with `0` on failure.
    #[inline]
    pub fn get_uint_or_zero(&self, key: impl AsRef<[u8]>) -> u64 {
        self.get_uint(key).unwrap_or(0)
    }

    /// Returns the first value for `key` as a non-negative float.
    ///
    /// # Errors
    /// [`Error::NumericFormat`] if the key is absent or the value is not a
    /// plain decimal number.
    pub fn get_ufloat(&self, key: impl AsRef<[u8]>) -> Result<f64> {
        slice_to_ufloat(self.peek(key)).ok_or(Error::NumericFormat)
    }

    /// [`get_ufloat`](Args::get_ufloat) with `0.0` on failure.
    #[inline]
    pub fn get_ufloat_or_zero(&self, key: impl AsRef<[u8]>) -> f64 {
        self.get_ufloat(key).unwrap_or(0.0)
    }

    /// `true` for `1`, `true` or `yes` (any case), or for a bare key.
    ///
    /// Everything else, absence included, is `false`.
    pub fn get_bool(&self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        let Some(entry) = self.entries.iter().find(|entry| entry.key == key) else {
            return false;
        };

        match entry.value() {
            None => true,
            Some(value) => [&b"1"[..], b"true", b"yes"]
                .iter()
                .any(|truth| value.eq_ignore_ascii_case(truth)),
        }
    }

    // SERIALIZATION

    /// Encoded query string, e.g. `k1=v1&k2=v2&bare`.
    #[inline]
    pub fn query_string(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        WriteBuffer::write_to(self, &mut buffer);
        buffer
    }

    /// [`query_string`](Args::query_string) as text.
    #[inline]
    pub fn string(&self) -> String {
        self.to_string()
    }

    /// Appends the encoded query string to `dst`.
    #[inline]
    pub fn append_bytes(&self, dst: &mut Vec<u8>) {
        WriteBuffer::write_to(self, dst);
    }

    /// Writes the encoded query string to `writer`, returning the byte count.
    #[inline]
    pub fn write_to<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        write_all(self, writer)
    }
}

impl WriteBuffer for Args {
    fn write_to(&self, buffer: &mut Vec<u8>) {
        let mut first = true;

        for entry in &self.entries {
            // Would vanish as an empty segment on the next parse
            if entry.no_value && entry.key.is_empty() {
                continue;
            }
            if !first {
                buffer.push(b'&');
            }
            first = false;

            PercentCodec::encode_into(buffer, &entry.key, &EncodeSet::QUERY);
            if !entry.no_value {
                buffer.push(b'=');
                PercentCodec::encode_into(buffer, &entry.value, &EncodeSet::QUERY);
            }
        }
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = Vec::new();
        WriteBuffer::write_to(self, &mut buffer);
        // Encoded output is ASCII
        f.write_str(&String::from_utf8_lossy(&buffer))
    }
}

// Decoding collector used by `parse`
impl<'a> QueryCollector<'a> for Args {
    fn add_param(&mut self, key: &'a [u8], value: Option<&'a [u8]>) {
        let mut entry = Entry {
            key: Vec::with_capacity(key.len()),
            value: Vec::new(),
            no_value: value.is_none(),
        };
        PercentCodec::decode_into(&mut entry.key, key, true);
        if let Some(value) = value {
            entry.value.reserve(value.len());
            PercentCodec::decode_into(&mut entry.value, value, true);
        }
        self.entries.push(entry);
    }

    #[inline(always)]
    fn length(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }
}
