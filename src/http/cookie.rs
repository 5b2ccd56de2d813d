//! `Cookie:` and `Set-Cookie:` header values
//!
//! [`Cookie`] is a single response cookie with its attributes. The request
//! side `Cookie:` header only carries `name=value` pairs; it is handled by
//! [`parse_request_cookie_pair`], [`visit_request_cookies`] and
//! [`append_request_cookies`] without building a [`Cookie`].

use crate::{
    errors::{Error, Result},
    http::{
        query::{Query, QueryCollector},
        types::{slice_to_i64, trim_whitespace},
        write::{write_all, WriteBuffer},
    },
    limits::CookieLimits,
    log,
};
use memchr::memchr;
use std::{fmt, io};
use time::{
    macros::{datetime, format_description},
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

/// Instant written for [`Expire::Delete`]: Tue, 10 Nov 2009 23:00:00 GMT.
pub const EXPIRE_DELETE: OffsetDateTime = datetime!(2009-11-10 23:00:00 UTC);

/// Expiration of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expire {
    /// No `Expires` attribute: a session cookie.
    #[default]
    Unlimited,
    /// Expired in the past, asks the client to drop the cookie.
    Delete,
    /// Expires at the given instant.
    At(OffsetDateTime),
}

impl Expire {
    /// The instant written to the wire, `None` for [`Expire::Unlimited`].
    #[inline]
    pub const fn instant(&self) -> Option<OffsetDateTime> {
        match self {
            Expire::Unlimited => None,
            Expire::Delete => Some(EXPIRE_DELETE),
            Expire::At(instant) => Some(*instant),
        }
    }
}

impl From<OffsetDateTime> for Expire {
    fn from(instant: OffsetDateTime) -> Self {
        match instant == EXPIRE_DELETE {
            true => Expire::Delete,
            false => Expire::At(instant),
        }
    }
}

/// The `SameSite` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SameSite {
    /// Attribute not written.
    #[default]
    Disabled,
    /// Bare `SameSite`, the browser picks the mode.
    Default,
    Lax,
    Strict,
    /// `SameSite=None`, only valid together with `Secure`.
    None,
}

impl SameSite {
    /// Case-insensitive `Lax`, `Strict` or `None`.
    ///
    /// # Examples
    /// ```
    /// use maker_wire::SameSite;
    ///
    /// assert_eq!(SameSite::parse(b"lax"), Some(SameSite::Lax));
    /// assert_eq!(SameSite::parse(b"NONE"), Some(SameSite::None));
    /// assert_eq!(SameSite::parse(b"sometimes"), None);
    /// ```
    pub fn parse(value: &[u8]) -> Option<SameSite> {
        [SameSite::Lax, SameSite::Strict, SameSite::None]
            .into_iter()
            .find(|mode| mode.as_str().as_bytes().eq_ignore_ascii_case(value))
    }

    /// Attribute value, empty for [`Disabled`](SameSite::Disabled) and
    /// [`Default`](SameSite::Default).
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SameSite::Disabled | SameSite::Default => "",
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

/// A response cookie, as found in one `Set-Cookie:` header.
///
/// Two attribute couplings hold at all times: `SameSite=None` turns on
/// `Secure`, and `Partitioned` turns on `Secure` and defaults the path to
/// `/`. Both happen in the setters.
///
/// # Examples
/// ```
/// use maker_wire::{Cookie, SameSite};
///
/// let mut cookie = Cookie::new();
/// cookie.set_key("session");
/// cookie.set_value("abc");
/// cookie.set_max_age(3600);
/// cookie.set_http_only(true);
/// cookie.set_same_site(SameSite::None);
///
/// assert!(cookie.secure());
/// assert_eq!(
///     cookie.to_string(),
///     "session=abc; Max-Age=3600; HttpOnly; Secure; SameSite=None"
/// );
///
/// let mut parsed = Cookie::new();
/// parsed.parse("foo=bar; Path=/; SameSite=None").unwrap();
/// assert!(parsed.secure());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookie {
    key: Vec<u8>,
    value: Vec<u8>,
    expire: Expire,
    max_age: i64,
    domain: Vec<u8>,
    path: Vec<u8>,

    http_only: bool,
    secure: bool,
    same_site: SameSite,
    partitioned: bool,
}

impl Cookie {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the zero value.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Overwrites `dst` with a copy of this cookie.
    #[inline]
    pub fn copy_to(&self, dst: &mut Cookie) {
        dst.clone_from(self);
    }

    #[inline]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    #[inline]
    pub fn set_key(&mut self, key: impl AsRef<[u8]>) {
        self.key.clear();
        self.key.extend_from_slice(key.as_ref());
    }

    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    #[inline]
    pub fn set_value(&mut self, value: impl AsRef<[u8]>) {
        self.value.clear();
        self.value.extend_from_slice(value.as_ref());
    }

    #[inline]
    pub fn expire(&self) -> Expire {
        self.expire
    }

    /// Sets the expiration. Only written when [`max_age`](Cookie::max_age) is `0`.
    #[inline]
    pub fn set_expire(&mut self, expire: impl Into<Expire>) {
        self.expire = expire.into();
    }

    /// Lifetime in seconds, `0` when unset.
    #[inline]
    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    #[inline]
    pub fn set_max_age(&mut self, seconds: i64) {
        self.max_age = seconds;
    }

    #[inline]
    pub fn domain(&self) -> &[u8] {
        &self.domain
    }

    #[inline]
    pub fn set_domain(&mut self, domain: impl AsRef<[u8]>) {
        self.domain.clear();
        self.domain.extend_from_slice(domain.as_ref());
    }

    #[inline]
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    #[inline]
    pub fn set_path(&mut self, path: impl AsRef<[u8]>) {
        self.path.clear();
        self.path.extend_from_slice(path.as_ref());
    }

    #[inline]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    #[inline]
    pub fn set_http_only(&mut self, http_only: bool) {
        self.http_only = http_only;
    }

    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    #[inline]
    pub fn set_secure(&mut self, secure: bool) {
        self.secure = secure;
    }

    #[inline]
    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    /// Sets `SameSite`. [`SameSite::None`] also sets `Secure`.
    #[inline]
    pub fn set_same_site(&mut self, mode: SameSite) {
        self.same_site = mode;
        if mode == SameSite::None {
            self.secure = true;
        }
    }

    #[inline]
    pub fn partitioned(&self) -> bool {
        self.partitioned
    }

    /// Sets `Partitioned`. Turning it on also sets `Secure` and, if the
    /// path is empty, sets it to `/`.
    pub fn set_partitioned(&mut self, partitioned: bool) {
        self.partitioned = partitioned;
        if partitioned {
            self.secure = true;
            if self.path.is_empty() {
                self.path.push(b'/');
            }
        }
    }

    /// Parses a `Set-Cookie:` header value.
    ///
    /// The first `;`-separated segment is `key=value` (`key` alone is a key
    /// with an empty value); the others are attributes matched case-insensitively.
    /// Unknown attributes are ignored and an `Expires` date in an unknown
    /// layout leaves the expiration unset. On error the cookie is left empty.
    ///
    /// # Errors
    /// - [`Error::NoCookie`] if the first segment is empty
    /// - [`Error::InvalidMaxAge`] if `Max-Age` is not an integer
    ///
    /// # Examples
    /// ```
    /// use maker_wire::{Cookie, Error, SameSite};
    ///
    /// let mut cookie = Cookie::new();
    /// cookie.parse("id=a3fWa; Domain=Example.com; path=/docs; httponly; SameSite").unwrap();
    ///
    /// assert_eq!(cookie.key(), b"id");
    /// assert_eq!(cookie.domain(), b"Example.com");
    /// assert_eq!(cookie.path(), b"/docs");
    /// assert!(cookie.http_only());
    /// assert_eq!(cookie.same_site(), SameSite::Default);
    ///
    /// assert_eq!(cookie.parse(";foo=bar"), Err(Error::NoCookie));
    /// assert_eq!(cookie.parse("foo=bar; max-age=soon"), Err(Error::InvalidMaxAge));
    /// ```
    pub fn parse(&mut self, src: impl AsRef<[u8]>) -> Result<()> {
        self.reset();
        let mut rest = src.as_ref();

        let first = trim_whitespace(next_segment(&mut rest));
        if first.is_empty() {
            return Err(Error::NoCookie);
        }
        let (key, value) = split_pair(first);
        self.key.extend_from_slice(key);
        self.value.extend_from_slice(unquote(value.unwrap_or_default()));

        while !rest.is_empty() {
            let segment = trim_whitespace(next_segment(&mut rest));
            if segment.is_empty() {
                continue;
            }
            let (name, value) = split_pair(segment);
            if let Err(err) = self.parse_attribute(name, value) {
                self.reset();
                return Err(err);
            }
        }

        Ok(())
    }

    fn parse_attribute(&mut self, name: &[u8], value: Option<&[u8]>) -> Result<()> {
        let is = |expected: &str| name.eq_ignore_ascii_case(expected.as_bytes());
        let text = value.unwrap_or_default();

        if is("expires") {
            match parse_http_date(text) {
                Some(instant) => self.set_expire(instant),
                None => {
                    log::debug!("unknown cookie date: {:?}", String::from_utf8_lossy(text));
                }
            }
        } else if is("max-age") {
            self.max_age = slice_to_i64(text).ok_or(Error::InvalidMaxAge)?;
        } else if is("domain") {
            self.set_domain(text);
        } else if is("path") {
            self.set_path(text);
        } else if is("httponly") {
            self.http_only = true;
        } else if is("secure") {
            self.secure = true;
        } else if is("samesite") {
            match text.is_empty() {
                true => self.set_same_site(SameSite::Default),
                false => {
                    if let Some(mode) = SameSite::parse(text) {
                        self.set_same_site(mode);
                    }
                }
            }
        } else if is("partitioned") {
            self.set_partitioned(true);
        } else {
            log::trace!("cookie attribute ignored: {:?}", String::from_utf8_lossy(name));
        }

        Ok(())
    }

    /// The `Set-Cookie:` header value.
    #[inline]
    pub fn cookie(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        WriteBuffer::write_to(self, &mut buffer);
        buffer
    }

    /// Appends the `Set-Cookie:` header value to `dst`.
    #[inline]
    pub fn append_bytes(&self, dst: &mut Vec<u8>) {
        WriteBuffer::write_to(self, dst);
    }

    /// Writes the `Set-Cookie:` header value to `writer`, returning the byte count.
    #[inline]
    pub fn write_to<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<usize> {
        write_all(self, writer)
    }
}

impl WriteBuffer for Cookie {
    fn write_to(&self, buffer: &mut Vec<u8>) {
        if !self.key.is_empty() {
            buffer.extend_from_slice(&self.key);
            buffer.push(b'=');
        }
        buffer.extend_from_slice(&self.value);

        if self.max_age != 0 {
            buffer.extend_from_slice(b"; Max-Age=");
            self.max_age.write_to(buffer);
        } else if let Some(instant) = self.expire.instant() {
            write_expires(buffer, instant);
        }

        if !self.domain.is_empty() {
            buffer.extend_from_slice(b"; Domain=");
            buffer.extend_from_slice(&self.domain);
        }
        if !self.path.is_empty() {
            buffer.extend_from_slice(b"; Path=");
            buffer.extend_from_slice(&self.path);
        }
        if self.http_only {
            buffer.extend_from_slice(b"; HttpOnly");
        }
        if self.secure {
            buffer.extend_from_slice(b"; Secure");
        }
        match self.same_site {
            SameSite::Disabled => {}
            SameSite::Default => buffer.extend_from_slice(b"; SameSite"),
            mode => {
                buffer.extend_from_slice(b"; SameSite=");
                buffer.extend_from_slice(mode.as_str().as_bytes());
            }
        }
        if self.partitioned {
            buffer.extend_from_slice(b"; Partitioned");
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.cookie()))
    }
}

// REQUEST SIDE

/// Splits one `name=value` token of a `Cookie:` header.
///
/// Whitespace around both parts and double quotes around the value are
/// dropped. Without `=` the whole token is the name. When `src` still holds
/// `;`, the last non-empty pair wins.
///
/// # Examples
/// ```
/// use maker_wire::cookie::parse_request_cookie_pair;
///
/// assert_eq!(parse_request_cookie_pair(b"foo=bar=aaa"), (&b"foo"[..], &b"bar=aaa"[..]));
/// assert_eq!(parse_request_cookie_pair(b"key"), (&b"key"[..], &b""[..]));
/// assert_eq!(parse_request_cookie_pair(b"=value"), (&b""[..], &b"value"[..]));
/// assert_eq!(parse_request_cookie_pair(b"key=; key2=abc"), (&b"key2"[..], &b"abc"[..]));
/// ```
pub fn parse_request_cookie_pair(src: &[u8]) -> (&[u8], &[u8]) {
    let mut last = LastPair::default();
    // No limit, cannot fail
    let _ = Query::split_into(&mut last, src, b';', true, usize::MAX);

    let (key, value) = last.pair.unwrap_or_default();
    (key, unquote(value))
}

/// Keeps only the most recent pair.
#[derive(Default)]
struct LastPair<'a> {
    pair: Option<(&'a [u8], &'a [u8])>,
    count: usize,
}

impl<'a> QueryCollector<'a> for LastPair<'a> {
    #[inline(always)]
    fn add_param(&mut self, key: &'a [u8], value: Option<&'a [u8]>) {
        self.pair = Some((key, value.unwrap_or_default()));
        self.count += 1;
    }

    #[inline(always)]
    fn length(&self) -> usize {
        self.count
    }

    #[inline(always)]
    fn with_capacity(_: usize) -> Self {
        Self::default()
    }
}

/// Calls `f` with every `name=value` pair of a `Cookie:` header, in order.
///
/// # Examples
/// ```
/// use maker_wire::cookie::visit_request_cookies;
///
/// let mut seen = Vec::new();
/// visit_request_cookies(b"  foo=bar;  aaa=\"bbb\"  ;;flag", |k, v| seen.push((k.to_vec(), v.to_vec())));
///
/// assert_eq!(seen, [
///     (b"foo".to_vec(), b"bar".to_vec()),
///     (b"aaa".to_vec(), b"bbb".to_vec()),
///     (b"flag".to_vec(), b"".to_vec()),
/// ]);
/// ```
pub fn visit_request_cookies<F>(header: &[u8], f: F)
where
    F: FnMut(&[u8], &[u8]),
{
    // No limit, cannot fail
    let _ = visit_pairs(header, usize::MAX, f);
}

/// [`visit_request_cookies`] that stops after `limits.max_cookies` pairs.
///
/// # Errors
/// [`Error::TooManyArgs`] if the header holds more pairs than allowed.
/// The pairs within the limit have been visited by then.
pub fn visit_request_cookies_with_limits<F>(header: &[u8], limits: &CookieLimits, f: F) -> Result<()>
where
    F: FnMut(&[u8], &[u8]),
{
    visit_pairs(header, limits.max_cookies, f).map_err(|err| {
        log::warning!("cookie header truncated: {err}");
        err
    })
}

fn visit_pairs<F>(header: &[u8], limit: usize, mut f: F) -> Result<()>
where
    F: FnMut(&[u8], &[u8]),
{
    let mut pairs: Vec<(&[u8], &[u8])> = Vec::new();
    let result = Query::split_into(&mut pairs, header, b';', true, limit);

    for (key, value) in pairs {
        f(key, unquote(value));
    }
    result
}

/// Writes pairs as a `Cookie:` header value: `k1=v1; k2=v2`.
///
/// A pair with an empty name is written as its value alone.
///
/// # Examples
/// ```
/// use maker_wire::cookie::append_request_cookies;
///
/// let mut header = Vec::new();
/// append_request_cookies(&mut header, [("foo", "bar"), ("", "solo"), ("a", "")]);
/// assert_eq!(header, b"foo=bar; solo; a=");
/// ```
pub fn append_request_cookies<I, K, V>(dst: &mut Vec<u8>, pairs: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    for (i, (key, value)) in pairs.into_iter().enumerate() {
        if i > 0 {
            dst.extend_from_slice(b"; ");
        }
        let key = key.as_ref();
        if !key.is_empty() {
            dst.extend_from_slice(key);
            dst.push(b'=');
        }
        dst.extend_from_slice(value.as_ref());
    }
}

// RESPONSE SIDE

/// Parses every `Set-Cookie:` header value of a response and calls `f` with
/// each cookie.
///
/// Lines are independent: a malformed one is skipped. Returns the number of
/// cookies visited.
///
/// # Examples
/// ```
/// use maker_wire::cookie::visit_set_cookies;
///
/// let lines = ["a=1; Path=/", ";broken", "b=2; Secure"];
/// let mut keys = Vec::new();
///
/// let visited = visit_set_cookies(lines, |cookie| keys.push(cookie.key().to_vec()));
/// assert_eq!(visited, 2);
/// assert_eq!(keys, [b"a".to_vec(), b"b".to_vec()]);
/// ```
pub fn visit_set_cookies<I, F>(lines: I, mut f: F) -> usize
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
    F: FnMut(&Cookie),
{
    let mut cookie = Cookie::new();
    let mut visited = 0;

    for line in lines {
        match cookie.parse(line) {
            Ok(()) => {
                f(&cookie);
                visited += 1;
            }
            Err(err) => {
                log::debug!("Set-Cookie skipped: {err}");
            }
        }
    }

    visited
}

// HELPERS

/// Cuts the next `;`-terminated segment off `rest`.
fn next_segment<'a>(rest: &mut &'a [u8]) -> &'a [u8] {
    let data: &'a [u8] = rest;
    match memchr(b';', data) {
        Some(end) => {
            *rest = &data[end + 1..];
            &data[..end]
        }
        None => {
            *rest = &[];
            data
        }
    }
}

/// `name=value` split on the first `=`, both sides trimmed.
fn split_pair(segment: &[u8]) -> (&[u8], Option<&[u8]>) {
    match memchr(b'=', segment) {
        Some(i) => (
            trim_whitespace(&segment[..i]),
            Some(trim_whitespace(&segment[i + 1..])),
        ),
        None => (segment, None),
    }
}

#[inline]
fn unquote(value: &[u8]) -> &[u8] {
    match value {
        [b'"', inner @ .., b'"'] => inner,
        _ => value,
    }
}

// DATES

fn write_expires(buffer: &mut Vec<u8>, instant: OffsetDateTime) {
    let Some(utc) = instant.checked_to_offset(UtcOffset::UTC) else {
        log::debug!("cookie expiration out of range: {instant}");
        return;
    };

    let mut date = Vec::with_capacity(29);
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    match utc.format_into(&mut date, format) {
        Ok(_) => {
            buffer.extend_from_slice(b"; Expires=");
            buffer.extend_from_slice(&date);
        }
        Err(err) => {
            log::debug!("cookie expiration not written: {err}");
        }
    }
}

/// Parses the date layouts seen in `Expires`:
/// - `Mon, 02 Jan 2006 15:04:05 GMT` (IMF-fixdate)
/// - `Mon, 02-Jan-2006 15:04:05 GMT`
/// - `Monday, 02-Jan-06 15:04:05 GMT` (RFC 850)
/// - `Mon Jan  2 15:04:05 2006` (asctime, UTC)
///
/// The zone is `GMT`, `UTC`, `UT`, `Z`, a US zone abbreviation or `+hhmm`.
fn parse_http_date(src: &[u8]) -> Option<OffsetDateTime> {
    let text = simdutf8::basic::from_utf8(src).ok()?;
    let tokens: Vec<&str> = text.split_ascii_whitespace().collect();

    let asctime = format_description!(
        "[weekday repr:short case_sensitive:false] [month repr:short case_sensitive:false] [day padding:none] [hour]:[minute]:[second] [year]"
    );
    if let Ok(date) = PrimitiveDateTime::parse(&tokens.join(" "), asctime) {
        return Some(date.assume_utc());
    }

    let (zone, rest) = tokens.split_last()?;
    let offset = zone_offset(zone)?;

    let expanded = rest.get(1).and_then(|date| expand_short_year(date));
    let mut parts = rest.to_vec();
    if let Some(expanded) = &expanded {
        parts[1] = expanded.as_str();
    }
    let rest = parts.join(" ");

    #[rustfmt::skip]
    let layouts: [&[_]; 3] = [
        format_description!("[weekday repr:short case_sensitive:false], [day padding:none] [month repr:short case_sensitive:false] [year] [hour]:[minute]:[second]"),
        format_description!("[weekday repr:short case_sensitive:false], [day padding:none]-[month repr:short case_sensitive:false]-[year] [hour]:[minute]:[second]"),
        format_description!("[weekday case_sensitive:false], [day padding:none]-[month repr:short case_sensitive:false]-[year] [hour]:[minute]:[second]"),
    ];

    layouts
        .iter()
        .find_map(|layout| PrimitiveDateTime::parse(&rest, *layout).ok())
        .map(|date| date.assume_offset(offset))
}

/// `02-Jan-06` to `02-Jan-2006`, two-digit years below 70 are 20xx.
fn expand_short_year(date: &str) -> Option<String> {
    let (day_month, year) = date.rsplit_once('-')?;
    if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let century = match year < "70" {
        true => "20",
        false => "19",
    };
    Some(format!("{day_month}-{century}{year}"))
}

fn zone_offset(zone: &str) -> Option<UtcOffset> {
    #[rustfmt::skip]
    const ZONES: [(&str, i8); 12] = [
        ("GMT", 0), ("UTC", 0), ("UT", 0), ("Z", 0),
        ("EST", -5), ("EDT", -4), ("CST", -6), ("CDT", -5),
        ("MST", -7), ("MDT", -6), ("PST", -8), ("PDT", -7),
    ];

    if let Some((_, hours)) = ZONES.iter().find(|(name, _)| name.eq_ignore_ascii_case(zone)) {
        return UtcOffset::from_hms(*hours, 0, 0).ok();
    }

    // +hhmm / -hhmm
    let (sign, digits) = match zone.as_bytes() {
        [b'+', digits @ ..] => (1, digits),
        [b'-', digits @ ..] => (-1, digits),
        _ => return None,
    };
    if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hours = ((digits[0] - b'0') * 10 + (digits[1] - b'0')) as i8;
    let minutes = ((digits[2] - b'0') * 10 + (digits[3] - b'0')) as i8;
    UtcOffset::from_hms(sign * hours, sign * minutes, 0).ok()
}
