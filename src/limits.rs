//! Parsing limits for untrusted input
//!
//! # Security-First Defaults
//!
//! The plain parsers ([`Args::parse`](crate::Args::parse),
//! [`visit_request_cookies`](crate::cookie::visit_request_cookies)) accept
//! input of any size. When the input comes straight from a client, use the
//! `*_with_limits` variants so a single request cannot blow up:
//! - Query parameter explosion
//! - Oversized form bodies
//! - Cookie header flooding
//!
//! # Examples
//!
//! ```
//! use maker_wire::{Args, Error, limits::ArgsLimits};
//!
//! let limits = ArgsLimits {
//!     max_pairs: 2,
//!     ..ArgsLimits::default()
//! };
//!
//! let mut args = Args::new();
//! assert!(args.parse_with_limits("a=1&b=2", &limits).is_ok());
//! assert_eq!(
//!     args.parse_with_limits("a=1&b=2&c=3", &limits),
//!     Err(Error::TooManyArgs(2))
//! );
//! ```

/// Limits applied by [`Args::parse_with_limits`](crate::Args::parse_with_limits).
#[derive(Debug, Clone)]
pub struct ArgsLimits {
    /// Maximum number of `key=value` pairs (default: `256`)
    ///
    /// Empty segments (`&&`) are skipped and do not count.
    pub max_pairs: usize,
    /// Maximum length of the raw query string or form body in bytes (default: `64 KB`)
    ///
    /// A leading `?` counts as well.
    pub max_len: usize,
}

impl Default for ArgsLimits {
    fn default() -> Self {
        Self {
            max_pairs: 256,
            max_len: 64 * 1024,
        }
    }
}

/// Limits applied by
/// [`visit_request_cookies_with_limits`](crate::cookie::visit_request_cookies_with_limits).
#[derive(Debug, Clone)]
pub struct CookieLimits {
    /// Maximum number of cookies visited in one `Cookie:` header (default: `64`)
    ///
    /// Browsers cap cookies per domain well below this. Pairs after the
    /// limit are not visited and the call reports
    /// [`Error::TooManyArgs`](crate::Error::TooManyArgs).
    pub max_cookies: usize,
}

impl Default for CookieLimits {
    fn default() -> Self {
        Self { max_cookies: 64 }
    }
}
