//! maker_wire - byte-oriented HTTP wire codec
//!
//! The pieces of an HTTP/1.x message that carry structured text, parsed and
//! serialized without going through `String`: query arguments, URIs, paths
//! and cookies. Everything works on `&[u8]`, so malformed UTF-8 in a request
//! never becomes a parse error of its own.
//!
//! # Components
//!
//! - [`percent`] - `%XX` decoding and encoding with per-component [encode sets](percent::EncodeSet)
//! - [`query`] - zero-copy splitter for `key=value&...` lists
//! - [`Args`] - ordered, duplicate-preserving multimap for query strings and form bodies
//! - [`PathNormalizer`] - dot-segment and duplicate-slash resolution
//! - [`Uri`] - absolute and relative URI parsing, reference resolution, serialization
//! - [`Cookie`] and [`cookie`] - `Set-Cookie:` values and `Cookie:` request headers
//!
//! # Examples
//!
//! Resolving a redirect:
//! ```
//! use maker_wire::Uri;
//!
//! let mut uri = Uri::new();
//! uri.parse(b"", b"https://Example.com/shop/list?page=2").unwrap();
//!
//! uri.update(b"../item/42?ref=list#top");
//! assert_eq!(uri.to_string(), "https://example.com/item/42?ref=list#top");
//! assert_eq!(uri.query_args().peek(b"ref"), b"list");
//! ```
//! Building a query string:
//! ```
//! use maker_wire::Args;
//!
//! let mut args = Args::new();
//! args.add("q", "rust http");
//! args.add_uint("page", 3);
//! args.add_no_value("debug");
//!
//! assert_eq!(args.to_string(), "q=rust+http&page=3&debug");
//! ```
//! Reading cookies:
//! ```
//! use maker_wire::{cookie::visit_request_cookies, Cookie};
//!
//! let mut names = Vec::new();
//! visit_request_cookies(b"theme=dark; session=abc", |name, _| names.push(name.to_vec()));
//! assert_eq!(names, [b"theme".to_vec(), b"session".to_vec()]);
//!
//! let mut cookie = Cookie::new();
//! cookie.parse("session=abc; Path=/; HttpOnly").unwrap();
//! assert_eq!(cookie.to_string(), "session=abc; Path=/; HttpOnly");
//! ```
//!
//! # Features
//!
//! - `log` - emit diagnostics (dropped input, truncated headers) through the [`log`](https://docs.rs/log) facade

mod log;

pub(crate) mod http {
    pub(crate) mod args;
    pub mod cookie;
    pub(crate) mod path;
    pub mod percent;
    pub mod query;
    pub(crate) mod types;
    pub(crate) mod uri;
    pub(crate) mod write;
}
pub(crate) mod errors;
pub mod limits;

pub use crate::{
    errors::{Error, Result},
    http::{
        args::Args,
        cookie,
        cookie::{Cookie, Expire, SameSite},
        path::PathNormalizer,
        percent, query,
        uri::Uri,
        write::WriteBuffer,
    },
};
