use std::result;

/// Result alias used across the crate.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors returned by the codecs.
///
/// Parsing is lenient wherever a canonical fallback exists, so only
/// structurally broken input ends up here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The URI contains control bytes or an invalid scheme.
    #[error("invalid uri")]
    InvalidUri,
    /// The host part is empty where one is required or is a broken IPv6 literal.
    #[error("invalid host")]
    InvalidHost,
    /// The zone identifier of an IPv6 literal is not escaped as `%25` or is empty.
    #[error("invalid ipv6 zone identifier")]
    InvalidIpv6Zone,
    /// The port suffix is empty or not numeric.
    #[error("invalid port")]
    InvalidPort,
    /// The userinfo part is ambiguous, e.g. holds a second `@`.
    #[error("invalid userinfo")]
    InvalidUserinfo,

    /// A typed argument is absent or not a valid number.
    #[error("value is not a valid number")]
    NumericFormat,
    /// More pairs than allowed by [`ArgsLimits`](crate::limits::ArgsLimits)
    /// or [`CookieLimits`](crate::limits::CookieLimits).
    #[error("too many query arguments (limit: {0})")]
    TooManyArgs(usize),
    /// The raw query string is longer than the configured limit.
    #[error("query string too long (limit: {0} bytes)")]
    ArgsTooLong(usize),

    /// The cookie has no `key=value` segment.
    #[error("no cookies found")]
    NoCookie,
    /// `Max-Age` is not an integer.
    #[error("invalid Max-Age attribute")]
    InvalidMaxAge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        #[rustfmt::skip]
        let cases = [
            (Error::InvalidPort, "invalid port"),
            (Error::TooManyArgs(16), "too many query arguments (limit: 16)"),
            (Error::NoCookie, "no cookies found"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
