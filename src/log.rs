#![allow(unused)]

// Without the `log` feature the arguments are still type checked and count as used.

macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::trace!($($tt)*);
        #[cfg(not(feature = "log"))]
        let _ = ::core::format_args!($($tt)*);
    };
}

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::debug!($($tt)*);
        #[cfg(not(feature = "log"))]
        let _ = ::core::format_args!($($tt)*);
    };
}

macro_rules! warning {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::warn!($($tt)*);
        #[cfg(not(feature = "log"))]
        let _ = ::core::format_args!($($tt)*);
    };
}

pub(crate) use {debug, trace, warning};

#[cfg(test)]
mod tests {
    #[test]
    #[deny(unused_variables)]
    fn arguments_are_used() {
        let err = crate::Error::NoCookie;
        let name = "Max-Age";
        let len = 3;

        debug!("skipped: {err}");
        trace!("ignored: {:?}", name);
        warning!("{} bytes", len);
    }
}
