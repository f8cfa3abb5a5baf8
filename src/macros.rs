//! Logging macros taking the context as trailing key/value arguments.
//!
//! Each macro forwards to the matching [`Logger`](crate::Logger) method,
//! building the context with [`ctx!`](crate::ctx).
//!
//! # Examples
//!
//! ```
//! use logged::{info, warn, DiscardHandler, Logger};
//!
//! let logger = Logger::new(DiscardHandler, Vec::new());
//!
//! // Message only
//! info!(logger, "server started");
//!
//! // Message with context
//! let port = 8080;
//! info!(logger, "listening", "port", port, "tls", true);
//!
//! // Owned messages work too
//! warn!(logger, format!("retry {} of {}", 3, 5), "backoff_ms", 250);
//! ```

/// Log at an explicit level.
///
/// ```
/// # use logged::{DiscardHandler, Level, Logger};
/// # let logger = Logger::new(DiscardHandler, Vec::new());
/// use logged::log;
/// log!(logger, Level::Info, "simple message");
/// log!(logger, Level::Error, "request failed", "status", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(, $item:expr)* $(,)?) => {
        $logger.log(
            $level,
            ::std::convert::AsRef::<str>::as_ref(&$msg),
            &$crate::ctx![$($item),*],
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $item:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Debug, $msg $(, $item)*)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $item:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Info, $msg $(, $item)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $msg:expr $(, $item:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Warn, $msg $(, $item)*)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $item:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Error, $msg $(, $item)*)
    };
}

/// Log a critical message.
///
/// ```
/// # use logged::{DiscardHandler, Logger};
/// # let logger = Logger::new(DiscardHandler, Vec::new());
/// use logged::crit;
/// crit!(logger, "disk full", "mount", "/var");
/// ```
#[macro_export]
macro_rules! crit {
    ($logger:expr, $msg:expr $(, $item:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Crit, $msg $(, $item)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Level, Logger, Value};
    use crate::formats::Format;
    use crate::handlers::test_util::SharedBuf;
    use crate::handlers::StreamHandler;

    fn logfmt_logger() -> (Logger, SharedBuf) {
        let out = SharedBuf::default();
        let logger = Logger::new(StreamHandler::new(out.clone(), Format::Logfmt), Vec::new());
        (logger, out)
    }

    #[test]
    fn test_log_macro() {
        let (logger, out) = logfmt_logger();

        log!(logger, Level::Info, "plain");
        log!(logger, Level::Error, "failed", "code", 500,);

        assert_eq!(
            out.contents(),
            "lvl=info msg=\"plain\"\nlvl=eror msg=\"failed\" code=500\n"
        );
    }

    #[test]
    fn test_level_macros() {
        let (logger, out) = logfmt_logger();

        debug!(logger, "d");
        info!(logger, "i", "n", 1u8);
        warn!(logger, "w", "ok", false);
        error!(logger, "e", "who", String::from("me"));
        crit!(logger, "c", "none", Option::<i32>::None);

        assert_eq!(
            out.contents(),
            "lvl=dbug msg=\"d\"\n\
             lvl=info msg=\"i\" n=1\n\
             lvl=warn msg=\"w\" ok=false\n\
             lvl=eror msg=\"e\" who=me\n\
             lvl=crit msg=\"c\" none=\n"
        );
    }

    #[test]
    fn test_macro_accepts_owned_message() {
        let (logger, out) = logfmt_logger();

        info!(logger, format!("retry {}", 2), "v", Value::display(&1.5f32));

        assert_eq!(out.contents(), "lvl=info msg=\"retry 2\" v=1.5\n");
    }

    #[test]
    fn test_macro_normalizes_odd_context() {
        let (logger, out) = logfmt_logger();

        warn!(logger, "odd", "lonely");

        assert_eq!(
            out.contents(),
            "lvl=warn msg=\"odd\" lonely= LOGGED_ERROR=\"Normalised odd number of arguments by adding nil\"\n"
        );
    }
}
