//! # logged
//!
//! Structured logging with key/value context, encoded as JSON or logfmt.
//!
//! ## Features
//!
//! - **Two encodings**: one JSON object or one logfmt line per record
//! - **Buffered output**: records batch in memory and flush on size, on a
//!   timer, or on close, from a background thread
//! - **Composable handlers**: level filtering and discard decorators around
//!   any [`Handler`]
//! - **Pooled buffers**: encoding reuses scratch buffers across calls
//!
//! ## Example
//!
//! ```
//! use logged::{ctx, info, DiscardHandler, Logger};
//!
//! let logger = Logger::new(DiscardHandler, ctx!["app", "demo"]);
//! info!(logger, "listening", "port", 8080, "tls", false);
//! ```

pub mod core;
pub mod formats;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Handler, Level, LoggedError, Logger, LoggerBuilder, LoggerConfig, Result, Value,
    };
    pub use crate::formats::{Format, Formatter};
    pub use crate::handlers::{
        open_log_file, BufferedStreamHandler, DiscardHandler, LevelFilterHandler, StreamHandler,
    };
    pub use crate::{crit, ctx, debug, error, info, warn};
}

pub use crate::core::{
    handler_fn, normalize, pool, BitSize, Buffer, BufferConfig, BufferPool, FloatFormat,
    Handler, HandlerFn, HandlerMetrics, Level, LoggedError, Logger, LoggerBuilder, LoggerConfig,
    PooledBuffer, Result, Value, ERROR_KEY, NORMALIZE_NOTE,
};
pub use formats::{formatter_from_str, Format, Formatter, FormatterFn, TIME_LAYOUT};
pub use handlers::{
    open_log_file, BufferedStreamHandler, DiscardHandler, LevelFilterHandler, StreamHandler,
};
