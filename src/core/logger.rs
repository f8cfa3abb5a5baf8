//! Front-end logger
//!
//! Binds a handler to a fixed context and hands every call's context,
//! normalized and appended to the bound one, to the handler.

use super::{
    error::Result,
    handler::Handler,
    level::Level,
    value::{Value, ERROR_KEY},
};
use crate::formats::Format;
use crate::handlers::{BufferedStreamHandler, LevelFilterHandler, StreamHandler};
use std::borrow::Cow;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Value recorded when a context had a key without a value
pub const NORMALIZE_NOTE: &str = "Normalised odd number of arguments by adding nil";

/// Pad an odd-length context so it splits evenly into pairs
///
/// The appended entries are `nil, "LOGGED_ERROR", <note>`: the nil
/// completes the dangling pair and the error pair explains it.
pub fn normalize(ctx: &[Value]) -> Cow<'_, [Value]> {
    if ctx.len() % 2 == 0 {
        return Cow::Borrowed(ctx);
    }

    let mut padded = Vec::with_capacity(ctx.len() + 3);
    padded.extend_from_slice(ctx);
    padded.push(Value::Nil);
    padded.push(Value::from(ERROR_KEY));
    padded.push(Value::from(NORMALIZE_NOTE));
    Cow::Owned(padded)
}

fn merge(prefix: &[Value], suffix: &[Value]) -> Vec<Value> {
    let mut merged = Vec::with_capacity(prefix.len() + suffix.len());
    merged.extend_from_slice(prefix);
    merged.extend_from_slice(suffix);
    merged
}

/// Cheap to clone; clones share the handler
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
    ctx: Vec<Value>,
}

impl Logger {
    pub fn new(handler: impl Handler + 'static, ctx: Vec<Value>) -> Self {
        Self::from_arc(Arc::new(handler), ctx)
    }

    pub fn from_arc(handler: Arc<dyn Handler>, ctx: Vec<Value>) -> Self {
        let ctx = match normalize(&ctx) {
            Cow::Borrowed(_) => ctx,
            Cow::Owned(padded) => padded,
        };
        Self { handler, ctx }
    }

    /// A logger sharing this handler with `ctx` added to the bound context
    #[must_use]
    pub fn with(&self, ctx: &[Value]) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            ctx: merge(&self.ctx, &normalize(ctx)),
        }
    }

    /// The context bound to every record
    pub fn context(&self) -> &[Value] {
        &self.ctx
    }

    pub fn log(&self, lvl: Level, msg: &str, ctx: &[Value]) {
        let ctx = normalize(ctx);
        if self.ctx.is_empty() {
            self.handler.log(msg, lvl, &ctx);
        } else {
            self.handler.log(msg, lvl, &merge(&self.ctx, &ctx));
        }
    }

    #[inline]
    pub fn debug(&self, msg: &str, ctx: &[Value]) {
        self.log(Level::Debug, msg, ctx);
    }

    #[inline]
    pub fn info(&self, msg: &str, ctx: &[Value]) {
        self.log(Level::Info, msg, ctx);
    }

    #[inline]
    pub fn warn(&self, msg: &str, ctx: &[Value]) {
        self.log(Level::Warn, msg, ctx);
    }

    #[inline]
    pub fn error(&self, msg: &str, ctx: &[Value]) {
        self.log(Level::Error, msg, ctx);
    }

    #[inline]
    pub fn crit(&self, msg: &str, ctx: &[Value]) {
        self.log(Level::Crit, msg, ctx);
    }

    /// Close the underlying handler
    pub fn close(&self) -> Result<()> {
        self.handler.close()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use logged::{ctx, Format, Level, Logger};
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .format(Format::Json)
    ///     .min_level(Level::Debug)
    ///     .buffered(8 * 1024, Duration::from_secs(1))
    ///     .context(ctx!["service", "api"])
    ///     .build(std::io::sink());
    ///
    /// logger.info("ready", &ctx!["port", 8080]);
    /// logger.close().unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

/// Builder for a [`Logger`] writing to a stream
pub struct LoggerBuilder {
    format: Format,
    min_level: Level,
    buffer: Option<(usize, Duration)>,
    ctx: Vec<Value>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            format: Format::default(),
            min_level: Level::Info,
            buffer: None,
            ctx: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Least severe level that still reaches the writer
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Buffer records, flushing at `max_bytes` or every `flush_interval`
    ///
    /// If not called, every record is written as it is logged.
    #[must_use = "builder methods return a new value"]
    pub fn buffered(mut self, max_bytes: usize, flush_interval: Duration) -> Self {
        self.buffer = Some((max_bytes, flush_interval));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, ctx: Vec<Value>) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn build<W: Write + Send + 'static>(self, writer: W) -> Logger {
        let handler: Arc<dyn Handler> = match self.buffer {
            Some((max_bytes, interval)) => Arc::new(LevelFilterHandler::new(
                self.min_level,
                BufferedStreamHandler::new(writer, max_bytes, interval, self.format),
            )),
            None => Arc::new(LevelFilterHandler::new(
                self.min_level,
                StreamHandler::new(writer, self.format),
            )),
        };

        Logger::from_arc(handler, self.ctx)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handler::handler_fn;
    use crate::ctx;
    use crate::handlers::test_util::SharedBuf;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    type Captured = Arc<Mutex<Option<(String, Level, Vec<Value>)>>>;

    fn capturing_logger(ctx: Vec<Value>) -> (Logger, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&captured);
        let logger = Logger::new(
            handler_fn(move |msg: &str, lvl: Level, ctx: &[Value]| {
                *sink.lock() = Some((msg.to_string(), lvl, ctx.to_vec()));
            }),
            ctx,
        );
        (logger, captured)
    }

    #[test]
    fn test_logger_levels() {
        let cases: [(fn(&Logger), &str, Level); 5] = [
            (|l| l.debug("debug", &ctx!["level", "debug"]), "debug", Level::Debug),
            (|l| l.info("info", &ctx!["level", "info"]), "info", Level::Info),
            (|l| l.warn("warn", &ctx!["level", "warn"]), "warn", Level::Warn),
            (|l| l.error("error", &ctx!["level", "error"]), "error", Level::Error),
            (|l| l.crit("critical", &ctx!["level", "critical"]), "critical", Level::Crit),
        ];

        for (call, want_msg, want_lvl) in cases {
            let (logger, captured) = capturing_logger(Vec::new());
            call(&logger);

            let (msg, lvl, ctx) = captured.lock().take().expect("handler was called");
            assert_eq!(msg, want_msg);
            assert_eq!(lvl, want_lvl);
            assert_eq!(ctx[0], Value::from("level"));
            assert_eq!(ctx.len(), 2);
        }
    }

    #[test]
    fn test_logger_merges_ctx() {
        let (logger, captured) = capturing_logger(ctx!["a", "b"]);

        logger.debug("test", &ctx!["c", "d"]);

        let (_, _, ctx) = captured.lock().take().unwrap();
        assert_eq!(ctx, ctx!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_logger_normalizes_ctx() {
        let (logger, captured) = capturing_logger(Vec::new());

        logger.debug("test", &ctx!["a"]);

        let (_, _, ctx) = captured.lock().take().unwrap();
        assert_eq!(ctx.len(), 4);
        assert_eq!(ctx[1], Value::Nil);
        assert_eq!(ctx[2], Value::from(ERROR_KEY));
        assert_eq!(ctx[3], Value::from(NORMALIZE_NOTE));
    }

    #[test]
    fn test_logger_normalizes_bound_ctx() {
        let (logger, captured) = capturing_logger(ctx!["dangling"]);

        logger.info("test", &ctx!["k", 1]);

        let (_, _, ctx) = captured.lock().take().unwrap();
        assert_eq!(ctx.len(), 6);
        assert_eq!(ctx[4], Value::from("k"));
    }

    #[test]
    fn test_logger_with_extends_ctx() {
        let (logger, captured) = capturing_logger(ctx!["svc", "api"]);
        let child = logger.with(&ctx!["req", 7]);

        child.warn("slow", &ctx!["ms", 250]);
        let (_, _, ctx) = captured.lock().take().unwrap();
        assert_eq!(ctx, ctx!["svc", "api", "req", 7, "ms", 250]);

        logger.warn("plain", &[]);
        let (_, _, ctx) = captured.lock().take().unwrap();
        assert_eq!(ctx, ctx!["svc", "api"]);
    }

    #[test]
    fn test_normalize_borrows_even_ctx() {
        let ctx = ctx!["a", 1];
        assert!(matches!(normalize(&ctx), Cow::Borrowed(_)));
    }

    #[test]
    fn test_logger_tries_to_call_underlying_close() {
        let (logger, _) = capturing_logger(Vec::new());

        assert!(logger.close().is_ok());
    }

    #[test]
    fn test_logger_calls_underlying_close() {
        struct CloseableHandler(Arc<AtomicBool>);

        impl Handler for CloseableHandler {
            fn log(&self, _msg: &str, _lvl: Level, _ctx: &[Value]) {}

            fn close(&self) -> Result<()> {
                self.0.store(true, Ordering::SeqCst);
                Ok(())
            }
        }

        let called = Arc::new(AtomicBool::new(false));
        let logger = Logger::new(CloseableHandler(Arc::clone(&called)), Vec::new());

        logger.close().unwrap();

        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_builder_defaults() {
        let out = SharedBuf::default();
        let logger = Logger::builder().build(out.clone());

        logger.debug("hidden", &[]);
        logger.info("shown", &ctx!["n", 1.5]);

        assert_eq!(out.contents(), "lvl=info msg=\"shown\" n=1.500\n");
    }

    #[test]
    fn test_builder_buffered_json() {
        let out = SharedBuf::default();
        let logger = Logger::builder()
            .format(Format::Json)
            .min_level(Level::Debug)
            .buffered(4096, Duration::from_secs(60))
            .context(ctx!["app", "demo"])
            .build(out.clone());

        logger.debug("queued", &[]);
        assert_eq!(out.contents(), "");

        logger.close().unwrap();
        assert_eq!(
            out.contents(),
            "{\"lvl\":\"dbug\",\"msg\":\"queued\",\"app\":\"demo\"}\n"
        );
    }
}
