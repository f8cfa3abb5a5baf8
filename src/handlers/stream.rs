//! Unbuffered stream handler
//!
//! Every record is encoded and written before `log` returns. Use it when
//! the writer already buffers, or when each record must reach the writer
//! immediately.

use crate::core::buffer;
use crate::core::error::{LoggedError, Result};
use crate::core::handler::Handler;
use crate::core::level::Level;
use crate::core::metrics::{report_write_failure, HandlerMetrics};
use crate::core::value::Value;
use crate::formats::Formatter;
use parking_lot::Mutex;
use std::io::{self, Write};

pub struct StreamHandler<W: Write + Send> {
    writer: Mutex<Option<W>>,
    formatter: Box<dyn Formatter>,
    metrics: HandlerMetrics,
}

impl<W: Write + Send> StreamHandler<W> {
    pub fn new(writer: W, formatter: impl Formatter + 'static) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
            formatter: Box::new(formatter),
            metrics: HandlerMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.metrics
    }
}

impl StreamHandler<io::Stdout> {
    /// Write records to standard output
    pub fn stdout(formatter: impl Formatter + 'static) -> Self {
        Self::new(io::stdout(), formatter)
    }
}

impl<W: Write + Send> Handler for StreamHandler<W> {
    fn log(&self, msg: &str, lvl: Level, ctx: &[Value]) {
        let mut buf = buffer::pool().get();
        self.formatter.format_into(msg, lvl, ctx, &mut buf);

        let mut writer = self.writer.lock();
        let Some(writer) = writer.as_mut() else {
            self.metrics.record_dropped();
            return;
        };

        self.metrics.record_logged();
        match writer.write_all(buf.as_bytes()) {
            Ok(()) => self.metrics.record_write(buf.len()),
            Err(e) => report_write_failure(&self.metrics, "stream write", &e),
        }
    }

    /// Flush and release the writer; later records are dropped
    fn close(&self) -> Result<()> {
        let Some(mut writer) = self.writer.lock().take() else {
            return Ok(());
        };
        writer
            .flush()
            .map_err(|e| LoggedError::io_operation("flushing stream writer", e))
    }
}
