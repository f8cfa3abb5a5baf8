//! Size and time buffered stream handler
//!
//! Encoded records collect in a pending buffer that is written out when
//! either trigger fires:
//! - the pending buffer reaches `max_bytes` (flushed by the `log` call that
//!   crossed it, before that call returns)
//! - the background worker's flush interval ticks
//!
//! Delivery is best-effort. Write errors during `log` or a timed flush are
//! counted in [`HandlerMetrics`] and reported on stderr; only the final
//! flush in `close` returns its error.

use crate::core::buffer;
use crate::core::error::{LoggedError, Result};
use crate::core::handler::Handler;
use crate::core::level::Level;
use crate::core::metrics::{report_write_failure, HandlerMetrics};
use crate::core::value::Value;
use crate::formats::Formatter;
use crossbeam_channel::{bounded, never, select, tick, Receiver, Sender};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Upper bound on the pending buffer's preallocation
const MAX_PREALLOC: usize = 64 * 1024;

/// Buffered handler writing to `W` from both callers and a flush worker
///
/// # Example
///
/// ```
/// use logged::{BufferedStreamHandler, Format, Handler, Level};
/// use std::time::Duration;
///
/// let h = BufferedStreamHandler::new(std::io::sink(), 4096, Duration::from_secs(1), Format::Logfmt);
/// h.log("queued", Level::Info, &[]);
/// h.close().expect("final flush");
/// ```
pub struct BufferedStreamHandler<W: Write + Send + 'static> {
    shared: Arc<Shared<W>>,
    formatter: Box<dyn Formatter>,
    max_bytes: usize,
    worker: Mutex<Worker>,
}

struct Worker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

struct Shared<W> {
    state: Mutex<State<W>>,
    /// Fast-path hint; `State::writer` being gone is authoritative
    closed: AtomicBool,
    metrics: HandlerMetrics,
}

struct State<W> {
    pending: Vec<u8>,
    writer: Option<W>,
}

impl<W: Write + Send + 'static> BufferedStreamHandler<W> {
    /// Create the handler and start its flush worker
    ///
    /// A zero `flush_interval` disables timed flushes; records are then
    /// written only when `max_bytes` is reached or on close.
    pub fn new(
        writer: W,
        max_bytes: usize,
        flush_interval: Duration,
        formatter: impl Formatter + 'static,
    ) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                pending: Vec::with_capacity(max_bytes.min(MAX_PREALLOC)),
                writer: Some(writer),
            }),
            closed: AtomicBool::new(false),
            metrics: HandlerMetrics::new(),
        });

        let (stop_tx, stop_rx) = bounded::<()>(0);
        let ticker = if flush_interval.is_zero() {
            never()
        } else {
            tick(flush_interval)
        };

        let worker_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || worker_shared.run(stop_rx, ticker));

        Self {
            shared,
            formatter: Box::new(formatter),
            max_bytes,
            worker: Mutex::new(Worker {
                stop: Some(stop_tx),
                handle: Some(handle),
            }),
        }
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.shared.metrics
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Bytes encoded but not yet written
    pub fn pending_len(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Write out whatever is pending now
    pub fn flush(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        self.shared
            .flush(&mut state)
            .map_err(|e| LoggedError::io_operation("flushing buffered records", e))
    }
}

impl<W: Write + Send + 'static> Shared<W> {
    fn run(&self, stop: Receiver<()>, ticker: Receiver<Instant>) {
        loop {
            select! {
                // The sender is dropped by close; that disconnect is the stop signal
                recv(stop) -> _ => break,
                recv(ticker) -> _ => {
                    let mut state = self.state.lock();
                    if let Err(e) = self.flush(&mut state) {
                        report_write_failure(&self.metrics, "timed flush", &e);
                    }
                }
            }
        }
    }

    /// Write the pending bytes and empty the buffer, even on failure
    fn flush(&self, state: &mut State<W>) -> io::Result<()> {
        if state.pending.is_empty() {
            return Ok(());
        }
        let result = match state.writer.as_mut() {
            Some(writer) => writer.write_all(&state.pending),
            None => Ok(()),
        };
        if result.is_ok() {
            self.metrics.record_write(state.pending.len());
        }
        state.pending.clear();
        result
    }
}

impl<W: Write + Send + 'static> Handler for BufferedStreamHandler<W> {
    fn log(&self, msg: &str, lvl: Level, ctx: &[Value]) {
        if self.shared.closed.load(Ordering::Acquire) {
            self.shared.metrics.record_dropped();
            return;
        }

        let mut buf = buffer::pool().get();
        self.formatter.format_into(msg, lvl, ctx, &mut buf);

        let mut state = self.shared.state.lock();
        if state.writer.is_none() {
            self.shared.metrics.record_dropped();
            return;
        }

        state.pending.extend_from_slice(buf.as_bytes());
        drop(buf);
        self.shared.metrics.record_logged();

        if state.pending.len() >= self.max_bytes {
            if let Err(e) = self.shared.flush(&mut state) {
                report_write_failure(&self.shared.metrics, "size-triggered flush", &e);
            }
        }
    }

    /// Stop the worker, write what is pending and release the writer
    ///
    /// Once this returns no further flush runs and every later `log` call
    /// is a no-op. Calling it again returns `Ok(())`.
    fn close(&self) -> Result<()> {
        let (stop, handle) = {
            let mut worker = self.worker.lock();
            (worker.stop.take(), worker.handle.take())
        };
        drop(stop);
        let worker_panicked = match handle {
            Some(handle) => handle.join().is_err(),
            None => false,
        };

        self.shared.closed.store(true, Ordering::Release);
        let mut state = self.shared.state.lock();
        let flushed = self.shared.flush(&mut state);
        let writer = state.writer.take();
        drop(state);

        let Some(mut writer) = writer else {
            return Ok(());
        };
        let writer_flushed = writer.flush();

        if worker_panicked {
            return Err(LoggedError::WorkerPanicked);
        }
        flushed.map_err(|e| LoggedError::io_operation("flushing buffered records", e))?;
        writer_flushed.map_err(|e| LoggedError::io_operation("flushing buffered writer", e))
    }
}

impl<W: Write + Send + 'static> Drop for BufferedStreamHandler<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGED ERROR] Failed to close buffered handler: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx;
    use crate::formats::Format;
    use crate::handlers::test_util::{wait_for, FailingWriter, SharedBuf};

    const RECORD: &str = "lvl=eror msg=\"some message\"\n";

    #[test]
    fn test_buffered_stream_handler() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 2000, Duration::from_secs(1), Format::Logfmt);

        h.log("some message", Level::Error, &[]);
        assert_eq!(out.contents(), "");
        assert_eq!(h.pending_len(), RECORD.len());

        h.close().unwrap();

        assert_eq!(out.contents(), RECORD);
    }

    #[test]
    fn test_buffered_sends_messages_after_flush_interval() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 2000, Duration::from_millis(5), Format::Logfmt);

        h.log("some message", Level::Error, &[]);

        assert!(wait_for(Duration::from_secs(2), || out.contents() == RECORD));
        h.close().unwrap();
        assert_eq!(out.contents(), RECORD);
    }

    #[test]
    fn test_buffered_sends_messages_after_flush_bytes() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 40, Duration::from_secs(60), Format::Logfmt);

        h.log("some message", Level::Error, &[]);
        assert_eq!(out.contents(), "");

        h.log("some message", Level::Error, &[]);

        // Flushed synchronously by the second call, in a single write
        assert_eq!(out.contents(), RECORD.repeat(2));
        assert_eq!(out.write_calls(), 1);
        assert_eq!(h.pending_len(), 0);
    }

    #[test]
    fn test_buffered_doesnt_write_after_close() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 40, Duration::from_secs(1), Format::Logfmt);
        h.close().unwrap();

        h.log("some message", Level::Error, &[]);
        h.log("some message", Level::Error, &[]);

        assert_eq!(out.contents(), "");
        assert_eq!(h.metrics().records_dropped(), 2);
    }

    #[test]
    fn test_buffered_close_is_idempotent() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 2000, Duration::from_secs(1), Format::Json);

        h.log("once", Level::Info, &ctx!["k", "v"]);
        h.close().unwrap();
        h.close().unwrap();

        assert_eq!(out.contents(), "{\"lvl\":\"info\",\"msg\":\"once\",\"k\":\"v\"}\n");
    }

    #[test]
    fn test_buffered_zero_interval_disables_timer() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 2000, Duration::ZERO, Format::Logfmt);

        h.log("some message", Level::Error, &[]);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(out.contents(), "");

        h.close().unwrap();
        assert_eq!(out.contents(), RECORD);
    }

    #[test]
    fn test_buffered_empty_tick_writes_nothing() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 2000, Duration::from_millis(1), Format::Logfmt);

        std::thread::sleep(Duration::from_millis(20));
        h.close().unwrap();

        assert_eq!(out.write_calls(), 0);
    }

    #[test]
    fn test_buffered_explicit_flush() {
        let out = SharedBuf::default();
        let h = BufferedStreamHandler::new(out.clone(), 2000, Duration::from_secs(60), Format::Logfmt);

        h.log("some message", Level::Error, &[]);
        h.flush().unwrap();

        assert_eq!(out.contents(), RECORD);
        assert_eq!(h.metrics().bytes_written(), RECORD.len() as u64);
    }

    #[test]
    fn test_buffered_drop_flushes() {
        let out = SharedBuf::default();
        {
            let h = BufferedStreamHandler::new(out.clone(), 2000, Duration::from_secs(60), Format::Logfmt);
            h.log("some message", Level::Error, &[]);
        }

        assert_eq!(out.contents(), RECORD);
    }

    #[test]
    fn test_buffered_close_reports_final_write_error() {
        let h = BufferedStreamHandler::new(FailingWriter, 2000, Duration::from_secs(60), Format::Logfmt);

        h.log("some message", Level::Error, &[]);
        let err = h.close().unwrap_err();

        assert!(matches!(err, LoggedError::IoOperation { .. }));
        assert!(h.close().is_ok());
    }

    #[test]
    fn test_buffered_close_flushes_writer_after_failed_write() {
        struct FlushTracking(Arc<AtomicBool>);

        impl Write for FlushTracking {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink gone"))
            }

            fn flush(&mut self) -> io::Result<()> {
                self.0.store(true, Ordering::SeqCst);
                Ok(())
            }
        }

        let flushed = Arc::new(AtomicBool::new(false));
        let h = BufferedStreamHandler::new(
            FlushTracking(Arc::clone(&flushed)),
            2000,
            Duration::from_secs(60),
            Format::Logfmt,
        );

        h.log("some message", Level::Error, &[]);
        assert!(h.close().is_err());

        assert!(flushed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_buffered_close_reports_panicked_worker_over_write_error() {
        let h = BufferedStreamHandler::new(FailingWriter, 2000, Duration::from_secs(60), Format::Logfmt);

        // Swap in a worker that dies so the join fails
        let (stop, handle) = {
            let mut worker = h.worker.lock();
            let panicking = thread::spawn(|| panic!("worker died"));
            (worker.stop.take(), worker.handle.replace(panicking))
        };
        drop(stop);
        handle.unwrap().join().unwrap();

        h.log("some message", Level::Error, &[]);
        let err = h.close().unwrap_err();

        assert!(matches!(err, LoggedError::WorkerPanicked));
        assert!(h.close().is_ok());
    }

    #[test]
    fn test_buffered_absorbs_size_triggered_write_error() {
        let h = BufferedStreamHandler::new(FailingWriter, 1, Duration::from_secs(60), Format::Logfmt);

        h.log("some message", Level::Error, &[]);

        assert_eq!(h.metrics().write_failures(), 1);
        assert_eq!(h.pending_len(), 0);
    }

    #[test]
    fn test_buffered_concurrent_logging() {
        let out = SharedBuf::default();
        let h = Arc::new(BufferedStreamHandler::new(
            out.clone(),
            256,
            Duration::from_millis(1),
            Format::Logfmt,
        ));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let h = Arc::clone(&h);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        h.log("concurrent", Level::Info, &ctx!["thread", t, "i", i]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("logging thread panicked");
        }
        h.close().unwrap();

        let contents = out.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 400);
        assert!(lines.iter().all(|l| l.starts_with("lvl=info msg=\"concurrent\" thread=")));
    }
}
