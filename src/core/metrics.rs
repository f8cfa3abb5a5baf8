//! Handler metrics for observability
//!
//! Output handlers never report write failures to the logging call site.
//! These counters are where such failures become visible.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by the stream handlers
///
/// # Example
///
/// ```
/// use logged::HandlerMetrics;
///
/// let metrics = HandlerMetrics::new();
/// metrics.record_logged();
/// metrics.record_write(128);
///
/// assert_eq!(metrics.records_logged(), 1);
/// assert_eq!(metrics.bytes_written(), 128);
/// ```
#[derive(Debug)]
pub struct HandlerMetrics {
    /// Records accepted for output
    records_logged: AtomicU64,

    /// Records ignored because the handler was already closed
    records_dropped: AtomicU64,

    /// Writes issued to the underlying writer
    writes: AtomicU64,

    /// Bytes handed to the underlying writer successfully
    bytes_written: AtomicU64,

    /// Writes that returned an error
    write_failures: AtomicU64,
}

impl HandlerMetrics {
    pub const fn new() -> Self {
        Self {
            records_logged: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_logged(&self) -> u64 {
        self.records_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_dropped(&self) -> u64 {
        self.records_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.records_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.records_dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a successful write of `bytes`
    #[inline]
    pub fn record_write(&self, bytes: usize) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a failed write, returning the previous failure count
    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.records_logged.store(0, Ordering::Relaxed);
        self.records_dropped.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for HandlerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HandlerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            records_logged: AtomicU64::new(self.records_logged()),
            records_dropped: AtomicU64::new(self.records_dropped()),
            writes: AtomicU64::new(self.writes()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}

/// Report a write failure nobody else will see
///
/// Prints the first failure and every 1000th after it.
pub(crate) fn report_write_failure(
    metrics: &HandlerMetrics,
    context: &str,
    err: &std::io::Error,
) {
    let previous = metrics.record_write_failure();
    if previous == 0 || (previous + 1) % 1000 == 0 {
        eprintln!(
            "[LOGGED ERROR] {} failed ({} failures so far): {}",
            context,
            previous + 1,
            err
        );
    }
}
